use std::fmt;

pub const STEPS_PER_CHANNEL: u8 = 10;
pub const CHANNEL_COUNT: usize = 3;
pub const MAX_ORDER: u8 = STEPS_PER_CHANNEL * CHANNEL_COUNT as u8;

/// One of the three staircase tracks of an Optopad Color run, presented in
/// the fixed order P, D, T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    P,
    D,
    T,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::P, Channel::D, Channel::T];

    pub fn index(self) -> usize {
        match self {
            Channel::P => 0,
            Channel::D => 1,
            Channel::T => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::P => "P",
            Channel::D => "D",
            Channel::T => "T",
        }
    }

    /// Channel presented after this one, `None` after T.
    pub fn next(self) -> Option<Channel> {
        match self {
            Channel::P => Some(Channel::D),
            Channel::D => Some(Channel::T),
            Channel::T => None,
        }
    }

    /// Global step order (1..=30) of the 1-based `step` within this channel.
    pub fn order_of(self, step: u8) -> u8 {
        self.index() as u8 * STEPS_PER_CHANNEL + step
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
