use thiserror::Error;

use crate::model::{Channel, LastCorrect, Response, STEPS_PER_CHANNEL, StepTable};

/// Consecutive misses that abandon the current channel.
pub const ABANDON_AFTER_FAILURES: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub channel: Channel,
    /// 0-based pointer within the channel.
    pub step_index: u8,
    pub consecutive_failures: u8,
    pub last_correct: LastCorrect,
}

impl Progress {
    pub fn step_number(&self) -> u8 {
        self.step_index + 1
    }

    pub fn order(&self) -> u8 {
        self.channel.order_of(self.step_number())
    }

    fn is_last_step(&self) -> bool {
        self.step_index + 1 >= STEPS_PER_CHANNEL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running(Progress),
    Finished(LastCorrect),
}

impl SessionState {
    pub fn start() -> Self {
        SessionState::Running(Progress {
            channel: Channel::P,
            step_index: 0,
            consecutive_failures: 0,
            last_correct: [0; 3],
        })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::Finished(_))
    }

    pub fn last_correct(&self) -> LastCorrect {
        match self {
            SessionState::Running(p) => p.last_correct,
            SessionState::Finished(lc) => *lc,
        }
    }

    pub fn progress(&self) -> Option<&Progress> {
        match self {
            SessionState::Running(p) => Some(p),
            SessionState::Finished(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("test already finished; response ignored")]
pub struct AlreadyFinished;

/// What a single response did to the staircase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Correct,
    Miss,
    /// Second consecutive miss; the channel was abandoned.
    Abandoned,
}

/// Applies one response. Pure: no I/O, the caller reacts to `Finished`.
pub fn transition(
    state: SessionState,
    steps: &StepTable,
    response: Response,
) -> Result<(SessionState, StepOutcome), AlreadyFinished> {
    let SessionState::Running(mut p) = state else {
        return Err(AlreadyFinished);
    };

    let expected = steps.expected(p.order());
    if response.is_correct(expected) {
        p.last_correct[p.channel.index()] = p.step_number();
        p.consecutive_failures = 0;
        let next = if p.is_last_step() {
            next_channel(p)
        } else {
            p.step_index += 1;
            SessionState::Running(p)
        };
        return Ok((next, StepOutcome::Correct));
    }

    p.consecutive_failures += 1;
    if p.consecutive_failures >= ABANDON_AFTER_FAILURES {
        return Ok((next_channel(p), StepOutcome::Abandoned));
    }
    let next = if p.is_last_step() {
        next_channel(p)
    } else {
        p.step_index += 1;
        SessionState::Running(p)
    };
    Ok((next, StepOutcome::Miss))
}

fn next_channel(p: Progress) -> SessionState {
    match p.channel.next() {
        Some(channel) => SessionState::Running(Progress {
            channel,
            step_index: 0,
            consecutive_failures: 0,
            last_correct: p.last_correct,
        }),
        None => SessionState::Finished(p.last_correct),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/engine/state.rs"]
mod tests;
