pub mod json;
pub mod text;

use crate::model::{Channel, LastCorrect, ResponseData, Thresholds};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSummary {
    pub channel: Channel,
    pub last_correct: u8,
    pub threshold: Option<f64>,
}

pub fn channel_summaries(last_correct: LastCorrect, thresholds: Thresholds) -> Vec<ChannelSummary> {
    Channel::ALL
        .iter()
        .map(|&channel| ChannelSummary {
            channel,
            last_correct: last_correct[channel.index()],
            threshold: thresholds[channel.index()],
        })
        .collect()
}

pub fn summaries_of(data: &ResponseData) -> Vec<ChannelSummary> {
    Channel::ALL
        .iter()
        .map(|&channel| {
            let (last_correct, threshold) = data.channel(channel);
            ChannelSummary {
                channel,
                last_correct,
                threshold,
            }
        })
        .collect()
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_threshold(v: Option<f64>) -> String {
    match v {
        Some(v) => format_f64_6(v),
        None => "undefined".to_string(),
    }
}
