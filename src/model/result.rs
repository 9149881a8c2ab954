use serde::{Deserialize, Serialize};

use crate::model::channel::{CHANNEL_COUNT, Channel};

/// Last correctly answered step (0..=10) per channel, in P, D, T order.
pub type LastCorrect = [u8; CHANNEL_COUNT];

/// Derived threshold per channel; `None` where it cannot be computed.
pub type Thresholds = [Option<f64>; CHANNEL_COUNT];

/// Per-channel outcome stored under `response_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    pub result_p: u8,
    pub result_d: u8,
    pub result_t: u8,
    pub result_p_value: Option<f64>,
    pub result_d_value: Option<f64>,
    pub result_t_value: Option<f64>,
}

impl ResponseData {
    pub fn new(last_correct: LastCorrect, thresholds: Thresholds) -> Self {
        Self {
            result_p: last_correct[0],
            result_d: last_correct[1],
            result_t: last_correct[2],
            result_p_value: thresholds[0],
            result_d_value: thresholds[1],
            result_t_value: thresholds[2],
        }
    }

    pub fn last_correct(&self) -> LastCorrect {
        [self.result_p, self.result_d, self.result_t]
    }

    pub fn thresholds(&self) -> Thresholds {
        [self.result_p_value, self.result_d_value, self.result_t_value]
    }

    pub fn channel(&self, channel: Channel) -> (u8, Option<f64>) {
        let i = channel.index();
        (self.last_correct()[i], self.thresholds()[i])
    }
}

/// One finished Optopad Color run, as handed to the result sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub patient_id: String,
    pub test_config_id: String,
    /// Always 0 for a completed adaptive run.
    pub current_step: u32,
    /// Unix seconds at which the session finished.
    pub completed_at: u64,
    pub response_data: ResponseData,
}
