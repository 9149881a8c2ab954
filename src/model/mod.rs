pub mod channel;
pub mod response;
pub mod result;
pub mod steps;

pub use channel::{Channel, STEPS_PER_CHANNEL};
pub use response::{Direction, Response};
pub use result::{LastCorrect, ResponseData, ResultRecord, Thresholds};
pub use steps::{Step, StepConfig, StepTable, parse_decimal};

use serde::{Deserialize, Serialize};

/// Test kinds a device can be configured for. Only `OptopadColor` runs
/// through the adaptive engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    #[serde(rename = "rejilla_amsler")]
    AmslerGrid,
    #[serde(rename = "agudeza_visual")]
    VisualAcuity,
    OptopadColor,
    OptopadCsf,
}

impl TestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::AmslerGrid => "rejilla_amsler",
            TestKind::VisualAcuity => "agudeza_visual",
            TestKind::OptopadColor => "optopad_color",
            TestKind::OptopadCsf => "optopad_csf",
        }
    }

    pub fn parse(raw: &str) -> Option<TestKind> {
        match raw.trim() {
            "rejilla_amsler" => Some(TestKind::AmslerGrid),
            "agudeza_visual" => Some(TestKind::VisualAcuity),
            "optopad_color" => Some(TestKind::OptopadColor),
            "optopad_csf" => Some(TestKind::OptopadCsf),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
