pub mod json;
pub mod sink;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::model::{ResultRecord, StepConfig, TestKind};

pub use json::JsonStore;
pub use sink::JsonLinesSink;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no {test_kind} configuration for device {device_id}")]
    ConfigNotFound {
        device_id: String,
        test_kind: TestKind,
    },
    #[error("{count} {test_kind} configurations for device {device_id}; expected one")]
    AmbiguousConfig {
        device_id: String,
        test_kind: TestKind,
        count: usize,
    },
}

/// Supplies the per-step configuration of a device's test.
pub trait StepConfigProvider {
    fn load_steps(&self, device_id: &str, test_kind: TestKind) -> Result<StepConfig, StoreError>;
}

/// Receives finished results. Deduplication is the caller's job.
pub trait ResultSink {
    fn persist(&mut self, record: &ResultRecord) -> Result<(), StoreError>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn persist(&mut self, record: &ResultRecord) -> Result<(), StoreError> {
        (**self).persist(record)
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, StoreError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
