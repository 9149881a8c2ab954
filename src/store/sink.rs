use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::model::ResultRecord;
use crate::store::{ResultSink, StoreError};

/// Appends each result as one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for JsonLinesSink {
    fn persist(&mut self, record: &ResultRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(record)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut out = BufWriter::new(file);
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        info!(
            path = %self.path.display(),
            patient_id = %record.patient_id,
            test_config_id = %record.test_config_id,
            "result persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
pub fn read_results(path: &std::path::Path) -> Result<Vec<ResultRecord>, StoreError> {
    let raw = fs::read_to_string(path)?;
    let mut out = Vec::new();
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        out.push(serde_json::from_str(line)?);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/store/sink.rs"]
mod tests;
