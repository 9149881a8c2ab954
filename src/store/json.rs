use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::model::{Direction, Step, StepConfig, StepTable, TestKind, parse_decimal};
use crate::store::{StepConfigProvider, StoreError, open_maybe_gz};

#[derive(Debug, Clone, Default, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    test_configs: Vec<TestConfigRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestConfigRecord {
    pub id: String,
    pub device_id: String,
    pub test_kind: String,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepRecord {
    #[serde(default)]
    pub order: Value,
    #[serde(default)]
    pub correct_values: Option<CorrectValues>,
    #[serde(default)]
    pub decimal_value: Option<DecimalValue>,
}

/// Stored either as a JSON array or as a string holding an encoded array.
/// Any other shape reads as no expected value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CorrectValues {
    List(Vec<Value>),
    Encoded(String),
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DecimalValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl CorrectValues {
    fn first(&self) -> Option<String> {
        match self {
            CorrectValues::List(values) => values.first().and_then(first_text),
            CorrectValues::Encoded(raw) => match serde_json::from_str::<Vec<Value>>(raw) {
                Ok(values) => values.first().and_then(first_text),
                Err(err) => {
                    warn!("unparseable correct_values {:?}: {}", raw, err);
                    None
                }
            },
            CorrectValues::Other(value) => {
                warn!("correct_values {} is neither a list nor a string", value);
                None
            }
        }
    }
}

fn first_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

impl DecimalValue {
    fn value(&self) -> Option<f64> {
        match self {
            DecimalValue::Number(v) => Some(*v).filter(|v| v.is_finite()),
            DecimalValue::Text(raw) => parse_decimal(raw),
            DecimalValue::Other(value) => {
                warn!("decimal_value {} is not a number", value);
                None
            }
        }
    }
}

impl StepRecord {
    /// Step order when it is an integer in 1..=255.
    fn order(&self) -> Option<u8> {
        self.order.as_i64().and_then(|o| u8::try_from(o).ok())
    }

    fn to_step(&self, order: u8) -> Step {
        let expected = self
            .correct_values
            .as_ref()
            .and_then(CorrectValues::first)
            .and_then(|label| {
                let parsed = Direction::parse_label(&label);
                if parsed.is_none() && !label.trim().is_empty() {
                    warn!(
                        order,
                        "expected value {:?} is not a direction; step left unconfigured", label
                    );
                }
                parsed
            });
        Step {
            expected,
            calibration: self.decimal_value.as_ref().and_then(DecimalValue::value),
        }
    }
}

/// Snapshot of the clinic's test configuration tables, read from a JSON
/// (optionally gzip-compressed) export.
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    configs: Vec<TestConfigRecord>,
}

impl JsonStore {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let store = Self::from_reader(open_maybe_gz(path)?)?;
        info!(
            path = %path.display(),
            configs = store.configs.len(),
            "loaded test configuration store"
        );
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let doc: StoreDocument = serde_json::from_reader(reader)?;
        Ok(Self {
            configs: doc.test_configs,
        })
    }

}

impl StepConfigProvider for JsonStore {
    fn load_steps(&self, device_id: &str, test_kind: TestKind) -> Result<StepConfig, StoreError> {
        let matching: Vec<&TestConfigRecord> = self
            .configs
            .iter()
            .filter(|c| c.device_id == device_id && TestKind::parse(&c.test_kind) == Some(test_kind))
            .collect();

        let config = match matching.as_slice() {
            [] => {
                return Err(StoreError::ConfigNotFound {
                    device_id: device_id.to_string(),
                    test_kind,
                });
            }
            [one] => *one,
            many => {
                return Err(StoreError::AmbiguousConfig {
                    device_id: device_id.to_string(),
                    test_kind,
                    count: many.len(),
                });
            }
        };

        let mut steps = StepTable::new();
        for record in &config.steps {
            let Some(order) = record.order() else {
                warn!(order = %record.order, "step order is not a valid integer; ignoring");
                continue;
            };
            steps.insert(order, record.to_step(order));
        }
        debug!(
            config_id = %config.id,
            configured = steps.len(),
            unconfigured = ?steps.unconfigured_orders(),
            "step table built"
        );

        Ok(StepConfig {
            config_id: config.id.clone(),
            steps,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/store/json.rs"]
mod tests;
