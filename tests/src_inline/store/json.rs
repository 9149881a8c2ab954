use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::*;
use crate::model::Channel;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("optopad_store_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const SAMPLE: &str = r#"{
  "test_configs": [
    {
      "id": "cfg-color",
      "device_id": "ipad-1",
      "test_kind": "optopad_color",
      "steps": [
        { "order": 1, "correct_values": ["Arriba"], "decimal_value": "0.5" },
        { "order": 2, "correct_values": "[\"derecha\"]", "decimal_value": 2 },
        { "order": 3, "correct_values": "not json", "decimal_value": "abc" },
        { "order": 4, "correct_values": ["sideways"], "decimal_value": null },
        { "order": 5, "correct_values": [], "decimal_value": "" },
        { "order": 6 },
        { "order": 11, "correct_values": ["Abajo"], "decimal_value": 1.5 },
        { "order": 31, "correct_values": ["Arriba"] },
        { "order": -2, "correct_values": ["Arriba"] },
        { "order": 1, "correct_values": ["Izquierda"] }
      ]
    },
    {
      "id": "cfg-amsler",
      "device_id": "ipad-1",
      "test_kind": "rejilla_amsler",
      "steps": []
    },
    {
      "id": "cfg-other",
      "device_id": "ipad-2",
      "test_kind": "optopad_color"
    }
  ]
}"#;

#[test]
fn test_load_steps_parses_value_shapes() {
    let store = JsonStore::from_reader(SAMPLE.as_bytes()).unwrap();
    let config = store.load_steps("ipad-1", TestKind::OptopadColor).unwrap();
    assert_eq!(config.config_id, "cfg-color");

    let steps = &config.steps;
    assert_eq!(steps.expected(1), Some(Direction::Up));
    assert_eq!(steps.calibration(Channel::P, 1), Some(0.5));
    assert_eq!(steps.expected(2), Some(Direction::Right));
    assert_eq!(steps.calibration(Channel::P, 2), Some(2.0));
    assert_eq!(steps.expected(3), None);
    assert_eq!(steps.calibration(Channel::P, 3), None);
    assert_eq!(steps.expected(4), None);
    assert_eq!(steps.expected(5), None);
    assert_eq!(steps.calibration(Channel::P, 5), None);
    assert_eq!(steps.expected(11), Some(Direction::Down));
    assert_eq!(steps.calibration(Channel::D, 1), Some(1.5));
}

#[test]
fn test_load_steps_ignores_out_of_range_and_duplicates() {
    let store = JsonStore::from_reader(SAMPLE.as_bytes()).unwrap();
    let config = store.load_steps("ipad-1", TestKind::OptopadColor).unwrap();
    // orders 1..=6 and 11; 31 and -2 dropped, second order 1 ignored
    assert_eq!(config.steps.len(), 7);
    assert_eq!(config.steps.expected(1), Some(Direction::Up));
}

#[test]
fn test_config_without_steps_is_found_but_empty() {
    let store = JsonStore::from_reader(SAMPLE.as_bytes()).unwrap();
    let config = store.load_steps("ipad-2", TestKind::OptopadColor).unwrap();
    assert_eq!(config.config_id, "cfg-other");
    assert!(config.steps.is_empty());
}

#[test]
fn test_missing_config_is_reported() {
    let store = JsonStore::from_reader(SAMPLE.as_bytes()).unwrap();
    let err = store
        .load_steps("ipad-9", TestKind::OptopadColor)
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::ConfigNotFound { ref device_id, test_kind: TestKind::OptopadColor }
            if device_id == "ipad-9"
    ));
    assert!(matches!(
        store.load_steps("ipad-2", TestKind::AmslerGrid),
        Err(StoreError::ConfigNotFound { .. })
    ));
}

#[test]
fn test_duplicate_configs_are_ambiguous() {
    let raw = r#"{"test_configs":[
        {"id":"a","device_id":"d","test_kind":"optopad_color"},
        {"id":"b","device_id":"d","test_kind":"optopad_color"}
    ]}"#;
    let store = JsonStore::from_reader(raw.as_bytes()).unwrap();
    assert!(matches!(
        store.load_steps("d", TestKind::OptopadColor),
        Err(StoreError::AmbiguousConfig { count: 2, .. })
    ));
}

#[test]
fn test_empty_document_has_no_configs() {
    let store = JsonStore::from_reader("{}".as_bytes()).unwrap();
    assert!(store.configs.is_empty());
    assert!(JsonStore::from_reader("not json".as_bytes()).is_err());
}

#[test]
fn test_mistyped_values_read_as_absent() {
    let raw = r#"{"test_configs":[
        {"id":"cfg-color","device_id":"ipad-1","test_kind":"optopad_color","steps":[
            {"order":1,"correct_values":["Arriba"],"decimal_value":true},
            {"order":2,"correct_values":{"x":1},"decimal_value":{"v":2}},
            {"order":3,"correct_values":7,"decimal_value":[3]},
            {"order":"4","correct_values":["Abajo"]},
            {"order":5.5,"correct_values":["Abajo"]},
            {"correct_values":["Abajo"]},
            {"order":6,"correct_values":["Derecha"],"decimal_value":"6"}
        ]},
        {"id":"cfg-other","device_id":"ipad-2","test_kind":"optopad_color"}
    ]}"#;
    let store = JsonStore::from_reader(raw.as_bytes()).unwrap();
    let config = store.load_steps("ipad-1", TestKind::OptopadColor).unwrap();
    let steps = &config.steps;

    assert_eq!(steps.expected(1), Some(Direction::Up));
    assert_eq!(steps.calibration(Channel::P, 1), None);
    assert_eq!(steps.expected(2), None);
    assert_eq!(steps.calibration(Channel::P, 2), None);
    assert_eq!(steps.expected(3), None);
    assert_eq!(steps.calibration(Channel::P, 3), None);
    // non-integer or missing orders are skipped
    assert_eq!(steps.len(), 4);
    assert_eq!(steps.expected(4), None);
    assert_eq!(steps.expected(6), Some(Direction::Right));
    assert_eq!(steps.calibration(Channel::P, 6), Some(6.0));

    // other devices in the same document still load
    assert!(store.load_steps("ipad-2", TestKind::OptopadColor).is_ok());
}

#[test]
fn test_load_plain_and_gz_files() {
    let dir = make_temp_dir();
    let plain = dir.join("store.json");
    fs::write(&plain, SAMPLE).unwrap();

    let gz = dir.join("store.json.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&gz).unwrap(), Compression::default());
    encoder.write_all(SAMPLE.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let a = JsonStore::load(&plain).unwrap();
    let b = JsonStore::load(&gz).unwrap();
    assert_eq!(a.configs.len(), 3);
    assert_eq!(
        a.load_steps("ipad-1", TestKind::OptopadColor).unwrap(),
        b.load_steps("ipad-1", TestKind::OptopadColor).unwrap()
    );
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = make_temp_dir();
    assert!(matches!(
        JsonStore::load(&dir.join("absent.json")),
        Err(StoreError::Io(_))
    ));
}
