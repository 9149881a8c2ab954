use serde::Serialize;

use crate::model::{LastCorrect, ResultRecord, Thresholds};
use crate::report::channel_summaries;

#[derive(Debug, Serialize)]
struct ChannelJson {
    channel: &'static str,
    last_correct: u8,
    threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ToolMeta {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ResultJson<'a> {
    tool: ToolMeta,
    saved: bool,
    record: &'a ResultRecord,
    channels: Vec<ChannelJson>,
}

#[derive(Debug, Serialize)]
struct ScoreJson {
    tool: ToolMeta,
    config_id: String,
    channels: Vec<ChannelJson>,
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    }
}

fn channels_json(last_correct: LastCorrect, thresholds: Thresholds) -> Vec<ChannelJson> {
    channel_summaries(last_correct, thresholds)
        .into_iter()
        .map(|s| ChannelJson {
            channel: s.channel.label(),
            last_correct: s.last_correct,
            threshold: s.threshold,
        })
        .collect()
}

pub fn render_result_json(record: &ResultRecord, saved: bool) -> Result<String, serde_json::Error> {
    let data = &record.response_data;
    serde_json::to_string_pretty(&ResultJson {
        tool: tool_meta(),
        saved,
        record,
        channels: channels_json(data.last_correct(), data.thresholds()),
    })
}

pub fn render_score_json(
    config_id: &str,
    last_correct: LastCorrect,
    thresholds: Thresholds,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ScoreJson {
        tool: tool_meta(),
        config_id: config_id.to_string(),
        channels: channels_json(last_correct, thresholds),
    })
}
