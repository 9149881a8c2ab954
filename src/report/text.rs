use crate::engine::SessionView;
use crate::model::ResultRecord;
use crate::report::{ChannelSummary, format_threshold, summaries_of};

pub fn render_result_text(record: &ResultRecord, saved: bool) -> String {
    let mut out = String::new();

    out.push_str("Optopad Color: test finished\n");
    out.push_str("============================\n\n");
    out.push_str(&format!("Patient: {}\n", record.patient_id));
    out.push_str(&format!("Configuration: {}\n\n", record.test_config_id));
    out.push_str("Last correct step (1-10) and threshold per channel:\n");
    out.push_str(&render_channels(&summaries_of(&record.response_data)));
    out.push('\n');
    out.push_str(if saved {
        "Result saved.\n"
    } else {
        "Result NOT saved.\n"
    });

    out
}

pub fn render_channels(summaries: &[ChannelSummary]) -> String {
    let mut out = String::new();
    for s in summaries {
        out.push_str(&format!(
            "  Channel {}: {:>2}  threshold {}\n",
            s.channel,
            s.last_correct,
            format_threshold(s.threshold)
        ));
    }
    out
}

/// Prompt line shown before each response.
pub fn render_prompt(view: &SessionView) -> String {
    let expected = match view.expected {
        Some(d) => format!("expected: {d}"),
        None => "no response configured for this step".to_string(),
    };
    format!(
        "Channel {}, step {} ({}) | last correct here: {} | P:{} D:{} T:{}",
        view.channel,
        view.step_number,
        expected,
        view.channel_last_correct,
        view.last_correct[0],
        view.last_correct[1],
        view.last_correct[2]
    )
}
