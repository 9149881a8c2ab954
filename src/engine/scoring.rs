use crate::model::{Channel, LastCorrect, StepTable, Thresholds};

/// Threshold estimate for one channel, interpolated from the calibration
/// values around the last correctly answered step `k`.
///
/// - `k == 0`: never succeeded, undefined.
/// - `k == 1`: `cv(1)^2 / cv(2)`.
/// - `2..=8`: mean of `cv(k+1)` and `cv(k+2)`.
/// - `k >= 9`: `cv(10)^2 / cv(9)`.
///
/// The boundary forms are intentionally asymmetric. Missing values and zero
/// divisors yield `None`.
pub fn channel_threshold(steps: &StepTable, channel: Channel, last_correct: u8) -> Option<f64> {
    let cv = |k: u8| steps.calibration(channel, k);
    let value = match last_correct {
        0 => return None,
        1 => squared_ratio(cv(1)?, cv(2)?)?,
        k @ 2..=8 => (cv(k + 1)? + cv(k + 2)?) / 2.0,
        _ => squared_ratio(cv(10)?, cv(9)?)?,
    };
    value.is_finite().then_some(value)
}

fn squared_ratio(numerator: f64, divisor: f64) -> Option<f64> {
    if divisor == 0.0 {
        return None;
    }
    Some(numerator * numerator / divisor)
}

pub fn thresholds(steps: &StepTable, last_correct: LastCorrect) -> Thresholds {
    Channel::ALL.map(|channel| channel_threshold(steps, channel, last_correct[channel.index()]))
}

#[cfg(test)]
#[path = "../../tests/src_inline/engine/scoring.rs"]
mod tests;
