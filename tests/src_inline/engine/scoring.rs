use super::*;
use crate::model::Step;

fn with_values(channel: Channel, values: &[(u8, f64)]) -> StepTable {
    values
        .iter()
        .map(|(k, v)| {
            (
                channel.order_of(*k),
                Step {
                    expected: None,
                    calibration: Some(*v),
                },
            )
        })
        .collect()
}

fn full_channel(channel: Channel) -> StepTable {
    let values: Vec<(u8, f64)> = (1..=10u8).map(|k| (k, k as f64)).collect();
    with_values(channel, &values)
}

#[test]
fn test_first_step_boundary() {
    let steps = with_values(Channel::P, &[(1, 2.0), (2, 4.0)]);
    assert_eq!(channel_threshold(&steps, Channel::P, 1), Some(1.0));
}

#[test]
fn test_first_step_zero_divisor_is_undefined() {
    let steps = with_values(Channel::P, &[(1, 2.0), (2, 0.0)]);
    assert_eq!(channel_threshold(&steps, Channel::P, 1), None);
}

#[test]
fn test_mid_range_mean() {
    let steps = with_values(Channel::P, &[(6, 3.0), (7, 5.0)]);
    assert_eq!(channel_threshold(&steps, Channel::P, 5), Some(4.0));
}

#[test]
fn test_mid_range_uses_following_pair() {
    let steps = full_channel(Channel::D);
    assert_eq!(channel_threshold(&steps, Channel::D, 2), Some(3.5));
    assert_eq!(channel_threshold(&steps, Channel::D, 8), Some(9.5));
}

#[test]
fn test_upper_boundary() {
    let steps = with_values(Channel::T, &[(9, 2.0), (10, 6.0)]);
    assert_eq!(channel_threshold(&steps, Channel::T, 9), Some(18.0));
    assert_eq!(channel_threshold(&steps, Channel::T, 10), Some(18.0));
}

#[test]
fn test_upper_boundary_zero_divisor_is_undefined() {
    let steps = with_values(Channel::T, &[(9, 0.0), (10, 6.0)]);
    assert_eq!(channel_threshold(&steps, Channel::T, 10), None);
}

#[test]
fn test_never_correct_is_undefined() {
    let steps = full_channel(Channel::P);
    assert_eq!(channel_threshold(&steps, Channel::P, 0), None);
}

#[test]
fn test_missing_neighbour_is_undefined() {
    let steps = with_values(Channel::P, &[(6, 3.0)]);
    assert_eq!(channel_threshold(&steps, Channel::P, 5), None);
    let steps = with_values(Channel::P, &[(1, 3.0)]);
    assert_eq!(channel_threshold(&steps, Channel::P, 1), None);
}

#[test]
fn test_values_are_read_from_own_channel() {
    let steps = with_values(Channel::P, &[(6, 3.0), (7, 5.0)]);
    assert_eq!(channel_threshold(&steps, Channel::D, 5), None);
}

#[test]
fn test_overflow_is_undefined() {
    let steps = with_values(Channel::P, &[(1, f64::MAX), (2, 0.5)]);
    assert_eq!(channel_threshold(&steps, Channel::P, 1), None);
}

#[test]
fn test_thresholds_triple() {
    let mut steps = full_channel(Channel::P);
    for (order, step) in [(21u8, 1.0f64), (22, 4.0)] {
        steps.insert(
            order,
            Step {
                expected: None,
                calibration: Some(step),
            },
        );
    }
    assert_eq!(thresholds(&steps, [5, 5, 1]), [Some(6.5), None, Some(0.25)]);
    assert_eq!(thresholds(&steps, [0, 0, 0]), [None, None, None]);
}
