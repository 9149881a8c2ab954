use super::*;

#[test]
fn test_parse_english_and_spanish_labels() {
    assert_eq!("up".parse::<Response>(), Ok(Response::Seen(Direction::Up)));
    assert_eq!(
        " Izquierda ".parse::<Response>(),
        Ok(Response::Seen(Direction::Left))
    );
    assert_eq!("DERECHA".parse::<Response>(), Ok(Response::Seen(Direction::Right)));
    assert_eq!("Ninguna".parse::<Response>(), Ok(Response::None));
    assert_eq!("none".parse::<Response>(), Ok(Response::None));
}

#[test]
fn test_embedded_none_marker_is_stripped() {
    assert_eq!(
        "arribaninguna".parse::<Response>(),
        Ok(Response::Seen(Direction::Up))
    );
    assert_eq!(
        "none down".parse::<Response>(),
        Ok(Response::Seen(Direction::Down))
    );
}

#[test]
fn test_unknown_label_rejected() {
    let err = "sideways".parse::<Response>().unwrap_err();
    assert_eq!(err, ResponseParseError("sideways".to_string()));
    assert!("".parse::<Response>().is_err());
}

#[test]
fn test_none_never_correct() {
    for d in Direction::ALL {
        assert!(!Response::None.is_correct(Some(d)));
    }
    assert!(!Response::None.is_correct(None));
}

#[test]
fn test_unconfigured_step_never_correct() {
    for r in Response::ALL {
        assert!(!r.is_correct(None));
    }
}

#[test]
fn test_exact_match_only() {
    let up = Response::Seen(Direction::Up);
    assert!(up.is_correct(Some(Direction::Up)));
    assert!(!up.is_correct(Some(Direction::Down)));
    assert!(!up.is_correct(Some(Direction::Left)));
}

#[test]
fn test_direction_parse_label_for_config() {
    assert_eq!(Direction::parse_label("Abajo"), Some(Direction::Down));
    assert_eq!(Direction::parse_label(" right "), Some(Direction::Right));
    assert_eq!(Direction::parse_label("diagonal"), None);
}
