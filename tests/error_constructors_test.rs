use porssi::error::PorssiError;

#[test]
fn error_constructors_group_1() {
    assert!(matches!(
        PorssiError::config("x"),
        PorssiError::Config { .. }
    ));
    assert!(matches!(
        PorssiError::network("x"),
        PorssiError::Network { .. }
    ));
    assert!(matches!(
        PorssiError::invalid_response("x"),
        PorssiError::InvalidResponse { .. }
    ));
    assert!(matches!(PorssiError::decode("x"), PorssiError::Decode { .. }));
}

#[test]
fn error_constructors_group_2() {
    let ser = PorssiError::Serialization {
        message: "s".into(),
    };
    assert!(matches!(ser, PorssiError::Serialization { .. }));
    assert!(matches!(PorssiError::io("x"), PorssiError::Io { .. }));
    assert!(matches!(PorssiError::web("x"), PorssiError::Web { .. }));
    assert!(matches!(
        PorssiError::validation("f", "m"),
        PorssiError::Validation { .. }
    ));
    assert!(matches!(
        PorssiError::generic("x"),
        PorssiError::Generic { .. }
    ));
}

#[test]
fn conversions_from_library_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(PorssiError::from(io), PorssiError::Io { .. }));

    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        PorssiError::from(json),
        PorssiError::Serialization { .. }
    ));
}
