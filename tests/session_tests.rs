use phpsess::{decode_session, DecodeError, PhpValue};

#[test]
fn test_decode_session() {
    let session = decode_session(
        b"foo|a:2:{i:0;i:1;i:1;i:2;}bar|a:3:{i:0;i:1;i:1;i:2;i:2;i:3;}",
    )
    .unwrap();

    assert_eq!(session.len(), 2);
    assert_eq!(
        session.get("foo"),
        Some(&PhpValue::List(vec![PhpValue::Int(1), PhpValue::Int(2)]))
    );
    assert_eq!(
        session.get("bar"),
        Some(&PhpValue::List(vec![
            PhpValue::Int(1),
            PhpValue::Int(2),
            PhpValue::Int(3)
        ]))
    );
}

#[test]
fn test_session_key_order_is_input_order() {
    let session = decode_session(b"zz|i:1;aa|i:2;mm|i:3;").unwrap();
    let keys: Vec<_> = session.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["zz", "aa", "mm"]);
}

#[test]
fn test_unset_marker_decodes_to_null() {
    let session = decode_session(b"gone|!next|i:1;").unwrap();
    assert_eq!(session.get("gone"), Some(&PhpValue::Null));
    assert_eq!(session.get("next"), Some(&PhpValue::Int(1)));
}

#[test]
fn test_unset_marker_at_end() {
    let session = decode_session(b"only|!").unwrap();
    assert_eq!(session.len(), 1);
    assert_eq!(session.get("only"), Some(&PhpValue::Null));
}

#[test]
fn test_empty_input() {
    assert!(decode_session(b"").unwrap().is_empty());
}

#[test]
fn test_empty_key() {
    let session = decode_session(b"|i:5;").unwrap();
    assert_eq!(session.get(""), Some(&PhpValue::Int(5)));
}

#[test]
fn test_binary_safe_keys() {
    let session = decode_session(b"k\x00ey|b:1;").unwrap();
    assert_eq!(session.get(&b"k\x00ey"[..]), Some(&PhpValue::Bool(true)));
}

#[test]
fn test_trailing_key_without_delimiter() {
    assert!(matches!(
        decode_session(b"foo|i:1;leftover"),
        Err(DecodeError::TrailingData { offset: 8 })
    ));
}

#[test]
fn test_malformed_value_reports_absolute_offset() {
    let err = decode_session(b"good|i:1;bad|q:1;").unwrap_err();
    assert!(matches!(err, DecodeError::UnknownType { offset: 13, tag: b'q' }));
}

#[test]
fn test_value_after_unset_marker_not_swallowed() {
    // Exactly one byte is consumed for '!', so the next segment starts
    // immediately after it
    let session = decode_session(b"a|!b|!c|i:9;").unwrap();
    assert_eq!(session.len(), 3);
    assert_eq!(session.get("a"), Some(&PhpValue::Null));
    assert_eq!(session.get("b"), Some(&PhpValue::Null));
    assert_eq!(session.get("c"), Some(&PhpValue::Int(9)));
}

#[test]
fn test_session_values_can_be_objects() {
    let session = decode_session(
        b"user|O:4:\"User\":1:{s:4:\"name\";s:5:\"alice\";}",
    )
    .unwrap();
    let user = session.get("user").unwrap().as_object().unwrap();
    assert_eq!(user.class_name(), "User");
    assert_eq!(user.get(b"name"), Some(&PhpValue::from("alice")));
}
