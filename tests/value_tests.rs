use phpsess::{
    decode_value, decode_value_with_options, ArrayKey, CustomRegistry, DecodeError,
    DecodeOptions, PhpBytes, PhpObject, PhpValue, OPAQUE_BODY_ATTRIBUTE,
};

#[test]
fn test_decode_constants() {
    assert_eq!(decode_value(b"N;").unwrap(), PhpValue::Null);
    assert_eq!(decode_value(b"b:1;").unwrap(), PhpValue::Bool(true));
    assert_eq!(decode_value(b"b:0;").unwrap(), PhpValue::Bool(false));
}

#[test]
fn test_decode_integers() {
    assert_eq!(decode_value(b"i:42;").unwrap(), PhpValue::Int(42));
    assert_eq!(decode_value(b"i:-30;").unwrap(), PhpValue::Int(-30));
    assert_eq!(decode_value(b"i:+7;").unwrap(), PhpValue::Int(7));
    assert_eq!(decode_value(b"i:0;").unwrap(), PhpValue::Int(0));
}

#[test]
fn test_decode_integer_extremes() {
    // PHP_INT_MAX and PHP_INT_MIN on 64-bit builds
    assert_eq!(
        decode_value(b"i:9223372036854775807;").unwrap(),
        PhpValue::Int(i64::MAX)
    );
    assert_eq!(
        decode_value(b"i:-9223372036854775808;").unwrap(),
        PhpValue::Int(i64::MIN)
    );

    // One past either end no longer fits an i64
    assert!(matches!(
        decode_value(b"i:9223372036854775808;"),
        Err(DecodeError::Format { .. })
    ));
    assert!(matches!(
        decode_value(b"i:-9223372036854775809;"),
        Err(DecodeError::Format { .. })
    ));
}

#[test]
fn test_decode_doubles() {
    assert_eq!(decode_value(b"d:3.141592;").unwrap(), PhpValue::Float(3.141592));
    assert_eq!(decode_value(b"d:-3.141592;").unwrap(), PhpValue::Float(-3.141592));
    assert_eq!(decode_value(b"d:1.5e10;").unwrap(), PhpValue::Float(1.5e10));

    let nan = decode_value(b"d:NAN;").unwrap().as_f64().unwrap();
    assert!(nan.is_nan());
    assert_eq!(decode_value(b"d:INF;").unwrap(), PhpValue::Float(f64::INFINITY));
    assert_eq!(decode_value(b"d:-INF;").unwrap(), PhpValue::Float(f64::NEG_INFINITY));
}

#[test]
fn test_decode_strings() {
    assert_eq!(decode_value(b"s:6:\"string\";").unwrap(), PhpValue::from("string"));
    assert_eq!(decode_value(b"s:0:\"\";").unwrap(), PhpValue::from(""));

    // The length counts bytes, so an embedded quote is fine
    assert_eq!(
        decode_value(b"s:7:\"str\"ing\";").unwrap(),
        PhpValue::from("str\"ing")
    );

    // Binary content, including NUL
    let value = decode_value(b"s:5:\"bin\x00\x01\";").unwrap();
    assert_eq!(value.as_bytes().unwrap().as_bytes(), b"bin\x00\x01");
}

#[test]
fn test_decode_escaped_strings() {
    // PHP never seems to emit S: but accepts it; each \xx escape counts as
    // one logical character
    let value = decode_value(b"S:5:\"bin\\00\\01\";").unwrap();
    assert_eq!(value.as_bytes().unwrap().as_bytes(), b"bin\x00\x01");

    assert_eq!(decode_value(b"S:2:\"\\41\\42\";").unwrap(), PhpValue::from("AB"));
    assert!(decode_value(b"S:1:\"\\zz\";").is_err());
}

#[test]
fn test_decode_list() {
    assert_eq!(
        decode_value(b"a:3:{i:0;i:1;i:1;i:2;i:2;i:3;}").unwrap(),
        PhpValue::List(vec![PhpValue::Int(1), PhpValue::Int(2), PhpValue::Int(3)])
    );
    assert_eq!(decode_value(b"a:0:{}").unwrap(), PhpValue::List(vec![]));
}

#[test]
fn test_decode_list_keys_out_of_order() {
    // Key set {0,1} is dense, so this is a list in original pair order
    assert_eq!(
        decode_value(b"a:2:{i:1;i:20;i:0;i:10;}").unwrap(),
        PhpValue::List(vec![PhpValue::Int(20), PhpValue::Int(10)])
    );
}

#[test]
fn test_decode_map_mixed_keys() {
    let value = decode_value(b"a:2:{s:1:\"a\";i:1;i:0;i:2;}").unwrap();
    let map = value.as_map().expect("mixed keys must not classify as list");
    assert_eq!(map.get("a"), Some(&PhpValue::Int(1)));
    assert_eq!(map.get(0), Some(&PhpValue::Int(2)));

    let keys: Vec<_> = map.keys().cloned().collect();
    assert_eq!(keys, vec![ArrayKey::from("a"), ArrayKey::from(0)]);
}

#[test]
fn test_decode_map_string_keys() {
    let value = decode_value(b"a:2:{s:1:\"a\";i:1;s:1:\"b\";i:2;}").unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(map.get("a"), Some(&PhpValue::Int(1)));
    assert_eq!(map.get("b"), Some(&PhpValue::Int(2)));
}

#[test]
fn test_decode_map_sparse_integer_keys() {
    let value = decode_value(b"a:2:{i:5;i:1;i:9;i:2;}").unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(map.get(5), Some(&PhpValue::Int(1)));
    assert_eq!(map.get(9), Some(&PhpValue::Int(2)));
}

#[test]
fn test_decode_nested_arrays() {
    let value = decode_value(b"a:1:{s:4:\"list\";a:2:{i:0;N;i:1;b:1;}}").unwrap();
    let inner = value.as_map().unwrap().get("list").unwrap();
    assert_eq!(
        inner,
        &PhpValue::List(vec![PhpValue::Null, PhpValue::Bool(true)])
    );
}

#[test]
fn test_decode_object_visibility() {
    let value = decode_value(
        b"O:5:\"Thing\":3:{s:4:\"publ\";s:6:\"public\";\
          s:7:\"\x00*\x00prot\";s:9:\"protected\";\
          s:11:\"\x00Thing\x00priv\";s:7:\"private\";}",
    )
    .unwrap();
    let thing = value.as_object().unwrap();

    assert_eq!(thing.class_name(), "Thing");
    assert_eq!(thing.get(b"publ"), Some(&PhpValue::from("public")));
    assert_eq!(thing.get(b"prot"), Some(&PhpValue::from("protected")));
    assert_eq!(thing.get(b"priv"), Some(&PhpValue::from("private")));
    assert_eq!(thing.get(b"missing"), None);

    // The flat entry list keeps the marked keys verbatim
    assert_eq!(thing.entries().len(), 3);
    assert_eq!(thing.entries()[1].0.as_bytes(), b"\x00*\x00prot");
}

#[test]
fn test_decode_stdclass() {
    // Note the 'o' body opens with '"' where 'O' opens with '{'
    let value = decode_value(b"o:1:\"s:4:\"prop\";s:5:\"value\";}").unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.class_name(), "stdClass");
    assert_eq!(object.get(b"prop"), Some(&PhpValue::from("value")));
}

#[test]
fn test_decode_object_integer_keys_stringify() {
    let value = decode_value(b"O:3:\"Row\":1:{i:7;s:1:\"x\";}").unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.get(b"7"), Some(&PhpValue::from("x")));
}

#[test]
fn test_decode_arrayobject() {
    let value = decode_value(
        b"C:11:\"ArrayObject\":45:{x:i:0;a:3:{i:0;i:1;i:1;i:2;i:2;i:3;};m:a:0:{}}",
    )
    .unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object.class_name(), "ArrayObject");
    assert_eq!(object.get(b"flags"), Some(&PhpValue::Int(0)));
    assert_eq!(
        object.get(b"array"),
        Some(&PhpValue::List(vec![
            PhpValue::Int(1),
            PhpValue::Int(2),
            PhpValue::Int(3)
        ]))
    );
    assert_eq!(object.get(b"members"), Some(&PhpValue::List(vec![])));
}

#[test]
fn test_decode_arrayobject_rejects_bad_backing_slot() {
    // Only 'm' or an array/object tag may follow the flags
    let result = decode_value(b"C:11:\"ArrayObject\":17:{x:i:0;N;;m:a:0:{}}");
    assert!(matches!(result, Err(DecodeError::Format { .. })));
}

#[test]
fn test_decode_unregistered_custom_class_is_opaque() {
    let value = decode_value(b"C:17:\"SerializableClass\":11:{some string}").unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.class_name(), "SerializableClass");
    assert_eq!(
        object.get(OPAQUE_BODY_ATTRIBUTE.as_bytes()),
        Some(&PhpValue::from("some string"))
    );
}

#[test]
fn test_custom_registry_hook() {
    let options = DecodeOptions::new().with_custom_decoder("Pair", |dec| {
        let first = dec.decode_value()?;
        dec.cursor_mut().expect(b',')?;
        let second = dec.decode_value()?;
        Ok(PhpObject::from_entries(
            "Pair",
            vec![
                (PhpBytes::from("first"), first),
                (PhpBytes::from("second"), second),
            ],
        ))
    });

    let value =
        decode_value_with_options(b"C:4:\"Pair\":9:{i:1;,i:2;}", &options).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.get(b"first"), Some(&PhpValue::Int(1)));
    assert_eq!(object.get(b"second"), Some(&PhpValue::Int(2)));
}

#[test]
fn test_empty_registry_treats_arrayobject_as_opaque() {
    let options = DecodeOptions::new().with_registry(CustomRegistry::empty());
    let value = decode_value_with_options(
        b"C:11:\"ArrayObject\":45:{x:i:0;a:3:{i:0;i:1;i:1;i:2;i:2;i:3;};m:a:0:{}}",
        &options,
    )
    .unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(
        object.get(OPAQUE_BODY_ATTRIBUTE.as_bytes()),
        Some(&PhpValue::from("x:i:0;a:3:{i:0;i:1;i:1;i:2;i:2;i:3;};m:a:0:{}"))
    );
}

#[test]
fn test_references_are_unsupported() {
    assert!(matches!(
        decode_value(b"R:1;"),
        Err(DecodeError::Unsupported { offset: 0, .. })
    ));
    assert!(matches!(
        decode_value(b"r:2;"),
        Err(DecodeError::Unsupported { .. })
    ));

    let nested = decode_value(b"a:1:{i:0;R:1;}");
    assert!(matches!(nested, Err(DecodeError::Unsupported { offset: 9, .. })));
}

#[test]
fn test_unknown_type_tag() {
    assert!(matches!(
        decode_value(b"z:0;"),
        Err(DecodeError::UnknownType { offset: 0, tag: b'z' })
    ));
}

#[test]
fn test_invalid_container_key() {
    assert!(matches!(
        decode_value(b"a:1:{b:1;i:1;}"),
        Err(DecodeError::InvalidKey { offset: 5, .. })
    ));
    assert!(matches!(
        decode_value(b"a:1:{N;i:1;}"),
        Err(DecodeError::InvalidKey { .. })
    ));
}

#[test]
fn test_trailing_data_after_value() {
    assert!(matches!(
        decode_value(b"i:42;i:43;"),
        Err(DecodeError::TrailingData { offset: 5 })
    ));
    assert!(matches!(
        decode_value(b"N;x"),
        Err(DecodeError::TrailingData { offset: 2 })
    ));
}

#[test]
fn test_truncated_inputs() {
    assert!(matches!(decode_value(b""), Err(DecodeError::UnexpectedEnd { .. })));
    assert!(matches!(decode_value(b"i:4"), Err(DecodeError::UnexpectedEnd { .. })));
    assert!(matches!(
        decode_value(b"s:10:\"short\";"),
        Err(DecodeError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        decode_value(b"a:2:{i:0;i:1;"),
        Err(DecodeError::UnexpectedEnd { .. })
    ));
}

#[test]
fn test_malformed_delimiters() {
    assert!(matches!(decode_value(b"i;42;"), Err(DecodeError::Format { .. })));
    assert!(matches!(decode_value(b"i:42x"), Err(DecodeError::Format { .. })));
    assert!(matches!(decode_value(b"s:3:xabc\";"), Err(DecodeError::Format { .. })));
}

#[test]
fn test_negative_array_count_fails_on_closing_brace() {
    // The count is parsed with the signed reader; a negative count runs
    // zero pair iterations and then trips over the content
    assert!(matches!(
        decode_value(b"a:-1:{i:0;i:1;}"),
        Err(DecodeError::Format { .. })
    ));
}

#[test]
fn test_depth_bound() {
    let mut input = Vec::new();
    for _ in 0..500 {
        input.extend_from_slice(b"a:1:{i:0;");
    }
    input.extend_from_slice(b"N;");
    for _ in 0..500 {
        input.push(b'}');
    }

    assert!(matches!(
        decode_value(&input),
        Err(DecodeError::DepthExceeded { max_depth: 128, .. })
    ));

    let options = DecodeOptions::new().with_max_depth(1000);
    assert!(decode_value_with_options(&input, &options).is_ok());
}

#[test]
fn test_deep_nesting_stays_off_the_call_stack() {
    // Container frames live on the heap, so a depth bound far beyond any
    // thread's stack capacity still decodes
    let levels = 50_000;
    let mut input = Vec::new();
    for _ in 0..levels {
        input.extend_from_slice(b"a:1:{i:0;");
    }
    input.extend_from_slice(b"i:7;");
    for _ in 0..levels {
        input.push(b'}');
    }

    let options = DecodeOptions::new().with_max_depth(levels + 1);
    let mut value = decode_value_with_options(&input, &options).unwrap();
    for _ in 0..levels {
        value = match value {
            PhpValue::List(mut items) => items.remove(0),
            other => panic!("expected list, got {:?}", other),
        };
    }
    assert_eq!(value, PhpValue::Int(7));
}
