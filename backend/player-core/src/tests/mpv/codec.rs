// Unit tests for the mpv wire codec
// Socket-level behavior is covered in integration_tests/mpv/client.rs

use crate::mpv::codec::{
    DRY_RUN, MpvCommand, MpvResponse, SUCCESS, decode, decode_command, encode,
    first_record,
};

use serde_json::json;

/// **VALUE**: Proves a command survives the trip to the wire and back with every field intact.
///
/// **WHY THIS MATTERS**: mpv matches replies to requests by `request_id` and executes exactly
/// the tokens it receives. Losing or reordering a token changes what the player does.
///
/// **BUG THIS CATCHES**: Would catch serialization that re-splits tokens on whitespace,
/// drops non-ASCII text, or escapes quotes incorrectly.
#[test]
fn given_tokens_with_whitespace_when_encoded_then_decodes_to_same_command() {
    // GIVEN: Commands whose tokens contain spaces, quotes and non-ASCII characters
    let cases = vec![
        MpvCommand::new(vec!["cycle".into(), "pause".into()], 100),
        MpvCommand::new(
            vec![
                "loadfile".into(),
                "/media/The Simpsons/S01E02_Bart the Genius.mkv".into(),
                "replace".into(),
            ],
            u64::MAX,
        ),
        MpvCommand::new(vec!["show-text".into(), "\"D'oh!\"\tñ".into()], 0),
        MpvCommand::new(Vec::new(), 7),
    ];

    for command in cases {
        // WHEN: Encoding and decoding from the peer's point of view
        let wire = encode(&command).expect("command should encode");
        let text = String::from_utf8(wire).expect("wire form is UTF-8");
        let decoded = decode_command(&text).expect("wire form should decode");

        // THEN: Every field is preserved
        assert_eq!(decoded, command);
    }
}

/// **VALUE**: The request is exactly one line, terminated by a single newline.
///
/// **BUG THIS CATCHES**: Would catch pretty-printing (embedded newlines) or a missing
/// terminator, either of which makes mpv wait for more input or split the request.
#[test]
fn given_command_when_encoded_then_single_newline_terminated_record() {
    let command = MpvCommand::new(vec!["cycle".into(), "mute".into()], 101);

    let wire = encode(&command).expect("command should encode");

    assert_eq!(
        wire,
        b"{\"command\":[\"cycle\",\"mute\"],\"request_id\":101}\n".to_vec()
    );
    assert_eq!(wire.iter().filter(|b| **b == b'\n').count(), 1);
}

#[test]
fn given_same_command_when_encoded_twice_then_bytes_identical() {
    let command = MpvCommand::new(vec!["playlist-next".into(), "force".into()], 5);

    assert_eq!(encode(&command).unwrap(), encode(&command).unwrap());
}

/// **VALUE**: A full mpv reply decodes into its three fields.
#[test]
fn given_success_reply_when_decoded_then_fields_populated() {
    let response = decode(r#"{"error":"success","data":{"v":1},"request_id":101}"#)
        .expect("valid reply should decode");

    assert_eq!(response.error, SUCCESS);
    assert_eq!(response.data, Some(json!({"v": 1})));
    assert_eq!(response.request_id, 101);
    assert!(response.is_success());
}

/// **VALUE**: Missing fields take their documented defaults instead of failing.
///
/// **WHY THIS MATTERS**: mpv omits `data` for commands without a result and some builds
/// omit `request_id`. Treating those as malformed would turn working commands into errors.
#[test]
fn given_reply_with_missing_fields_when_decoded_then_defaults_apply() {
    let response = decode("{}").expect("empty object should decode");

    assert_eq!(response, MpvResponse::default());
    assert_eq!(response.error, "");
    assert_eq!(response.data, None);
    assert_eq!(response.request_id, 0);
}

#[test]
fn given_null_data_when_decoded_then_data_absent() {
    let response = decode(r#"{"error":"success","data":null,"request_id":3}"#).unwrap();

    assert_eq!(response.data, None);
}

/// **VALUE**: Every JSON shape mpv can return in `data` is representable.
#[test]
fn given_scalar_and_sequence_data_when_decoded_then_preserved() {
    let cases = vec![
        (r#"{"data":true}"#, json!(true)),
        (r#"{"data":12.5}"#, json!(12.5)),
        (r#"{"data":"S01E01.mkv"}"#, json!("S01E01.mkv")),
        (r#"{"data":[{"filename":"a.mkv"},{"filename":"b.mkv"}]}"#, json!([{"filename":"a.mkv"},{"filename":"b.mkv"}])),
    ];

    for (record, expected) in cases {
        let response = decode(record).expect("reply should decode");
        assert_eq!(response.data, Some(expected), "data mismatch for {record}");
    }
}

/// **VALUE**: Malformed replies fail with the raw text attached, never with a made-up value.
///
/// **BUG THIS CATCHES**: Would catch a decoder that silently returns `MpvResponse::default()`
/// for garbage, hiding protocol breakage behind an empty error string.
#[test]
fn given_invalid_json_when_decoded_then_error_carries_raw_text() {
    let invalid = vec![
        r#"{"error":"success","data":{"v":"#,
        "not json at all",
        r#"["success", null, 1]"#,
        r#""success""#,
        r#"{"error":5}"#,
        r#"{"request_id":-1}"#,
    ];

    for raw in invalid {
        let err = decode(raw).expect_err("invalid reply must not decode");
        assert_eq!(err.raw(), Some(raw), "raw text should be preserved for {raw}");
        assert!(!err.message().is_empty());
    }
}

#[test]
fn given_invalid_utf8_bytes_when_first_record_decoded_then_replaced_not_rejected() {
    let mut bytes = br#"{"error":"success","data":""#.to_vec();
    bytes.push(0xff);
    bytes.extend_from_slice(b"\",\"request_id\":9}\n");

    let response = decode(&first_record(&bytes)).expect("lossy UTF-8 should still decode");

    assert_eq!(response.request_id, 9);
    assert_eq!(response.data, Some(json!("\u{fffd}")));
}

/// **VALUE**: Only the first line of a reply buffer is considered.
///
/// **WHY THIS MATTERS**: mpv can emit event lines after the reply. Feeding the whole buffer
/// to the decoder would make every such reply look malformed.
#[test]
fn given_buffer_with_trailing_lines_when_first_record_taken_then_rest_ignored() {
    let buffer = b"  {\"error\":\"success\"}  \r\n{\"event\":\"pause\"}\n";

    assert_eq!(first_record(buffer), r#"{"error":"success"}"#);
    assert_eq!(first_record(b""), "");
    assert_eq!(first_record(b"\n\n"), "");
    assert_eq!(first_record(b"no newline"), "no newline");
}

#[test]
fn given_request_id_when_dry_run_response_built_then_sentinel_and_no_data() {
    let response = MpvResponse::dry_run(104);

    assert_eq!(response.error, DRY_RUN);
    assert_eq!(response.data, None);
    assert_eq!(response.request_id, 104);
    assert!(response.is_dry_run());
    assert!(!response.is_success());
}
