use super::kv_client::parse_count;
use super::ClientError;

#[test]
fn test_parse_count_accepts_decimal() {
    assert_eq!(parse_count("0").unwrap(), 0);
    assert_eq!(parse_count("42").unwrap(), 42);
}

#[test]
fn test_parse_count_rejects_malformed() {
    for raw in ["", "-1", "4 2", "0x10", "two"] {
        match parse_count(raw) {
            Err(ClientError::InvalidCount(s)) => assert_eq!(s, raw),
            other => panic!("expected InvalidCount for {raw:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_status_converts_to_boxed_error() {
    let err: ClientError = tonic::Status::unavailable("down").into();
    assert!(matches!(err, ClientError::Status(ref s) if s.code() == tonic::Code::Unavailable));
    assert!(err.to_string().contains("down"));
}
