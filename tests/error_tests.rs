use axum::http::StatusCode;
use canarygate::TrapError;

#[test]
fn test_status_codes() {
    assert_eq!(TrapError::MissingPayload.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        TrapError::PayloadTooLarge { limit: 10 }.status_code(),
        StatusCode::PAYLOAD_TOO_LARGE
    );
    assert_eq!(
        TrapError::Multipart("truncated".to_string()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        TrapError::Unexpected("boom".to_string()).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_client_faults_map_to_upload_error() {
    assert_eq!(TrapError::MissingPayload.event_type(), "upload_error");
    assert_eq!(
        TrapError::PayloadTooLarge { limit: 10 }.event_type(),
        "upload_error"
    );
    assert_eq!(
        TrapError::Multipart("bad boundary".to_string()).event_type(),
        "upload_error"
    );
}

#[test]
fn test_server_faults_map_to_upload_exception() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    assert_eq!(TrapError::StorageWrite(io).event_type(), "upload_exception");
    assert_eq!(
        TrapError::Unexpected("boom".to_string()).event_type(),
        "upload_exception"
    );
}

#[test]
fn test_operator_messages_never_leak_detail() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "/secret/path denied");
    let msg = TrapError::StorageWrite(io).operator_message();
    assert!(!msg.contains("/secret/path"));

    let msg = TrapError::Multipart("internal parser state 0x7f".to_string()).operator_message();
    assert!(!msg.contains("0x7f"));
}
