//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a JPEG strip of the given size
pub fn assert_jpeg(response: &TestResponse, width: u32, height: u32) {
    assert_ok(response);
    assert!(
        response.is_jpeg(),
        "Expected JPEG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..3.min(response.body.len())]
    );
    assert_eq!(response.header("content-type"), Some("image/jpeg"));

    let image = response.image();
    assert_eq!((image.width(), image.height()), (width, height));
}

/// Assert a 400 response with the given message
pub fn assert_bad_request(response: &TestResponse, message: &str) {
    assert_status(response, StatusCode::BAD_REQUEST);
    assert_error_body(response, 400, message);
}

/// Assert the JSON error body
pub fn assert_error_body(response: &TestResponse, status: u16, message: &str) {
    let json: serde_json::Value = response.json();
    assert_eq!(
        json,
        serde_json::json!({ "status": status, "message": message })
    );
}

/// Assert two colors are equal within a lossy-compression tolerance
pub fn assert_color_near(actual: [u8; 3], expected: (u8, u8, u8), tolerance: u8) {
    let expected = [expected.0, expected.1, expected.2];
    let close = actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance);
    assert!(
        close,
        "Expected color near {expected:?} (±{tolerance}), got {actual:?}"
    );
}
