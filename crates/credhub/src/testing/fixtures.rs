//! Canned server responses

/// API URL used by mock-backed clients
pub const TEST_API_URL: &str = "https://example.com";

/// Creation time used by every fixture
pub const TEST_CREATED_AT: &str = "2017-01-01T04:07:18Z";

/// Response envelope for a credential of `kind` with `value`
pub fn credential_response(name: &str, kind: &str, value: serde_json::Value) -> String {
    serde_json::json!({
        "id": "some-id",
        "name": name,
        "type": kind,
        "value": value,
        "version_created_at": TEST_CREATED_AT,
    })
    .to_string()
}

/// `password` response for `/example-password`
pub fn password_response() -> String {
    credential_response(
        "/example-password",
        "password",
        serde_json::json!("some-password"),
    )
}

/// `certificate` response for `/example-certificate`
pub fn certificate_response() -> String {
    credential_response(
        "/example-certificate",
        "certificate",
        serde_json::json!({
            "ca": "some-ca",
            "certificate": "some-certificate",
            "private_key": "some-private-key",
        }),
    )
}

/// `user` response for `/example-user`, hash included
pub fn user_response() -> String {
    credential_response(
        "/example-user",
        "user",
        serde_json::json!({
            "username": "some-username",
            "password": "some-password",
            "password_hash": "some-hash",
        }),
    )
}

/// Non-2xx error envelope
pub fn error_response(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
