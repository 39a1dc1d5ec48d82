//! Response classification
//!
//! Maps a completed HTTP exchange to success or a typed [`CredHubError`]. Transport
//! failures never reach this point; they are already [`CredHubError::Network`].

use bytes::Bytes;
use http::StatusCode;

use crate::codec;
use crate::core::{CredHubError, Result};
use crate::transport::ApiResponse;

/// Whether `response` should trigger the one-shot token refresh
pub fn needs_refresh(response: &ApiResponse) -> bool {
    response.status == StatusCode::UNAUTHORIZED
}

/// Classify a response, returning the body of a 2xx
///
/// A 401 is classified before its body is read. Any other non-2xx must carry the
/// `{"error": ".."}` envelope; if it does not, the response is malformed.
pub fn classify(response: ApiResponse) -> Result<Bytes> {
    let status = response.status;
    if status.is_success() {
        return Ok(response.body);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(CredHubError::Unauthorized { source: None });
    }
    match codec::decode_server_error(&response.body) {
        Ok(message) => Err(CredHubError::Server {
            status: status.as_u16(),
            message,
        }),
        Err(source) => Err(CredHubError::MalformedResponse { source }),
    }
}
