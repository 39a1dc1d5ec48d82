//! Wire codec for credential payloads
//!
//! All knowledge of the JSON shapes exchanged with the server lives here. Both
//! directions dispatch on [`CredentialType`] with an exhaustive match, so a new
//! credential kind needs exactly one new variant plus its encode/decode arms.
//!
//! Request shapes:
//!
//! ```text
//! PUT  {"name": .., "type": .., "value": .., "overwrite": ..}
//! POST {"name": .., "type": .., "overwrite": .., "parameters": {..}, "value": {"username": ..}?}
//! ```
//!
//! Response shape, also accepted wrapped in `{"data": [..]}`:
//!
//! ```text
//! {"id": .., "name": .., "type": .., "value": .., "version_created_at": ..}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::DecodeError;
use crate::credentials::{Credential, CredentialType, CredentialValue, GenerationParameters};

/// Result of decoding a response body
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Body held a credential
    Credential(Credential),
    /// Body was empty (e.g. a successful `DELETE`)
    NoContent,
}

impl Decoded {
    /// The credential, or [`DecodeError::NoContent`] for an empty body
    pub fn into_credential(self) -> Result<Credential, DecodeError> {
        match self {
            Self::Credential(credential) => Ok(credential),
            Self::NoContent => Err(DecodeError::NoContent),
        }
    }

    /// The credential, if any
    pub fn credential(self) -> Option<Credential> {
        match self {
            Self::Credential(credential) => Some(credential),
            Self::NoContent => None,
        }
    }
}

#[derive(Serialize)]
struct SetBody<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: CredentialType,
    value: &'a CredentialValue,
    overwrite: bool,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: CredentialType,
    overwrite: bool,
    parameters: &'a GenerationParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<GenerateUser<'a>>,
}

#[derive(Serialize)]
struct GenerateUser<'a> {
    username: &'a str,
}

#[derive(Deserialize)]
struct Envelope {
    name: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    version_created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ServerErrorBody {
    error: String,
}

/// Encode a `PUT /api/v1/data` body
///
/// The `type` field is taken from the value itself, so tag and shape cannot disagree.
pub fn encode_set(
    name: &str,
    value: &CredentialValue,
    overwrite: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&SetBody {
        name,
        kind: value.credential_type(),
        value,
        overwrite,
    })
}

/// Encode a `POST /api/v1/data` body
///
/// `username` is only meaningful for `user` credentials and is dropped otherwise.
pub fn encode_generate(
    name: &str,
    kind: CredentialType,
    parameters: &GenerationParameters,
    username: Option<&str>,
    overwrite: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    let value = match kind {
        CredentialType::User => username.map(|username| GenerateUser { username }),
        _ => None,
    };
    serde_json::to_vec(&GenerateBody {
        name,
        kind,
        overwrite,
        parameters,
        value,
    })
}

/// Decode a success body into a credential
///
/// A zero-length body is [`Decoded::NoContent`]. Anything that is not a JSON object
/// is [`DecodeError::Malformed`]; an object with a missing or unknown `type`, or a
/// `value` that does not fit its type, is rejected rather than defaulted.
pub fn decode(payload: &[u8]) -> Result<Decoded, DecodeError> {
    if payload.is_empty() {
        return Ok(Decoded::NoContent);
    }

    let mut object: Map<String, Value> =
        serde_json::from_slice(payload).map_err(DecodeError::Malformed)?;

    if !object.contains_key("type") {
        if let Some(Value::Array(items)) = object.remove("data") {
            let newest = items.into_iter().next().ok_or(DecodeError::EmptyDataList)?;
            object = serde_json::from_value(newest).map_err(DecodeError::Malformed)?;
        }
    }

    let kind = match object.get("type") {
        None | Some(Value::Null) => return Err(DecodeError::MissingType),
        Some(Value::String(tag)) => tag
            .parse::<CredentialType>()
            .map_err(|unknown| DecodeError::UnknownType(unknown.0))?,
        Some(other) => return Err(DecodeError::UnknownType(other.to_string())),
    };

    let raw_value = object
        .remove("value")
        .ok_or(DecodeError::MissingField("value"))?;
    let envelope: Envelope =
        serde_json::from_value(Value::Object(object)).map_err(DecodeError::Envelope)?;

    Ok(Decoded::Credential(Credential {
        id: envelope.id,
        name: envelope.name,
        value: decode_value(kind, raw_value)?,
        version_created_at: envelope.version_created_at,
    }))
}

fn decode_value(kind: CredentialType, raw: Value) -> Result<CredentialValue, DecodeError> {
    let invalid = |source| DecodeError::InvalidValue { kind, source };
    let value = match kind {
        CredentialType::Password => {
            CredentialValue::Password(serde_json::from_value(raw).map_err(invalid)?)
        }
        CredentialType::Value => {
            CredentialValue::Value(serde_json::from_value(raw).map_err(invalid)?)
        }
        CredentialType::Json => CredentialValue::Json(raw),
        CredentialType::User => CredentialValue::User(serde_json::from_value(raw).map_err(invalid)?),
        CredentialType::Certificate => {
            CredentialValue::Certificate(serde_json::from_value(raw).map_err(invalid)?)
        }
        CredentialType::Rsa => CredentialValue::Rsa(serde_json::from_value(raw).map_err(invalid)?),
        CredentialType::Ssh => CredentialValue::Ssh(serde_json::from_value(raw).map_err(invalid)?),
    };
    Ok(value)
}

/// Decode the `{"error": "<message>"}` envelope of a non-2xx response
pub fn decode_server_error(payload: &[u8]) -> Result<String, serde_json::Error> {
    serde_json::from_slice::<ServerErrorBody>(payload).map(|body| body.error)
}
