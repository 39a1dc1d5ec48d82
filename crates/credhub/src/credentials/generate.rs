//! Server-side generation parameters

use serde::{Deserialize, Serialize};

/// Parameters for `POST /api/v1/data`
///
/// Only the fields relevant to the requested type are read by the server;
/// unset fields are left out of the request so server defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Password length (`password`, `user`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Leave out upper-case letters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_upper: Option<bool>,
    /// Leave out lower-case letters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_lower: Option<bool>,
    /// Leave out digits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_number: Option<bool>,
    /// Add special characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_special: Option<bool>,
    /// Key length in bits (`rsa`, `ssh`): 2048, 3072 or 4096
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_length: Option<u32>,
    /// Comment appended to the public key (`ssh`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_comment: Option<String>,
}

impl GenerationParameters {
    /// Password parameters with a fixed length
    pub fn password(length: u32) -> Self {
        Self {
            length: Some(length),
            ..Self::default()
        }
    }

    /// Key-pair parameters with a fixed key length
    pub fn key_pair(key_length: u32) -> Self {
        Self {
            key_length: Some(key_length),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_parameters_serialize_empty() {
        assert_eq!(
            serde_json::to_value(GenerationParameters::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn only_set_fields_are_sent() {
        let params = GenerationParameters {
            include_special: Some(true),
            ..GenerationParameters::password(40)
        };
        assert_eq!(
            serde_json::to_value(params).unwrap(),
            json!({ "length": 40, "include_special": true })
        );
    }
}
