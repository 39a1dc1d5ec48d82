//! `set` operations against a recording transport

use credhub::CredHubError;
use credhub::credentials::{
    CertificateValue, CredentialType, CredentialValue, RsaValue, SshValue, UserValue,
};
use credhub::testing::{certificate_response, mock_credhub, password_response, user_response};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn set_certificate_sends_put_with_typed_body() {
    let mock = mock_credhub();
    mock.http.respond_ok(certificate_response());

    let certificate = CertificateValue {
        ca: Some("some-ca".into()),
        ..CertificateValue::default()
    };
    mock.credhub
        .set_certificate("/example-certificate", certificate, true)
        .await
        .unwrap();

    let request = mock.http.last_request().unwrap();
    assert_eq!(request.path, "/api/v1/data");
    assert_eq!(request.method, Method::PUT);
    assert_eq!(
        mock.http.last_body_json().unwrap(),
        json!({
            "name": "/example-certificate",
            "type": "certificate",
            "overwrite": true,
            "value": { "ca": "some-ca" }
        })
    );
}

#[tokio::test]
async fn set_certificate_returns_the_stored_credential() {
    let mock = mock_credhub();
    mock.http.respond_ok(certificate_response());

    let certificate = CertificateValue {
        certificate: Some("some-cert".into()),
        ..CertificateValue::default()
    };
    let credential = mock
        .credhub
        .set_certificate("/example-certificate", certificate, false)
        .await
        .unwrap();

    assert_eq!(credential.name, "/example-certificate");
    assert_eq!(credential.credential_type(), CredentialType::Certificate);
    assert_eq!(
        credential.value,
        CredentialValue::Certificate(CertificateValue {
            ca: Some("some-ca".into()),
            ca_name: None,
            certificate: Some("some-certificate".into()),
            private_key: Some("some-private-key".into()),
        })
    );
}

#[tokio::test]
async fn set_password_sends_put_with_overwrite_false() {
    let mock = mock_credhub();
    mock.http.respond_ok(password_response());

    mock.credhub
        .set_password("/example-password", "some-password", false)
        .await
        .unwrap();

    let request = mock.http.last_request().unwrap();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/api/v1/data");
    assert_eq!(
        String::from_utf8(request.body.unwrap()).unwrap(),
        r#"{"name":"/example-password","type":"password","value":"some-password","overwrite":false}"#
    );
}

#[tokio::test]
async fn set_password_returns_the_stored_credential() {
    let mock = mock_credhub();
    mock.http.respond_ok(password_response());

    let credential = mock
        .credhub
        .set_password("/example-password", "some-password", false)
        .await
        .unwrap();

    assert_eq!(credential.id.as_deref(), Some("some-id"));
    assert_eq!(credential.name, "/example-password");
    assert_eq!(credential.credential_type(), CredentialType::Password);
    assert_eq!(credential.value.as_str(), Some("some-password"));
}

#[tokio::test]
async fn set_user_body_omits_hash() {
    let mock = mock_credhub();
    mock.http.respond_ok(user_response());

    mock.credhub
        .set_user(
            "/example-user",
            UserValue::new("some-user", "some-password"),
            false,
        )
        .await
        .unwrap();

    assert_eq!(
        mock.http.last_body_json().unwrap(),
        json!({
            "name": "/example-user",
            "type": "user",
            "overwrite": false,
            "value": { "username": "some-user", "password": "some-password" }
        })
    );
}

#[tokio::test]
async fn set_user_returns_server_hash() {
    let mock = mock_credhub();
    mock.http.respond_ok(user_response());

    let credential = mock
        .credhub
        .set_user("/example-user", UserValue::new("username", "some-user"), false)
        .await
        .unwrap();

    let CredentialValue::User(user) = credential.value else {
        panic!("expected a user credential");
    };
    assert_eq!(user.username, "some-username");
    assert_eq!(user.password, "some-password");
    assert_eq!(user.password_hash.as_deref(), Some("some-hash"));
}

#[tokio::test]
async fn set_rsa_round_trips_key_pair() {
    let mock = mock_credhub();
    mock.http.respond_ok(
        json!({
            "id": "67fc3def-bbfb-4953-83f8-4ab0682ad676",
            "name": "/example-rsa",
            "type": "rsa",
            "value": { "public_key": "public-key", "private_key": "private-key" },
            "version_created_at": "2017-01-01T04:07:18Z"
        })
        .to_string(),
    );

    let rsa = RsaValue {
        public_key: Some("public-key".into()),
        private_key: Some("private-key".into()),
    };
    let credential = mock
        .credhub
        .set_rsa("/example-rsa", rsa.clone(), false)
        .await
        .unwrap();

    assert_eq!(
        mock.http.last_body_json().unwrap()["value"],
        json!({ "public_key": "public-key", "private_key": "private-key" })
    );
    assert_eq!(credential.value, CredentialValue::Rsa(rsa));
}

#[tokio::test]
async fn set_ssh_reads_fingerprint() {
    let mock = mock_credhub();
    mock.http.respond_ok(
        json!({
            "id": "ssh-id",
            "name": "/example-ssh",
            "type": "ssh",
            "value": {
                "public_key": "ssh-rsa AAAA",
                "private_key": "private-key",
                "public_key_fingerprint": "SHA256:abc"
            },
            "version_created_at": "2017-01-01T04:07:18Z"
        })
        .to_string(),
    );

    let credential = mock
        .credhub
        .set_ssh(
            "/example-ssh",
            SshValue {
                public_key: Some("ssh-rsa AAAA".into()),
                private_key: Some("private-key".into()),
                public_key_fingerprint: None,
            },
            true,
        )
        .await
        .unwrap();

    let CredentialValue::Ssh(ssh) = credential.value else {
        panic!("expected an ssh credential");
    };
    assert_eq!(ssh.public_key_fingerprint.as_deref(), Some("SHA256:abc"));
}

#[tokio::test]
async fn set_json_keeps_document_verbatim() {
    let document = json!({ "nested": { "list": [1, "two", null] } });
    let mock = mock_credhub();
    mock.http.respond_ok(
        json!({
            "name": "/example-json",
            "type": "json",
            "value": document,
        })
        .to_string(),
    );

    let credential = mock
        .credhub
        .set_json("/example-json", document.clone(), false)
        .await
        .unwrap();

    assert_eq!(mock.http.last_body_json().unwrap()["value"], document);
    assert_eq!(credential.value, CredentialValue::Json(document));
    assert_eq!(credential.id, None);
}

#[tokio::test]
async fn set_fails_on_network_error() {
    let mock = mock_credhub();
    mock.http.fail_next_send();

    let err = mock
        .credhub
        .set_password("/example-password", "some-password", false)
        .await
        .unwrap_err();

    assert!(matches!(err, CredHubError::Network { .. }), "got {err:?}");
}

#[tokio::test]
async fn set_fails_on_unparseable_body() {
    let mock = mock_credhub();
    mock.http.respond_ok("something-invalid");

    let err = mock
        .credhub
        .set_certificate("/example-certificate", CertificateValue::default(), false)
        .await
        .unwrap_err();

    assert!(
        matches!(err, CredHubError::MalformedResponse { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn set_fails_on_empty_success_body() {
    let mock = mock_credhub();
    mock.http.respond_ok("");

    let err = mock
        .credhub
        .set_value("/example-value", "v", false)
        .await
        .unwrap_err();

    assert!(matches!(err, CredHubError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn set_surfaces_server_message() {
    let mock = mock_credhub();
    mock.http.respond_with(
        StatusCode::BAD_REQUEST,
        r#"{"error":"The request includes an unrecognized parameter 'foo'."}"#,
    );

    let err = mock
        .credhub
        .set_value("/example-value", "v", false)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "The request includes an unrecognized parameter 'foo'."
    );
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn set_rejects_empty_name_without_sending() {
    let mock = mock_credhub();

    let err = mock
        .credhub
        .set_value("  ", "v", false)
        .await
        .unwrap_err();

    assert!(matches!(err, CredHubError::InvalidRequest { .. }));
    assert_eq!(mock.http.send_count(), 0);
}
