use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};

/// Path of the credential data endpoint
pub const DATA_PATH: &str = "/api/v1/data";

/// Outgoing request, relative to the configured API URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute path, e.g. `/api/v1/data`
    pub path: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Headers, including `Authorization` once authorized
    pub headers: HeaderMap,
    /// JSON body
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Bodiless request with `Accept: application/json`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers,
            body: None,
        }
    }

    /// Append a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body and its `Content-Type`
    pub fn with_json_body(mut self, body: Vec<u8>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(body);
        self
    }

    /// `PUT /api/v1/data`
    pub fn set(body: Vec<u8>) -> Self {
        Self::new(Method::PUT, DATA_PATH).with_json_body(body)
    }

    /// `POST /api/v1/data`
    pub fn generate(body: Vec<u8>) -> Self {
        Self::new(Method::POST, DATA_PATH).with_json_body(body)
    }

    /// `GET /api/v1/data?name=<name>`
    pub fn get(name: &str) -> Self {
        Self::new(Method::GET, DATA_PATH).with_query("name", name)
    }

    /// `GET /api/v1/data/<id>`
    pub fn get_by_id(id: &str) -> Self {
        Self::new(Method::GET, format!("{DATA_PATH}/{id}"))
    }

    /// `DELETE /api/v1/data?name=<name>`
    pub fn delete(name: &str) -> Self {
        Self::new(Method::DELETE, DATA_PATH).with_query("name", name)
    }

    /// Value of the `name` query parameter, if any
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Completed HTTP exchange, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Response status
    pub status: StatusCode,
    /// Raw body
    pub body: Bytes,
}

impl ApiResponse {
    /// Response with the given status and body
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
