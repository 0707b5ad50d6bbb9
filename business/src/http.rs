//! HTTP client returning send-safe responses.
//!
//! The request is fully drained inside [`RequestBuilder::send`], so the returned
//! [`Response`] holds plain data and can cross task boundaries. Dropping the
//! future returned by `send` drops the underlying connection.

use std::collections::HashMap;

/// A simplified HTTP response that contains only Send-safe data.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// What went wrong below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    /// The client gave up waiting.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// The connection broke while reading the body.
    Body,
    Other,
}

/// HTTP client error.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub kind: HttpErrorKind,
    pub message: String,
}

impl HttpError {
    pub fn new(kind: HttpErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == HttpErrorKind::Timeout
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            HttpErrorKind::Timeout
        } else if err.is_connect() {
            HttpErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            HttpErrorKind::Body
        } else {
            HttpErrorKind::Other
        };
        Self::new(kind, err.to_string())
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP error: {}", self.message)
    }
}

impl std::error::Error for HttpError {}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// A builder for GET requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    url: String,
    headers: HashMap<String, String>,
}

impl RequestBuilder {
    fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Send the request and read the whole body.
    pub async fn send(self) -> HttpResult<Response> {
        let mut request = self.client.get(&self.url);

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(Response { status, body })
    }
}

/// Thin wrapper over a pooled `reqwest::Client`.
///
/// # Example
///
/// ```ignore
/// use people_business::http::Client;
///
/// async fn fetch_users() {
///     let response = Client::default()
///         .get("https://jsonplaceholder.typicode.com/users")
///         .send()
///         .await
///         .unwrap();
///
///     if response.is_success() {
///         let users: serde_json::Value = response.json().unwrap();
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        assert!(Response::new(200, Vec::new()).is_success());
        assert!(Response::new(204, Vec::new()).is_success());
        assert!(!Response::new(404, Vec::new()).is_success());
        assert!(!Response::new(500, Vec::new()).is_success());
    }

    #[test]
    fn test_response_json() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct TestData {
            message: String,
        }

        let response = Response::new(200, br#"{"message": "hello"}"#.to_vec());

        let data: TestData = response.json().unwrap();
        assert_eq!(
            data,
            TestData {
                message: "hello".to_owned()
            }
        );
    }

    #[test]
    fn test_response_json_malformed() {
        let response = Response::new(200, b"<html>oops</html>".to_vec());
        assert!(response.json::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_request_builder_headers() {
        let builder = Client::default()
            .get("https://example.com")
            .header("Accept", "application/json");

        assert_eq!(builder.url, "https://example.com");
        assert_eq!(
            builder.headers.get("Accept"),
            Some(&"application/json".to_owned())
        );
    }

    #[test]
    fn test_http_error_timeout_flag() {
        assert!(HttpError::new(HttpErrorKind::Timeout, "slow").is_timeout());
        let err = HttpError::new(HttpErrorKind::Connect, "refused");
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "HTTP error: refused");
    }
}
