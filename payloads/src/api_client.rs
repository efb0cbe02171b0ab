use crate::{requests, responses};
use reqwest::{Method, StatusCode, multipart::Form};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::{fmt, sync::Arc, time::Duration};

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// Reads the current bearer token. Called on every request, so a token
/// obtained after the client was built is picked up immediately.
pub type TokenProvider = Arc<dyn Fn() -> Option<SecretString> + Send + Sync>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Plain-text error bodies longer than this are replaced by the status
/// reason; they are usually HTML error pages from a proxy.
const MAX_PLAIN_ERROR_LEN: usize = 200;

/// Process-wide client settings, fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend, without the `/api` prefix.
    pub address: String,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// An API client for interfacing with the backend.
///
/// Cloning is cheap: the underlying `reqwest::Client` and the token provider
/// are reference counted.
#[derive(Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
    pub timeout: Option<Duration>,
    pub token_provider: Option<TokenProvider>,
}

impl fmt::Debug for APIClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("APIClient")
            .field("address", &self.address)
            .field("timeout", &self.timeout)
            .field("has_token_provider", &self.token_provider.is_some())
            .finish()
    }
}

impl APIClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            address: config.address.trim_end_matches('/').to_string(),
            inner_client: reqwest::Client::new(),
            timeout: config.timeout,
            token_provider: None,
        }
    }

    pub fn with_token_provider(
        mut self,
        provider: impl Fn() -> Option<SecretString> + Send + Sync + 'static,
    ) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/api{path}", &self.address)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = self.format_url(path);
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.inner_client.request(method, url);
        if let Some(token) =
            self.token_provider.as_ref().and_then(|provider| provider())
        {
            request = request.bearer_auth(token.expose_secret());
        }

        // The browser build races requests against a timer instead.
        #[cfg(not(target_arch = "wasm32"))]
        let request = match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        request
    }

    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ReqwestResult {
        self.request(Method::GET, path).query(query).send().await
    }

    pub(crate) async fn post(
        &self,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> ReqwestResult {
        self.request(Method::POST, path).json(body).send().await
    }

    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: Form,
    ) -> ReqwestResult {
        self.request(Method::POST, path).multipart(form).send().await
    }

    pub(crate) async fn patch(
        &self,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> ReqwestResult {
        self.request(Method::PATCH, path).json(body).send().await
    }

    pub(crate) async fn delete(&self, path: &str) -> ReqwestResult {
        self.request(Method::DELETE, path).send().await
    }
}

/// Methods on the backend API that sit outside any resource
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.get("/health_check", &[]).await?;
        ok_empty(response).await
    }

    /// Exchange credentials for a session token. Storing the token is up to
    /// the caller; hand it back through the token provider.
    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<responses::Session, ClientError> {
        let response = self.post("/auth/login", details).await?;
        Ok(ok_single(response).await?.data)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing the server's message.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),
    #[error("Unexpected response from the server.")]
    Decode(#[source] reqwest::Error),
    #[error("The server took too long to respond.")]
    Timeout,
    /// The request was superseded or its owner went away. Never shown.
    #[error("Request canceled")]
    Canceled,
    #[error("Payload has no `{0}` field")]
    MissingIdentifier(String),
    #[error("Payload could not be encoded")]
    Payload(#[from] serde_json::Error),
    #[error("Invalid file type `{0}`")]
    InvalidMime(String),
    #[error("The server reported the request as unsuccessful.")]
    Unsuccessful,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e)
        } else {
            Self::Network(e)
        }
    }
}

impl ClientError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::APIError(StatusCode::UNAUTHORIZED, _))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            _ => None,
        }
    }
}

/// Human-readable message for a failed response: the server's own message
/// when it sent one, otherwise a short plain-text body, otherwise the
/// status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Something went wrong")
            .to_string()
    };

    if let Ok(parsed) = serde_json::from_str::<responses::ErrorBody>(body) {
        return parsed.into_message().unwrap_or_else(fallback);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty()
        && trimmed.len() <= MAX_PLAIN_ERROR_LEN
        && !trimmed.starts_with('<')
    {
        return trimmed.to_string();
    }
    fallback()
}

async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return e.into(),
    };
    let message = error_message(status, &body);
    tracing::warn!(%status, %message, "request failed");
    ClientError::APIError(status, message)
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json::<T>().await?)
}

/// Like [`ok_body`] for the `{ data, success }` envelope, treating
/// `success: false` as a failure.
pub async fn ok_single<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<responses::Single<T>, ClientError> {
    let single: responses::Single<T> = ok_body(response).await?;
    if !single.success {
        return Err(ClientError::Unsuccessful);
    }
    Ok(single)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins() {
        let message = error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"Name is already taken"}"#,
        );
        assert_eq!(message, "Name is already taken");
    }

    #[test]
    fn error_key_is_accepted() {
        let message =
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"Bad year"}"#);
        assert_eq!(message, "Bad year");
    }

    #[test]
    fn json_without_message_falls_back_to_reason() {
        let message =
            error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"code":7}"#);
        assert_eq!(message, "Internal Server Error");
    }

    #[test]
    fn short_plain_text_is_used() {
        let message = error_message(StatusCode::NOT_FOUND, "No such award\n");
        assert_eq!(message, "No such award");
    }

    #[test]
    fn html_pages_are_replaced() {
        let message = error_message(
            StatusCode::BAD_GATEWAY,
            "<html><body>upstream down</body></html>",
        );
        assert_eq!(message, "Bad Gateway");
    }

    #[test]
    fn unauthorized_is_detected() {
        let error =
            ClientError::APIError(StatusCode::UNAUTHORIZED, "expired".into());
        assert!(error.is_unauthorized());
        assert!(!error.is_canceled());
        assert!(!ClientError::Canceled.is_unauthorized());
    }

    #[test]
    fn address_trailing_slash_is_trimmed() {
        let client = APIClient::new(&ClientConfig::new("http://host:8000/"));
        assert_eq!(client.format_url("/awards"), "http://host:8000/api/awards");
    }
}
