// SAM backend HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, bearer-token
// injection, and `{status, message, data}` envelope unwrapping. Endpoint
// groups (users, devices, telemetry, ...) are implemented as inherent
// methods in separate files so this module stays focused on transport.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Error bodies are sometimes still envelopes; pull the message out if so.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Raw HTTP client for the SAM backend REST API.
///
/// All request helpers return the parsed [`Envelope`] after checking both
/// the HTTP status and the envelope's own `status` flag, so callers only
/// ever see successful payloads or a typed [`Error`].
pub struct SamClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    /// Bearer token issued by `POST /api/v1/login/user`.
    token: RwLock<Option<SecretString>>,
}

impl SamClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://10.0.0.5:8080`); the
    /// `/api/vN/...` paths are appended to it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
            token: RwLock::new(None),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
            token: RwLock::new(None),
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Attach a bearer token to every subsequent request.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the bearer token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a bearer token is currently set.
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a fixed API path such as `api/v1/getAll/user`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Build an API URL with one trailing, percent-encoded path segment
    /// (an id or a samId).
    pub(crate) fn api_url_with(&self, path: &str, segment: &str) -> Result<Url, Error> {
        let mut url = self.api_url(path)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Envelope<T>, Error> {
        debug!("GET {}", url);

        let builder = self.apply_token(self.http.get(url));
        let resp = self.send(builder).await?;

        self.parse_envelope(resp).await
    }

    /// Send a GET request with a serialized query string.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &(impl Serialize + Sync),
    ) -> Result<Envelope<T>, Error> {
        debug!("GET {} (with query)", url);

        let builder = self.apply_token(self.http.get(url).query(query));
        let resp = self.send(builder).await?;

        self.parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Envelope<T>, Error> {
        debug!("POST {}", url);

        let builder = self.apply_token(self.http.post(url).json(body));
        let resp = self.send(builder).await?;

        self.parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Envelope<T>, Error> {
        debug!("PUT {}", url);

        let builder = self.apply_token(self.http.put(url).json(body));
        let resp = self.send(builder).await?;

        self.parse_envelope(resp).await
    }

    /// Send a DELETE request and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Envelope<T>, Error> {
        debug!("DELETE {}", url);

        let builder = self.apply_token(self.http.delete(url));
        let resp = self.send(builder).await?;

        self.parse_envelope(resp).await
    }

    /// Send a DELETE request carrying a JSON body.
    pub(crate) async fn delete_with_body<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Envelope<T>, Error> {
        debug!("DELETE {} (with body)", url);

        let builder = self.apply_token(self.http.delete(url).json(body));
        let resp = self.send(builder).await?;

        self.parse_envelope(resp).await
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    /// Parse the `{ status, message, data }` envelope.
    ///
    /// HTTP 401/403/404 map to dedicated variants; other non-success codes
    /// and a failed envelope `status` become `Error::Api`. A body that is
    /// not a valid envelope for `T` is `Error::MalformedPayload`.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(status = status.as_u16(), len = body.len(), "response received");

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| format!("HTTP {status}: {}", preview(&body)));
            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED => Error::Authentication { message },
                reqwest::StatusCode::FORBIDDEN => Error::Forbidden { message },
                reqwest::StatusCode::NOT_FOUND => Error::NotFound { message },
                _ => Error::Api {
                    message,
                    status: Some(status.as_u16()),
                },
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            Error::MalformedPayload {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            }
        })?;

        if envelope.is_ok() {
            Ok(envelope)
        } else {
            Err(Error::Api {
                message: envelope
                    .message
                    .unwrap_or_else(|| "request rejected by backend".into()),
                status: None,
            })
        }
    }
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.message.or(parsed.error).filter(|m| !m.is_empty())
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
