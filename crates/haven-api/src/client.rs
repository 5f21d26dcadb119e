// Hand-crafted async HTTP client for the haven cloud API.
//
// Wraps `reqwest::Client` with base-URL joining, session-token injection,
// and uniform status handling. Bodies are returned raw as `ApiResponse` —
// the core crate owns parsing and validation, so a response here is only
// "the server answered 2xx with these bytes".

use std::sync::RwLock;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Response ─────────────────────────────────────────────────────────

/// A successful (2xx) response body, held raw.
///
/// Exposes the body both ways the core crate needs it: as text for debug
/// logging and as typed JSON for validation.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The raw response body.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserialize the body, with a short preview in the error on failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| {
            let preview = preview(&self.body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: self.body.clone(),
            }
        })
    }
}

/// Truncate a body to at most 200 bytes for error messages, backing up to
/// a char boundary so a multibyte character straddling the cutoff cannot
/// panic the slice.
fn preview(body: &str) -> &str {
    let mut cut = body.len().min(200);
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    &body[..cut]
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the haven cloud API.
///
/// Shared by every entity for the entity's whole lifetime; requests are
/// independent, so concurrent use is fine — the client holds no per-entity
/// state beyond the session token.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Session token applied as a bearer header on every request.
    /// Login/refresh flows live outside this crate.
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a client for the given cloud base URL.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut base_url = Url::parse(base_url)?;

        // Keep a trailing slash so relative joins append instead of replace.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages transport settings).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The cloud base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Store a session token (captured by whatever auth flow the caller runs).
    pub fn set_token(&self, token: SecretString) {
        debug!("storing session token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Apply the stored token to a request builder.
    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Join a relative path (e.g. `"api/v1/automations/3"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.apply_token(self.http.get(url)).send().await?;
        Self::handle_response(resp).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<ApiResponse, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .apply_token(self.http.post(url).json(body))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// Send a POST request with no body (fire-and-forget actions).
    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.apply_token(self.http.post(url)).send().await?;
        Self::handle_response(resp).await
    }

    /// Send a PATCH request with a JSON body.
    pub async fn patch(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<ApiResponse, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self
            .apply_token(self.http.patch(url).json(body))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Map status codes, capture the body, and return it raw on success.
    async fn handle_response(resp: reqwest::Response) -> Result<ApiResponse, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session token rejected or expired".into(),
            });
        }

        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        Ok(ApiResponse { status, body })
    }
}
