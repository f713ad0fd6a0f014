//! Authenticated request pipeline.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use refetch_core::error::{AuthError, Error, InvalidInputError, TransportError};
use refetch_core::{
    AccessToken, BaseUrl, Notice, Notifier, NullNotifier, RefreshToken, Result, SessionStore,
};

use crate::request::{Body, RequestOptions, multipart_form};
use crate::wire::{RefreshRequest, RefreshResponse, TOKEN_REFRESH};

/// Authenticated HTTP client with transparent token refresh.
///
/// Every call attaches the stored access token as a bearer credential. A
/// 401 response triggers one refresh through the token refresh endpoint
/// and one retry of the original request; any further rejection is
/// terminal. Refresh failure clears the session, notifies the user through
/// the injected [`Notifier`], and surfaces as
/// [`AuthError::SessionExpired`].
///
/// The client never caches tokens between calls; the injected
/// [`SessionStore`] is the single owner of credential state.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base: BaseUrl,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    // Coalesces concurrent refresh attempts into a single wire call.
    refresh_gate: Mutex<()>,
}

impl AuthClient {
    /// Create a client with the given base URL and session store, and no
    /// user-facing notification sink.
    pub fn new(base: BaseUrl, store: Arc<dyn SessionStore>) -> Self {
        Self::with_notifier(base, store, Arc::new(NullNotifier))
    }

    /// Create a client with an injected notification sink.
    pub fn with_notifier(
        base: BaseUrl,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("refetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            inner: Arc::new(ClientInner {
                http,
                base,
                store,
                notifier,
                refresh_gate: Mutex::new(()),
            }),
        }
    }

    /// Returns the base URL this client is configured for.
    pub fn base(&self) -> &BaseUrl {
        &self.inner.base
    }

    /// Perform an authenticated request.
    ///
    /// Relative targets are joined onto the base URL; absolute `http(s)`
    /// targets pass through unchanged. Non-401 responses are returned
    /// verbatim, whatever their status; interpreting them is the caller's
    /// concern.
    #[instrument(skip(self, options), fields(base = %self.inner.base, %method, path = target))]
    pub async fn execute(
        &self,
        method: Method,
        target: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let url = self.inner.base.join(target);

        let access = match self.inner.store.get().await?.access {
            Some(access) => access,
            None => self.acquire_without_access().await?,
        };

        let response = self.dispatch(&method, &url, &options, &access).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!("access token rejected, refreshing session");
        let access = self.refresh_rejected(&access).await?;

        // Single retry with the refreshed token; the second response is
        // terminal whatever its status, including another 401.
        self.dispatch(&method, &url, &options, &access).await
    }

    /// `GET` a target with default options.
    pub async fn get(&self, target: &str) -> Result<Response> {
        self.execute(Method::GET, target, RequestOptions::new())
            .await
    }

    /// `POST` a JSON body to a target.
    pub async fn post_json<B: Serialize>(&self, target: &str, body: &B) -> Result<Response> {
        let value = serde_json::to_value(body).map_err(|e| InvalidInputError::Body {
            reason: e.to_string(),
        })?;
        self.execute(Method::POST, target, RequestOptions::new().json(value))
            .await
    }

    /// Force a refresh of the stored access token.
    ///
    /// On failure the session is cleared, the notifier is told, and
    /// [`AuthError::SessionExpired`] is returned.
    #[instrument(skip(self), fields(base = %self.inner.base))]
    pub async fn refresh(&self) -> Result<()> {
        let _gate = self.inner.refresh_gate.lock().await;

        let Some(refresh) = self.inner.store.get().await?.refresh else {
            self.expire_session().await?;
            return Err(AuthError::SessionExpired.into());
        };

        match self.mint_access(&refresh).await {
            Ok((access, rotated)) => {
                self.inner.store.set_tokens(access, rotated).await?;
                info!("session refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed");
                self.expire_session().await?;
                Err(AuthError::SessionExpired.into())
            }
        }
    }

    /// Obtain an access token when none is stored, by eagerly refreshing.
    ///
    /// Fails with [`AuthError::Unauthenticated`] when no refresh token
    /// exists (without touching the network) or when the eager refresh
    /// fails (after clearing the session).
    async fn acquire_without_access(&self) -> Result<AccessToken> {
        let _gate = self.inner.refresh_gate.lock().await;

        let session = self.inner.store.get().await?;
        if let Some(access) = session.access {
            // Another caller refreshed while we waited on the gate.
            return Ok(access);
        }
        let Some(refresh) = session.refresh else {
            debug!("no credentials available, not dispatching");
            self.inner.notifier.notify(Notice::LoginRequired);
            return Err(AuthError::Unauthenticated.into());
        };

        match self.mint_access(&refresh).await {
            Ok((access, rotated)) => {
                self.inner
                    .store
                    .set_tokens(access.clone(), rotated)
                    .await?;
                info!("session refreshed");
                Ok(access)
            }
            Err(err) => {
                warn!(error = %err, "eager refresh failed");
                self.expire_session().await?;
                Err(AuthError::Unauthenticated.into())
            }
        }
    }

    /// Refresh after a 401, coalescing concurrent attempts.
    ///
    /// `rejected` is the token the failed call carried: if the store
    /// already holds a different one, another caller refreshed first and
    /// its token is reused instead of issuing a second refresh call.
    async fn refresh_rejected(&self, rejected: &AccessToken) -> Result<AccessToken> {
        let _gate = self.inner.refresh_gate.lock().await;

        let session = self.inner.store.get().await?;
        if let Some(access) = session.access {
            if access != *rejected {
                debug!("token already replaced by a concurrent refresh");
                return Ok(access);
            }
        }
        let Some(refresh) = session.refresh else {
            self.expire_session().await?;
            return Err(AuthError::SessionExpired.into());
        };

        match self.mint_access(&refresh).await {
            Ok((access, rotated)) => {
                self.inner
                    .store
                    .set_tokens(access.clone(), rotated)
                    .await?;
                info!("session refreshed");
                Ok(access)
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed");
                self.expire_session().await?;
                Err(AuthError::SessionExpired.into())
            }
        }
    }

    /// Call the refresh endpoint and return the minted token pair.
    ///
    /// Does not touch the store; callers persist on success and clear on
    /// failure.
    async fn mint_access(
        &self,
        refresh: &RefreshToken,
    ) -> Result<(AccessToken, Option<RefreshToken>)> {
        let url = self.inner.base.join(TOKEN_REFRESH);
        let request = RefreshRequest {
            refresh: refresh.as_str(),
        };

        let response = self
            .inner
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "refresh endpoint rejected the refresh token");
            return Err(AuthError::RefreshRejected {
                status: status.as_u16(),
            }
            .into());
        }

        // A malformed success body is a refresh failure like any other.
        let body: RefreshResponse = response.json().await.map_err(transport_error)?;

        Ok((
            AccessToken::new(body.access),
            body.refresh.map(RefreshToken::new),
        ))
    }

    /// Clear the session and tell the user it expired.
    async fn expire_session(&self) -> Result<()> {
        self.inner.store.clear().await?;
        self.inner.notifier.notify(Notice::SessionExpired);
        Ok(())
    }

    /// Send one request with the given access token attached.
    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        options: &RequestOptions,
        access: &AccessToken,
    ) -> Result<Response> {
        let headers = self.build_headers(options, access)?;
        let mut request = self.inner.http.request(method.clone(), url).headers(headers);

        request = match &options.body {
            Body::Empty => request,
            Body::Json(value) => request.json(value),
            Body::Multipart(parts) => request.multipart(multipart_form(parts)?),
        };

        request.send().await.map_err(transport_error)
    }

    /// Merge caller headers over the pipeline defaults.
    fn build_headers(&self, options: &RequestOptions, access: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", access.as_str());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| InvalidInputError::Header {
                name: "authorization".to_string(),
                reason: e.to_string(),
            })?,
        );

        // Multipart bodies leave Content-Type to the transport so it can
        // set the boundary itself.
        if !matches!(options.body, Body::Multipart(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        // Caller headers take precedence over the defaults.
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base", &self.inner.base)
            .finish()
    }
}

/// Map a reqwest error onto the transport taxonomy.
fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        TransportError::Timeout.into()
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
        .into()
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
        .into()
    }
}
