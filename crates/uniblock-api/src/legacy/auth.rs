// Session login and controller platform detection.
//
// The session lives in the cookie jar the client was built with. UniFi OS
// consoles additionally hand out a CSRF token that must accompany every
// proxied POST.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::auth::ControllerPlatform;
use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::transport::TransportConfig;

const CSRF_HEADER: &str = "x-csrf-token";

impl LegacyClient {
    /// Open a session with `username` / `password`.
    ///
    /// Any non-2xx answer is an [`Error::Authentication`] carrying the
    /// status and body the controller sent back.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.base_url().join(self.platform().login_path())?;
        debug!(%url, username, "logging in");

        let resp = self
            .http()
            .post(url)
            .json(&json!({
                "username": username,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        if let Some(token) = resp
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            debug!("session carries a CSRF token");
            self.set_csrf_token(token.to_owned());
        }

        Ok(())
    }

    /// Work out which kind of controller answers at `base_url`.
    ///
    /// UniFi OS serves `/api/auth/login`; a classic controller answers 404
    /// there. The probe uses the same TLS and timeout settings as the
    /// client that will be built afterwards.
    pub async fn detect_platform(
        base_url: &Url,
        transport: &TransportConfig,
    ) -> Result<ControllerPlatform, Error> {
        let http = transport.build_client()?;

        let probe = base_url.join(ControllerPlatform::UnifiOs.login_path())?;
        match http.get(probe.clone()).send().await {
            Ok(resp) if resp.status() != StatusCode::NOT_FOUND => {
                debug!(%probe, status = %resp.status(), "UniFi OS console detected");
                return Ok(ControllerPlatform::UnifiOs);
            }
            Ok(_) => {}
            Err(e) => debug!(%probe, error = %e, "UniFi OS probe failed"),
        }

        let probe = base_url.join(ControllerPlatform::ClassicController.login_path())?;
        http.get(probe.clone()).send().await?;
        debug!(%probe, "classic controller detected");
        Ok(ControllerPlatform::ClassicController)
    }
}
