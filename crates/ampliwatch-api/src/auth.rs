// AmpliFi login handshake
//
// Three ordered steps, each scraping or spending a token: GET the login
// page and pull the form token out of the HTML, POST it with the password
// (success is signaled by the session cookie, not the status line), then
// GET the info page for the second token the data endpoint wants. The
// tokens rotate on every handshake, so a forced re-auth re-derives both.

use std::sync::LazyLock;

use regex::Regex;
use secrecy::ExposeSecret;
use tracing::debug;

use crate::client::{INFO_PATH, LOGIN_PATH, RouterClient, SESSION_COOKIE, SessionTokens, preview};
use crate::error::Error;

/// Login form token as it appears in the login page HTML.
static LOGIN_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"value='([A-Za-z0-9]{16})'").expect("login token pattern"));

/// Data-fetch token as it appears in the info page HTML.
static INFO_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"token='([A-Za-z0-9]{16})'").expect("info token pattern"));

impl RouterClient {
    /// Ensure a usable session exists, running the handshake if needed.
    ///
    /// With `force` the cached tokens and session cookie are dropped first
    /// and the handshake always runs. Without it, cached tokens are trusted
    /// as-is; a stale session surfaces later as an unparsable data body,
    /// which resets state so the next call lands back here.
    ///
    /// Tokens are only stored once all three steps succeed, so a failure
    /// partway through leaves the session unauthenticated.
    pub async fn ensure_authenticated(&self, force: bool) -> Result<(), Error> {
        if force {
            self.reset_session();
        } else if self.has_session() {
            debug!("session tokens already cached, skipping handshake");
            return Ok(());
        }

        let login_token = self.fetch_login_token().await?;
        self.login(&login_token).await?;
        let info_token = self.fetch_info_token().await?;

        self.set_tokens(SessionTokens {
            login_token,
            info_token,
        });
        debug!("handshake complete");
        Ok(())
    }

    /// Validate the configured host and password with a forced handshake.
    ///
    /// Never raises; meant for credential validation before persisting
    /// configuration, not for runtime polling.
    pub async fn test_connection(&self) -> bool {
        match self.ensure_authenticated(true).await {
            Ok(()) => true,
            Err(e) => {
                debug!("connection test failed: {e}");
                false
            }
        }
    }

    /// Step 1: scrape the login form token.
    async fn fetch_login_token(&self) -> Result<String, Error> {
        let url = self.endpoint(LOGIN_PATH)?;

        debug!("GET {}", url);

        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login page returned HTTP {status}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        extract_token(&LOGIN_TOKEN_RE, &body).ok_or_else(|| Error::Authentication {
            message: "login token not found in login page".into(),
        })
    }

    /// Step 2: spend the login token together with the password.
    ///
    /// A wrong password still answers HTTP 200 (the login page again), so
    /// the session cookie is the only reliable success signal.
    async fn login(&self, login_token: &str) -> Result<(), Error> {
        let url = self.endpoint(LOGIN_PATH)?;

        debug!("POST {}", url);

        let form = [
            ("token", login_token),
            ("password", self.password().expose_secret()),
        ];
        let resp = self
            .http()
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        if !resp.cookies().any(|c| c.name() == SESSION_COOKIE) {
            return Err(Error::Authentication {
                message: "login response did not set a session cookie (wrong password?)".into(),
            });
        }

        debug!("login successful");
        Ok(())
    }

    /// Step 3: scrape the data-fetch token from the info page.
    async fn fetch_info_token(&self) -> Result<String, Error> {
        let url = self.endpoint(INFO_PATH)?;

        debug!("GET {}", url);

        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("info page returned HTTP {status}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        extract_token(&INFO_TOKEN_RE, &body).ok_or_else(|| Error::Authentication {
            message: "info token not found in info page".into(),
        })
    }
}

fn extract_token(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}
