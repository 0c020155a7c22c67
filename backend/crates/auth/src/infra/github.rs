//! GitHub OAuth adapter
//!
//! Authorization-code exchange against github.com followed by a profile
//! fetch from the REST API. Every transport, status or decoding failure is
//! reported as `ExternalExchangeFailed`.

use std::time::Duration;

use platform::config::{env_duration, env_or, env_var};
use reqwest::{Client, Url, header};
use serde::Deserialize;

use crate::domain::repository::ExternalIdentityBroker;
use crate::domain::value_object::external_profile::ExternalProfile;
use crate::error::{AuthError, AuthResult};

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const SCOPE: &str = "user:email";
const USER_AGENT: &str = concat!("devthreads/", env!("CARGO_PKG_VERSION"));

const DEFAULT_REDIRECT_URL: &str = "http://localhost:8080/api/auth/github/callback";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub http_timeout: Duration,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl GithubConfig {
    /// `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET`, `GITHUB_REDIRECT_URL`,
    /// `GITHUB_HTTP_TIMEOUT`
    pub fn from_env() -> Self {
        let config = Self {
            client_id: env_var("GITHUB_CLIENT_ID").unwrap_or_default(),
            client_secret: env_var("GITHUB_CLIENT_SECRET").unwrap_or_default(),
            redirect_url: env_or("GITHUB_REDIRECT_URL", DEFAULT_REDIRECT_URL),
            http_timeout: env_duration("GITHUB_HTTP_TIMEOUT", DEFAULT_HTTP_TIMEOUT),
        };
        if !config.is_configured() {
            tracing::warn!("GitHub OAuth client is not configured, external login will fail");
        }
        config
    }

    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

impl From<GithubUser> for ExternalProfile {
    fn from(user: GithubUser) -> Self {
        Self {
            external_id: user.id.to_string(),
            login: user.login,
            email: user.email.filter(|e| !e.trim().is_empty()),
            display_name: user.name,
            avatar_url: user.avatar_url,
        }
    }
}

#[derive(Clone)]
pub struct GithubIdentityBroker {
    client: Client,
    config: GithubConfig,
}

impl GithubIdentityBroker {
    pub fn new(config: GithubConfig) -> AuthResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(exchange_failed)?;
        Ok(Self { client, config })
    }

    async fn fetch_access_token(&self, code: &str) -> AuthResult<String> {
        let response = self
            .client
            .post(ACCESS_TOKEN_URL)
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send()
            .await
            .map_err(exchange_failed)?
            .error_for_status()
            .map_err(exchange_failed)?;

        let body: AccessTokenResponse = response.json().await.map_err(exchange_failed)?;

        // GitHub reports a bad code with 200 and an `error` field
        match (body.access_token, body.error) {
            (Some(token), None) if !token.is_empty() => Ok(token),
            (_, error) => Err(AuthError::ExternalExchangeFailed(format!(
                "token endpoint rejected code: {} {}",
                error.unwrap_or_else(|| "no access_token".into()),
                body.error_description.unwrap_or_default()
            ))),
        }
    }

    async fn fetch_user(&self, access_token: &str) -> AuthResult<GithubUser> {
        self.client
            .get(USER_URL)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(exchange_failed)?
            .error_for_status()
            .map_err(exchange_failed)?
            .json()
            .await
            .map_err(exchange_failed)
    }
}

impl ExternalIdentityBroker for GithubIdentityBroker {
    fn authorize_url(&self) -> String {
        match Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", SCOPE),
            ],
        ) {
            Ok(url) => url.into(),
            // Constant base URL, parameters are only percent-encoded
            Err(_) => AUTHORIZE_URL.to_string(),
        }
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<ExternalProfile> {
        if !self.config.is_configured() {
            return Err(AuthError::ExternalExchangeFailed(
                "GitHub OAuth client is not configured".into(),
            ));
        }

        let access_token = self.fetch_access_token(code).await?;
        let user = self.fetch_user(&access_token).await?;

        tracing::debug!(github_id = user.id, login = %user.login, "GitHub profile fetched");

        Ok(user.into())
    }
}

fn exchange_failed(err: reqwest::Error) -> AuthError {
    AuthError::ExternalExchangeFailed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker() -> GithubIdentityBroker {
        GithubIdentityBroker::new(GithubConfig {
            client_id: "abc123".into(),
            client_secret: "shh".into(),
            redirect_url: "http://localhost:8080/api/auth/github/callback".into(),
            http_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn test_authorize_url() {
        let url = Url::parse(&broker().authorize_url()).unwrap();
        assert_eq!(url.host_str(), Some("github.com"));
        assert_eq!(url.path(), "/login/oauth/authorize");

        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(params.contains(&("client_id".into(), "abc123".into())));
        assert!(params.contains(&("scope".into(), "user:email".into())));
        assert!(params.contains(&(
            "redirect_uri".into(),
            "http://localhost:8080/api/auth/github/callback".into()
        )));
    }

    #[test]
    fn test_profile_from_github_user() {
        let user: GithubUser = serde_json::from_str(
            r#"{"id": 583231, "login": "octocat", "name": "The Octocat", "email": "", "avatar_url": null}"#,
        )
        .unwrap();
        let profile = ExternalProfile::from(user);
        assert_eq!(profile.external_id, "583231");
        assert_eq!(profile.login, "octocat");
        // blank email is treated as undisclosed
        assert_eq!(profile.email, None);
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_without_network() {
        let broker = GithubIdentityBroker::new(GithubConfig::default()).unwrap();
        let err = broker.exchange_code("code").await.unwrap_err();
        assert!(matches!(err, AuthError::ExternalExchangeFailed(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", broker().config);
        assert!(!rendered.contains("shh"));
    }
}
