use serde::Deserialize;
use thiserror::Error;

use crate::config::{OAuthClientConfig, OAuthConfig};

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const MICROSOFT_TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";
const MICROSOFT_USERINFO_URL: &str = "https://graph.microsoft.com/v1.0/me";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("userinfo request failed: {0}")]
    UserInfo(String),
    #[error("provider returned no email address")]
    MissingEmail,
}

/// Normalized identity returned by a provider's userinfo endpoint.
#[derive(Debug, Clone)]
pub struct OAuthIdentity {
    /// Provider-side stable account id.
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Microsoft,
}

impl Provider {
    pub fn parse(name: &str) -> Result<Self, OAuthError> {
        match name {
            "google" => Ok(Provider::Google),
            "microsoft" => Ok(Provider::Microsoft),
            other => Err(OAuthError::UnsupportedProvider(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Microsoft => "microsoft",
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct GoogleProfile {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Deserialize)]
struct MicrosoftProfile {
    id: String,
    mail: Option<String>,
    #[serde(rename = "userPrincipalName")]
    user_principal_name: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

/// Exchange an authorization code for the provider-side identity.
///
/// Plain pass-through: a failing provider call surfaces as an error with no
/// retry, and the handler maps it to a 401.
pub async fn fetch_identity(
    http: &reqwest::Client,
    config: &OAuthConfig,
    provider: Provider,
    code: &str,
    redirect_uri: &str,
) -> Result<OAuthIdentity, OAuthError> {
    let client = client_config(config, provider)?;
    let access_token = exchange_code(http, provider, client, code, redirect_uri).await?;

    match provider {
        Provider::Google => {
            let profile: GoogleProfile = get_profile(http, GOOGLE_USERINFO_URL, &access_token)
                .await?
                .json()
                .await
                .map_err(|e| OAuthError::UserInfo(e.to_string()))?;
            Ok(OAuthIdentity {
                subject: profile.id,
                email: profile.email.ok_or(OAuthError::MissingEmail)?,
                display_name: profile.name,
                avatar_url: profile.picture,
            })
        }
        Provider::Microsoft => {
            let profile: MicrosoftProfile = get_profile(http, MICROSOFT_USERINFO_URL, &access_token)
                .await?
                .json()
                .await
                .map_err(|e| OAuthError::UserInfo(e.to_string()))?;
            let email = profile
                .mail
                .or(profile.user_principal_name)
                .ok_or(OAuthError::MissingEmail)?;
            Ok(OAuthIdentity {
                subject: profile.id,
                email,
                display_name: profile.display_name,
                avatar_url: None,
            })
        }
    }
}

fn client_config<'a>(
    config: &'a OAuthConfig,
    provider: Provider,
) -> Result<&'a OAuthClientConfig, OAuthError> {
    let client = match provider {
        Provider::Google => config.google.as_ref(),
        Provider::Microsoft => config.microsoft.as_ref(),
    };
    client.ok_or_else(|| OAuthError::NotConfigured(provider.as_str().to_string()))
}

async fn exchange_code(
    http: &reqwest::Client,
    provider: Provider,
    client: &OAuthClientConfig,
    code: &str,
    redirect_uri: &str,
) -> Result<String, OAuthError> {
    let token_url = match provider {
        Provider::Google => GOOGLE_TOKEN_URL,
        Provider::Microsoft => MICROSOFT_TOKEN_URL,
    };

    let mut form = vec![
        ("client_id", client.client_id.as_str()),
        ("client_secret", client.client_secret.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri),
    ];
    if provider == Provider::Microsoft {
        form.push(("scope", "openid profile email User.Read"));
    }

    let response = http
        .post(token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;

    if !response.status().is_success() {
        return Err(OAuthError::TokenExchange(format!(
            "provider returned {}",
            response.status()
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;

    token
        .access_token
        .ok_or_else(|| OAuthError::TokenExchange("no access token in response".into()))
}

async fn get_profile(
    http: &reqwest::Client,
    url: &str,
    access_token: &str,
) -> Result<reqwest::Response, OAuthError> {
    let response = http
        .get(url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| OAuthError::UserInfo(e.to_string()))?;

    if !response.status().is_success() {
        return Err(OAuthError::UserInfo(format!(
            "provider returned {}",
            response.status()
        )));
    }

    Ok(response)
}
