// Session status resolution
use crate::auth::TokenCache;
use crate::expiry::{self, Classification};
use crate::models::TokenRecord;
use crate::preferences::PreferenceStore;
use crate::profile_store::ProfileStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the cache says about the selected profile's session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No SSO config, no cached token, or a token without `expiresAt`
    NoSession,
    /// `expiresAt` present but not a timestamp
    Unparsable { raw: String },
    Valid {
        expires_at: DateTime<Utc>,
        classification: Classification,
        console_url: Option<String>,
        region: String,
    },
}

/// Machine-readable status for `status --json`
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub profile: &'a str,
    pub state: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<&'a str>,
    /// Start URL configured for the profile in ~/.aws/config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_url: Option<&'a str>,
    pub profiles: &'a [String],
}

impl SessionState {
    pub fn from_token(token: Option<&TokenRecord>, default_region: &str, now: &DateTime<Utc>) -> Self {
        let Some(token) = token else {
            return SessionState::NoSession;
        };
        let Some(raw) = token.expires_at.as_ref() else {
            return SessionState::NoSession;
        };

        match expiry::parse_expiry(raw) {
            Ok(expires_at) => SessionState::Valid {
                expires_at,
                classification: expiry::classify(&expires_at, now),
                console_url: token.console_url().map(str::to_string),
                region: token.region_or(default_region).to_string(),
            },
            Err(e) => {
                tracing::debug!("{}", e);
                SessionState::Unparsable {
                    raw: raw.to_string(),
                }
            }
        }
    }

    pub fn report<'a>(&'a self, profile: &'a str, profiles: &'a [String]) -> StatusReport<'a> {
        let mut report = StatusReport {
            profile,
            state: "no_session",
            expires_at: None,
            seconds_remaining: None,
            region: None,
            start_url: None,
            profiles,
        };

        match self {
            SessionState::NoSession => {}
            SessionState::Unparsable { raw } => {
                report.state = "unparsable";
                report.expires_at = Some(raw.clone());
            }
            SessionState::Valid {
                expires_at,
                classification,
                region,
                ..
            } => {
                report.state = classification.status.as_str();
                report.expires_at = Some(expires_at.to_rfc3339());
                report.seconds_remaining = Some(classification.seconds_remaining());
                report.region = Some(region.as_str());
            }
        }

        report
    }
}

/// Resolves the session state of a profile from config and token cache
pub struct SessionManager<P: PreferenceStore> {
    profiles: ProfileStore<P>,
    cache: TokenCache,
    default_region: String,
}

impl<P: PreferenceStore> SessionManager<P> {
    pub fn new(profiles: ProfileStore<P>, cache: TokenCache, default_region: impl Into<String>) -> Self {
        Self {
            profiles,
            cache,
            default_region: default_region.into(),
        }
    }

    pub fn profiles(&self) -> &ProfileStore<P> {
        &self.profiles
    }

    /// Cached token for a profile; the cache is not touched for non-SSO profiles
    pub fn find_token(&self, profile_name: &str) -> Option<TokenRecord> {
        let Some(profile) = self.profiles.sso_profile(profile_name) else {
            tracing::debug!("Profile '{}' has no SSO configuration", profile_name);
            return None;
        };

        let token = self.cache.find_token(&profile);
        if let Some(token) = &token {
            tracing::debug!(
                "Token for '{}' (region {})",
                profile_name,
                token.region_or(&self.default_region)
            );
        }
        token
    }

    pub fn resolve(&self, profile_name: &str, now: &DateTime<Utc>) -> SessionState {
        let token = self.find_token(profile_name);
        SessionState::from_token(token.as_ref(), &self.default_region, now)
    }
}
