use serde::{Deserialize, Deserializer, Serialize};

/// Profile name that maps to the unqualified `[default]` section
pub const DEFAULT_PROFILE: &str = "default";

/// An SSO-configured profile from ~/.aws/config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsoProfile {
    pub name: String,
    pub start_url: String,
    /// Session name (for AWS CLI v2 [sso-session] compatibility)
    /// When present, the token cache is keyed by SHA1 of session_name instead of start_url
    pub session_name: Option<String>,
}

impl SsoProfile {
    /// Material hashed into the token cache file name
    pub fn cache_key_material(&self) -> &str {
        self.session_name.as_deref().unwrap_or(&self.start_url)
    }
}

/// Cached SSO-OIDC token as written by the AWS CLI
///
/// Only the fields this plugin reads are modelled. `expiresAt` is kept as a raw
/// JSON value so that a record with a broken timestamp still loads and can be
/// reported as unparsable instead of being skipped as a malformed cache entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(rename = "expiresAt", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<serde_json::Value>,

    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub region: Option<String>,

    #[serde(
        rename = "startUrl",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_url: Option<String>,
}

/// Non-string values are treated as absent rather than failing the whole record
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl TokenRecord {
    pub fn region_or<'a>(&'a self, default_region: &'a str) -> &'a str {
        self.region.as_deref().unwrap_or(default_region)
    }

    /// Start URL for the console link, if non-empty
    pub fn console_url(&self) -> Option<&str> {
        self.start_url.as_deref().filter(|url| !url.is_empty())
    }
}
