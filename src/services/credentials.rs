use crate::errors::HubError;
use crate::utils::text::strip_one_trailing_slash;
use serde::Deserialize;
use std::fmt;

/// Connection configuration as supplied by the host, before validation.
#[derive(Clone, Default, Deserialize)]
pub struct RawCredentials {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, alias = "otp")]
    pub one_time_code: Option<String>,
}

impl RawCredentials {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("HUB_BASE_URL").ok(),
            username: std::env::var("HUB_USERNAME").ok(),
            password: std::env::var("HUB_PASSWORD").ok(),
            one_time_code: std::env::var("HUB_OTP").ok(),
        }
    }

    /// Fills every field that is blank here from `fallback`.
    pub fn or(self, fallback: RawCredentials) -> Self {
        Self {
            base_url: non_blank(self.base_url).or(fallback.base_url),
            username: non_blank(self.username).or(fallback.username),
            password: non_blank(self.password).or(fallback.password),
            one_time_code: non_blank(self.one_time_code).or(fallback.one_time_code),
        }
    }
}

impl fmt::Debug for RawCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawCredentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("one_time_code", &self.one_time_code.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Validated connection settings. Immutable once resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    base_url: String,
    username: String,
    password: String,
    one_time_code: Option<String>,
}

impl ConnectionSettings {
    /// Fails on the first blank field, checked in the order
    /// base_url, username, password.
    pub fn resolve(raw: RawCredentials) -> Result<Self, HubError> {
        let base_url = required(raw.base_url, "base_url")?;
        let username = required(raw.username, "username")?;
        let password = required(raw.password, "password")?;
        Ok(Self {
            base_url: strip_one_trailing_slash(&base_url).to_string(),
            username,
            password,
            one_time_code: non_blank(raw.one_time_code),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn one_time_code(&self) -> Option<&str> {
        self.one_time_code.as_deref()
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("one_time_code", &self.one_time_code.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, HubError> {
    non_blank(value).ok_or_else(|| HubError::missing_credential(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn raw(base_url: &str, username: &str, password: &str) -> RawCredentials {
        RawCredentials {
            base_url: Some(base_url.to_string()),
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            one_time_code: None,
        }
    }

    #[test]
    fn strips_exactly_one_trailing_slash() {
        let settings = ConnectionSettings::resolve(raw("http://host:8581/", "admin", "secret")).unwrap();
        assert_eq!(settings.base_url(), "http://host:8581");

        let settings = ConnectionSettings::resolve(raw("http://host:8581//", "admin", "secret")).unwrap();
        assert_eq!(settings.base_url(), "http://host:8581/");
    }

    #[test]
    fn leaves_urls_without_trailing_slash_untouched() {
        let settings = ConnectionSettings::resolve(raw("http://host:8581", "admin", "secret")).unwrap();
        assert_eq!(settings.base_url(), "http://host:8581");
        let again = ConnectionSettings::resolve(raw(settings.base_url(), "admin", "secret")).unwrap();
        assert_eq!(again, settings);
    }

    #[test]
    fn reports_first_missing_field_in_order() {
        let err = ConnectionSettings::resolve(RawCredentials::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingCredential);
        assert!(err.description.contains("base_url"));

        let err = ConnectionSettings::resolve(raw("http://host", "  ", "")).unwrap_err();
        assert!(err.description.contains("username"));

        let err = ConnectionSettings::resolve(raw("http://host", "admin", "")).unwrap_err();
        assert!(err.description.contains("password"));
    }

    #[test]
    fn blank_one_time_code_is_dropped() {
        let mut input = raw("http://host", "admin", "secret");
        input.one_time_code = Some(" ".to_string());
        assert_eq!(ConnectionSettings::resolve(input).unwrap().one_time_code(), None);
    }

    #[test]
    fn debug_output_hides_password() {
        let settings = ConnectionSettings::resolve(raw("http://host", "admin", "secret")).unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("admin"));
    }

    #[test]
    fn inline_values_win_over_fallback() {
        let merged = raw("http://inline", "", "pw").or(raw("http://env", "env-user", "env-pw"));
        assert_eq!(merged.base_url.as_deref(), Some("http://inline"));
        assert_eq!(merged.username.as_deref(), Some("env-user"));
        assert_eq!(merged.password.as_deref(), Some("pw"));
    }
}
