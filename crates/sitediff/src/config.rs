//! Runtime configuration loaded from environment variables.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use page_capture::CaptureConfig;
use std::env;
use std::time::Duration;

/// Run-wide settings resolved once at startup.
///
/// Credentials fall back to fixed defaults so runs against unprotected
/// environments work without any setup.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub username: String,
    pub password: String,
    pub nav_timeout_secs: u64,
}

impl RunConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `BASIC_AUTH_USERNAME`: basic-auth user (default: `admin`)
    /// - `BASIC_AUTH_PASSWORD`: basic-auth password (default: `password`)
    /// - `SITEDIFF_NAV_TIMEOUT_SECS`: per-navigation timeout (default: 60)
    #[must_use]
    pub fn from_env() -> Self {
        let username = env::var("BASIC_AUTH_USERNAME").unwrap_or_else(|_| String::from("admin"));
        let password =
            env::var("BASIC_AUTH_PASSWORD").unwrap_or_else(|_| String::from("password"));
        let nav_timeout_secs = env::var("SITEDIFF_NAV_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60)
            .max(1);
        Self {
            username,
            password,
            nav_timeout_secs,
        }
    }

    /// HTTP Basic `Authorization` header value for the configured credentials.
    #[must_use]
    pub fn auth_header(&self) -> String {
        let credentials = BASE64_STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {credentials}")
    }

    /// Capture settings derived from this configuration.
    #[must_use]
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            auth_header: Some(self.auth_header()),
            nav_timeout: Duration::from_secs(self.nav_timeout_secs),
            ..CaptureConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_encodes_default_credentials() {
        let config = RunConfig {
            username: "admin".into(),
            password: "password".into(),
            nav_timeout_secs: 60,
        };
        assert_eq!(config.auth_header(), "Basic YWRtaW46cGFzc3dvcmQ=");
    }

    #[test]
    fn capture_config_carries_auth_viewport_and_timeout() {
        let config = RunConfig {
            username: "user".into(),
            password: "secret".into(),
            nav_timeout_secs: 5,
        };

        let capture = config.capture_config();

        assert_eq!(capture.nav_timeout, Duration::from_secs(5));
        assert_eq!(capture.viewport_width, 1280);
        assert_eq!(capture.viewport_height, 720);
        assert_eq!(capture.auth_header.as_deref(), Some("Basic dXNlcjpzZWNyZXQ="));
    }
}
