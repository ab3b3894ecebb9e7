//! Redash session authentication
//!
//! Redash's admin surface has no token API for user administration; the
//! connector signs in through the same form login a browser uses and keeps
//! the session cookie. Login success is only detectable from the returned
//! HTML page title.

use serde::{Deserialize, Serialize};

use identra_connector::error::{ConnectorError, ConnectorResult};

/// Page title Redash renders after a successful login.
const SUCCESS_LOGIN_TITLE: &str = "Redash";
/// Page title of the login form shown again after rejected credentials.
const FAILED_LOGIN_TITLE: &str = "Login to Redash";

/// Admin credentials for the Redash form login.
///
/// The [`Debug`] impl redacts the password to prevent accidental credential
/// exposure in log output.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Create a redacted copy safe for logging/display.
    pub fn redacted(&self) -> Self {
        Self {
            email: self.email.clone(),
            password: "***REDACTED***".to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Classify the HTML page returned by the login form.
///
/// Success and failure both come back as `200 OK`; the page title is the
/// only discriminator. An unrecognized title means the deployment answered
/// with something other than a login flow page and is surfaced as upstream
/// breakage rather than bad credentials.
pub(crate) fn classify_login_page(html: &str) -> ConnectorResult<()> {
    match extract_html_title(html).as_deref() {
        Some(SUCCESS_LOGIN_TITLE) => Ok(()),
        Some(FAILED_LOGIN_TITLE) => Err(ConnectorError::auth_failed(
            "Redash rejected the configured credentials",
        )),
        other => Err(ConnectorError::upstream(
            None,
            format!("unrecognized login response page (title: {other:?})"),
        )),
    }
}

/// Extract the trimmed contents of the first `<title>` element.
pub(crate) fn extract_html_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let start = lower[open..].find('>')? + open + 1;
    let end = lower[start..].find("</title")? + start;
    Some(html[start..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_html_title("<html><head><title>Redash</title></head></html>").as_deref(),
            Some("Redash")
        );
        assert_eq!(
            extract_html_title("<TITLE attr=\"x\"> Login to Redash </TITLE>").as_deref(),
            Some("Login to Redash")
        );
        assert_eq!(extract_html_title("<html><body>no title</body></html>"), None);
    }

    #[test]
    fn test_classify_success() {
        let html = "<html><head><title>Redash</title></head><body></body></html>";
        assert!(classify_login_page(html).is_ok());
    }

    #[test]
    fn test_classify_rejected_credentials() {
        let html = "<html><head><title>Login to Redash</title></head></html>";
        assert!(matches!(
            classify_login_page(html),
            Err(ConnectorError::AuthenticationFailed { .. })
        ));
    }

    #[test]
    fn test_classify_unknown_page() {
        let html = "<html><head><title>502 Bad Gateway</title></head></html>";
        assert!(matches!(
            classify_login_page(html),
            Err(ConnectorError::Upstream { .. })
        ));
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("admin@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("admin@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
