//! SMTP settings read from the environment.

use std::fmt;
use tracing::warn;

/// Default SMTP relay when `SMTP_SERVER` is unset.
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";

/// Default submission port when `SMTP_PORT` is unset.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP connection and sender settings.
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// SMTP relay host.
    pub server: String,

    /// SMTP port (STARTTLS).
    pub port: u16,

    /// Login user name.
    pub username: String,

    /// Login password.
    pub password: String,

    /// `From` address.
    pub sender: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .finish()
    }
}

impl MailConfig {
    /// Reads `SMTP_SERVER`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD` and
    /// `SENDER_EMAIL`.
    ///
    /// Returns `None`, with a warning, when the username, password or sender is
    /// missing or the port isn't a number. Sending is then disabled.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MailConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        // Passwords are used verbatim; surrounding spaces may be significant.
        let password = lookup("SMTP_PASSWORD").filter(|v| !v.is_empty());

        let port = match value("SMTP_PORT") {
            None => DEFAULT_SMTP_PORT,
            Some(raw) => match raw.parse() {
                Ok(port) => port,
                Err(_) => {
                    warn!(port = %raw, "SMTP_PORT is not a valid port, email sending disabled");
                    return None;
                }
            },
        };

        let mut missing: Vec<&str> = ["SMTP_USERNAME", "SENDER_EMAIL"]
            .into_iter()
            .filter(|key| value(*key).is_none())
            .collect();
        if password.is_none() {
            missing.push("SMTP_PASSWORD");
        }
        if !missing.is_empty() {
            warn!(missing = ?missing, "Email configuration incomplete, email sending disabled");
            return None;
        }

        Some(Self {
            server: value("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            port,
            username: value("SMTP_USERNAME")?,
            password: password?,
            sender: value("SENDER_EMAIL")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: [&str; 5] = [
        "SMTP_SERVER",
        "SMTP_PORT",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "SENDER_EMAIL",
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let all: Vec<(&str, Option<&str>)> = ALL_KEYS
            .iter()
            .map(|key| (*key, vars.iter().find(|(k, _)| k == key).map(|(_, v)| *v)))
            .collect();
        temp_env::with_vars(all, f);
    }

    #[test]
    fn complete_config_uses_defaults() {
        with_env(
            &[
                ("SMTP_USERNAME", "bot"),
                ("SMTP_PASSWORD", "secret"),
                ("SENDER_EMAIL", "bot@example.com"),
            ],
            || {
                let config = MailConfig::from_env().unwrap();
                assert_eq!(config.server, DEFAULT_SMTP_SERVER);
                assert_eq!(config.port, DEFAULT_SMTP_PORT);
                assert_eq!(config.sender, "bot@example.com");
            },
        );
    }

    #[test]
    fn explicit_server_and_port() {
        with_env(
            &[
                ("SMTP_SERVER", "mail.example.com"),
                ("SMTP_PORT", "2525"),
                ("SMTP_USERNAME", "bot"),
                ("SMTP_PASSWORD", "secret"),
                ("SENDER_EMAIL", "bot@example.com"),
            ],
            || {
                let config = MailConfig::from_env().unwrap();
                assert_eq!(config.server, "mail.example.com");
                assert_eq!(config.port, 2525);
            },
        );
    }

    #[test]
    fn missing_password_disables_mail() {
        with_env(
            &[("SMTP_USERNAME", "bot"), ("SENDER_EMAIL", "bot@example.com")],
            || assert!(MailConfig::from_env().is_none()),
        );
    }

    #[test]
    fn password_is_kept_verbatim() {
        with_env(
            &[
                ("SMTP_SERVER", "  mail.example.com "),
                ("SMTP_USERNAME", " bot "),
                ("SMTP_PASSWORD", " pass phrase "),
                ("SENDER_EMAIL", "bot@example.com\n"),
            ],
            || {
                let config = MailConfig::from_env().unwrap();
                assert_eq!(config.server, "mail.example.com");
                assert_eq!(config.username, "bot");
                assert_eq!(config.password, " pass phrase ");
                assert_eq!(config.sender, "bot@example.com");
            },
        );
    }

    #[test]
    fn invalid_port_disables_mail() {
        with_env(
            &[
                ("SMTP_PORT", "smtp"),
                ("SMTP_USERNAME", "bot"),
                ("SMTP_PASSWORD", "secret"),
                ("SENDER_EMAIL", "bot@example.com"),
            ],
            || assert!(MailConfig::from_env().is_none()),
        );
    }

    #[test]
    fn debug_redacts_password() {
        let config = MailConfig {
            server: "s".to_string(),
            port: 1,
            username: "u".to_string(),
            password: "hunter2".to_string(),
            sender: "a@b.c".to_string(),
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
