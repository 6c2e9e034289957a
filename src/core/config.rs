use std::fmt;
use std::time::Duration;

use super::error::{AgentError, AgentResult};

/// Default agent endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.szamlazz.hu/szamla/";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the client authenticates against the agent.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Agent key (`szamlaagentkulcs`).
    Token(String),
    /// Web login (`felhasznalo` / `jelszo`).
    UserPassword {
        /// Login name.
        user: String,
        /// Login password.
        password: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Self::UserPassword { user, .. } => f
                .debug_struct("UserPassword")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Response schema version (`valaszVerzio`).
///
/// Version 1 returns the PDF as the whole response body; version 2 wraps
/// it base64-encoded in an `xmlszamlavalasz` document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseVersion {
    #[default]
    V1,
    V2,
}

impl ResponseVersion {
    /// Numeric value sent in `valaszVerzio`.
    pub const fn number(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

impl TryFrom<u8> for ResponseVersion {
    type Error = AgentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(AgentError::Config(format!(
                "response version must be 1 or 2, got {other}"
            ))),
        }
    }
}

/// Validated client configuration. Build with [`ClientConfig::with_token`]
/// or [`ClientConfig::with_credentials`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) credentials: Credentials,
    pub(crate) e_invoice: bool,
    pub(crate) request_invoice_download: bool,
    pub(crate) downloaded_invoice_count: u32,
    pub(crate) response_version: ResponseVersion,
    pub(crate) timeout: Duration,
    pub(crate) endpoint: String,
}

impl ClientConfig {
    /// Start a configuration authenticated with an agent key.
    pub fn with_token(token: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(Credentials::Token(token.into()))
    }

    /// Start a configuration authenticated with a user name and password.
    pub fn with_credentials(
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientConfigBuilder {
        ClientConfigBuilder::new(Credentials::UserPassword {
            user: user.into(),
            password: password.into(),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn e_invoice(&self) -> bool {
        self.e_invoice
    }

    pub fn request_invoice_download(&self) -> bool {
        self.request_invoice_download
    }

    pub fn downloaded_invoice_count(&self) -> u32 {
        self.downloaded_invoice_count
    }

    pub fn response_version(&self) -> ResponseVersion {
        self.response_version
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Builder for [`ClientConfig`].
///
/// ```
/// use std::time::Duration;
/// use szamla_agent::{ClientConfig, ResponseVersion};
///
/// let config = ClientConfig::with_token("agent-key")
///     .e_invoice(true)
///     .request_invoice_download(true)
///     .response_version(ResponseVersion::V2)
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// assert!(config.e_invoice());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    credentials: Credentials,
    e_invoice: bool,
    request_invoice_download: bool,
    downloaded_invoice_count: u32,
    response_version: ResponseVersion,
    timeout: Duration,
    endpoint: String,
}

impl ClientConfigBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            e_invoice: false,
            request_invoice_download: false,
            downloaded_invoice_count: 1,
            response_version: ResponseVersion::V1,
            timeout: DEFAULT_TIMEOUT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Issue invoices as e-invoices (`eszamla`).
    pub fn e_invoice(mut self, enabled: bool) -> Self {
        self.e_invoice = enabled;
        self
    }

    /// Ask the service to return the invoice PDF (`szamlaLetoltes`).
    pub fn request_invoice_download(mut self, enabled: bool) -> Self {
        self.request_invoice_download = enabled;
        self
    }

    /// Number of copies in the downloaded PDF (`szamlaLetoltesPld`).
    pub fn downloaded_invoice_count(mut self, count: u32) -> Self {
        self.downloaded_invoice_count = count;
        self
    }

    pub fn response_version(mut self, version: ResponseVersion) -> Self {
        self.response_version = version;
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the agent endpoint (test systems, proxies).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if the credential fields are empty,
    /// the endpoint is empty, or the timeout is zero.
    pub fn build(self) -> AgentResult<ClientConfig> {
        match &self.credentials {
            Credentials::Token(token) if token.trim().is_empty() => {
                return Err(AgentError::Config("auth token must not be empty".into()));
            }
            Credentials::UserPassword { user, password }
                if user.trim().is_empty() || password.is_empty() =>
            {
                return Err(AgentError::Config(
                    "user and password must both be non-empty".into(),
                ));
            }
            _ => {}
        }
        if self.endpoint.trim().is_empty() {
            return Err(AgentError::Config("endpoint must not be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(AgentError::Config("timeout must be greater than zero".into()));
        }

        Ok(ClientConfig {
            credentials: self.credentials,
            e_invoice: self.e_invoice,
            request_invoice_download: self.request_invoice_download,
            downloaded_invoice_count: self.downloaded_invoice_count,
            response_version: self.response_version,
            timeout: self.timeout,
            endpoint: self.endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::with_token("key").build().unwrap();
        assert!(!config.e_invoice());
        assert!(!config.request_invoice_download());
        assert_eq!(config.downloaded_invoice_count(), 1);
        assert_eq!(config.response_version(), ResponseVersion::V1);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn empty_token_rejected() {
        let err = ClientConfig::with_token("  ").build().unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn empty_password_rejected() {
        assert!(ClientConfig::with_credentials("user", "").build().is_err());
        assert!(ClientConfig::with_credentials("", "pw").build().is_err());
        assert!(ClientConfig::with_credentials("user", "pw").build().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = ClientConfig::with_token("key")
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn response_version_from_number() {
        assert_eq!(ResponseVersion::try_from(2).unwrap(), ResponseVersion::V2);
        assert!(ResponseVersion::try_from(3).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = ClientConfig::with_credentials("demo", "s3cret")
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("demo"));
        assert!(!debug.contains("s3cret"));

        let token = format!("{:?}", Credentials::Token("agent-key".into()));
        assert!(!token.contains("agent-key"));
    }
}
