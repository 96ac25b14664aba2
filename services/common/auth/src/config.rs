use jsonwebtoken::Algorithm;

/// Symmetric signing algorithms accepted for token issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtAlgorithm {
    HS256,
    HS384,
    HS512,
}

impl JwtAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            JwtAlgorithm::HS256 => "HS256",
            JwtAlgorithm::HS384 => "HS384",
            JwtAlgorithm::HS512 => "HS512",
        }
    }

    pub fn from_str(value: &str) -> Option<JwtAlgorithm> {
        match value {
            "HS256" => Some(JwtAlgorithm::HS256),
            "HS384" => Some(JwtAlgorithm::HS384),
            "HS512" => Some(JwtAlgorithm::HS512),
            _ => None,
        }
    }
}

impl From<JwtAlgorithm> for Algorithm {
    fn from(value: JwtAlgorithm) -> Self {
        match value {
            JwtAlgorithm::HS256 => Algorithm::HS256,
            JwtAlgorithm::HS384 => Algorithm::HS384,
            JwtAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

/// Runtime configuration for token signing and verification.
///
/// There is no default for the secret key; it must come from deployment
/// configuration.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub algorithm: JwtAlgorithm,
    /// Lifetime of access tokens, in minutes.
    pub access_ttl_minutes: i64,
    /// Lifetime of refresh tokens, in days.
    pub refresh_ttl_days: i64,
    /// Allowable clock skew in seconds when validating exp/nbf.
    pub leeway_seconds: u32,
}

impl SecurityConfig {
    pub fn new(secret_key: impl Into<String>, algorithm: JwtAlgorithm) -> Self {
        Self {
            secret_key: secret_key.into(),
            algorithm,
            access_ttl_minutes: 30,
            refresh_ttl_days: 7,
            leeway_seconds: 0,
        }
    }

    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_ttl_minutes = minutes;
        self
    }

    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_ttl_days = days;
        self
    }

    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}
