use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use crate::claims::{ClaimsRepr, TokenClaims, TokenKind};
use crate::config::SecurityConfig;
use crate::error::{AuthError, AuthResult};

/// Signs and verifies compact tokens with the shared symmetric secret.
///
/// Stateless: keyed only by the (secret, algorithm) pair and the configured
/// lifetimes.
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    leeway_seconds: u32,
}

impl TokenCodec {
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            algorithm: config.algorithm.into(),
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
            leeway_seconds: config.leeway_seconds,
        }
    }

    /// Issue a token of the given kind for the subject, valid from now until
    /// now plus the kind's configured lifetime.
    pub fn issue(&self, kind: TokenKind, subject: Uuid) -> AuthResult<String> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        self.encode(&TokenClaims {
            subject,
            kind,
            issued_at: now,
            not_before: now,
            expires_at: now + ttl,
        })
    }

    pub fn encode(&self, claims: &TokenClaims) -> AuthResult<String> {
        let repr = ClaimsRepr::from(claims);
        encode(&Header::new(self.algorithm), &repr, &self.encoding_key)
            .map_err(|err| AuthError::Internal(format!("failed to sign token: {err}")))
    }

    /// Verify signature and the `nbf <= now <= exp` window, then parse the
    /// claims. Every verification failure collapses into `InvalidToken`;
    /// the detail is only logged.
    pub fn decode(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway_seconds.into();
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        let data = decode::<ClaimsRepr>(token, &self.decoding_key, &validation).map_err(|err| {
            debug!(?err, "token failed verification");
            AuthError::InvalidToken
        })?;

        TokenClaims::try_from(data.claims)
    }
}
