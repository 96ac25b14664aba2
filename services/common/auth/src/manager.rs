use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::claims::{TokenClaims, TokenKind};
use crate::codec::TokenCodec;
use crate::config::SecurityConfig;
use crate::error::{AuthError, AuthResult};
use crate::hasher;
use crate::revocation::{InMemoryRevocationRegistry, RevocationRegistry};

/// Facade over the credential hasher, token codec, and revocation registry.
pub struct SecurityManager {
    codec: TokenCodec,
    registry: Arc<dyn RevocationRegistry>,
}

impl SecurityManager {
    pub fn new(config: SecurityConfig) -> Self {
        Self::with_registry(config, Arc::new(InMemoryRevocationRegistry::new()))
    }

    pub fn with_registry(config: SecurityConfig, registry: Arc<dyn RevocationRegistry>) -> Self {
        Self {
            codec: TokenCodec::new(&config),
            registry,
        }
    }

    pub fn hash_password(&self, plain: &str) -> AuthResult<String> {
        hasher::hash_password(plain)
    }

    pub fn verify_password(&self, plain: &str, hash: &str) -> bool {
        hasher::verify_password(plain, hash)
    }

    pub fn create_access_token(&self, subject: Uuid) -> AuthResult<String> {
        self.codec.issue(TokenKind::Access, subject)
    }

    pub fn create_refresh_token(&self, subject: Uuid) -> AuthResult<String> {
        self.codec.issue(TokenKind::Refresh, subject)
    }

    /// Decode and verify a token, then consult the registry under the
    /// decoded claim's own kind. Signature and validity-window checks come
    /// first: a structurally invalid token never reveals whether it was
    /// also revoked.
    pub async fn decode_token(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = self.codec.decode(token)?;
        if self.registry.is_revoked(token, claims.kind).await? {
            debug!(kind = claims.kind.as_str(), "rejected revoked token");
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    pub async fn revoke_access_token(&self, token: &str) -> AuthResult<()> {
        self.registry.revoke(token, TokenKind::Access).await
    }

    pub async fn revoke_refresh_token(&self, token: &str) -> AuthResult<()> {
        self.registry.revoke(token, TokenKind::Refresh).await
    }

    pub async fn is_access_token_revoked(&self, token: &str) -> AuthResult<bool> {
        self.registry.is_revoked(token, TokenKind::Access).await
    }

    pub async fn is_refresh_token_revoked(&self, token: &str) -> AuthResult<bool> {
        self.registry.is_revoked(token, TokenKind::Refresh).await
    }
}
