use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::claims::TokenKind;
use crate::error::AuthResult;

/// Append-only blacklist of token strings, partitioned by kind.
///
/// Implementations must be safe under concurrent requests and idempotent:
/// revoking the same token twice is a no-op. The interface is async and
/// fallible so a durable backend (an external cache, say) can substitute
/// for the in-memory set without changing caller semantics.
#[async_trait]
pub trait RevocationRegistry: Send + Sync {
    async fn revoke(&self, token: &str, kind: TokenKind) -> AuthResult<()>;
    async fn is_revoked(&self, token: &str, kind: TokenKind) -> AuthResult<bool>;
}

/// Process-local registry backed by two lock-guarded sets.
///
/// Entries are never evicted; growth is bounded only by logout and refresh
/// volume.
#[derive(Clone, Default)]
pub struct InMemoryRevocationRegistry {
    access: Arc<RwLock<HashSet<String>>>,
    refresh: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryRevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, kind: TokenKind) -> &RwLock<HashSet<String>> {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

#[async_trait]
impl RevocationRegistry for InMemoryRevocationRegistry {
    async fn revoke(&self, token: &str, kind: TokenKind) -> AuthResult<()> {
        let mut guard = self.partition(kind).write().expect("rwlock poisoned");
        guard.insert(token.to_owned());
        Ok(())
    }

    async fn is_revoked(&self, token: &str, kind: TokenKind) -> AuthResult<bool> {
        let guard = self.partition(kind).read().expect("rwlock poisoned");
        Ok(guard.contains(token))
    }
}
