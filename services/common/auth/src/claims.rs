use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Discriminates the two token lifetimes issued by the service. The wire
/// value doubles as the revocation partition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Application-focused representation of verified token claims.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject: Uuid,
    pub kind: TokenKind,
    pub issued_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ClaimsRepr {
    pub sub: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl From<&TokenClaims> for ClaimsRepr {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            sub: claims.subject.to_string(),
            kind: claims.kind,
            iat: claims.issued_at.timestamp(),
            nbf: claims.not_before.timestamp(),
            exp: claims.expires_at.timestamp(),
        }
    }
}

impl TryFrom<ClaimsRepr> for TokenClaims {
    type Error = AuthError;

    fn try_from(value: ClaimsRepr) -> AuthResult<Self> {
        let subject = Uuid::parse_str(&value.sub).map_err(|_| AuthError::InvalidIdentity)?;

        Ok(Self {
            subject,
            kind: value.kind,
            issued_at: timestamp(value.iat)?,
            not_before: timestamp(value.nbf)?,
            expires_at: timestamp(value.exp)?,
        })
    }
}

fn timestamp(seconds: i64) -> AuthResult<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or(AuthError::InvalidToken)
}
