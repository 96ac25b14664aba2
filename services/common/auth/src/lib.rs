pub mod claims;
pub mod codec;
pub mod config;
pub mod error;
pub mod hasher;
pub mod manager;
pub mod revocation;

pub use claims::{TokenClaims, TokenKind};
pub use codec::TokenCodec;
pub use config::{JwtAlgorithm, SecurityConfig};
pub use error::{AuthError, AuthResult};
pub use manager::SecurityManager;
pub use revocation::{InMemoryRevocationRegistry, RevocationRegistry};
