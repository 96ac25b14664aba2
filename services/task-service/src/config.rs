use anyhow::{anyhow, Context, Result};
use common_auth::{JwtAlgorithm, SecurityConfig};
use std::env;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub environment: String,
    pub security: SecurityConfig,
}

pub fn load_service_config() -> Result<ServiceConfig> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string());

    // The signing secret has no fallback on purpose: a well-known default
    // would let anyone mint valid tokens.
    let secret_key = env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY must be set")?;

    let algorithm = env::var("JWT_ALGORITHM")
        .context("JWT_ALGORITHM must be set")
        .map(|value| parse_algorithm(&value))??;

    let access_ttl_minutes = positive_from_env("JWT_ACCESS_TOKEN_EXPIRE_MINUTES")?;
    let refresh_ttl_days = positive_from_env("JWT_REFRESH_TOKEN_EXPIRE_DAYS")?;

    let leeway_seconds = match env::var("JWT_LEEWAY_SECONDS") {
        Ok(value) => value
            .trim()
            .parse::<u32>()
            .context("Failed to parse JWT_LEEWAY_SECONDS")?,
        Err(_) => 0,
    };

    let security = SecurityConfig::new(secret_key, algorithm)
        .with_access_ttl_minutes(access_ttl_minutes)
        .with_refresh_ttl_days(refresh_ttl_days)
        .with_leeway(leeway_seconds);

    Ok(ServiceConfig {
        database_url,
        environment,
        security,
    })
}

fn parse_algorithm(value: &str) -> Result<JwtAlgorithm> {
    JwtAlgorithm::from_str(value.trim()).ok_or_else(|| {
        anyhow!("Unsupported JWT_ALGORITHM '{value}'. Use HS256, HS384, or HS512.")
    })
}

fn positive_from_env(key: &str) -> Result<i64> {
    let raw = env::var(key).with_context(|| format!("{key} must be set"))?;
    let value = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("Failed to parse {key}"))?;
    if value <= 0 {
        return Err(anyhow!("{key} must be positive, got {value}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_algorithm_accepts_supported_names() {
        assert_eq!(parse_algorithm("HS256").expect("parses"), JwtAlgorithm::HS256);
        assert_eq!(parse_algorithm(" HS512 ").expect("parses"), JwtAlgorithm::HS512);
        assert!(parse_algorithm("RS256").is_err());
    }

    #[test]
    fn positive_from_env_rejects_zero_and_garbage() {
        std::env::set_var("TEST_TTL_OK", "30");
        std::env::set_var("TEST_TTL_ZERO", "0");
        std::env::set_var("TEST_TTL_WORDS", "soon");
        assert_eq!(positive_from_env("TEST_TTL_OK").expect("parses"), 30);
        assert!(positive_from_env("TEST_TTL_ZERO").is_err());
        assert!(positive_from_env("TEST_TTL_WORDS").is_err());
        assert!(positive_from_env("TEST_TTL_MISSING").is_err());
    }
}
