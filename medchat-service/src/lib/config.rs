use std::env;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
}

/// Where protected routes get the caller's credential from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Each request's bearer header is verified by the gate itself.
    #[default]
    Header,
    /// A verifying layer runs first and leaves the token in request extensions.
    Context,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy variables DATABASE_URL and JWT_SECRET_KEY
    /// 2. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, AUTH__MODE, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Fails when no source provides `jwt.secret` or `database.url`.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::file_sources("config", &run_mode)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__").try_parsing(true))
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET_KEY").ok())?;

        Self::from_builder(builder)
    }

    fn file_sources(dir: &str, run_mode: &str) -> config::ConfigBuilder<DefaultState> {
        ConfigBuilder::builder()
            .add_source(File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
    }

    /// Apply defaults, deserialize and validate.
    pub fn from_builder(
        builder: config::ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigError> {
        let configuration = builder
            .set_default("database.max_connections", 5)?
            .set_default("server.http_port", 8080)?
            .set_default("auth.mode", "header")?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message("database.url must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        Config::from_builder(
            ConfigBuilder::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/medchat"

            [jwt]
            secret = "secret_key_at_least_32_bytes_long!"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.auth.mode, AuthMode::Header);
    }

    #[test]
    fn test_context_mode() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/medchat"

            [jwt]
            secret = "secret_key_at_least_32_bytes_long!"

            [auth]
            mode = "context"
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.mode, AuthMode::Context);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = from_toml(
            r#"
            [database]
            url = "postgres://localhost/medchat"

            [jwt]
            secret = ""
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_secret_rejected() {
        let result = from_toml(
            r#"
            [database]
            url = "postgres://localhost/medchat"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_shipped_files_carry_no_secret() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/config");

        for run_mode in ["development", "production"] {
            let result = Config::from_builder(Config::file_sources(dir, run_mode));
            assert!(result.is_err(), "{} loaded without a secret", run_mode);
        }

        let with_secret = Config::from_builder(
            Config::file_sources(dir, "development")
                .set_override("jwt.secret", "secret_key_at_least_32_bytes_long!")
                .unwrap(),
        )
        .unwrap();
        assert_eq!(with_secret.database.max_connections, 5);
    }

    #[test]
    fn test_missing_database_url_rejected() {
        let result = from_toml(
            r#"
            [jwt]
            secret = "secret_key_at_least_32_bytes_long!"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let jwt = JwtConfig {
            secret: "super-secret".to_string(),
        };

        assert!(!format!("{:?}", jwt).contains("super-secret"));
    }
}
