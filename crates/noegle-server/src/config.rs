use serde::{Deserialize, Serialize};

/// Auth configuration: signing key, the distinguished admin account and
/// session lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub signing_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    /// Session token lifetime in seconds (default: 300)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,
}

fn default_session_ttl() -> i64 {
    300
}

/// A user to seed into the directory on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUserConfig {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Server configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String, // "0.0.0.0:3000"
    pub auth: AuthConfig,
    #[serde(default)]
    pub seed_users: Vec<SeedUserConfig>,
}

/// Load server config from a YAML file with NOEGLE__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    use anyhow::Context;
    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("NOEGLE")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", path))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", path))?;
    Ok(config)
}
