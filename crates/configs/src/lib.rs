use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Development-only signing secret. A warning is logged whenever it is in use.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 5000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Apply pending migrations on startup.
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,
    /// Load demo customers and products after migrating.
    #[serde(default)]
    pub seed_demo_data: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            auto_migrate: default_auto_migrate(),
            seed_demo_data: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_auto_migrate() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session token lifetime, seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: default_jwt_secret(), token_ttl_secs: default_token_ttl() }
    }
}

fn default_jwt_secret() -> String { DEV_JWT_SECRET.to_string() }
fn default_token_ttl() -> u64 { 7 * 24 * 60 * 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_origin")]
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self { Self { allowed_origin: default_cors_origin() } }
}

fn default_cors_origin() -> String { "http://localhost:5173".to_string() }

/// `CONFIG_PATH` (default `config.toml`); a missing file yields the defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file_or_default(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Like `load_from_file`, but a missing file yields the defaults.
/// Unreadable or malformed files are still errors.
pub fn load_from_file_or_default(path: &str) -> Result<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path, "config file absent, using defaults");
            return Ok(AppConfig::default());
        }
        Err(e) => return Err(anyhow!("failed to read {path}: {e}")),
    };
    toml::from_str(&content).map_err(|e| anyhow!("invalid config file {path}: {e}"))
}

/// Parse a duration such as `7d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_duration_secs(raw: &str) -> Result<u64> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(anyhow!("empty duration"));
    }
    let (digits, unit) = match s.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    };
    let n: u64 = digits.parse().map_err(|_| anyhow!("invalid duration: {raw}"))?;
    let factor = match unit {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return Err(anyhow!("invalid duration unit in {raw}")),
    };
    n.checked_mul(factor).ok_or_else(|| anyhow!("duration overflow: {raw}"))
}

impl AppConfig {
    /// File (if present) + process environment, normalized and validated.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment-style lookups. Takes the lookup as a
    /// closure so callers (and tests) control the source.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            self.server.port = port.parse().map_err(|_| anyhow!("invalid port: {port}"))?;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(flag) = lookup("AUTO_MIGRATE") {
            self.database.auto_migrate = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(flag) = lookup("SEED_DEMO_DATA") {
            self.database.seed_demo_data = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("JWT_EXPIRES_IN") {
            self.auth.token_ttl_secs = parse_duration_secs(&ttl)?;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.cors.allowed_origin = origin;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive"));
        }
        Ok(())
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.to_lowercase().starts_with("sqlite:")
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret must not be empty"));
        }
        if self.token_ttl_secs == 0 {
            return Err(anyhow!("auth.token_ttl_secs must be positive"));
        }
        if self.jwt_secret == DEV_JWT_SECRET {
            tracing::warn!("auth.jwt_secret is the development default; set JWT_SECRET in production");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn parses_duration_units() {
        assert_eq!(parse_duration_secs("7d").unwrap(), 604_800);
        assert_eq!(parse_duration_secs("12h").unwrap(), 43_200);
        assert_eq!(parse_duration_secs("30m").unwrap(), 1_800);
        assert_eq!(parse_duration_secs("45s").unwrap(), 45);
        assert_eq!(parse_duration_secs("3600").unwrap(), 3_600);
        assert!(parse_duration_secs("").is_err());
        assert!(parse_duration_secs("7w").is_err());
        assert!(parse_duration_secs("d").is_err());
    }

    #[test]
    fn defaults_use_seven_day_tokens() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.auth.token_ttl_secs, 7 * 24 * 3600);
        assert_eq!(cfg.cors.allowed_origin, "http://localhost:5173");
        assert!(cfg.database.auto_migrate);
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = AppConfig::default();
        cfg.apply_env_overrides(lookup(&[
            ("PORT", "8088"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN", "1h"),
            ("CORS_ORIGIN", "https://app.example.com"),
            ("AUTO_MIGRATE", "false"),
            ("SEED_DEMO_DATA", "yes"),
        ]))
        .unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert!(cfg.database.is_sqlite());
        assert!(!cfg.database.auto_migrate);
        assert!(cfg.database.seed_demo_data);
        assert_eq!(cfg.auth.jwt_secret, "s3cret");
        assert_eq!(cfg.auth.token_ttl_secs, 3600);
        assert_eq!(cfg.cors.allowed_origin, "https://app.example.com");
        cfg.normalize_and_validate().unwrap();
    }

    #[test]
    fn invalid_port_override_is_an_error() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env_overrides(lookup(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn validation_rejects_bad_database_settings() {
        let mut cfg = AppConfig::default();
        assert!(cfg.normalize_and_validate().is_err(), "empty url must fail");

        cfg.database.url = "mysql://localhost/db".into();
        assert!(cfg.database.validate().is_err());

        cfg.database.url = "postgres://localhost/db".into();
        cfg.database.min_connections = 5;
        cfg.database.max_connections = 2;
        assert!(cfg.database.validate().is_err());

        cfg.database.max_connections = 5;
        assert!(cfg.database.validate().is_ok());
    }

    #[test]
    fn validation_rejects_empty_secret() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite::memory:".into();
        cfg.auth.jwt_secret = "  ".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn parses_toml_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://u:p@localhost/sales"
            max_connections = 4
            min_connections = 1

            [auth]
            jwt_secret = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 4);
        assert_eq!(cfg.database.acquire_timeout_secs, 30);
        assert_eq!(cfg.auth.jwt_secret, "abc");
        assert_eq!(cfg.auth.token_ttl_secs, 604_800);
        assert_eq!(cfg.cors.allowed_origin, "http://localhost:5173");
    }

    fn scratch_file(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("sales-api-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("sales-api-{}-absent.toml", std::process::id()));
        let cfg = load_from_file_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.auth.jwt_secret, DEV_JWT_SECRET);
        assert!(!cfg.database.seed_demo_data);
    }

    #[test]
    fn malformed_file_is_an_error_not_defaults() {
        let path = scratch_file(
            "bad-type",
            "[auth]\njwt_secret = \"prod-secret\"\ntoken_ttl_secs = \"oops\"\n",
        );
        let res = load_from_file_or_default(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert!(res.is_err());

        let path = scratch_file("bad-syntax", "[auth\njwt_secret = ");
        let res = load_from_file_or_default(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert!(res.is_err());
    }

    #[test]
    fn present_file_is_used() {
        let path = scratch_file("good", "[auth]\njwt_secret = \"prod-secret\"\n");
        let cfg = load_from_file_or_default(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.unwrap().auth.jwt_secret, "prod-secret");
    }
}
