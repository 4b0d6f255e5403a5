use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT key have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Covers the
    /// synchronous thumbnail call made while handling a training webhook.
    pub request_timeout_secs: u64,
    /// Shared secret for webhook HMAC signatures. Verification is disabled
    /// when unset.
    pub webhook_secret: Option<String>,
    /// How often the reconciler runs, in seconds (default: `300`).
    pub reconcile_interval_secs: u64,
    /// Age after which an unsubmitted placeholder or an unclaimed parked
    /// completion is reported, in seconds (default: `900`).
    pub placeholder_ttl_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `8080`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`    | `120`                   |
    /// | `FAL_WEBHOOK_SECRET`      | unset                   |
    /// | `RECONCILE_INTERVAL_SECS` | `300`                   |
    /// | `PLACEHOLDER_TTL_SECS`    | `900`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_secs("REQUEST_TIMEOUT_SECS", 120);

        let webhook_secret = std::env::var("FAL_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let reconcile_interval_secs = parse_secs("RECONCILE_INTERVAL_SECS", 300);
        let placeholder_ttl_secs = parse_secs("PLACEHOLDER_TTL_SECS", 900);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            webhook_secret,
            reconcile_interval_secs,
            placeholder_ttl_secs,
            jwt,
        }
    }
}

fn parse_secs(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .map(|v| {
            v.parse()
                .unwrap_or_else(|_| panic!("{var} must be a valid u64"))
        })
        .unwrap_or(default)
}
