use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub redis_url: String,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub llm: LlmConfig,
    pub stripe: StripeConfig,
    pub smtp: SmtpConfig,
    pub credits: CreditsConfig,
    pub monitor: MonitorConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub refresh_secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_seconds: u64,
    pub max_requests: u64,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u64,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    /// Base URL the verification link in outgoing mail points at.
    pub verify_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditPackage {
    pub price_id: String,
    pub credits: i64,
}

#[derive(Debug, Clone)]
pub struct CreditsConfig {
    pub signup_grant: i64,
    pub answer_cost: i64,
    pub packages: Vec<CreditPackage>,
}

impl CreditsConfig {
    pub fn credits_for_price(&self, price_id: &str) -> i64 {
        self.packages
            .iter()
            .find(|p| p.price_id == price_id)
            .map(|p| p.credits)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub interval_seconds: u64,
    pub concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
            },
            redis_url: "redis://localhost:6379".into(),
            auth: AuthConfig {
                jwt_secret: String::new(),
                refresh_secret: String::new(),
                access_ttl_seconds: 3600,
                refresh_ttl_seconds: 7 * 24 * 3600,
            },
            rate_limit: RateLimitConfig {
                window_seconds: 60,
                max_requests: 100,
            },
            llm: LlmConfig {
                model: "gpt-3.5-turbo".into(),
                max_tokens: 300,
                timeout_seconds: 30,
            },
            stripe: StripeConfig {
                secret_key: String::new(),
                api_base: "https://api.stripe.com".into(),
            },
            smtp: SmtpConfig {
                host: "localhost".into(),
                port: 465,
                username: String::new(),
                password: String::new(),
                from: "noreply@interview-pilot.local".into(),
                verify_base_url: "http://localhost:8080".into(),
            },
            credits: CreditsConfig {
                signup_grant: 30,
                answer_cost: 1,
                packages: Vec::new(),
            },
            monitor: MonitorConfig {
                interval_seconds: 60,
                concurrency: 4,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
        }
    }
}

impl AppConfig {
    /// Builds the config from environment variables, falling back to defaults.
    ///
    /// `JWT_SECRET` and `REFRESH_SECRET` are required; everything else has a
    /// development-friendly default.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                host: var_or("SERVER_HOST", defaults.server.host),
                port: parse_or("SERVER_PORT", defaults.server.port)?,
            },
            redis_url: var_or("REDIS_URL", defaults.redis_url),
            auth: AuthConfig {
                jwt_secret: required("JWT_SECRET")?,
                refresh_secret: required("REFRESH_SECRET")?,
                access_ttl_seconds: parse_or(
                    "ACCESS_TOKEN_TTL_SECONDS",
                    defaults.auth.access_ttl_seconds,
                )?,
                refresh_ttl_seconds: parse_or(
                    "REFRESH_TOKEN_TTL_SECONDS",
                    defaults.auth.refresh_ttl_seconds,
                )?,
            },
            rate_limit: RateLimitConfig {
                window_seconds: parse_or(
                    "RATE_LIMIT_WINDOW_SECONDS",
                    defaults.rate_limit.window_seconds,
                )?,
                max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", defaults.rate_limit.max_requests)?,
            },
            llm: LlmConfig {
                model: var_or("LLM_MODEL", defaults.llm.model),
                max_tokens: parse_or("LLM_MAX_TOKENS", defaults.llm.max_tokens)?,
                timeout_seconds: parse_or("LLM_TIMEOUT_SECONDS", defaults.llm.timeout_seconds)?,
            },
            stripe: StripeConfig {
                secret_key: var_or("STRIPE_SECRET_KEY", defaults.stripe.secret_key),
                api_base: var_or("STRIPE_API_BASE", defaults.stripe.api_base),
            },
            smtp: SmtpConfig {
                host: var_or("SMTP_HOST", defaults.smtp.host),
                port: parse_or("SMTP_PORT", defaults.smtp.port)?,
                username: var_or("SMTP_USERNAME", defaults.smtp.username),
                password: var_or("SMTP_PASSWORD", defaults.smtp.password),
                from: var_or("EMAIL_FROM", defaults.smtp.from),
                verify_base_url: var_or("VERIFY_BASE_URL", defaults.smtp.verify_base_url),
            },
            credits: CreditsConfig {
                signup_grant: parse_or("SIGNUP_CREDIT_GRANT", defaults.credits.signup_grant)?,
                answer_cost: parse_or("ANSWER_CREDIT_COST", defaults.credits.answer_cost)?,
                packages: parse_packages(&var_or("CREDIT_PACKAGES", String::new()))?,
            },
            monitor: MonitorConfig {
                interval_seconds: parse_or(
                    "MONITOR_INTERVAL_SECONDS",
                    defaults.monitor.interval_seconds,
                )?,
                concurrency: parse_or("MONITOR_CONCURRENCY", defaults.monitor.concurrency)?,
            },
            cors: CorsConfig {
                allowed_origins: var_or("CORS_ALLOWED_ORIGINS", String::new())
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            },
        })
    }
}

fn var_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("missing required environment variable {key}"))
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}

/// Parses `CREDIT_PACKAGES` of the form `price_abc=200,price_def=600`.
fn parse_packages(raw: &str) -> anyhow::Result<Vec<CreditPackage>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (price_id, credits) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("invalid CREDIT_PACKAGES entry: {pair}"))?;
            Ok(CreditPackage {
                price_id: price_id.trim().to_string(),
                credits: credits.trim().parse()?,
            })
        })
        .collect()
}
