use std::time::Duration;

use clap::Parser;
use sqlx::postgres::PgConnectOptions;

use crate::state::ServiceInfo;

#[derive(Clone, Debug, Parser)]
#[clap(version, about = "Lab scoring server")]
pub struct ShopieaArgs {
    /// Database host
    #[clap(long, env = "SHOPIEA_DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[clap(long, env = "SHOPIEA_DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user
    #[clap(long, env = "SHOPIEA_DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[clap(long, env = "SHOPIEA_DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[clap(long, env = "SHOPIEA_DB_NAME", default_value = "shopiea")]
    pub db_name: String,

    /// Session time zone of database connections
    #[clap(long, env = "SHOPIEA_TZ")]
    pub tz: Option<String>,

    /// Address to bind
    #[clap(long, env = "SHOPIEA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port
    #[clap(long, env = "SHOPIEA_PORT", default_value_t = 9898)]
    pub port: u16,

    /// Deployment mode, `release` or `debug`
    #[clap(long, env = "SHOPIEA_MODE", default_value = "debug")]
    pub mode: String,

    /// Deployment environment; `production` switches logs to JSON lines
    #[clap(long = "env", env = "SHOPIEA_ENV", default_value = "development")]
    pub environment: String,

    /// Key used to sign access tokens
    #[clap(long, env = "SHOPIEA_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in hours
    #[clap(long, env = "SHOPIEA_TOKEN_TTL_HOURS", default_value_t = 24)]
    pub token_ttl_hours: i64,

    /// Per-request timeout in seconds
    #[clap(long, env = "SHOPIEA_REQUEST_TIMEOUT", default_value_t = 10)]
    pub request_timeout: u64,

    /// Password given to the seeded `admin` user
    #[clap(long, env = "SHOPIEA_ADMIN_PASSWORD", default_value = "admin123", hide_env_values = true)]
    pub admin_password: String,

    #[clap(long, env = "SHOPIEA_CASE_REPO", default_value = "")]
    pub case_repo: String,

    #[clap(long, env = "SHOPIEA_CASE_BRANCH", default_value = "")]
    pub case_branch: String,

    #[clap(long, env = "SHOPIEA_INFRA_REPO", default_value = "")]
    pub infra_repo: String,

    #[clap(long, env = "SHOPIEA_INFRA_BRANCH", default_value = "")]
    pub infra_branch: String,

    /// Run database migrations and exit
    #[clap(long)]
    pub migrate: bool,

    /// Seed default roles, class, admin, course and lab, then exit
    #[clap(long)]
    pub seed: bool,
}

impl ShopieaArgs {
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name);
        match &self.tz {
            Some(tz) if !tz.is_empty() => options.options([("timezone", tz.as_str())]),
            _ => options,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_release(&self) -> bool {
        self.mode == "release"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            case_repo: self.case_repo.clone(),
            case_branch: self.case_branch.clone(),
            infra_repo: self.infra_repo.clone(),
            infra_branch: self.infra_branch.clone(),
        }
    }
}
