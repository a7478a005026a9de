//! CLI argument definitions for the PostgreSQL connection.

use clap::Args;
use std::fmt;

/// PostgreSQL connection parameters, read from flags or `DB_*` variables.
#[derive(Args, Clone)]
pub struct ConnectionArgs {
    /// PostgreSQL host
    #[arg(long, env = "DB_HOST", default_value = "postgres-source")]
    pub db_host: String,

    /// PostgreSQL port
    #[arg(long, env = "DB_PORT", default_value = "5432")]
    pub db_port: u16,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "sourcedb")]
    pub db_name: String,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(
        long,
        env = "DB_PASSWORD",
        default_value = "postgres",
        hide_env_values = true
    )]
    pub db_password: String,
}

impl ConnectionArgs {
    /// libpq key/value connection string understood by `tokio_postgres::connect`.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            quote(&self.db_host),
            self.db_port,
            quote(&self.db_name),
            quote(&self.db_user),
            quote(&self.db_password)
        )
    }

    /// `host:port/dbname`, used in log lines.
    pub fn target(&self) -> String {
        format!("{}:{}/{}", self.db_host, self.db_port, self.db_name)
    }
}

// Keeps the password out of `{:?}` output.
impl fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"***")
            .finish()
    }
}

/// Quote a value for the key/value connection string format.
fn quote(value: &str) -> String {
    if !value.is_empty() && !value.contains(|c: char| c.is_whitespace() || c == '\'' || c == '\\')
    {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
