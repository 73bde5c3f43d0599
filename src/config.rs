//! Runtime Configuration
//! Mission: Build one immutable config object at process start
//!
//! The signing secret is required: the process refuses to start without
//! it rather than serving requests it cannot authenticate.

use anyhow::{bail, Result};
use clap::Parser;

/// Command line arguments, with environment variable fallbacks.
#[derive(Parser, Debug)]
#[command(name = "crewdesk", about = "CrewDesk HR management backend")]
pub struct ServerArgs {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Path to the SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "./crewdesk.db")]
    pub database: String,
}

/// Process-wide configuration, constructed once at startup and never
/// mutated afterward.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_args(args: ServerArgs) -> Result<Self> {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => bail!("JWT_SECRET must be set; refusing to start without signing material"),
        };

        Ok(Self {
            host: args.host,
            port: args.port,
            database_path: args.database,
            jwt_secret,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
