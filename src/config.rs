use std::{net::SocketAddr, str::FromStr, time::Duration};

use golf_core::{SettlementPolicy, VenueCalendar, calendar::DEFAULT_UTC_OFFSET_MINUTES};
use log::LevelFilter;
use golf_server_app::workflow::admin::bootstrap::{AdminSeed, DEFAULT_ADMIN_USERNAME};
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SESSION_TTL_MINUTES: u64 = 24 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file_path: String,
    pub archive_pattern: String,
    pub console_level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub listen_addr: SocketAddr,
    pub calendar: VenueCalendar,
    pub policy: SettlementPolicy,
    pub session_ttl: Duration,
    pub admin_seed: AdminSeed,
    pub log: LogConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let host = optional("GOLF_HTTP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(optional("GOLF_HTTP_PORT"), "GOLF_HTTP_PORT", DEFAULT_PORT)?;
        let listen_addr = format!("{}:{}", host.trim(), port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                name: "GOLF_HTTP_HOST",
                value: host.clone(),
            })?;

        let offset = parse_or(
            optional("GOLF_VENUE_UTC_OFFSET_MINUTES"),
            "GOLF_VENUE_UTC_OFFSET_MINUTES",
            DEFAULT_UTC_OFFSET_MINUTES,
        )?;
        let calendar =
            VenueCalendar::from_offset_minutes(offset).ok_or_else(|| ConfigError::Invalid {
                name: "GOLF_VENUE_UTC_OFFSET_MINUTES",
                value: offset.to_string(),
            })?;

        let max_players = parse_or(
            optional("GOLF_MAX_PLAYERS"),
            "GOLF_MAX_PLAYERS",
            SettlementPolicy::default().max_players,
        )?;
        if max_players == 0 {
            return Err(ConfigError::Invalid {
                name: "GOLF_MAX_PLAYERS",
                value: max_players.to_string(),
            });
        }

        let ttl_minutes = parse_or(
            optional("GOLF_SESSION_TTL_MINUTES"),
            "GOLF_SESSION_TTL_MINUTES",
            DEFAULT_SESSION_TTL_MINUTES,
        )?;

        let console_level = parse_or(
            optional("GOLF_LOG_LEVEL"),
            "GOLF_LOG_LEVEL",
            LevelFilter::Info,
        )?;

        Ok(ServerConfig {
            db_path: required("GOLF_DB_PATH")?,
            listen_addr,
            calendar,
            policy: SettlementPolicy::new(max_players),
            session_ttl: Duration::from_secs(ttl_minutes * 60),
            admin_seed: AdminSeed {
                username: optional("GOLF_ADMIN_USERNAME")
                    .map(|u| u.trim().to_string())
                    .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
                password: optional("GOLF_ADMIN_PASSWORD"),
            },
            log: LogConfig {
                file_path: required("LOG_FILE_PATH")?,
                archive_pattern: required("LOG_ARCHIVE_PATTERN")?,
                console_level,
            },
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
