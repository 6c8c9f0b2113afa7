//! Process configuration: a TOML file overlaid by environment variables.
//!
//! ```toml
//! database_url = "postgres://localhost:5432/sumdnc"
//! nextauth_url = "http://localhost:3000"
//! nextauth_secret = "change-me"
//! node_env = "development"
//!
//! [pagination]
//! default_limit = 10
//! max_limit = 100
//! ```
//!
//! Environment overrides: `DATABASE_URL`, `NEXTAUTH_URL`, `NEXTAUTH_SECRET`,
//! `NODE_ENV`. `SUMDNC_CONFIG` names the file to read.

use serde::Deserialize;
use std::{collections::BTreeMap, env, fmt, fs, path::PathBuf};
use sumdnc_core::db::PagePolicy;
use thiserror::Error as ThisError;
use url::Url;

pub const CONFIG_PATH_VAR: &str = "SUMDNC_CONFIG";

const DATABASE_URL_VAR: &str = "DATABASE_URL";
const NEXTAUTH_URL_VAR: &str = "NEXTAUTH_URL";
const NEXTAUTH_SECRET_VAR: &str = "NEXTAUTH_SECRET";
const NODE_ENV_VAR: &str = "NODE_ENV";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Every field that failed validation, with all of its messages.
    #[error("invalid configuration: {}", format_field_errors(.0))]
    Invalid(BTreeMap<String, Vec<String>>),
}

impl ConfigError {
    /// Field errors for an `Invalid` config.
    #[must_use]
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

fn format_field_errors(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

///
/// Environment
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "development" => Some(Self::Development),
            "test" => Some(Self::Test),
            "production" => Some(Self::Production),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Config
///

#[derive(Clone, Eq, PartialEq)]
pub struct Config {
    pub database_url: Url,
    pub nextauth_url: Url,
    pub nextauth_secret: String,
    pub environment: Environment,
    pub pagination: PagePolicy,
}

// Manual Debug impl to keep the secret out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_str())
            .field("nextauth_url", &self.nextauth_url.as_str())
            .field("nextauth_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("pagination", &self.pagination)
            .finish()
    }
}

impl Config {
    /// Load from `SUMDNC_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var_os(CONFIG_PATH_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let text = fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Some(text)
            }
            None => None,
        };

        Self::from_sources(file.as_deref(), |key| env::var(key).ok())
    }

    /// Build from optional TOML text plus an environment lookup.
    /// Environment values win over file values.
    pub fn from_sources(
        toml_text: Option<&str>,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut raw = match toml_text {
            Some(text) => toml::from_str::<RawConfig>(text)?,
            None => RawConfig::default(),
        };
        raw.overlay_env(env_lookup);

        raw.validate()
    }
}

///
/// RawConfig
/// Unvalidated file + env values.
///

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    database_url: Option<String>,
    nextauth_url: Option<String>,
    nextauth_secret: Option<String>,
    node_env: Option<String>,
    #[serde(default)]
    pagination: RawPagination,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPagination {
    default_limit: Option<u32>,
    max_limit: Option<u32>,
}

impl RawConfig {
    fn overlay_env(&mut self, env_lookup: impl Fn(&str) -> Option<String>) {
        let slots = [
            (DATABASE_URL_VAR, &mut self.database_url),
            (NEXTAUTH_URL_VAR, &mut self.nextauth_url),
            (NEXTAUTH_SECRET_VAR, &mut self.nextauth_secret),
            (NODE_ENV_VAR, &mut self.node_env),
        ];
        for (key, slot) in slots {
            if let Some(value) = env_lookup(key) {
                *slot = Some(value);
            }
        }
    }

    fn validate(self) -> Result<Config, ConfigError> {
        let mut errors = BTreeMap::<String, Vec<String>>::new();
        let mut push = |field: &str, message: String| {
            errors.entry(field.to_string()).or_default().push(message);
        };

        let database_url = parse_url(DATABASE_URL_VAR, self.database_url.as_deref(), &mut push);
        let nextauth_url = parse_url(NEXTAUTH_URL_VAR, self.nextauth_url.as_deref(), &mut push);

        let nextauth_secret = match self.nextauth_secret {
            Some(secret) if !secret.is_empty() => Some(secret),
            Some(_) => {
                push(NEXTAUTH_SECRET_VAR, "must not be empty".to_string());
                None
            }
            None => {
                push(NEXTAUTH_SECRET_VAR, "required".to_string());
                None
            }
        };

        let environment = match self.node_env.as_deref() {
            None => Some(Environment::default()),
            Some(raw) => Environment::parse(raw).or_else(|| {
                push(
                    NODE_ENV_VAR,
                    format!("expected 'development' | 'test' | 'production', received '{raw}'"),
                );
                None
            }),
        };

        let defaults = PagePolicy::DEFAULT;
        let pagination = PagePolicy::new(
            self.pagination
                .default_limit
                .unwrap_or_else(|| defaults.default_limit()),
            self.pagination
                .max_limit
                .unwrap_or_else(|| defaults.max_limit()),
        )
        .map_err(|err| push("pagination", err.to_string()))
        .ok();

        match (
            database_url,
            nextauth_url,
            nextauth_secret,
            environment,
            pagination,
        ) {
            (
                Some(database_url),
                Some(nextauth_url),
                Some(nextauth_secret),
                Some(environment),
                Some(pagination),
            ) if errors.is_empty() => Ok(Config {
                database_url,
                nextauth_url,
                nextauth_secret,
                environment,
                pagination,
            }),
            _ => Err(ConfigError::Invalid(errors)),
        }
    }
}

fn parse_url(field: &str, raw: Option<&str>, push: &mut impl FnMut(&str, String)) -> Option<Url> {
    let Some(raw) = raw else {
        push(field, "required".to_string());
        return None;
    };

    Url::parse(raw)
        .map_err(|err| push(field, format!("invalid url: {err}")))
        .ok()
}

///
/// TESTS
///
