//! Configuration of the bots.
//!
//! Settings come from environment variables prefixed by `CLUBBOT_`, nested
//! keys being separated by `__`, and from an optional YAML file (or JSON when
//! the file name ends with `.json`). Environment variables override the file.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # Google Sheets API
//! sheets:
//!   # Optional, this is the default
//!   url: "https://sheets.googleapis.com"
//!   # OAuth bearer token with access to the spreadsheets
//!   access_token: "ya29..."
//!
//! # Volunteers bot, left out to disable it
//! volunteers:
//!   spreadsheet_id: "1AbC..."
//!   matrix:
//!     user_id: "@volunteers:example.org"
//!     password: "secret-password"
//!
//! # Membership bot, left out to disable it
//! membership:
//!   spreadsheet_id: "1XyZ..."
//!   matrix:
//!     user_id: "@membership:example.org"
//!     password: "secret-password"
//!   # Optional, shown to people who are not registered
//!   signup_url: "https://example.org/signup"
//! ```
//!
//! Without a file, the same settings as environment variables:
//!
//! ```bash
//! export CLUBBOT_SHEETS__ACCESS_TOKEN="ya29..."
//! export CLUBBOT_VOLUNTEERS__SPREADSHEET_ID="1AbC..."
//! export CLUBBOT_VOLUNTEERS__MATRIX__USER_ID="@volunteers:example.org"
//! export CLUBBOT_VOLUNTEERS__MATRIX__PASSWORD="secret-from-env"
//! ```

use std::path::Path;

use anyhow::{Context, bail};
use figment::{
    Figment,
    providers::{Env, Format, Json, Yaml},
};
use serde::Deserialize;

/// Prefix of the environment variables overriding the file.
const ENV_PREFIX: &str = "CLUBBOT_";

/// Root configuration. Built once at startup and handed to each bot.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Spreadsheet API settings, shared by both bots
    pub sheets: Sheets,
    /// Volunteers bot, disabled when absent
    pub volunteers: Option<VolunteersBot>,
    /// Membership bot, disabled when absent
    pub membership: Option<MembershipBot>,
}

/// Google Sheets API settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Sheets {
    /// Base URL of the API, without the `/v4` path
    #[serde(default = "default_sheets_url")]
    pub url: String,
    /// Bearer token sent with every request
    pub access_token: String,
}

fn default_sheets_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

/// Matrix account of one bot.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Matrix {
    /// Fully qualified Matrix user ID, `@username:homeserver.com`
    pub user_id: String,
    /// Password used for the first login. The session is persisted afterwards.
    pub password: String,
}

/// Volunteers bot settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VolunteersBot {
    /// Spreadsheet holding the hours, aliases and milestones
    pub spreadsheet_id: String,
    pub matrix: Matrix,
}

/// Membership bot settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MembershipBot {
    /// Spreadsheet holding the signup, associate and payment tables
    pub spreadsheet_id: String,
    pub matrix: Matrix,
    /// Where people who are not registered can sign up
    #[serde(default)]
    pub signup_url: Option<String>,
}

impl Config {
    /// Loads the configuration file at `path`, if any, and applies the
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// - the given file does not exist or cannot be parsed
    /// - a required value is missing
    /// - no bot section is configured
    pub fn load(path: Option<&str>) -> anyhow::Result<Config> {
        let figment = match path {
            Some(path) => {
                if !Path::new(path).is_file() {
                    bail!("configuration file {} not found", path);
                }
                if path.ends_with(".json") {
                    Figment::from(Json::file(path))
                } else {
                    Figment::from(Yaml::file(path))
                }
            }
            None => Figment::new(),
        };

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| match path {
                Some(path) => format!("invalid configuration in {}", path),
                None => format!("invalid configuration in {}* variables", ENV_PREFIX),
            })?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.volunteers.is_none() && self.membership.is_none() {
            bail!("no bot configured, add a volunteers or membership section");
        }
        if self.sheets.access_token.trim().is_empty() {
            bail!("sheets.access_token is empty");
        }

        let spreadsheet_ids = [
            self.volunteers.as_ref().map(|bot| &bot.spreadsheet_id),
            self.membership.as_ref().map(|bot| &bot.spreadsheet_id),
        ];
        if spreadsheet_ids
            .into_iter()
            .flatten()
            .any(|id| id.trim().is_empty())
        {
            bail!("spreadsheet_id is empty");
        }

        Ok(())
    }
}
