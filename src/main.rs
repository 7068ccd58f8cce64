//! clubbot - Matrix bots for a club backed by a spreadsheet.
//!
//! # Overview
//!
//! Two bots share this binary:
//!
//! - **Volunteers**: members log the hours they volunteered, look up totals and
//!   the leaderboard, and pick aliases. Crossing a milestone of club-wide hours
//!   is announced in the room.
//! - **Membership**: members check that their signup and fees are recorded.
//!
//! Both read and append rows of a Google spreadsheet through its `values`
//! API. Each bot runs when its section is present in the configuration, both
//! at once when both are.
//!
//! # Configuration
//!
//! ```yaml
//! sheets:
//!   access_token: "ya29..."
//! volunteers:
//!   spreadsheet_id: "1AbC..."
//!   matrix:
//!     user_id: "@volunteers:example.org"
//!     password: "your-password"
//! membership:
//!   spreadsheet_id: "1XyZ..."
//!   matrix:
//!     user_id: "@membership:example.org"
//!     password: "your-password"
//!   signup_url: "https://example.org/signup"
//! ```
//!
//! The file is optional: any value can be given or overridden with a
//! `CLUBBOT_` environment variable, see [`config`].
//!
//! # Usage
//!
//! ```bash
//! clubbot --config config.yaml --data ./clubbot-data
//! # or from the environment only
//! clubbot --data ./clubbot-data
//! ```
//!
//! # Bot Commands
//!
//! - `!logHours [name] <description> <hours>` - Log volunteer hours
//! - `!getHours [name]` - Show the total hours of someone
//! - `!addAlias [name] <new-alias>` - Give someone an alias
//! - `!hiscores` - Show the leaderboard
//! - `!verify <first-name> <last-name> <id-number>` - Check a membership
//! - `!help` - List the commands of the bot
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use futures::future::join_all;
use log::{error, info};

use crate::{
    bot::{Backend, Bot},
    config::Config,
};

mod bot;
mod commands;
mod config;
mod error;
mod matrix;
mod membership;
mod sheets;
mod utils;
mod volunteers;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Optional configuration file, YAML or JSON (`.json` extension).
    ///
    /// Settings can also come from `CLUBBOT_` environment variables, e.g.
    /// `CLUBBOT_VOLUNTEERS__MATRIX__PASSWORD`, which override the file.
    #[arg(short, long)]
    config: Option<String>,

    /// Directory for persistent data.
    ///
    /// Each bot keeps its Matrix session in a subdirectory named after it
    /// (`volunteers/`, `membership/`). It holds access tokens, keep it
    /// private.
    #[arg(short, long)]
    data: String,
}

/// Logs in every configured bot, then runs them until they stop.
async fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(args.config.as_deref())?;

    let mut bots = Vec::new();
    if let Some(volunteers) = &config.volunteers {
        let backend = Backend::volunteers(&config.sheets, volunteers);
        bots.push(Bot::new(backend, &volunteers.matrix, &args.data).await?);
    }
    if let Some(membership) = &config.membership {
        let backend = Backend::membership(&config.sheets, membership);
        bots.push(Bot::new(backend, &membership.matrix, &args.data).await?);
    }

    info!("running {} bot(s)", bots.len());
    join_all(bots.into_iter().map(Bot::start)).await;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting clubbot {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
