//! Volunteer hours tracking.
//!
//! Members log the hours they volunteered, look at their totals and at the
//! leaderboard, and pick aliases. The club celebrates every time the hours
//! logged since the milestone start date cross a new threshold.
//!
//! # Modules
//!
//! - `alias` - Case-insensitive alias resolution and registration checks
//! - `ledger` - Hour entries, per-person totals and the leaderboard
//! - `milestone` - Milestone computation from the dated hours table
//! - `service` - Spreadsheet reads and writes used by the command handlers

mod alias;
mod ledger;
mod milestone;
mod service;

pub use crate::volunteers::alias::{Alias, AliasTable};
pub use crate::volunteers::ledger::{HourEntry, PersonTotal, Totals};
pub use crate::volunteers::service::VolunteerService;
