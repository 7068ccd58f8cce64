//! Spreadsheet access used as the bots' database.
//!
//! The bots only ever read a named range or append a row to one. This module
//! wraps those two calls of the Google Sheets `values` API behind the
//! [`Requester`] trait so the services built on top can be tested with a mock.
//!
//! # Modules
//!
//! - `requester` - HTTP client for the `values.get` and `values.append` calls
//! - `response_structs` - Request and response bodies of the API
//! - `cells` - Conversions from raw cell values to numbers, text and dates
//!
//! # Examples
//!
//! ```no_run
//! use clubbot::sheets::{Requester, SheetsRequester, ValueRender, ranges};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let requester = SheetsRequester::new("https://sheets.googleapis.com", "sheet-id", "token");
//! let rows = requester
//!     .get_values(ranges::MILESTONES_COLUMN, ValueRender::Formatted)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod cells;
mod requester;
mod response_structs;

pub use crate::sheets::cells::{cell_date, cell_number, cell_text, parse_number};
#[cfg(test)]
pub use crate::sheets::requester::MockRequester;
pub use crate::sheets::requester::{Requester, SheetsRequester, ValueRender};

/// Rows of a range, as returned by the API. Rows can be shorter than the range
/// when trailing cells are empty.
pub type Rows = Vec<Vec<serde_json::Value>>;

/// Named ranges defined in the club spreadsheets.
pub mod ranges {
    /// Where new hour entries are appended.
    pub const HOURS_TABLE_NEXT: &str = "hours_table_next";
    /// Hour entries with names normalised through the alias table, header included.
    pub const NORMALISED_HOURS_TABLE: &str = "normalised_name_event_date_hours_table";
    /// Registered aliases as `[alias, name]` rows.
    pub const ALIAS_NAME_TABLE: &str = "alias_name_table";
    /// Where new aliases are appended.
    pub const ALIASES_TABLE_NEXT: &str = "aliases_table_next";
    /// Single cell holding the date milestones start counting from.
    pub const MILESTONES_START_DATE: &str = "milestones_start_date";
    /// `[date, hours]` rows used for milestones.
    pub const DATE_HOURS_TABLE: &str = "date_hours_table";
    /// One milestone threshold per row.
    pub const MILESTONES_COLUMN: &str = "milestones_column";
    /// Member ids, parallel to [`PAID`].
    pub const ID: &str = "id";
    /// Member ids of everyone who signed up.
    pub const SIGNUP_ID: &str = "signupId";
    /// Member ids of associate members.
    pub const ASSOCIATE_ID: &str = "associateId";
    /// `[semester 1, semester 2, both semesters]` payment flags.
    pub const PAID: &str = "paid";
}
