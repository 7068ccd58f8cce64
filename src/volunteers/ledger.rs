//! Volunteer hours ledger.
//!
//! The ledger is append-only: corrections are new entries with negative
//! hours. Totals are always recomputed from the normalised table.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::sheets::{Rows, cell_number, cell_text};

/// Number of people shown on the leaderboard.
pub const MAX_HISCORES_LENGTH: usize = 10;

/// One submission of volunteer hours.
#[derive(Debug, Clone, PartialEq)]
pub struct HourEntry {
    /// Canonical name of the volunteer
    pub name: String,
    /// What the hours were spent on
    pub description: String,
    /// When the entry was logged
    pub timestamp: DateTime<Utc>,
    /// Hours, negative for corrections
    pub hours: f64,
}

impl HourEntry {
    /// Spreadsheet row for this entry: `[name, description, timestamp, hours]`.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.description.clone().into(),
            self.timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .into(),
            self.hours.into(),
        ]
    }
}

/// Sum of the hours of one person.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonTotal {
    pub name: String,
    pub hours: f64,
}

/// Totals of everyone in the ledger, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct Totals(Vec<PersonTotal>);

impl Totals {
    /// Sums the normalised hours table.
    ///
    /// The first row is a header and is skipped. Column 0 holds the name and
    /// column 3 the hours; rows without a name are ignored and non-numeric
    /// hours count `0`.
    pub fn from_normalised_rows(rows: &Rows) -> Self {
        let mut totals: Vec<PersonTotal> = Vec::new();

        for row in rows.iter().skip(1) {
            let name = row.first().map(cell_text).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let hours = row.get(3).and_then(cell_number).unwrap_or(0.0);

            match totals.iter_mut().find(|total| total.name == name) {
                Some(total) => total.hours += hours,
                None => totals.push(PersonTotal { name, hours }),
            }
        }

        Totals(totals)
    }

    /// Total hours of `name`, `None` if they have no entry.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|total| total.name == name)
            .map(|total| total.hours)
    }

    /// Every name in the ledger.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|total| total.name.as_str())
    }

    /// The best volunteers, most hours first.
    ///
    /// Ties keep the ledger order. At most [`MAX_HISCORES_LENGTH`] people are
    /// returned.
    pub fn leaderboard(&self) -> Vec<PersonTotal> {
        let mut hiscores = self.0.clone();
        // sort_by is stable
        hiscores.sort_by(|a, b| b.hours.total_cmp(&a.hours));
        hiscores.truncate(MAX_HISCORES_LENGTH);
        hiscores
    }
}
