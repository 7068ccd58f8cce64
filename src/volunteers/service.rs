//! Spreadsheet-backed operations of the volunteers bot.
//!
//! [`VolunteerService`] reads the tables the command handlers work on and
//! applies the writes they ask for. It holds no data between calls: every
//! read goes to the spreadsheet.

use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::{
    error::CommandError,
    sheets::{Requester, ValueRender, ranges},
    volunteers::{
        alias::{Alias, AliasTable},
        ledger::{HourEntry, Totals},
        milestone::MilestoneSheet,
    },
};

/// Volunteer hours and aliases stored in one spreadsheet.
pub struct VolunteerService<R: Requester> {
    /// Spreadsheet requester
    requester: R,
    /// Serializes the read-append-read sequence of [`Self::log_hours`].
    ///
    /// Only appends made by this process are ordered; another process writing
    /// to the same sheet can still make a milestone announcement be missed or
    /// repeated.
    ledger_lock: Mutex<()>,
}

impl<R: Requester> VolunteerService<R> {
    /// Create a new [VolunteerService].
    ///
    /// # Arguments
    ///
    /// * `requester` - An implementation of the [Requester] trait bound to the volunteers spreadsheet.
    pub fn new(requester: R) -> Self {
        VolunteerService {
            requester,
            ledger_lock: Mutex::new(()),
        }
    }

    /// Reads the alias table.
    pub async fn aliases(&self) -> Result<AliasTable, CommandError> {
        let rows = self
            .requester
            .get_values(ranges::ALIAS_NAME_TABLE, ValueRender::Formatted)
            .await?;
        Ok(AliasTable::from_rows(&rows))
    }

    /// Reads the normalised hours table and sums it per person.
    pub async fn totals(&self) -> Result<Totals, CommandError> {
        let rows = self
            .requester
            .get_values(ranges::NORMALISED_HOURS_TABLE, ValueRender::Unformatted)
            .await?;
        Ok(Totals::from_normalised_rows(&rows))
    }

    /// Reads the milestone ranges and computes the current milestone.
    ///
    /// The three ranges are fetched concurrently, unformatted so that dates
    /// and numbers come back as numbers.
    pub async fn milestone(&self) -> Result<f64, CommandError> {
        let (start_date, date_hours, thresholds) = futures::try_join!(
            self.requester
                .get_values(ranges::MILESTONES_START_DATE, ValueRender::Unformatted),
            self.requester
                .get_values(ranges::DATE_HOURS_TABLE, ValueRender::Unformatted),
            self.requester
                .get_values(ranges::MILESTONES_COLUMN, ValueRender::Unformatted),
        )?;

        let sheet = MilestoneSheet {
            start_date: start_date.first().and_then(|row| row.first()).cloned(),
            date_hours,
            thresholds,
        };

        sheet.current_milestone()
    }

    /// Appends an entry to the ledger.
    ///
    /// The milestone is computed before and after the append. Returns the new
    /// milestone when it is greater than the previous one, `None` otherwise.
    /// Nothing is written when the first milestone computation fails. Once the
    /// row is appended the entry counts as logged: a failure to read the
    /// milestone again only skips the announcement.
    pub async fn log_hours(&self, entry: &HourEntry) -> Result<Option<f64>, CommandError> {
        let _guard = self.ledger_lock.lock().await;

        let previous = self.milestone().await?;
        info!("log {} hours for {}", entry.hours, entry.name);
        self.requester
            .append_row(ranges::HOURS_TABLE_NEXT, entry.to_row())
            .await?;
        let current = match self.milestone().await {
            Ok(current) => current,
            Err(e) => {
                warn!("hours logged for {} but milestone unreadable: {}", entry.name, e);
                return Ok(None);
            }
        };

        debug!("milestone before {}, after {}", previous, current);

        // Negative corrections can move the milestone back down
        Ok((current > previous).then_some(current))
    }

    /// Appends an alias to the alias table.
    pub async fn add_alias(&self, alias: &Alias) -> Result<(), CommandError> {
        info!("add alias {} for {}", alias.alias, alias.name);
        self.requester
            .append_row(ranges::ALIASES_TABLE_NEXT, alias.to_row())
            .await
    }
}
