//! Community milestone computation.
//!
//! A milestone is a threshold of cumulative volunteer hours. The current
//! milestone is found by folding the thresholds in spreadsheet order: the
//! first one is the starting point and every later threshold that the total
//! reaches replaces it.

use chrono::NaiveDateTime;
use log::debug;
use serde_json::Value;

use crate::{
    error::CommandError,
    sheets::{Rows, cell_date, cell_number},
};

/// Inputs of the milestone computation, as read from the spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct MilestoneSheet {
    /// Cell holding the date milestones count from
    pub start_date: Option<Value>,
    /// `[date, hours]` rows
    pub date_hours: Rows,
    /// Single-column threshold rows
    pub thresholds: Rows,
}

impl MilestoneSheet {
    /// Computes the current milestone from the raw sheet content.
    ///
    /// Non-numeric thresholds read as `0`.
    ///
    /// # Errors
    ///
    /// [`CommandError::Configuration`] when the start date is missing or
    /// unreadable, or when there are no thresholds.
    pub fn current_milestone(&self) -> Result<f64, CommandError> {
        let start = self
            .start_date
            .as_ref()
            .and_then(cell_date)
            .ok_or_else(|| {
                CommandError::Configuration(format!(
                    "unreadable milestone start date {:?}",
                    self.start_date
                ))
            })?;

        let entries: Vec<(Option<NaiveDateTime>, Option<f64>)> = self
            .date_hours
            .iter()
            .map(|row| {
                (
                    row.first().and_then(cell_date),
                    row.get(1).and_then(cell_number),
                )
            })
            .collect();

        let thresholds: Vec<f64> = self
            .thresholds
            .iter()
            .map(|row| row.first().and_then(cell_number).unwrap_or(0.0))
            .collect();

        current_milestone(start, &entries, &thresholds)
    }
}

/// Sums the hours that count towards milestones.
///
/// Entries dated before `start` and entries without numeric hours count `0`.
/// An entry whose date is unknown is counted.
pub fn qualifying_hours(start: NaiveDateTime, entries: &[(Option<NaiveDateTime>, Option<f64>)]) -> f64 {
    entries
        .iter()
        .map(|(date, hours)| match (date, hours) {
            (_, None) => 0.0,
            (Some(date), Some(_)) if *date < start => 0.0,
            (_, Some(hours)) => *hours,
        })
        .sum()
}

/// Returns the milestone reached by the entries since `start`.
///
/// The first threshold is returned when none is reached.
///
/// # Errors
///
/// [`CommandError::Configuration`] when `thresholds` is empty.
///
/// # Examples
///
/// ```
/// let milestone = current_milestone(start, &[(None, Some(150.0))], &[100.0, 200.0]).unwrap();
/// assert_eq!(milestone, 100.0);
/// ```
pub fn current_milestone(
    start: NaiveDateTime,
    entries: &[(Option<NaiveDateTime>, Option<f64>)],
    thresholds: &[f64],
) -> Result<f64, CommandError> {
    let Some((first, rest)) = thresholds.split_first() else {
        return Err(CommandError::Configuration(
            "no milestone thresholds".to_string(),
        ));
    };

    let total = qualifying_hours(start, entries);
    let milestone = rest.iter().fold(*first, |best, threshold| {
        if total >= *threshold { *threshold } else { best }
    });

    debug!("{} qualifying hours, milestone {}", total, milestone);

    Ok(milestone)
}
