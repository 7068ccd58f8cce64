//! Membership tier decision table.
//!
//! A member is identified by their club id number. The signup, associate and
//! paid tables decide their tier; the semester matters because members can
//! pay for one semester at a time.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::{
    error::CommandError,
    sheets::{Rows, cell_text},
};

/// Month from which the semester 2 payment is required.
const SEMESTER_2_START_MONTH: u32 = 7;

/// Membership classification of a club id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// The id is not in the signup table
    Unregistered,
    /// Signed up, but no payment row exists
    PaymentNotRecorded,
    /// Payment row exists but the current semester is not paid
    NotYetPaid,
    /// Paid for the current semester (or for the whole year)
    FullMember,
    /// Associate member, no payment needed
    Associate,
}

impl Tier {
    /// Turns the tiers that mean "unknown to the club" into errors.
    ///
    /// # Errors
    ///
    /// [`CommandError::NotRegistered`] and [`CommandError::PaymentNotRecorded`].
    pub fn into_result(self) -> Result<Tier, CommandError> {
        match self {
            Tier::Unregistered => Err(CommandError::NotRegistered),
            Tier::PaymentNotRecorded => Err(CommandError::PaymentNotRecorded),
            tier => Ok(tier),
        }
    }
}

/// Payment flags of one member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Payment {
    pub semester_1: bool,
    pub semester_2: bool,
    pub both_semesters: bool,
}

impl Payment {
    /// Reads `[semester 1, semester 2, both semesters]` flags. A flag is set
    /// when its cell reads `Yes`; missing cells are unset.
    pub fn from_row(row: &[serde_json::Value]) -> Self {
        let flag = |index: usize| {
            row.get(index)
                .map(|cell| cell_text(cell).trim().eq_ignore_ascii_case("yes"))
                .unwrap_or(false)
        };

        Payment {
            semester_1: flag(0),
            semester_2: flag(1),
            both_semesters: flag(2),
        }
    }

    /// Whether the payment covers the semester `today` is in.
    pub fn covers(&self, today: NaiveDate) -> bool {
        if self.both_semesters {
            return true;
        }
        if today.month() < SEMESTER_2_START_MONTH {
            self.semester_1
        } else {
            self.semester_2
        }
    }
}

/// Snapshot of the membership tables.
#[derive(Debug, Clone, Default)]
pub struct MembershipTables {
    signup_ids: HashSet<String>,
    associate_ids: HashSet<String>,
    payments: HashMap<String, Payment>,
}

impl MembershipTables {
    /// Builds the snapshot from the raw ranges.
    ///
    /// `ids` and `paid` are parallel: the n-th id owns the n-th payment row.
    /// When an id appears twice, its first payment row is used.
    pub fn from_rows(signup_ids: &Rows, associate_ids: &Rows, ids: &Rows, paid: &Rows) -> Self {
        let mut payments = HashMap::new();
        for (index, id) in first_column(ids).into_iter().enumerate() {
            if id.is_empty() {
                continue;
            }
            let payment = paid
                .get(index)
                .map(|row| Payment::from_row(row))
                .unwrap_or_default();
            payments.entry(id).or_insert(payment);
        }

        MembershipTables {
            signup_ids: first_column(signup_ids).into_iter().collect(),
            associate_ids: first_column(associate_ids).into_iter().collect(),
            payments,
        }
    }

    /// Classifies `id_number` on `today`.
    ///
    /// 1. Not signed up: [`Tier::Unregistered`]
    /// 2. Associate: [`Tier::Associate`], payments are not looked at
    /// 3. No payment row: [`Tier::PaymentNotRecorded`]
    /// 4. Otherwise [`Tier::FullMember`] if the payment covers the current
    ///    semester, [`Tier::NotYetPaid`] if not
    pub fn evaluate(&self, id_number: &str, today: NaiveDate) -> Tier {
        let id_number = id_number.trim();

        let tier = if !self.signup_ids.contains(id_number) {
            Tier::Unregistered
        } else if self.associate_ids.contains(id_number) {
            Tier::Associate
        } else {
            match self.payments.get(id_number) {
                None => Tier::PaymentNotRecorded,
                Some(payment) if payment.covers(today) => Tier::FullMember,
                Some(_) => Tier::NotYetPaid,
            }
        };

        debug!("member {} evaluated as {:?} on {}", id_number, tier, today);

        tier
    }
}

fn first_column(rows: &Rows) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.first()
                .map(|cell| cell_text(cell).trim().to_string())
                .unwrap_or_default()
        })
        .collect()
}
