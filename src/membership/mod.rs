//! Membership verification.
//!
//! Members prove they belong to the club by giving their name and id number.
//! The id is looked up in the signup, associate and payment tables of the
//! membership spreadsheet to find their [`Tier`].
//!
//! # Modules
//!
//! - `evaluator` - The tier decision table, including the semester rule
//! - `service` - Spreadsheet reads feeding the evaluator

mod evaluator;
mod service;

pub use crate::membership::evaluator::{MembershipTables, Tier};
pub use crate::membership::service::MembershipService;
