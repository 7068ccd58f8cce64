//! Spreadsheet reads of the membership bot.

use crate::{
    error::CommandError,
    membership::evaluator::MembershipTables,
    sheets::{Requester, ValueRender, ranges},
};

/// Membership records stored in one spreadsheet. The bot never writes to it.
pub struct MembershipService<R: Requester> {
    /// Spreadsheet requester
    requester: R,
}

impl<R: Requester> MembershipService<R> {
    /// Create a new [MembershipService].
    ///
    /// # Arguments
    ///
    /// * `requester` - An implementation of the [Requester] trait bound to the membership spreadsheet.
    pub fn new(requester: R) -> Self {
        MembershipService { requester }
    }

    /// Reads the signup, associate, id and paid ranges concurrently.
    pub async fn tables(&self) -> Result<MembershipTables, CommandError> {
        let (signup_ids, associate_ids, ids, paid) = futures::try_join!(
            self.requester
                .get_values(ranges::SIGNUP_ID, ValueRender::Formatted),
            self.requester
                .get_values(ranges::ASSOCIATE_ID, ValueRender::Formatted),
            self.requester.get_values(ranges::ID, ValueRender::Formatted),
            self.requester.get_values(ranges::PAID, ValueRender::Formatted),
        )?;

        Ok(MembershipTables::from_rows(
            &signup_ids,
            &associate_ids,
            &ids,
            &paid,
        ))
    }
}
