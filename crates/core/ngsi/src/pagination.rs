//! The page-at-a-time transfer loop shared by all the copy and remove strategies.
//!
//! Each iteration asks the source for one page along with the total count of matching entities,
//! then hands the page over to the strategy. A dry-run stops after the first count query.
//! Pages are not transactional: a failure leaves the pages already written in place.

use crate::error::ReplicationError;
use crate::error::Strategy;
use tracing::info;
use tracing::warn;

/// Number of entities requested per page
pub const PAGE_SIZE: usize = 100;

/// The slice of the result set requested by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

/// A page along with the total count of entities matching the query
#[derive(Debug)]
pub struct Fetched<P> {
    pub total: usize,
    pub page: P,
}

/// How the window moves from one page to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The offset moves forward by one page, as when copying.
    Offset,
    /// The offset stays at zero, the entities of the previous page having been removed.
    Restart,
}

pub trait PageStrategy {
    type Page;

    fn strategy(&self) -> Strategy;

    fn advance(&self) -> Advance;

    /// Query one page of entities and the total count
    fn fetch(&self, window: Window) -> Result<Fetched<Self::Page>, ReplicationError>;

    /// Write the page, returning how many entities it accounts for
    fn apply(&self, window: Window, fetched: Fetched<Self::Page>)
        -> Result<usize, ReplicationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing has been written: this is the count of entities that would be processed
    DryRun(usize),
    /// All the pages have been processed: this is the number of entities processed
    Done(usize),
}

pub fn paginate<S: PageStrategy>(strategy: &S, run: bool) -> Result<Outcome, ReplicationError> {
    let limit = PAGE_SIZE;
    let mut page = 0;
    let mut processed = 0;

    loop {
        let offset = match strategy.advance() {
            Advance::Offset => page * limit,
            Advance::Restart => 0,
        };
        let window = Window { offset, limit };

        let fetched = strategy.fetch(window)?;
        let total = fetched.total;
        if !run {
            return Ok(Outcome::DryRun(total));
        }
        if total == 0 {
            break;
        }

        let applied = strategy.apply(window, fetched).inspect_err(|err| {
            warn!(target: "ngsi", "{err}: page {page} rejected, {processed} of {total} entities done")
        })?;
        processed += applied;
        info!(
            target: "ngsi",
            "{}: page {page} done, {processed} of {total} entities",
            strategy.strategy()
        );

        let more = match strategy.advance() {
            Advance::Offset => (page + 1) * limit < total,
            Advance::Restart => limit < total,
        };
        if !more {
            break;
        }
        page += 1;
    }

    Ok(Outcome::Done(processed))
}
