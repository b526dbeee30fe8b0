pub use crate::config::*;

use crate::run_booth_stats;

/// A builder for assembling a division tally vote by vote.
///
/// ```
/// pub use booth_tally::builder::Builder;
/// # use booth_tally::TallyErrors;
///
/// let mut builder = Builder::new();
/// builder.add_vote("Sydney Town Hall", "Australian Labor Party", 120);
/// builder.add_vote("Sydney Town Hall", "Liberal", 80);
///
/// let tally = builder.tally()?;
/// assert_eq!(tally.total_votes.0, 200);
///
/// # Ok::<(), TallyErrors>(())
/// ```
pub struct Builder {
    pub(crate) _records: Vec<VoteRecord>,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _records: Vec::new(),
        }
    }

    /// Adds one first-preference count for a premises.
    ///
    /// The party name does not need to be one of the named categories; it is
    /// classified when the tally is run.
    pub fn add_vote(&mut self, premises: &str, party: &str, ordinary_votes: u64) {
        self.add_vote_2(&VoteRecord {
            premises: premises.to_string(),
            party: party.to_string(),
            ordinary_votes: VoteCount(ordinary_votes),
        })
    }

    pub fn add_vote_2(&mut self, record: &VoteRecord) {
        self._records.push(record.clone());
    }

    /// Runs the tabulation over the votes added so far.
    pub fn tally(&self) -> Result<DivisionTally, TallyErrors> {
        run_booth_stats(&self._records)
    }
}
