// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// The marker substring in a polling place name that identifies an
/// early-voting (pre-poll) booth, as used in the AEC polling place lists.
pub const PRE_POLL_MARKER: &str = "PP";

/// A number of ordinary votes (votes cast in person on polling day).
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct VoteCount(pub u64);

impl VoteCount {
    pub const EMPTY: VoteCount = VoteCount(0);
}

impl Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

/// Wheelchair accessibility of a premises, from the gazette.
///
/// Anything that is not clearly labeled in the source data collapses to `None`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum WheelchairAccess {
    Full,
    Assisted,
    None,
}

impl WheelchairAccess {
    pub fn from_label(label: &str) -> WheelchairAccess {
        match label.trim() {
            "Full" => WheelchairAccess::Full,
            "Assisted" => WheelchairAccess::Assisted,
            _ => WheelchairAccess::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WheelchairAccess::Full => "Full",
            WheelchairAccess::Assisted => "Assisted",
            WheelchairAccess::None => "None or unknown",
        }
    }
}

/// A polling place expected to operate at the coming election, from the
/// expected polling places gazette.
#[derive(PartialEq, Debug, Clone)]
pub struct ExpectedPlace {
    pub division: String,
    /// Premises name, whitespace-trimmed with known variants corrected.
    pub premises: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub wheelchair: WheelchairAccess,
    pub ord_vote_est: Option<u64>,
    pub dec_vote_est: Option<u64>,
}

/// A polling place that operated at the previous election.
#[derive(PartialEq, Debug, Clone)]
pub struct PollingPlace {
    pub id: u32,
    pub division: String,
    /// The polling place name. Pre-poll booths carry a marker in this name.
    pub name: String,
    pub premises: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PollingPlace {
    pub fn is_pre_poll(&self) -> bool {
        self.name.contains(PRE_POLL_MARKER)
    }
}

/// One row of the first-preferences file, before joining on polling places.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FirstPrefRecord {
    pub polling_place_id: u32,
    pub party: String,
    pub ordinary_votes: VoteCount,
}

/// A first-preference count attached to the premises it was cast at.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRecord {
    pub premises: String,
    pub party: String,
    pub ordinary_votes: VoteCount,
}

/// The fixed set of party categories used for aggregation and display.
///
/// Every party name maps to exactly one category; parties matching none of
/// the named rules collapse to `Other`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum PartyCategory {
    Labor,
    Liberal,
    Greens,
    Independent,
    OneNation,
    UnitedAustralia,
    Other,
}

impl PartyCategory {
    /// All the categories, in display order.
    pub const ALL: [PartyCategory; 7] = [
        PartyCategory::Labor,
        PartyCategory::Liberal,
        PartyCategory::Greens,
        PartyCategory::Independent,
        PartyCategory::OneNation,
        PartyCategory::UnitedAustralia,
        PartyCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PartyCategory::Labor => "Labor",
            PartyCategory::Liberal => "Liberal",
            PartyCategory::Greens => "Greens",
            PartyCategory::Independent => "Independent",
            PartyCategory::OneNation => "One Nation",
            PartyCategory::UnitedAustralia => "United Australia",
            PartyCategory::Other => "Other",
        }
    }

    /// The map colour conventionally associated with the category.
    pub fn colour(&self) -> &'static str {
        match self {
            PartyCategory::Labor => "red",
            PartyCategory::Liberal => "blue",
            PartyCategory::Greens => "green",
            PartyCategory::Independent => "lightseagreen",
            PartyCategory::OneNation => "orange",
            PartyCategory::UnitedAustralia => "yellow",
            PartyCategory::Other => "grey",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Vote totals per category for one premises.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CategoryTotals {
    totals: [VoteCount; PartyCategory::ALL.len()],
}

impl CategoryTotals {
    pub fn new() -> CategoryTotals {
        CategoryTotals {
            totals: [VoteCount::EMPTY; PartyCategory::ALL.len()],
        }
    }

    pub fn add(&mut self, category: PartyCategory, votes: VoteCount) {
        self.totals[category.index()] += votes;
    }

    pub fn get(&self, category: PartyCategory) -> VoteCount {
        self.totals[category.index()]
    }

    pub fn total(&self) -> VoteCount {
        self.totals.iter().cloned().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == VoteCount::EMPTY
    }

    /// The categories with their totals, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (PartyCategory, VoteCount)> + '_ {
        PartyCategory::ALL.iter().map(|c| (*c, self.get(*c)))
    }
}

// ******** Output data structures *********

/// Aggregated first preferences for one premises.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PremisesTally {
    pub premises: String,
    pub totals: CategoryTotals,
}

/// Aggregated first preferences for a set of booths, one entry per premises
/// name, in premises name order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DivisionTally {
    pub booths: Vec<PremisesTally>,
    pub total_votes: VoteCount,
}

impl DivisionTally {
    pub fn empty() -> DivisionTally {
        DivisionTally {
            booths: Vec::new(),
            total_votes: VoteCount::EMPTY,
        }
    }

    pub fn get(&self, premises: &str) -> Option<&PremisesTally> {
        self.booths.iter().find(|b| b.premises == premises)
    }
}

/// Errors that prevent the tabulation from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    EmptyDivision,
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::EmptyDivision => write!(f, "no vote records to tabulate"),
        }
    }
}
