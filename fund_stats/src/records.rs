// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The two parties that take part in head-to-head comparisons.
///
/// Filings carry many other party codes (third parties, independents, vacant
/// seats). Those are excluded before any comparative aggregation runs.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Party {
    Democrat,
    Republican,
}

impl Party {
    /// Maps the one-letter code used in the filings. Any other code is not a
    /// major party and returns `None`.
    pub fn from_code(code: &str) -> Option<Party> {
        match code {
            "D" => Some(Party::Democrat),
            "R" => Some(Party::Republican),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Party::Democrat => "D",
            Party::Republican => "R",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Party::Democrat => "Democrats",
            Party::Republican => "Republicans",
        }
    }
}

/// One row of a filing, as read from the input file.
///
/// The monetary fields are kept in their original string form, which may
/// carry thousands separators ("1,234,567.89").
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawCandidateRow {
    /// Raw district identifier, e.g. "NY 017".
    pub district: String,
    pub party_code: String,
    /// Candidate name, possibly in the "Last, First" form.
    pub name: String,
    pub net_receipts: String,
    pub cash_on_hand: String,
    pub incumbency: String,
    pub previously_held_by: Option<String>,
}

/// A filing row after numeric normalization.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateRecord {
    pub district: String,
    pub party_code: String,
    pub name: String,
    pub net_receipts: f64,
    pub cash_on_hand: f64,
    pub incumbency: String,
    pub previously_held_by: Option<String>,
}

impl CandidateRecord {
    pub fn party(&self) -> Option<Party> {
        Party::from_code(&self.party_code)
    }

    pub fn is_incumbent(&self) -> bool {
        self.incumbency == "Incumbent"
    }
}

// ******** Derived structures *********

/// The best-funded candidate of one party in one district.
#[derive(PartialEq, Debug, Clone)]
pub struct DistrictPartyTop {
    pub district: String,
    pub party: Party,
    pub record: CandidateRecord,
}

/// One aggregated value per party for a single district. A `None` side means
/// that the party has no candidate in the district.
#[derive(PartialEq, Debug, Clone)]
pub struct DistrictPair {
    pub district: String,
    pub democrat: Option<f64>,
    pub republican: Option<f64>,
}

impl DistrictPair {
    pub fn contested(&self) -> bool {
        self.democrat.is_some() && self.republican.is_some()
    }
}

/// Head-to-head outcome of one district.
///
/// An uncontested race and a perfectly tied race both collapse to a zero
/// amount in the legacy file format, but the variants stay distinguishable
/// for reporting.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum RaceMargin {
    /// Only one of the two parties fields a candidate.
    Uncontested,
    /// Both parties are present with exactly equal top receipts.
    Tied,
    /// Both parties are present; amount is the absolute receipt difference.
    Lead { amount: f64 },
}

impl RaceMargin {
    /// The scalar difference written to the file report. Uncontested and
    /// tied races both report 0.
    pub fn amount(&self) -> f64 {
        match self {
            RaceMargin::Lead { amount } => *amount,
            _ => 0.0,
        }
    }
}

/// How many districts are uncontested per party, and how many have
/// candidates from both parties.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct RaceCounts {
    pub democrat_only: usize,
    pub republican_only: usize,
    pub contested: usize,
}

/// For districts where both parties are present: which side holds the
/// strictly greater value of some aggregation.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct LeaderCounts {
    pub democrats: usize,
    pub republicans: usize,
    pub tied: usize,
}

/// Party-wide sums across all districts.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PartyTotals {
    pub party: Party,
    pub candidates: usize,
    pub net_receipts: f64,
    pub cash_on_hand: f64,
}

// ******** Errors *********

/// Errors raised by the aggregation engine.
#[derive(PartialEq, Debug, Clone)]
pub enum StatsError {
    /// A monetary field did not parse once grouping separators were removed.
    /// `row` is the zero-based index of the offending input row.
    MalformedAmount {
        row: usize,
        column: String,
        value: String,
    },
    /// A statistic was requested over an empty or zero-sum collection.
    InsufficientData,
}

impl Error for StatsError {}

impl Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::MalformedAmount { column, value, .. } => {
                write!(f, "malformed amount in column {}: {:?}", column, value)
            }
            StatsError::InsufficientData => {
                write!(f, "not enough data to compute the requested statistic")
            }
        }
    }
}
