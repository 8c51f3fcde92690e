//! District/party aggregation and fairness statistics for campaign-finance
//! filings.
//!
//! The crate takes a flat collection of candidate filing rows and derives
//! the comparative reports: the best-funded candidate per district and
//! party, per-district head-to-head margins, party-wide totals, and the
//! distributional picture of each party's receipts (Gini coefficient and
//! concentration ratios).
//!
//! Every function here is pure: no I/O, no printing, no shared accumulator.
//! Groups are keyed by district and independent of each other, so the
//! engine can be partitioned by district key without locks if it ever needs
//! to be.

mod records;
pub mod stats;

use log::debug;

use std::collections::BTreeMap;

pub use crate::records::*;
pub use crate::stats::DistributionSummary;

/// Parses a monetary field: surrounding whitespace, a leading dollar sign
/// and grouping commas are stripped before parsing.
///
/// Amounts are non-negative by invariant, so negative or non-finite results
/// are rejected along with non-numeric residues.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(x) if x.is_finite() && x >= 0.0 => Some(x),
        _ => None,
    }
}

/// Numeric normalization pass: parses the monetary fields of every row and
/// produces a new collection. Fails fast on the first malformed amount with
/// the zero-based row index and the offending column.
pub fn normalize_rows(rows: &[RawCandidateRow]) -> Result<Vec<CandidateRecord>, StatsError> {
    debug!("normalize_rows: {} rows", rows.len());
    let mut res: Vec<CandidateRecord> = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let net_receipts =
            parse_amount(&row.net_receipts).ok_or_else(|| StatsError::MalformedAmount {
                row: idx,
                column: "Netreceipts".to_string(),
                value: row.net_receipts.clone(),
            })?;
        let cash_on_hand =
            parse_amount(&row.cash_on_hand).ok_or_else(|| StatsError::MalformedAmount {
                row: idx,
                column: "ECOH".to_string(),
                value: row.cash_on_hand.clone(),
            })?;
        res.push(CandidateRecord {
            district: row.district.clone(),
            party_code: row.party_code.clone(),
            name: row.name.clone(),
            net_receipts,
            cash_on_hand,
            incumbency: row.incumbency.clone(),
            previously_held_by: row.previously_held_by.clone(),
        });
    }
    Ok(res)
}

/// Retains only the Democrat and Republican rows. An empty result is a
/// valid outcome, not an error: downstream aggregations tolerate zero-row
/// groups.
pub fn filter_two_party(records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    records.into_iter().filter(|r| r.party().is_some()).collect()
}

/// The best-funded candidate of each (district, party) group present in the
/// input, ordered by (district, party).
///
/// Ties on net receipts are broken by input order: the first-encountered
/// record wins. This is a stated policy, not an accident of grouping.
pub fn top_by_district_party(records: &[CandidateRecord]) -> Vec<DistrictPartyTop> {
    let mut best: BTreeMap<(String, Party), &CandidateRecord> = BTreeMap::new();
    for r in records {
        let party = match r.party() {
            Some(p) => p,
            None => continue,
        };
        let key = (r.district.clone(), party);
        // Strictly greater, so the earlier record keeps equal ties.
        let replace = match best.get(&key) {
            Some(cur) => r.net_receipts > cur.net_receipts,
            None => true,
        };
        if replace {
            best.insert(key, r);
        }
    }
    debug!("top_by_district_party: {} groups", best.len());
    best.into_iter()
        .map(|((district, party), r)| DistrictPartyTop {
            district,
            party,
            record: r.clone(),
        })
        .collect()
}

/// Sums net receipts across *all* candidates of each party in each
/// district. This is a different aggregation from
/// [`top_by_district_party`]: "leads by party total" and "leads by single
/// best-funded candidate" are reported independently.
pub fn party_totals_by_district(records: &[CandidateRecord]) -> Vec<DistrictPair> {
    let mut acc: BTreeMap<String, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for r in records {
        let party = match r.party() {
            Some(p) => p,
            None => continue,
        };
        let entry = acc.entry(r.district.clone()).or_insert((None, None));
        let slot = match party {
            Party::Democrat => &mut entry.0,
            Party::Republican => &mut entry.1,
        };
        *slot = Some(slot.unwrap_or(0.0) + r.net_receipts);
    }
    pairs_from_map(acc)
}

/// Per-district top-candidate receipts, one optional value per party.
pub fn top_pairs(tops: &[DistrictPartyTop]) -> Vec<DistrictPair> {
    let mut acc: BTreeMap<String, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for t in tops {
        let entry = acc.entry(t.district.clone()).or_insert((None, None));
        match t.party {
            Party::Democrat => entry.0 = Some(t.record.net_receipts),
            Party::Republican => entry.1 = Some(t.record.net_receipts),
        }
    }
    pairs_from_map(acc)
}

fn pairs_from_map(acc: BTreeMap<String, (Option<f64>, Option<f64>)>) -> Vec<DistrictPair> {
    acc.into_iter()
        .map(|(district, (democrat, republican))| DistrictPair {
            district,
            democrat,
            republican,
        })
        .collect()
}

/// Head-to-head outcome per district, from the top-candidate selection.
/// Districts with a single party are `Uncontested`; both parties with equal
/// receipts are `Tied`; otherwise the absolute difference is reported.
pub fn race_margins(tops: &[DistrictPartyTop]) -> Vec<(String, RaceMargin)> {
    top_pairs(tops)
        .into_iter()
        .map(|pair| {
            let margin = match (pair.democrat, pair.republican) {
                (Some(d), Some(r)) if d == r => RaceMargin::Tied,
                (Some(d), Some(r)) => RaceMargin::Lead {
                    amount: (d - r).abs(),
                },
                _ => RaceMargin::Uncontested,
            };
            (pair.district, margin)
        })
        .collect()
}

/// Counts uncontested districts per party and districts with candidates
/// from both parties.
pub fn race_counts(records: &[CandidateRecord]) -> RaceCounts {
    let mut seen: BTreeMap<&str, (bool, bool)> = BTreeMap::new();
    for r in records {
        if let Some(party) = r.party() {
            let entry = seen.entry(r.district.as_str()).or_insert((false, false));
            match party {
                Party::Democrat => entry.0 = true,
                Party::Republican => entry.1 = true,
            }
        }
    }
    let mut counts = RaceCounts::default();
    for (_, presence) in seen {
        match presence {
            (true, true) => counts.contested += 1,
            (true, false) => counts.democrat_only += 1,
            (false, true) => counts.republican_only += 1,
            (false, false) => {}
        }
    }
    counts
}

/// Counts the districts where either side holds the strictly greater value.
/// Only districts with both parties present participate; uncontested
/// districts are excluded from all three counts.
pub fn compare_leaders(pairs: &[DistrictPair]) -> LeaderCounts {
    let mut counts = LeaderCounts::default();
    for pair in pairs {
        if let (Some(d), Some(r)) = (pair.democrat, pair.republican) {
            if d > r {
                counts.democrats += 1;
            } else if r > d {
                counts.republicans += 1;
            } else {
                counts.tied += 1;
            }
        }
    }
    counts
}

/// Party-wide candidate count and sums of net receipts and cash on hand.
pub fn party_totals(records: &[CandidateRecord], party: Party) -> PartyTotals {
    let mut totals = PartyTotals {
        party,
        candidates: 0,
        net_receipts: 0.0,
        cash_on_hand: 0.0,
    };
    for r in records {
        if r.party() == Some(party) {
            totals.candidates += 1;
            totals.net_receipts += r.net_receipts;
            totals.cash_on_hand += r.cash_on_hand;
        }
    }
    totals
}

/// The net-receipt amounts of one party, in input order.
pub fn net_receipts_of(records: &[CandidateRecord], party: Party) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.party() == Some(party))
        .map(|r| r.net_receipts)
        .collect()
}
