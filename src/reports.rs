use log::{info, warn};

use fund_stats::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashMap;
use std::fs;

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Command;
use crate::reports::format::money;

pub mod format;
pub mod io_csv;
pub mod writer;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Cannot open input file {path}"))]
    MissingInputFile { source: csv::Error, path: String },
    #[snafu(display("Input file has no readable header row"))]
    MissingHeader { source: csv::Error },
    #[snafu(display("Required column {column:?} is missing from the input header"))]
    MissingColumn { column: String },
    #[snafu(display("Line {lineno} cannot be read"))]
    CsvLine { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno} has fewer fields than the header"))]
    RowTooShort { lineno: usize },
    #[snafu(display("Line {lineno}: {source}"))]
    MalformedAmount { source: StatsError, lineno: usize },
    #[snafu(display("Cannot compute the distribution statistics for {scope}: {source}"))]
    Distribution { source: StatsError, scope: String },
    #[snafu(display("Cannot write the report to {path}"))]
    WritingReport { source: csv::Error, path: String },
    #[snafu(display("Cannot write the report to {path}"))]
    FlushingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot serialize the summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Cannot write the summary to {path}"))]
    WritingSummaryFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot open the reference summary {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The reference summary {path} is not valid JSON"))]
    ParsingReference {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("The computed summary differs from the reference summary"))]
    ReferenceMismatch {},
}

pub type ReportResult<T> = Result<T, ReportError>;

pub fn run(command: &Command) -> ReportResult<()> {
    match command {
        Command::Top { input, out } => run_top(input, out),
        Command::Margins { input, out } => run_margins(input, out),
        Command::Summary {
            input,
            out,
            reference,
        } => run_summary(input, out.as_deref(), reference.as_deref()),
    }
}

/// Reads the filing file, normalizes the monetary fields and drops
/// everything but the two major parties.
fn load_records(path: &str) -> ReportResult<Vec<CandidateRecord>> {
    let rows = io_csv::read_candidate_rows(path)?;
    let records = fund_stats::normalize_rows(&rows).map_err(|e| {
        // The engine reports a zero-based row index; line 1 is the header.
        let lineno = match &e {
            StatsError::MalformedAmount { row, .. } => row + 2,
            _ => 0,
        };
        ReportError::MalformedAmount { source: e, lineno }
    })?;
    Ok(filter_two_party(records))
}

fn run_top(input: &str, out: &str) -> ReportResult<()> {
    let records = load_records(input)?;
    let tops = top_by_district_party(&records);
    info!(
        "run_top: {} district/party leaders from {} rows",
        tops.len(),
        records.len()
    );
    for t in &tops {
        println!(
            "{:<8} {:<2} {:>14.2}  {}",
            t.district,
            t.party.code(),
            t.record.net_receipts,
            t.record.name
        );
    }
    writer::write_top_report(out, &tops)?;
    println!("\nResults saved to '{}'", out);
    Ok(())
}

fn run_margins(input: &str, out: &str) -> ReportResult<()> {
    let records = load_records(input)?;
    let tops = top_by_district_party(&records);
    let rows = build_margin_rows(&tops);

    let margins: Vec<RaceMargin> = race_margins(&tops).into_iter().map(|(_, m)| m).collect();
    let uncontested = margins
        .iter()
        .filter(|m| matches!(m, RaceMargin::Uncontested))
        .count();
    let tied = margins
        .iter()
        .filter(|m| matches!(m, RaceMargin::Tied))
        .count();
    info!(
        "run_margins: {} rows, {} uncontested districts, {} exact ties",
        rows.len(),
        uncontested,
        tied
    );

    for row in &rows {
        println!(
            "{:<8} {:<2} {:>14.2} {:>14.2}  {}",
            row.district, row.party, row.net_receipts, row.absolute_difference, row.candidate
        );
    }
    writer::write_margin_report(out, &rows)?;
    println!("\nResults saved to '{}'", out);
    Ok(())
}

/// One row of the margins report, fully formatted and joined with the
/// district-level difference.
fn build_margin_rows(tops: &[DistrictPartyTop]) -> Vec<writer::MarginRow> {
    let margins: HashMap<String, RaceMargin> = race_margins(tops).into_iter().collect();
    let mut rows: Vec<writer::MarginRow> = tops
        .iter()
        .map(|t| {
            let margin = margins
                .get(&t.district)
                .copied()
                .unwrap_or(RaceMargin::Uncontested);
            writer::MarginRow {
                district: format::canonical_district(&t.district),
                candidate: format::display_name(&t.record.name, t.record.is_incumbent()),
                party: t.party.code().to_string(),
                net_receipts: t.record.net_receipts,
                incumbency: t.record.incumbency.clone(),
                previously_held_by: t.record.previously_held_by.clone(),
                absolute_difference: margin.amount(),
            }
        })
        .collect();
    // Sorted by the previously-held-by annotation, then by the difference,
    // both ascending. Rows without the annotation go last, as in the
    // historical report.
    rows.sort_by(|a, b| {
        let ka = (
            a.previously_held_by.is_none(),
            a.previously_held_by.as_deref().unwrap_or(""),
        );
        let kb = (
            b.previously_held_by.is_none(),
            b.previously_held_by.as_deref().unwrap_or(""),
        );
        ka.cmp(&kb)
            .then(a.absolute_difference.total_cmp(&b.absolute_difference))
    });
    rows
}

fn run_summary(input: &str, out: Option<&str>, reference: Option<&str>) -> ReportResult<()> {
    let records = load_records(input)?;

    let counts = race_counts(&records);
    let total_leaders = compare_leaders(&party_totals_by_district(&records));
    let tops = top_by_district_party(&records);
    let top_leaders = compare_leaders(&top_pairs(&tops));
    let dem_totals = party_totals(&records, Party::Democrat);
    let rep_totals = party_totals(&records, Party::Republican);
    let dem_dist = DistributionSummary::compute(&net_receipts_of(&records, Party::Democrat))
        .context(DistributionSnafu {
            scope: Party::Democrat.label(),
        })?;
    let rep_dist = DistributionSummary::compute(&net_receipts_of(&records, Party::Republican))
        .context(DistributionSnafu {
            scope: Party::Republican.label(),
        })?;

    print_summary(
        &counts,
        &total_leaders,
        &top_leaders,
        &dem_totals,
        &rep_totals,
        &dem_dist,
        &rep_dist,
    );

    let summary_js = summary_to_json(
        &counts,
        &total_leaders,
        &top_leaders,
        &dem_totals,
        &rep_totals,
        &dem_dist,
        &rep_dist,
    );
    let pretty = serde_json::to_string_pretty(&summary_js).context(WritingJsonSnafu {})?;

    if let Some(path) = out {
        fs::write(path, &pretty).context(WritingSummaryFileSnafu { path })?;
        info!("Summary written to {}", path);
    }

    // The reference summary, if provided for comparison
    if let Some(path) = reference {
        let ref_str = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
        let ref_js: JSValue = serde_json::from_str(&ref_str).context(ParsingReferenceSnafu { path })?;
        let pretty_ref = serde_json::to_string_pretty(&ref_js).context(WritingJsonSnafu {})?;
        if pretty_ref != pretty {
            warn!("Found differences with the reference summary");
            print_diff(pretty_ref.as_str(), pretty.as_str(), "\n");
            return ReferenceMismatchSnafu {}.fail();
        }
        info!("Summary matches the reference {}", path);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn print_summary(
    counts: &RaceCounts,
    total_leaders: &LeaderCounts,
    top_leaders: &LeaderCounts,
    dem_totals: &PartyTotals,
    rep_totals: &PartyTotals,
    dem_dist: &DistributionSummary,
    rep_dist: &DistributionSummary,
) {
    println!(
        "1. Races where Democrats are running unchallenged: {}",
        counts.democrat_only
    );
    println!(
        "2. Races where Republicans are running unchallenged: {}",
        counts.republican_only
    );
    println!(
        "3. Races with candidates from both parties: {}",
        counts.contested
    );

    println!("\n4. In races with both parties:");
    println!("\n   a. Based on TOTAL party fundraising per district:");
    println!(
        "      Democrats lead (total party fundraising): {}",
        total_leaders.democrats
    );
    println!(
        "      Republicans lead (total party fundraising): {}",
        total_leaders.republicans
    );
    if total_leaders.tied > 0 {
        println!("      (Tied: {})", total_leaders.tied);
    }
    println!("\n   b. Based on TOP candidate from each party:");
    println!(
        "      Democrats lead (top candidate): {}",
        top_leaders.democrats
    );
    println!(
        "      Republicans lead (top candidate): {}",
        top_leaders.republicans
    );
    if top_leaders.tied > 0 {
        println!("      (Tied: {})", top_leaders.tied);
    }

    println!("\n5. Total fundraising across all candidates:");
    for totals in [dem_totals, rep_totals] {
        println!("   {}:", totals.party.label());
        println!("      Total Net Receipts: {}", money(totals.net_receipts));
        println!("      Total Cash on Hand: {}", money(totals.cash_on_hand));
    }
    println!("\n   Difference:");
    let receipts_ahead = if dem_totals.net_receipts > rep_totals.net_receipts {
        "Democrats"
    } else {
        "Republicans"
    };
    println!(
        "      Net Receipts: {} ({} ahead)",
        money((dem_totals.net_receipts - rep_totals.net_receipts).abs()),
        receipts_ahead
    );
    let cash_ahead = if dem_totals.cash_on_hand > rep_totals.cash_on_hand {
        "Democrats"
    } else {
        "Republicans"
    };
    println!(
        "      Cash on Hand: {} ({} ahead)",
        money((dem_totals.cash_on_hand - rep_totals.cash_on_hand).abs()),
        cash_ahead
    );

    println!("\n6. Distribution of Net Receipts by Party:");
    print_distribution(Party::Democrat.label(), dem_dist);
    print_distribution(Party::Republican.label(), rep_dist);

    println!("\n   Summary:");
    if dem_dist.gini < rep_dist.gini {
        println!(
            "      Democrats have MORE even distribution (lower Gini: {:.4} vs {:.4})",
            dem_dist.gini, rep_dist.gini
        );
    } else {
        println!(
            "      Republicans have MORE even distribution (lower Gini: {:.4} vs {:.4})",
            rep_dist.gini, dem_dist.gini
        );
    }
}

fn print_distribution(label: &str, d: &DistributionSummary) {
    println!("\n   {}:", label);
    println!("      Total candidates: {}", d.count);
    println!("      Mean: {}", money(d.mean));
    println!("      Median: {}", money(d.median));
    println!("      Std Dev: {}", money(d.std_dev));
    println!("      Min: {}", money(d.min));
    println!("      Max: {}", money(d.max));
    println!("      25th percentile: {}", money(d.q25));
    println!("      75th percentile: {}", money(d.q75));
    println!(
        "      Gini coefficient: {:.4} (0=perfect equality, 1=perfect inequality)",
        d.gini
    );
    println!(
        "      Top 5 candidates hold: {} ({:.1}% of total funds)",
        money(d.top5_amount),
        d.top5_share
    );
    println!(
        "      Top 10 candidates hold: {} ({:.1}% of total funds)",
        money(d.top10_amount),
        d.top10_share
    );
    println!(
        "      Top 5% of candidates ({} candidates) hold: {:.1}% of total funds",
        d.top_5pct_count, d.top_5pct_share
    );
    println!(
        "      Top 10% of candidates ({} candidates) hold: {:.1}% of total funds",
        d.top_10pct_count, d.top_10pct_share
    );
    println!(
        "      Top candidate holds: {} ({:.1}% of total funds)",
        money(d.top1_amount),
        d.top1_share
    );
}

// ******** JSON rendering of the summary *********

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct RaceCountsJs {
    democrat_only: usize,
    republican_only: usize,
    contested: usize,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct LeaderCountsJs {
    democrats: usize,
    republicans: usize,
    tied: usize,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct PartyTotalsJs {
    party: String,
    candidates: usize,
    net_receipts: f64,
    cash_on_hand: f64,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct DistributionJs {
    count: usize,
    mean: f64,
    median: f64,
    std_dev: f64,
    min: f64,
    max: f64,
    q25: f64,
    q75: f64,
    gini: f64,
    top5_share: f64,
    top10_share: f64,
    top_5pct_share: f64,
    top_10pct_share: f64,
    top1_share: f64,
}

impl From<&DistributionSummary> for DistributionJs {
    fn from(d: &DistributionSummary) -> DistributionJs {
        DistributionJs {
            count: d.count,
            mean: d.mean,
            median: d.median,
            std_dev: d.std_dev,
            min: d.min,
            max: d.max,
            q25: d.q25,
            q75: d.q75,
            gini: d.gini,
            top5_share: d.top5_share,
            top10_share: d.top10_share,
            top_5pct_share: d.top_5pct_share,
            top_10pct_share: d.top_10pct_share,
            top1_share: d.top1_share,
        }
    }
}

impl From<&LeaderCounts> for LeaderCountsJs {
    fn from(l: &LeaderCounts) -> LeaderCountsJs {
        LeaderCountsJs {
            democrats: l.democrats,
            republicans: l.republicans,
            tied: l.tied,
        }
    }
}

impl From<&PartyTotals> for PartyTotalsJs {
    fn from(t: &PartyTotals) -> PartyTotalsJs {
        PartyTotalsJs {
            party: t.party.label().to_string(),
            candidates: t.candidates,
            net_receipts: t.net_receipts,
            cash_on_hand: t.cash_on_hand,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn summary_to_json(
    counts: &RaceCounts,
    total_leaders: &LeaderCounts,
    top_leaders: &LeaderCounts,
    dem_totals: &PartyTotals,
    rep_totals: &PartyTotals,
    dem_dist: &DistributionSummary,
    rep_dist: &DistributionSummary,
) -> JSValue {
    let races = RaceCountsJs {
        democrat_only: counts.democrat_only,
        republican_only: counts.republican_only,
        contested: counts.contested,
    };
    json!({
        "races": races,
        "leaders": {
            "totalFundraising": LeaderCountsJs::from(total_leaders),
            "topCandidate": LeaderCountsJs::from(top_leaders),
        },
        "partyTotals": [PartyTotalsJs::from(dem_totals), PartyTotalsJs::from(rep_totals)],
        "distributions": {
            "democrats": DistributionJs::from(dem_dist),
            "republicans": DistributionJs::from(rep_dist),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        district: &str,
        party: &str,
        name: &str,
        net: &str,
        incumbency: &str,
    ) -> RawCandidateRow {
        RawCandidateRow {
            district: district.to_string(),
            party_code: party.to_string(),
            name: name.to_string(),
            net_receipts: net.to_string(),
            cash_on_hand: "0".to_string(),
            incumbency: incumbency.to_string(),
            previously_held_by: None,
        }
    }

    // The worked example: NY 017 with a Democrat incumbent at 1,000 and a
    // Republican challenger at 1,500.
    #[test]
    fn margin_rows_from_raw_filing_rows() {
        let rows = vec![
            raw("NY 017", "D", "Smith, Jane", "1,000", "Incumbent"),
            raw("NY 017", "R", "Doe, John", "1,500", "Challenger"),
        ];
        let records = filter_two_party(normalize_rows(&rows).unwrap());
        let tops = top_by_district_party(&records);
        let margin_rows = build_margin_rows(&tops);

        assert_eq!(margin_rows.len(), 2);
        for row in &margin_rows {
            assert_eq!(row.district, "NY-17");
            assert_eq!(row.absolute_difference, 500.0);
        }
        assert_eq!(margin_rows[0].candidate, "Jane Smith*");
        assert_eq!(margin_rows[1].candidate, "John Doe");
    }

    #[test]
    fn margin_rows_sorted_by_annotation_then_difference() {
        let mk = |district: &str, net: f64, prev: Option<&str>| DistrictPartyTop {
            district: district.to_string(),
            party: Party::Democrat,
            record: CandidateRecord {
                district: district.to_string(),
                party_code: "D".to_string(),
                name: "X, Y".to_string(),
                net_receipts: net,
                cash_on_hand: 0.0,
                incumbency: "Challenger".to_string(),
                previously_held_by: prev.map(|s| s.to_string()),
            },
        };
        let tops = vec![
            mk("AZ 001", 100.0, None),
            mk("AZ 002", 100.0, Some("R")),
            mk("AZ 003", 100.0, Some("D")),
        ];
        let rows = build_margin_rows(&tops);
        let annotations: Vec<Option<String>> =
            rows.iter().map(|r| r.previously_held_by.clone()).collect();
        assert_eq!(
            annotations,
            vec![
                Some("D".to_string()),
                Some("R".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn uncontested_districts_keep_zero_difference() {
        let rows = vec![
            raw("WY 001", "R", "Solo, Ann", "900", "Incumbent"),
            raw("NY 017", "D", "Smith, Jane", "1,000", "Challenger"),
            raw("NY 017", "R", "Doe, John", "1,000", "Challenger"),
        ];
        let records = filter_two_party(normalize_rows(&rows).unwrap());
        let margin_rows = build_margin_rows(&top_by_district_party(&records));
        for row in &margin_rows {
            // Both the uncontested and the exactly tied district write 0.
            assert_eq!(row.absolute_difference, 0.0);
        }
    }

    #[test]
    fn malformed_amount_reports_file_line() {
        let rows = vec![
            raw("NY 017", "D", "Smith, Jane", "1,000", "Incumbent"),
            raw("NY 017", "R", "Doe, John", "n/a", "Challenger"),
        ];
        let err = fund_stats::normalize_rows(&rows).map_err(|e| {
            let lineno = match &e {
                StatsError::MalformedAmount { row, .. } => row + 2,
                _ => 0,
            };
            ReportError::MalformedAmount { source: e, lineno }
        });
        match err {
            Err(ReportError::MalformedAmount { lineno, .. }) => assert_eq!(lineno, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn summary_json_is_stable() {
        let rows = vec![
            raw("NY 017", "D", "Smith, Jane", "1,000", "Incumbent"),
            raw("NY 017", "R", "Doe, John", "1,500", "Challenger"),
            raw("WY 001", "R", "Solo, Ann", "900", "Incumbent"),
        ];
        let records = filter_two_party(normalize_rows(&rows).unwrap());
        let counts = race_counts(&records);
        let total_leaders = compare_leaders(&party_totals_by_district(&records));
        let tops = top_by_district_party(&records);
        let top_leaders = compare_leaders(&top_pairs(&tops));
        let dem_totals = party_totals(&records, Party::Democrat);
        let rep_totals = party_totals(&records, Party::Republican);
        let dem_dist =
            DistributionSummary::compute(&net_receipts_of(&records, Party::Democrat)).unwrap();
        let rep_dist =
            DistributionSummary::compute(&net_receipts_of(&records, Party::Republican)).unwrap();
        let js = summary_to_json(
            &counts,
            &total_leaders,
            &top_leaders,
            &dem_totals,
            &rep_totals,
            &dem_dist,
            &rep_dist,
        );
        assert_eq!(js["races"]["contested"], 1);
        assert_eq!(js["races"]["republicanOnly"], 1);
        assert_eq!(js["leaders"]["topCandidate"]["republicans"], 1);
        assert_eq!(js["leaders"]["topCandidate"]["democrats"], 0);
        assert_eq!(js["partyTotals"][0]["party"], "Democrats");
        assert_eq!(js["partyTotals"][1]["netReceipts"], 2400.0);
        assert_eq!(js["distributions"]["democrats"]["count"], 1);
    }
}
