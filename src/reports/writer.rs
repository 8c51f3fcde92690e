// CSV writers for the file reports.

use snafu::prelude::*;

use fund_stats::DistrictPartyTop;

use crate::reports::{io_csv, FlushingReportSnafu, ReportResult, WritingReportSnafu};

/// One fully formatted row of the margins report.
#[derive(PartialEq, Debug, Clone)]
pub struct MarginRow {
    pub district: String,
    pub candidate: String,
    pub party: String,
    pub net_receipts: f64,
    pub incumbency: String,
    pub previously_held_by: Option<String>,
    pub absolute_difference: f64,
}

/// Writes the top-candidate listing with the raw column projection, one row
/// per (district, party) pair, in the order given.
pub fn write_top_report(path: &str, tops: &[DistrictPartyTop]) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(WritingReportSnafu { path })?;
    wtr.write_record([
        io_csv::COL_DISTRICT,
        io_csv::COL_NAME,
        io_csv::COL_PARTY,
        io_csv::COL_NET_RECEIPTS,
        io_csv::COL_INCUMBENCY,
        io_csv::COL_PREVIOUSLY_HELD_BY,
    ])
    .context(WritingReportSnafu { path })?;
    for t in tops {
        let r = &t.record;
        let net = r.net_receipts.to_string();
        wtr.write_record([
            r.district.as_str(),
            r.name.as_str(),
            r.party_code.as_str(),
            net.as_str(),
            r.incumbency.as_str(),
            r.previously_held_by.as_deref().unwrap_or(""),
        ])
        .context(WritingReportSnafu { path })?;
    }
    wtr.flush().context(FlushingReportSnafu { path })?;
    Ok(())
}

/// Writes the margins report in the order given (the caller sorts).
pub fn write_margin_report(path: &str, rows: &[MarginRow]) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(WritingReportSnafu { path })?;
    wtr.write_record([
        "District",
        "Candidate",
        "Party",
        "Net receipts",
        io_csv::COL_INCUMBENCY,
        io_csv::COL_PREVIOUSLY_HELD_BY,
        "Absolute difference",
    ])
    .context(WritingReportSnafu { path })?;
    for row in rows {
        let net = row.net_receipts.to_string();
        let diff = row.absolute_difference.to_string();
        wtr.write_record([
            row.district.as_str(),
            row.candidate.as_str(),
            row.party.as_str(),
            net.as_str(),
            row.incumbency.as_str(),
            row.previously_held_by.as_deref().unwrap_or(""),
            diff.as_str(),
        ])
        .context(WritingReportSnafu { path })?;
    }
    wtr.flush().context(FlushingReportSnafu { path })?;
    Ok(())
}
