// Primitives for reading the candidate filing files.

use std::io;

use csv::StringRecord;
use log::{debug, info};
use snafu::prelude::*;

use fund_stats::RawCandidateRow;

use crate::reports::{
    CsvLineSnafu, MissingColumnSnafu, MissingHeaderSnafu, MissingInputFileSnafu, ReportResult,
    RowTooShortSnafu,
};

pub const COL_DISTRICT: &str = "DISTRICT";
pub const COL_PARTY: &str = "PARTY";
pub const COL_NAME: &str = "NAME";
pub const COL_NET_RECEIPTS: &str = "Netreceipts";
pub const COL_CASH_ON_HAND: &str = "ECOH";
pub const COL_INCUMBENCY: &str = "INCUMBENCY";
pub const COL_PREVIOUSLY_HELD_BY: &str = "Previously held by";

/// Column positions resolved against the header row.
struct Columns {
    district: usize,
    party: usize,
    name: usize,
    net_receipts: usize,
    cash_on_hand: usize,
    incumbency: usize,
    // The annotation column is optional.
    previously_held_by: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> ReportResult<Columns> {
        let find = |column: &str| -> ReportResult<usize> {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .context(MissingColumnSnafu { column })
        };
        Ok(Columns {
            district: find(COL_DISTRICT)?,
            party: find(COL_PARTY)?,
            name: find(COL_NAME)?,
            net_receipts: find(COL_NET_RECEIPTS)?,
            cash_on_hand: find(COL_CASH_ON_HAND)?,
            incumbency: find(COL_INCUMBENCY)?,
            previously_held_by: headers.iter().position(|h| h.trim() == COL_PREVIOUSLY_HELD_BY),
        })
    }

    fn row(&self, line: &StringRecord, lineno: usize) -> ReportResult<RawCandidateRow> {
        let get = |col: usize| -> ReportResult<&str> {
            line.get(col).context(RowTooShortSnafu { lineno })
        };
        let previously_held_by = match self.previously_held_by {
            Some(col) => {
                let v = line.get(col).unwrap_or("").trim();
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            }
            None => None,
        };
        Ok(RawCandidateRow {
            district: get(self.district)?.trim().to_string(),
            party_code: get(self.party)?.trim().to_string(),
            name: get(self.name)?.to_string(),
            net_receipts: get(self.net_receipts)?.to_string(),
            cash_on_hand: get(self.cash_on_hand)?.to_string(),
            incumbency: get(self.incumbency)?.trim().to_string(),
            previously_held_by,
        })
    }
}

pub fn read_candidate_rows(path: &str) -> ReportResult<Vec<RawCandidateRow>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(MissingInputFileSnafu { path })?;
    let rows = parse_candidate_rows(rdr)?;
    info!("read_candidate_rows: {} rows from {}", rows.len(), path);
    Ok(rows)
}

fn parse_candidate_rows<R: io::Read>(mut rdr: csv::Reader<R>) -> ReportResult<Vec<RawCandidateRow>> {
    let headers = rdr.headers().context(MissingHeaderSnafu {})?.clone();
    let cols = Columns::from_headers(&headers)?;

    let mut res: Vec<RawCandidateRow> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The header occupies the first line of the file.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineSnafu { lineno })?;
        debug!("{:?} {:?}", lineno, line);
        res.push(cols.row(&line, lineno)?);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportError;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn reads_rows_with_reordered_columns() {
        let data = "PARTY,DISTRICT,NAME,Netreceipts,ECOH,INCUMBENCY,Previously held by\n\
                    D,NY 017,\"Smith, Jane\",\"1,000\",500,Incumbent,D\n\
                    R,NY 017,\"Doe, John\",\"1,500\",200,Challenger,\n";
        let rows = parse_candidate_rows(reader(data)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].district, "NY 017");
        assert_eq!(rows[0].party_code, "D");
        assert_eq!(rows[0].name, "Smith, Jane");
        assert_eq!(rows[0].net_receipts, "1,000");
        assert_eq!(rows[0].previously_held_by, Some("D".to_string()));
        // An empty annotation cell reads as absent.
        assert_eq!(rows[1].previously_held_by, None);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let data = "DISTRICT,PARTY,NAME,ECOH,INCUMBENCY\nNY 017,D,x,1,Open\n";
        let err = parse_candidate_rows(reader(data)).unwrap_err();
        match err {
            ReportError::MissingColumn { column } => assert_eq!(column, COL_NET_RECEIPTS),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_annotation_column_is_tolerated() {
        let data = "DISTRICT,PARTY,NAME,Netreceipts,ECOH,INCUMBENCY\nNY 017,D,x,1,2,Open\n";
        let rows = parse_candidate_rows(reader(data)).unwrap();
        assert_eq!(rows[0].previously_held_by, None);
    }
}
