use clap::{Parser, Subcommand};

/// This is a reporting program for district-level fundraising filings.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Writes the best-funded candidate of each party in each district.
    Top {
        /// (file path) The delimited file containing the candidate filings.
        #[clap(short, long, value_parser, default_value = "filtered_races.csv")]
        input: String,
        /// (file path) Where the report is written.
        #[clap(short, long, value_parser, default_value = "top_by_district.csv")]
        out: String,
    },
    /// Writes the per-district head-to-head receipt differences.
    Margins {
        /// (file path) The delimited file containing the candidate filings.
        #[clap(short, long, value_parser, default_value = "filtered_races.csv")]
        input: String,
        /// (file path) Where the report is written.
        #[clap(short, long, value_parser, default_value = "top_by_district_attempt.csv")]
        out: String,
    },
    /// Prints the national race counts, party totals and distribution statistics.
    Summary {
        /// (file path) The delimited file containing the candidate filings.
        #[clap(short, long, value_parser, default_value = "every_race.csv")]
        input: String,
        /// (file path, optional) If specified, the summary will also be written in JSON
        /// format to the given location.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// (file path, optional) A reference summary in JSON format. If provided, fundtally
        /// will check that the computed summary matches the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
}
