//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Download numbered book pages from a cookie-authenticated digital library.
///
/// Filenames are built from a prefix, a zero-padded page number and an
/// optional suffix, e.g. `gjuzelev_vasil_006.jpg`. Each page is tried once
/// per suffix; the run stops early after repeated pages where every suffix
/// failed.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about)]
pub struct Args {
    /// RON file with download settings; flags given here take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// URL of the directory holding the page images
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,

    /// Text before the page number, e.g. `gjuzelev_vasil`
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Full filename template, e.g. `{prefix}_{num:03d}{suffix}.jpg`
    #[arg(long, conflicts_with_all = ["separator", "digits", "extension"])]
    pub pattern: Option<String>,

    /// Text between prefix and page number [default: _]
    #[arg(long)]
    pub separator: Option<String>,

    /// Zero-padded width of the page number [default: 3]
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub digits: Option<u8>,

    /// File extension [default: jpg]
    #[arg(long)]
    pub extension: Option<String>,

    /// Page variant suffix; repeat for several, e.g. `--suffix _1L --suffix _2R`
    #[arg(short, long = "suffix", value_name = "SUFFIX")]
    pub suffixes: Vec<String>,

    /// First page number [default: 1]
    #[arg(long)]
    pub start: Option<u32>,

    /// Last page number; -1 downloads until pages keep failing [default: -1]
    #[arg(long, allow_negative_numbers = true)]
    pub end: Option<i64>,

    /// Directory for downloaded pages [default: downloaded_pages]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSESSIONID cookie value; the built-in one is used when omitted
    #[arg(long)]
    pub session_id: Option<String>,

    /// dspacc cookie value; the built-in one is used when omitted
    #[arg(long)]
    pub access_token: Option<String>,

    /// Continue without asking when the connection test fails
    #[arg(short, long)]
    pub yes: bool,

    /// Smallest body, in bytes, accepted as a real page [default: 5000]
    #[arg(long)]
    pub min_bytes: Option<u64>,

    /// Pause after each downloaded page, in milliseconds [default: 500]
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sentinel_end_page() {
        let args = Args::try_parse_from(["folio", "--end", "-1"]).unwrap();
        assert_eq!(args.end, Some(-1));
    }

    #[test]
    fn suffix_flag_repeats_in_order() {
        let args =
            Args::try_parse_from(["folio", "--suffix", "_1L", "-s", "_2R", "--suffix", ""])
                .unwrap();
        assert_eq!(args.suffixes, vec!["_1L", "_2R", ""]);
    }

    #[test]
    fn pattern_conflicts_with_parts() {
        let result = Args::try_parse_from(["folio", "--pattern", "{num}.jpg", "--digits", "4"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn digits_must_be_positive() {
        assert!(Args::try_parse_from(["folio", "--digits", "0"]).is_err());
    }

    #[test]
    fn verbosity_maps_to_level() {
        let args = Args::try_parse_from(["folio"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::Info);

        let args = Args::try_parse_from(["folio", "-vv"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::Trace);

        let args = Args::try_parse_from(["folio", "-q"]).unwrap();
        assert_eq!(args.log_level(), LevelFilter::Error);
    }
}
