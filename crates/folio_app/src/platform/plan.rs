//! Merges command-line flags and the optional config file into one run.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use folio_core::{
    resolve_end_page, Credentials, DownloadConfig, FilenamePattern, DEFAULT_NUMBER_WIDTH,
};
use folio_engine::EngineSettings;

use super::persistence::ConfigFile;
use crate::cli::Args;

const DEFAULT_OUTPUT_DIR: &str = "downloaded_pages";
const DEFAULT_SEPARATOR: &str = "_";
const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug)]
pub struct RunPlan {
    pub config: DownloadConfig,
    pub settings: EngineSettings,
    pub assume_yes: bool,
}

impl RunPlan {
    /// Flags win over file values; file values win over defaults.
    pub fn resolve(args: &Args, file: ConfigFile) -> anyhow::Result<Self> {
        let Some(base_url) = args.base_url.clone().or(file.base_url) else {
            bail!("no base url given; pass --base-url or set `base_url` in the config file");
        };
        let prefix = args.prefix.clone().or(file.prefix).unwrap_or_default();

        let pattern = match (&args.pattern, file.pattern) {
            (Some(template), _) => FilenamePattern::parse(template)
                .with_context(|| format!("invalid --pattern `{template}`"))?,
            (None, Some(pattern))
                if args.separator.is_none() && args.digits.is_none() && args.extension.is_none() =>
            {
                pattern
            }
            _ => FilenamePattern::from_parts(
                args.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR),
                args.digits.map_or(DEFAULT_NUMBER_WIDTH, usize::from),
                args.extension.as_deref().unwrap_or(DEFAULT_EXTENSION),
            ),
        };

        let suffixes = if args.suffixes.is_empty() {
            file.suffixes
        } else {
            args.suffixes.clone()
        };

        let start_page = args.start.or(file.start).unwrap_or(1);
        let end_page = resolve_end_page(args.end.or(file.end).unwrap_or(-1))?;
        let output_dir = args
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let credentials = Credentials::or_defaults(
            args.session_id.clone().or(file.session_id),
            args.access_token.clone().or(file.access_token),
        );

        let config = DownloadConfig::new(&base_url, pattern, prefix, output_dir)?
            .with_suffixes(suffixes)
            .with_pages(start_page, end_page)
            .with_credentials(credentials);

        let mut settings = EngineSettings::default();
        if let Some(min_bytes) = args.min_bytes.or(file.min_bytes) {
            settings.min_payload_bytes = min_bytes;
        }
        if let Some(delay_ms) = args.delay_ms.or(file.delay_ms) {
            settings.success_delay = Duration::from_millis(delay_ms);
        }

        Ok(Self {
            config,
            settings,
            assume_yes: args.yes,
        })
    }
}
