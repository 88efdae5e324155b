//! Download settings stored in a RON file.
//!
//! ```ron
//! (
//!     base_url: Some("http://unilib-dspace.nasledstvo.bg/xmlui/bitstream/handle/nls/29904/"),
//!     prefix: Some("gjuzelev_vasil"),
//!     pattern: Some("{prefix}_{num:03d}{suffix}.jpg"),
//!     suffixes: ["_1L", "_2R"],
//!     start: Some(1),
//!     end: Some(-1),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use folio_core::FilenamePattern;
use folio_logging::folio_info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub prefix: Option<String>,
    pub pattern: Option<FilenamePattern>,
    pub suffixes: Vec<String>,
    pub start: Option<u32>,
    pub end: Option<i64>,
    pub output_dir: Option<PathBuf>,
    pub session_id: Option<String>,
    pub access_token: Option<String>,
    pub min_bytes: Option<u64>,
    pub delay_ms: Option<u64>,
}

pub fn load_config_file(path: &Path) -> anyhow::Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let config = parse_config(&content)
        .with_context(|| format!("failed to parse config file {:?}", path))?;
    folio_info!("Loaded settings from {:?}", path);
    Ok(config)
}

fn parse_config(content: &str) -> anyhow::Result<ConfigFile> {
    Ok(ron::from_str(content)?)
}
