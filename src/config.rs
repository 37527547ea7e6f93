use std::time::Duration;

use clap::{Parser, ValueEnum};
use reqwest::Url;

use crate::data::filter::FilterMode;

/// Name of the page query parameter that carries the file to load.
pub const FILE_URL_PARAM: &str = "fileUrl";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
    Json,
}

/// Launch parameters of the viewer.
#[derive(Debug, Clone, Parser)]
#[command(name = "sheet-viewer", version, about = "View a spreadsheet and filter rows by NULL cells")]
pub struct LaunchConfig {
    /// Spreadsheet to load (http(s) URL, file:// URL or path).
    #[arg(long = "file-url", alias = "fileUrl", conflicts_with = "page_url")]
    pub file_url: Option<String>,

    /// Viewer page URL whose `fileUrl` query parameter names the spreadsheet,
    /// e.g. `viewer.html?fileUrl=https://host/data.xlsx`.
    #[arg(long = "page-url")]
    pub page_url: Option<String>,

    /// HTTP fetch timeout in seconds.
    #[arg(long = "timeout-secs", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Load, optionally filter once, print the result and exit.
    #[arg(long)]
    pub headless: bool,

    /// Columns the headless filter is applied to (repeat or comma-separate).
    #[arg(long, value_delimiter = ',', requires = "headless")]
    pub columns: Option<Vec<String>>,

    /// Filter mode for the headless filter.
    #[arg(long, value_enum, requires = "headless")]
    pub mode: Option<FilterMode>,

    /// Output format in headless mode.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,
}

impl LaunchConfig {
    /// The source to load. A missing parameter yields an empty source, which
    /// the loader rejects like any other failed fetch.
    pub fn source(&self) -> String {
        if let Some(url) = &self.file_url {
            return url.clone();
        }
        self.page_url
            .as_deref()
            .and_then(|page| query_param(page, FILE_URL_PARAM))
            .unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the headless run should perform a filter action.
    pub fn wants_filter(&self) -> bool {
        self.columns.is_some() || self.mode.is_some()
    }
}

/// Value of query parameter `name` in `page_url`. Relative page URLs such as
/// `viewer.html?fileUrl=...` are resolved against a dummy base.
pub fn query_param(page_url: &str, name: &str) -> Option<String> {
    let url = Url::parse(page_url)
        .or_else(|_| Url::parse("http://localhost/")?.join(page_url))
        .ok()?;
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
