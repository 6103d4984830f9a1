use crate::error::{PyupError, Result};
use crate::python::version::{MainVersion, PyVersion};
use colored::Colorize;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use url::Url;

const PYTHON_ORG: &str = "https://www.python.org";
const BASE_URL_ENV: &str = "PYUP_PYTHON_URL";

/// Support phase of a CPython release line, decoupled from the wording on
/// the downloads page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportStatus {
    Prerelease,
    Bugfix,
    Security,
    Unsupported,
}

impl SupportStatus {
    /// Map the release-status text on the downloads page to a status.
    /// Unrecognized labels return None so callers can skip the entry.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "prerelease" | "pre-release" => Some(Self::Prerelease),
            "bugfix" => Some(Self::Bugfix),
            "security" => Some(Self::Security),
            _ => None,
        }
    }

    /// Lines in these phases receive new installs during an upgrade
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Bugfix | Self::Security)
    }
}

impl fmt::Display for SupportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SupportStatus::Prerelease => "prerelease",
            SupportStatus::Bugfix => "bugfix",
            SupportStatus::Security => "security",
            SupportStatus::Unsupported => "unsupported",
        };
        f.write_str(label)
    }
}

/// Client for the python.org downloads page
pub struct PythonOrgClient {
    client: Client,
    base_url: String,
}

impl PythonOrgClient {
    pub fn new() -> Result<Self> {
        let base_url = match std::env::var(BASE_URL_ENV) {
            Ok(url) => {
                Self::validate_base_url(&url)?;
                url.trim_end_matches('/').to_string()
            }
            Err(_) => PYTHON_ORG.to_string(),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("pyup/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn validate_base_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|_| PyupError::SupportPage(format!("invalid base URL: {url}")))?;

        match parsed.scheme() {
            "https" | "http" => Ok(()),
            scheme => Err(PyupError::SupportPage(format!(
                "unsupported base URL scheme: {scheme}"
            ))),
        }
    }

    /// Scrape the currently supported release lines and their status.
    ///
    /// Network and HTTP failures abort the whole operation; no meaningful
    /// upgrade plan exists without the full release list.
    pub fn supported_versions(&self) -> Result<BTreeMap<MainVersion, SupportStatus>> {
        let url = format!("{}/downloads/", self.base_url);

        if std::env::var("PYUP_VERBOSE").is_ok() {
            eprintln!("[VERBOSE] Fetching: {url}");
        }

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(PyupError::SupportPage(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        let body = response.text()?;
        let lines = Self::parse_release_list(&body);

        if lines.is_empty() {
            return Err(PyupError::SupportPage(format!(
                "no active releases found at {url}; page layout may have changed"
            )));
        }

        Ok(lines)
    }

    /// Extract (line, status) pairs from the active-release-list widget.
    /// Entries with an unparseable version or unknown status label are
    /// skipped with a warning rather than failing the scrape.
    fn parse_release_list(body: &str) -> BTreeMap<MainVersion, SupportStatus> {
        let document = Html::parse_document(body);
        let entry = Selector::parse("div.active-release-list-widget li").unwrap();
        let release_version = Selector::parse("span.release-version").unwrap();
        let release_status = Selector::parse("span.release-status").unwrap();

        let mut lines = BTreeMap::new();

        for item in document.select(&entry) {
            let Some(version_text) = item
                .select(&release_version)
                .next()
                .map(|node| node.text().collect::<String>())
            else {
                continue;
            };
            let Some(status_text) = item
                .select(&release_status)
                .next()
                .map(|node| node.text().collect::<String>())
            else {
                continue;
            };

            let version = match PyVersion::parse(version_text.trim()) {
                Ok(version) => version,
                Err(_) => {
                    eprintln!(
                        "{} skipping unrecognized release version: {}",
                        "Warning:".yellow(),
                        version_text.trim()
                    );
                    continue;
                }
            };

            let Some(status) = SupportStatus::from_label(&status_text) else {
                eprintln!(
                    "{} skipping unrecognized release status '{}' for Python {}",
                    "Warning:".yellow(),
                    status_text.trim(),
                    version.main_format()
                );
                continue;
            };

            lines.insert(version.main(), status);
        }

        lines
    }
}
