//! Deterministic names for archives and their entries.
//!
//! Everything produced in one run is stamped with the same [`RunTimestamp`], so an archive key
//! always resolves to the same tarball within a run and never to a previous run's tarball (unless
//! both runs started within the same second).

use chrono::{
    Local,
    NaiveDateTime,
};
use inventory_collector_config::{
    Settings,
    Target,
};
use std::{
    fmt,
    path::{
        Path,
        PathBuf,
    },
    str::FromStr,
};
use strum::{
    Display,
    EnumIter,
};

/// Separates the components of archive and entry names.
pub const SEPARATOR: &str = "_@_";

/// The instant a run started, as `YYYYmmddHHMMSS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunTimestamp(String);

impl RunTimestamp {
    pub const FORMAT: &'static str = "%Y%m%d%H%M%S";

    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self(datetime.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RunTimestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, Self::FORMAT).map(Self::from_datetime)
    }
}

impl fmt::Display for RunTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one tarball: `<customer>_@_<site>_@_<model>_@_<timestamp>.tar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveKey {
    pub customer: String,
    pub site: String,
    pub model: String,
    pub timestamp: RunTimestamp,
}

impl ArchiveKey {
    /// The archive an exporter target's inventory goes to.
    pub fn for_target(target: &Target, timestamp: &RunTimestamp) -> Self {
        Self {
            customer: target.customer.clone(),
            site: target.site.clone(),
            model: target.model.clone(),
            timestamp: timestamp.clone(),
        }
    }

    /// The archive a Juju model's status and bundle go to.
    pub fn for_model(settings: &Settings, model: &str, timestamp: &RunTimestamp) -> Self {
        Self {
            customer: settings.customer.clone(),
            site: settings.site.clone(),
            model: model.to_string(),
            timestamp: timestamp.clone(),
        }
    }

    pub fn file_name(&self) -> String {
        [
            self.customer.as_str(),
            self.site.as_str(),
            self.model.as_str(),
            self.timestamp.as_str(),
        ]
        .join(SEPARATOR)
            + ".tar"
    }

    pub fn path_in(&self, collection_path: &Path) -> PathBuf {
        collection_path.join(self.file_name())
    }
}

/// What an archive entry contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntryKind {
    Dpkg,
    Snap,
    Kernel,
    JujuStatus,
    JujuBundle,
}

/// The inventory endpoints every exporter serves, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ExporterEndpoint {
    Dpkg,
    Snap,
    Kernel,
}

impl ExporterEndpoint {
    pub fn entry_kind(self) -> EntryKind {
        match self {
            ExporterEndpoint::Dpkg => EntryKind::Dpkg,
            ExporterEndpoint::Snap => EntryKind::Snap,
            ExporterEndpoint::Kernel => EntryKind::Kernel,
        }
    }

    /// `http://<endpoint>/<kind>` for an exporter at `host:port`.
    pub fn url(self, exporter: &str) -> String {
        format!("http://{exporter}/{self}")
    }
}

/// `<kind>_@_<scope>_@_<timestamp>`, where scope is a hostname or a model name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName(String);

impl EntryName {
    pub fn new(kind: EntryKind, scope: &str, timestamp: &RunTimestamp) -> Self {
        Self(format!("{kind}{SEPARATOR}{scope}{SEPARATOR}{timestamp}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
