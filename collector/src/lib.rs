//! # Software Inventory Collector
//!
//! Gathers the software inventory of a deployment into tarballs on disk.
//!
//! ## Sources
//!
//! - **Exporters**: every configured target serves its `dpkg`, `snap` and `kernel` inventory over HTTP
//! - **Juju controller**: every model visible to the configured user contributes its status and bundle
//!
//! ## Architecture
//!
//! - **`naming`**: Archive and entry names, all stamped with the run's timestamp
//! - **`collectors`**: Produce documents and hand them to a [`DocumentSender`]
//! - **`archive`**: A single [`ArchiveWriter`] appends every document to its tarball
//! - **`bundle`**: Splits bundle exports and drops cross-model relation offers
//! - **`controller`**: The seam the Juju collector talks to a controller through
//!
//! Archives are named `<customer>_@_<site>_@_<model>_@_<timestamp>.tar`; exporter targets are
//! grouped by their configured model, Juju models get one archive each.

#[macro_use]
extern crate tracing;

pub mod archive;
pub mod bundle;
pub mod collectors;
pub mod controller;
pub mod document;
mod error;
pub mod naming;

pub use archive::{
    ArchiveWriter,
    RunSummary,
};
pub use collectors::*;
pub use controller::{
    ControllerApi,
    ModelApi,
};
pub use document::{
    document_channel,
    Document,
    DocumentSender,
};
pub use error::CollectionError;
pub use naming::{
    ArchiveKey,
    EntryKind,
    EntryName,
    RunTimestamp,
};
