//! Appending documents to tarballs on disk.
//!
//! Archives are only ever appended to: existing members are left in place and the new member is
//! written over the end-of-archive marker, after which a fresh marker is written. Nothing here
//! locks the archive, so a path must only ever have one writer at a time.

use crate::{
    document::Document,
    CollectionError,
};
use std::{
    collections::BTreeMap,
    fs::{
        self,
        File,
        OpenOptions,
    },
    io::{
        self,
        Seek,
        SeekFrom,
    },
    path::{
        Path,
        PathBuf,
    },
};
use temp_dir::TempDir;
use tokio::sync::mpsc;

const BLOCK_SIZE: u64 = 512;
const STAGING_PREFIX: &str = "software-inventory-collector";
const STAGED_FILE: &str = "entry";

/// Adds `content` to the tarball at `archive_path` as `entry_name`, creating the tarball if needed.
///
/// The content is staged in a temporary directory that is removed again on every return path.
pub fn append_to_archive(archive_path: &Path, entry_name: &str, content: &str) -> io::Result<()> {
    let staging = TempDir::with_prefix(STAGING_PREFIX).map_err(io::Error::other)?;
    let staged = staging.child(STAGED_FILE);
    fs::write(&staged, content)?;

    let mut archive = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(archive_path)?;
    let end = end_of_members(&mut archive)?;
    archive.seek(SeekFrom::Start(end))?;

    let mut builder = tar::Builder::new(archive);
    builder.append_path_with_name(&staged, entry_name)?;
    let mut archive = builder.into_inner()?;

    // Drop any record padding left behind the old end-of-archive marker.
    let len = archive.stream_position()?;
    archive.set_len(len)?;
    Ok(())
}

/// Offset just past the data of the last member, i.e. where the end-of-archive marker starts.
fn end_of_members(archive: &mut File) -> io::Result<u64> {
    if archive.metadata()?.len() == 0 {
        return Ok(0);
    }

    let mut end = 0;
    let mut reader = tar::Archive::new(&mut *archive);
    for member in reader.entries()? {
        let member = member?;
        let size = member.header().entry_size()?;
        end = member.raw_file_position() + size.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    }
    Ok(end)
}

/// Entries written per archive during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub archives: BTreeMap<PathBuf, usize>,
}

impl RunSummary {
    pub fn archive_count(&self) -> usize {
        self.archives.len()
    }

    pub fn entry_count(&self) -> usize {
        self.archives.values().sum()
    }
}

/// Writes documents into archives under the collection path, one at a time.
#[derive(Debug)]
pub struct ArchiveWriter {
    collection_path: PathBuf,
    summary: RunSummary,
}

impl ArchiveWriter {
    pub fn new(collection_path: impl Into<PathBuf>) -> Self {
        Self {
            collection_path: collection_path.into(),
            summary: RunSummary::default(),
        }
    }

    pub fn write(&mut self, document: &Document) -> Result<(), CollectionError> {
        let path = document.archive.path_in(&self.collection_path);
        append_to_archive(&path, document.entry.as_str(), &document.content).map_err(|source| {
            CollectionError::Archive {
                path: path.clone(),
                source,
            }
        })?;

        debug!(archive = %path.display(), entry = %document.entry, bytes = document.content.len(), "Archived document");
        *self.summary.archives.entry(path).or_default() += 1;
        Ok(())
    }

    /// Drains `documents` until every sender is gone, stopping at the first failed write.
    ///
    /// Blocks the calling thread; run it where blocking is allowed.
    pub fn consume(mut self, mut documents: mpsc::Receiver<Document>) -> Result<RunSummary, CollectionError> {
        while let Some(document) = documents.blocking_recv() {
            self.write(&document)?;
        }
        Ok(self.summary)
    }
}
