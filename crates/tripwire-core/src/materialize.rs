//! Corpus materialization into a scratch workspace.
//!
//! Fixtures are static and immutable once authored; materialization writes
//! them to disk for the external tools to consume and records exactly what
//! was written so cleanup removes nothing else.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::corpus::Corpus;
use crate::domain::error::{Result, TripwireError};
use crate::domain::fixture::Fixture;

/// Record of a materialized corpus: the workspace root and every file the
/// materializer wrote, used for targeted cleanup.
#[derive(Debug, Clone)]
pub struct MaterializedCorpus {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl MaterializedCorpus {
    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths of every file written, support files first.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Absolute path a fixture was materialized to.
    pub fn fixture_path(&self, fixture: &Fixture) -> PathBuf {
        self.root.join(&fixture.path)
    }

    /// Remove exactly the files the materializer wrote, then prune any
    /// directories that became empty, including the root.
    pub fn remove(self) -> Result<()> {
        for file in &self.files {
            match fs::remove_file(file) {
                Ok(()) => debug!(path = %file.display(), "removed materialized file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            prune_empty_dirs(file.parent(), &self.root);
        }
        // The root itself, if nothing else lives there.
        if fs::remove_dir(&self.root).is_ok() {
            debug!(root = %self.root.display(), "removed workspace root");
        }
        Ok(())
    }
}

/// Write the corpus into `root`.
///
/// Refuses a non-empty workspace unless `force` is set; fixtures are
/// consumed read-only, so a dirty workspace means stale state from an
/// earlier run.
pub fn materialize(corpus: &Corpus, root: &Path, force: bool) -> Result<MaterializedCorpus> {
    if !force && root.exists() && root.read_dir()?.next().is_some() {
        return Err(TripwireError::WorkspaceNotEmpty(root.to_path_buf()));
    }
    fs::create_dir_all(root)?;

    let mut files = Vec::with_capacity(corpus.support_files().len() + corpus.len());

    // Support files first: collaborators must resolve before any fixture
    // that imports them is exercised.
    for support in corpus.support_files() {
        files.push(write_relative(root, &support.path, &support.content)?);
    }
    for fixture in corpus.fixtures() {
        files.push(write_relative(root, &fixture.path, &fixture.content)?);
    }

    info!(
        root = %root.display(),
        fixtures = corpus.len(),
        support_files = corpus.support_files().len(),
        "materialized corpus"
    );

    Ok(MaterializedCorpus {
        root: root.to_path_buf(),
        files,
    })
}

fn write_relative(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(path)
}

/// Remove a previously materialized corpus without a live
/// [`MaterializedCorpus`] record, re-deriving the file list from the corpus
/// itself. Files the materializer would not have written are left alone.
pub fn remove_materialized(corpus: &Corpus, root: &Path) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }
    let mut files = Vec::with_capacity(corpus.support_files().len() + corpus.len());
    for support in corpus.support_files() {
        files.push(root.join(&support.path));
    }
    for fixture in corpus.fixtures() {
        files.push(root.join(&fixture.path));
    }
    MaterializedCorpus {
        root: root.to_path_buf(),
        files,
    }
    .remove()
}

/// Walk upward from `start`, removing empty directories, stopping at `root`.
fn prune_empty_dirs(start: Option<&Path>, root: &Path) {
    let mut current = start;
    while let Some(dir) = current {
        if dir == root || fs::remove_dir(dir).is_err() {
            break;
        }
        current = dir.parent();
    }
}
