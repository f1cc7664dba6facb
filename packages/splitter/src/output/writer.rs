//! Fragment writer: output layout, JSON encoding and execution.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::sink::FileSink;
use crate::config::{
    json_file, url_path, COMPONENTS_FILE, PAGES_DIR, SLOTS_FILE, UNNAMED_FILE_STEM,
    WORKFLOWS_FILE,
};
use crate::error::{Result, SplitterError};
use crate::types::{CollectionKind, Document, Fragment, Fragments};

/// A file the writer will produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Everything a run writes, in write order.
///
/// Files follow fragment owner order, each fragment's collections in
/// [`CollectionKind::ALL`] order, then the pass-through lists by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritePlan {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PlannedFile>,
    planned: BTreeSet<PathBuf>,
}

impl WritePlan {
    fn add_dir(&mut self, dir: PathBuf) {
        if !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
    }

    /// Queue a file, refusing a path that is already planned.
    fn add_file(&mut self, path: PathBuf, contents: Vec<u8>) -> Result<()> {
        if !self.planned.insert(path.clone()) {
            return Err(SplitterError::DuplicatePath { path });
        }
        self.files.push(PlannedFile { path, contents });
        Ok(())
    }

    /// Paths of all planned files.
    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|file| file.path.as_path())
    }
}

/// Location of a fragment below `<root>/pages`, or `None` for the root.
#[must_use]
pub fn fragment_location(fragment: &Fragment<'_>) -> Option<PathBuf> {
    fragment.url().and_then(url_path)
}

/// Check that no two fragments share an output location.
///
/// Fragments without a usable URL all share the output root, so two of
/// those are a conflict as well.
pub fn check_distinct(fragments: &Fragments<'_>) -> Result<()> {
    let mut locations: BTreeMap<Option<PathBuf>, usize> = BTreeMap::new();
    for fragment in fragments.values() {
        *locations.entry(fragment_location(fragment)).or_default() += 1;
    }

    match locations.into_iter().find(|(_, count)| *count > 1) {
        Some((location, count)) => Err(SplitterError::DuplicateUrl {
            url: location
                .map(|path| path.to_string_lossy().into_owned())
                .unwrap_or_default(),
            count,
        }),
        None => Ok(()),
    }
}

/// Lay out all output files for a split export.
///
/// Fails with [`SplitterError::DuplicateUrl`] before anything is planned if
/// two fragments would land in the same directory, and with
/// [`SplitterError::DuplicatePath`] if two files would share a path (a page
/// url named like a collection file, or a pass-through list named like a
/// root fragment file).
pub fn plan_output(
    root: &Path,
    document: &Document,
    fragments: &Fragments<'_>,
) -> Result<WritePlan> {
    check_distinct(fragments)?;

    let mut plan = WritePlan::default();
    plan.add_dir(root.to_path_buf());

    for (owner, fragment) in fragments {
        let (dir, name) = match fragment_location(fragment) {
            Some(relative) => {
                let name = relative
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (root.join(PAGES_DIR).join(relative), name)
            }
            None => (root.to_path_buf(), file_stem(owner)),
        };
        plan.add_dir(dir.clone());

        for (kind, items) in fragment.collections() {
            let stem = match kind {
                CollectionKind::Pages => name.as_str(),
                CollectionKind::Components => COMPONENTS_FILE,
                CollectionKind::Slots => SLOTS_FILE,
                CollectionKind::Workflows => WORKFLOWS_FILE,
            };
            plan.add_file(json_file(&dir, stem), to_json(items)?)?;
        }

        tracing::debug!(
            owner = %owner,
            dir = %dir.display(),
            elements = fragment.len(),
            "Planned fragment"
        );
    }

    for (name, items) in document.pass_through() {
        if items.is_empty() {
            continue;
        }
        plan.add_file(json_file(root, &file_stem(name)), to_json(items)?)?;
    }

    Ok(plan)
}

/// Create the planned directories, then write the planned files.
///
/// Stops at the first failure; files already written stay in place.
pub fn execute_plan<S: FileSink + ?Sized>(plan: &WritePlan, sink: &mut S) -> Result<()> {
    for dir in &plan.dirs {
        sink.create_dir_all(dir)
            .map_err(|source| SplitterError::Write {
                path: dir.clone(),
                source,
            })?;
    }

    for file in &plan.files {
        sink.write_file(&file.path, &file.contents)
            .map_err(|source| SplitterError::Write {
                path: file.path.clone(),
                source,
            })?;
        tracing::debug!(path = %file.path.display(), bytes = file.contents.len(), "Wrote file");
    }

    Ok(())
}

/// Pretty-printed JSON with a trailing newline.
fn to_json<T: serde::Serialize + ?Sized>(items: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(items)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Make a name safe to use as a single file name.
fn file_stem(name: &str) -> String {
    if name.is_empty() {
        return UNNAMED_FILE_STEM.to_string();
    }
    name.replace(['/', '\\'], "_")
}
