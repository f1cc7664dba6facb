//! Main splitter service that ties all components together.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::index::NodeIndex;
use crate::output::{execute_plan, fragment_location, plan_output, FileSink, WritePlan};
use crate::partition::partition;
use crate::types::{CollectionKind, Document, Fragments};

/// Per-fragment overview, as shown by `inspect` and after a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentSummary {
    /// Owning top-level page, empty for unowned elements.
    pub owner: String,

    /// URL the fragment directory is named after, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Directory below `pages/`, or `None` when written to the output root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,

    pub pages: usize,
    pub components: usize,
    pub slots: usize,
    pub workflows: usize,
}

/// Result of a completed split.
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub fragments: Vec<FragmentSummary>,
    pub plan: WritePlan,
}

/// Read and decode an export file.
pub fn load_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path)?;
    let document = Document::from_slice(&bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Loaded export");
    Ok(document)
}

/// Index and partition a document.
pub fn split_document(document: &Document) -> Result<Fragments<'_>> {
    let index = NodeIndex::build(document)?;
    partition(document, &index)
}

/// Summarize each fragment of a document without planning any output.
pub fn summarize(document: &Document) -> Result<Vec<FragmentSummary>> {
    let fragments = split_document(document)?;
    Ok(summaries(&fragments))
}

fn summaries(fragments: &Fragments<'_>) -> Vec<FragmentSummary> {
    fragments
        .iter()
        .map(|(owner, fragment)| FragmentSummary {
            owner: owner.clone(),
            url: fragment.url().map(String::from),
            location: fragment_location(fragment),
            pages: fragment.get(CollectionKind::Pages).len(),
            components: fragment.get(CollectionKind::Components).len(),
            slots: fragment.get(CollectionKind::Slots).len(),
            workflows: fragment.get(CollectionKind::Workflows).len(),
        })
        .collect()
}

/// Split a document and lay out its output under `root` without writing.
pub fn plan_split(document: &Document, root: &Path) -> Result<SplitReport> {
    let fragments = split_document(document)?;
    let plan = plan_output(root, document, &fragments)?;
    Ok(SplitReport {
        fragments: summaries(&fragments),
        plan,
    })
}

/// Split a document and write every fragment under `root`.
///
/// Nothing is written when indexing, resolution or the URL check fails.
/// A write failure aborts immediately; earlier files stay on disk.
pub fn split_export<S: FileSink + ?Sized>(
    document: &Document,
    root: &Path,
    sink: &mut S,
) -> Result<SplitReport> {
    let report = plan_split(document, root)?;
    execute_plan(&report.plan, sink)?;

    tracing::info!(
        root = %root.display(),
        fragments = report.fragments.len(),
        files = report.plan.files.len(),
        "Split export"
    );
    Ok(report)
}
