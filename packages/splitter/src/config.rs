//! Configuration constants and path derivation for the splitter.

use std::path::{Component, Path, PathBuf};

/// Top-level field holding the (nested) page tree.
pub const ROOT_PAGE_LIST: &str = "rootPageList";

/// Top-level field holding components.
pub const COMPONENT_LIST: &str = "componentList";

/// Top-level field holding slots.
pub const SLOT_LIST: &str = "slotList";

/// Top-level field holding workflows.
pub const WORKFLOW_LIST: &str = "workflowList";

/// Element identifier property.
pub const PROP_ID: &str = "id";

/// Nested pages of a page.
pub const PROP_CHILDREN: &str = "children";

/// Page URL, used to name a fragment's output directory.
pub const PROP_URL: &str = "url";

/// Parent page of a page, slot or workflow.
pub const PROP_PARENT_PAGE_ID: &str = "parentPageId";

/// Parent slot of a component.
pub const PROP_PARENT_SLOT_ID: &str = "parentSlotId";

/// Parent component of a slot.
pub const PROP_PARENT_COMPONENT_ID: &str = "parentComponentId";

/// Owner of a workflow, taken verbatim.
pub const PROP_PARENT_ID: &str = "parentId";

/// Subdirectory of the output root holding fragments that have a URL.
pub const PAGES_DIR: &str = "pages";

/// Output file stem for a fragment's components.
pub const COMPONENTS_FILE: &str = "components";

/// Output file stem for a fragment's slots.
pub const SLOTS_FILE: &str = "slots";

/// Output file stem for a fragment's workflows.
pub const WORKFLOWS_FILE: &str = "workflows";

/// File stem used when a name reduces to nothing, e.g. an empty owner id.
pub const UNNAMED_FILE_STEM: &str = "unnamed";

/// Extension of every output file.
pub const JSON_EXTENSION: &str = "json";

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Derive the default output root for an input file.
///
/// The export is split into a directory named after the input file stem,
/// created in the current working directory.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use uibakery_splitter::config::output_root_for;
///
/// assert_eq!(output_root_for(Path::new("exports/app.json")), PathBuf::from("app"));
/// assert_eq!(output_root_for(Path::new("app")), PathBuf::from("app"));
/// ```
#[must_use]
pub fn output_root_for(input: &Path) -> PathBuf {
    input
        .file_stem()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("export"))
}

/// Map a page URL to a relative path below the `pages` directory.
///
/// Only plain name segments survive: leading slashes, empty segments, `.`
/// and `..` are dropped, so the result never leaves the directory it is
/// joined onto. Returns `None` when nothing usable remains.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use uibakery_splitter::config::url_path;
///
/// assert_eq!(url_path("/orders/list"), Some(PathBuf::from("orders/list")));
/// assert_eq!(url_path("../../etc"), Some(PathBuf::from("etc")));
/// assert_eq!(url_path("/"), None);
/// ```
#[must_use]
pub fn url_path(url: &str) -> Option<PathBuf> {
    let path: PathBuf = url
        .split(['/', '\\'])
        .flat_map(|segment| Path::new(segment).components())
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect();

    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Build `<dir>/<stem>.json`.
#[must_use]
pub fn json_file(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.{JSON_EXTENSION}"))
}
