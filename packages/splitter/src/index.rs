//! Identifier index over the four collections of an export.
//!
//! The index borrows from the [`Document`]: every entry points at the
//! element as it appears in the export, nested pages included. Nothing is
//! moved out of its parent's `children` array.

use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use crate::config::PROP_CHILDREN;
use crate::error::{Result, SplitterError};
use crate::types::{identifier, CollectionKind, Document, Element};

/// Lookup table from identifier to element for one collection.
pub type ElementsById<'a> = HashMap<&'a str, &'a Element>;

/// Read-only lookup tables built once per run.
#[derive(Debug, Default)]
pub struct NodeIndex<'a> {
    pub pages: ElementsById<'a>,
    pub components: ElementsById<'a>,
    pub slots: ElementsById<'a>,
    pub workflows: ElementsById<'a>,
}

impl<'a> NodeIndex<'a> {
    /// Index every element of the document.
    ///
    /// Pages are flattened through their `children`; the other collections
    /// are flat. A duplicate identifier replaces the earlier entry.
    pub fn build(document: &'a Document) -> Result<Self> {
        let mut index = Self::default();

        for kind in CollectionKind::ALL {
            if let Some(found) = document.malformed_collection(kind) {
                tracing::warn!(
                    collection = %kind,
                    found,
                    "Recognized collection is not an array, ignoring it"
                );
            }

            let entries = document.collection(kind);
            match kind {
                CollectionKind::Pages => index_pages(entries, &mut index.pages)?,
                _ => index_flat(kind, entries, index.table_mut(kind))?,
            }
        }

        tracing::debug!(
            pages = index.pages.len(),
            components = index.components.len(),
            slots = index.slots.len(),
            workflows = index.workflows.len(),
            "Built node index"
        );

        Ok(index)
    }

    /// The lookup table for one collection.
    #[must_use]
    pub fn table(&self, kind: CollectionKind) -> &ElementsById<'a> {
        match kind {
            CollectionKind::Pages => &self.pages,
            CollectionKind::Components => &self.components,
            CollectionKind::Slots => &self.slots,
            CollectionKind::Workflows => &self.workflows,
        }
    }

    fn table_mut(&mut self, kind: CollectionKind) -> &mut ElementsById<'a> {
        match kind {
            CollectionKind::Pages => &mut self.pages,
            CollectionKind::Components => &mut self.components,
            CollectionKind::Slots => &mut self.slots,
            CollectionKind::Workflows => &mut self.workflows,
        }
    }

    /// Look up an element by identifier.
    #[must_use]
    pub fn get(&self, kind: CollectionKind, id: &str) -> Option<&'a Element> {
        self.table(kind).get(id).copied()
    }

    /// Total number of indexed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        CollectionKind::ALL
            .iter()
            .map(|kind| self.table(*kind).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cast an array entry to an element.
///
/// `position` is the entry's index in the breadth-first order used for
/// error reporting.
pub(crate) fn as_element(
    kind: CollectionKind,
    position: usize,
    entry: &Value,
) -> Result<&Element> {
    entry
        .as_object()
        .ok_or(SplitterError::NotAnElement {
            collection: kind,
            position,
        })
}

fn insert<'a>(
    kind: CollectionKind,
    position: usize,
    element: &'a Element,
    into: &mut ElementsById<'a>,
) -> Result<()> {
    let id = identifier(element).ok_or(SplitterError::MissingIdentifier {
        collection: kind,
        position,
    })?;

    if into.insert(id, element).is_some() {
        tracing::warn!(
            collection = %kind,
            id,
            "Duplicate identifier, keeping the last occurrence"
        );
    }
    Ok(())
}

fn index_flat<'a>(
    kind: CollectionKind,
    entries: &'a [Value],
    into: &mut ElementsById<'a>,
) -> Result<()> {
    for (position, entry) in entries.iter().enumerate() {
        let element = as_element(kind, position, entry)?;
        insert(kind, position, element, into)?;
    }
    Ok(())
}

/// Flatten the page tree with an explicit queue.
fn index_pages<'a>(entries: &'a [Value], into: &mut ElementsById<'a>) -> Result<()> {
    let mut queue: VecDeque<&'a Value> = entries.iter().collect();
    let mut position = 0;

    while let Some(entry) = queue.pop_front() {
        let element = as_element(CollectionKind::Pages, position, entry)?;
        insert(CollectionKind::Pages, position, element, into)?;
        queue.extend(children(element));
        position += 1;
    }
    Ok(())
}

/// Nested pages of a page; a missing or non-array `children` has none.
pub(crate) fn children(page: &Element) -> &[Value] {
    match page.get(PROP_CHILDREN) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}
