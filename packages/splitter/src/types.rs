//! Core data types for the splitter.
//!
//! Elements are kept as raw JSON objects: the splitter only reads the few
//! properties it needs for ownership resolution and re-serializes everything
//! else untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::config::{
    COMPONENT_LIST, PROP_ID, PROP_URL, ROOT_PAGE_LIST, SLOT_LIST, WORKFLOW_LIST,
};
use crate::error::{Result, SplitterError};

/// A single exported node: a JSON object with named properties.
pub type Element = Map<String, Value>;

/// Identifier of the top-level page owning an element. Empty means unowned.
pub type Owner = String;

/// The four recognized collections of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollectionKind {
    /// `rootPageList`: pages, possibly nesting other pages under `children`.
    Pages,

    /// `componentList`: flat list of components.
    Components,

    /// `slotList`: flat list of slots.
    Slots,

    /// `workflowList`: flat list of workflows.
    Workflows,
}

impl CollectionKind {
    /// All kinds, in output order.
    pub const ALL: [Self; 4] = [Self::Pages, Self::Components, Self::Slots, Self::Workflows];

    /// Top-level field name of this collection in the export document.
    #[must_use]
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Pages => ROOT_PAGE_LIST,
            Self::Components => COMPONENT_LIST,
            Self::Slots => SLOT_LIST,
            Self::Workflows => WORKFLOW_LIST,
        }
    }

    /// Look up a kind by its top-level field name.
    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field_name() == name)
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A decoded export document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Wrap a decoded JSON value. The top level must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(SplitterError::InvalidDocument(format!(
                "top-level value must be an object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Decode a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Entries of a recognized collection.
    ///
    /// A missing field, or a field that is not an array, yields no entries.
    #[must_use]
    pub fn collection(&self, kind: CollectionKind) -> &[Value] {
        match self.fields.get(kind.field_name()) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// JSON type of a recognized field that is present but not an array.
    #[must_use]
    pub fn malformed_collection(&self, kind: CollectionKind) -> Option<&'static str> {
        match self.fields.get(kind.field_name()) {
            Some(Value::Array(_)) | None => None,
            Some(other) => Some(json_type_name(other)),
        }
    }

    /// Top-level arrays that are not one of the recognized collections.
    pub fn pass_through(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.fields.iter().filter_map(|(name, value)| {
            if CollectionKind::from_field_name(name).is_some() {
                return None;
            }
            match value {
                Value::Array(items) => Some((name.as_str(), items.as_slice())),
                _ => None,
            }
        })
    }
}

/// One output unit: the elements attributed to a single owner.
///
/// Collections are only created on first push, so a fragment never holds an
/// empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment<'a> {
    collections: BTreeMap<CollectionKind, Vec<&'a Value>>,
}

impl<'a> Fragment<'a> {
    /// Create an empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to one of the collections.
    pub fn push(&mut self, kind: CollectionKind, element: &'a Value) {
        self.collections.entry(kind).or_default().push(element);
    }

    /// Elements of one collection, empty if the fragment has none.
    #[must_use]
    pub fn get(&self, kind: CollectionKind) -> &[&'a Value] {
        self.collections.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Collections with at least one element, in output order.
    pub fn collections(&self) -> impl Iterator<Item = (CollectionKind, &[&'a Value])> {
        self.collections
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(kind, items)| (*kind, items.as_slice()))
    }

    /// Total number of elements across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first non-empty `url` among the fragment's top-level pages.
    ///
    /// Nested `children` are not inspected.
    #[must_use]
    pub fn url(&self) -> Option<&'a str> {
        self.get(CollectionKind::Pages)
            .iter()
            .copied()
            .filter_map(Value::as_object)
            .find_map(|page| string_property(page, PROP_URL))
    }
}

/// All fragments of a run, keyed by owner.
pub type Fragments<'a> = BTreeMap<Owner, Fragment<'a>>;

/// Read a string property, treating empty strings and non-strings as absent.
#[must_use]
pub fn string_property<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Read the `id` property. Any string is accepted, including an empty one.
#[must_use]
pub fn identifier(element: &Element) -> Option<&str> {
    element.get(PROP_ID).and_then(Value::as_str)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
