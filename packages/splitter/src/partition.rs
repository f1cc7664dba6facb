//! Grouping of all elements by owning top-level page.

use std::collections::VecDeque;

use serde_json::Value;

use crate::error::Result;
use crate::index::{as_element, children, NodeIndex};
use crate::resolver::OwnerResolver;
use crate::types::{CollectionKind, Document, Fragments};

/// Split a document into fragments keyed by owner.
///
/// Pages are visited breadth-first, children included; each page is stored
/// as it appears in the export, so a fragment's root pages still carry their
/// nested `children`. Components, slots and workflows are visited in input
/// order. Owners without elements never get a fragment.
pub fn partition<'a>(document: &'a Document, index: &NodeIndex<'a>) -> Result<Fragments<'a>> {
    let resolver = OwnerResolver::new(index);
    let mut fragments = Fragments::new();

    let mut queue: VecDeque<&'a Value> =
        document.collection(CollectionKind::Pages).iter().collect();
    let mut position = 0;
    while let Some(entry) = queue.pop_front() {
        let page = as_element(CollectionKind::Pages, position, entry)?;
        let owner = resolver.owner_of_page(page)?;
        fragments
            .entry(owner)
            .or_default()
            .push(CollectionKind::Pages, entry);
        queue.extend(children(page));
        position += 1;
    }

    for kind in [
        CollectionKind::Slots,
        CollectionKind::Components,
        CollectionKind::Workflows,
    ] {
        for (position, entry) in document.collection(kind).iter().enumerate() {
            let element = as_element(kind, position, entry)?;
            let owner = resolver.owner_of(kind, element)?;
            fragments.entry(owner).or_default().push(kind, entry);
        }
    }

    tracing::debug!(fragments = fragments.len(), "Partitioned export");
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplitterError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    /// Partition and convert to plain JSON for comparison.
    fn split(value: Value) -> Result<BTreeMap<String, Value>> {
        let doc = Document::from_value(value)?;
        let index = NodeIndex::build(&doc)?;
        let fragments = partition(&doc, &index)?;
        Ok(fragments
            .into_iter()
            .map(|(owner, fragment)| {
                let fields = fragment
                    .collections()
                    .map(|(kind, items)| {
                        let items = items.iter().map(|item| (*item).clone()).collect();
                        (kind.field_name().to_string(), Value::Array(items))
                    })
                    .collect();
                (owner, Value::Object(fields))
            })
            .collect())
    }

    fn expected(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(owner, value)| ((*owner).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_pages() {
        let got = split(json!({
            "rootPageList": [{ "id": "1" }, { "id": "2" }, { "id": "3", "parentPageId": "1" }]
        }))
        .unwrap();

        assert_eq!(
            got,
            expected(&[
                (
                    "1",
                    json!({ "rootPageList": [{ "id": "1" }, { "id": "3", "parentPageId": "1" }] })
                ),
                ("2", json!({ "rootPageList": [{ "id": "2" }] })),
            ])
        );
    }

    #[test]
    fn test_components() {
        let got = split(json!({
            "rootPageList": [{ "id": "1" }, { "id": "2" }],
            "componentList": [{ "id": "11", "parentSlotId": "21" }],
            "slotList": [{ "id": "21", "parentPageId": "1" }]
        }))
        .unwrap();

        assert_eq!(
            got,
            expected(&[
                (
                    "1",
                    json!({
                        "rootPageList": [{ "id": "1" }],
                        "componentList": [{ "id": "11", "parentSlotId": "21" }],
                        "slotList": [{ "id": "21", "parentPageId": "1" }]
                    })
                ),
                ("2", json!({ "rootPageList": [{ "id": "2" }] })),
            ])
        );
    }

    #[test]
    fn test_components_chained() {
        let got = split(json!({
            "rootPageList": [{ "id": "1" }],
            "componentList": [
                { "id": "11", "parentSlotId": "21" },
                { "id": "12", "parentSlotId": "22" },
                { "id": "13", "parentSlotId": "23" }
            ],
            "slotList": [
                { "id": "21", "parentPageId": "1" },
                { "id": "22", "parentComponentId": "11" },
                { "id": "23", "parentComponentId": "12" }
            ]
        }))
        .unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got["1"]["componentList"].as_array().unwrap().len(), 3);
        assert_eq!(got["1"]["slotList"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_unexisting_page_id() {
        let err = split(json!({
            "rootPageList": [{ "id": "1" }],
            "componentList": [{ "id": "11", "parentSlotId": "21" }],
            "slotList": [{ "id": "21", "parentPageId": "2" }]
        }))
        .unwrap_err();
        assert!(matches!(err, SplitterError::DanglingReference { .. }));
    }

    #[test]
    fn test_broken_chain() {
        let got = split(json!({
            "rootPageList": [{ "id": "1" }],
            "componentList": [{ "id": "11", "parentSlotId": "21" }],
            "slotList": [{ "id": "22", "parentPageId": "1" }]
        }))
        .unwrap();

        assert_eq!(
            got,
            expected(&[
                (
                    "",
                    json!({ "componentList": [{ "id": "11", "parentSlotId": "21" }] })
                ),
                (
                    "1",
                    json!({
                        "rootPageList": [{ "id": "1" }],
                        "slotList": [{ "id": "22", "parentPageId": "1" }]
                    })
                ),
            ])
        );
    }

    #[test]
    fn test_node_expected() {
        let err = split(json!({
            "rootPageList": [{ "id": "1" }, { "id": "2" }],
            "componentList": [{ "id": "11", "parentSlotId": "21" }],
            "slotList": [1, { "id": "21", "parentPageId": "1" }]
        }))
        .unwrap_err();
        assert!(matches!(err, SplitterError::NotAnElement { .. }));
    }

    #[test]
    fn test_list_not_valid() {
        let got = split(json!({
            "rootPageList": [{ "id": "1" }, { "id": "2" }],
            "componentList": [{ "id": "11", "parentSlotId": "21" }],
            "slotList": 1
        }))
        .unwrap();

        assert_eq!(
            got,
            expected(&[
                (
                    "",
                    json!({ "componentList": [{ "id": "11", "parentSlotId": "21" }] })
                ),
                ("1", json!({ "rootPageList": [{ "id": "1" }] })),
                ("2", json!({ "rootPageList": [{ "id": "2" }] })),
            ])
        );
    }

    #[test]
    fn test_nested_pages_keep_children_and_appear_once_each() {
        let got = split(json!({
            "rootPageList": [
                { "id": "1", "children": [{ "id": "2", "parentPageId": "1" }] }
            ]
        }))
        .unwrap();

        assert_eq!(
            got,
            expected(&[(
                "1",
                json!({
                    "rootPageList": [
                        { "id": "1", "children": [{ "id": "2", "parentPageId": "1" }] },
                        { "id": "2", "parentPageId": "1" }
                    ]
                })
            )])
        );
    }

    #[test]
    fn test_workflows_by_parent_id() {
        let got = split(json!({
            "rootPageList": [{ "id": "1" }],
            "workflowList": [
                { "id": "31", "parentPageId": "1" },
                { "id": "32", "parentId": "elsewhere" },
                { "id": "33" }
            ]
        }))
        .unwrap();

        assert_eq!(
            got,
            expected(&[
                ("", json!({ "workflowList": [{ "id": "33" }] })),
                (
                    "1",
                    json!({
                        "rootPageList": [{ "id": "1" }],
                        "workflowList": [{ "id": "31", "parentPageId": "1" }]
                    })
                ),
                (
                    "elsewhere",
                    json!({ "workflowList": [{ "id": "32", "parentId": "elsewhere" }] })
                ),
            ])
        );
    }

    #[test]
    fn test_partition_is_total() {
        let doc = Document::from_value(json!({
            "rootPageList": [
                { "id": "1", "children": [{ "id": "4", "parentPageId": "1" }] },
                { "id": "2" },
                { "id": "3", "parentPageId": "2" }
            ],
            "componentList": [
                { "id": "11", "parentSlotId": "21" },
                { "id": "12" },
                { "id": "13", "parentSlotId": "missing" }
            ],
            "slotList": [
                { "id": "21", "parentPageId": "4" },
                { "id": "22", "parentComponentId": "11" },
                { "id": "23" }
            ],
            "workflowList": [{ "id": "31", "parentPageId": "3" }, { "id": "32" }]
        }))
        .unwrap();
        let index = NodeIndex::build(&doc).unwrap();
        let fragments = partition(&doc, &index).unwrap();

        for kind in CollectionKind::ALL {
            let mut seen: Vec<&str> = fragments
                .values()
                .flat_map(|fragment| fragment.get(kind))
                .map(|element| element["id"].as_str().unwrap())
                .collect();
            seen.sort_unstable();
            let mut indexed: Vec<&str> = index.table(kind).keys().copied().collect();
            indexed.sort_unstable();
            assert_eq!(seen, indexed, "{kind} must be partitioned exactly once");
        }
        assert!(fragments.values().all(|fragment| !fragment.is_empty()));
    }
}
