//! Ownership resolution.
//!
//! Each element kind has its own parent field(s) and its own policy for
//! references that do not resolve:
//!
//! | kind      | parent field(s)                      | unresolved reference |
//! |-----------|--------------------------------------|----------------------|
//! | page      | `parentPageId`                       | error                |
//! | component | `parentSlotId`                       | unowned              |
//! | slot      | `parentPageId`, `parentComponentId`  | error                |
//! | workflow  | `parentPageId`, else `parentId`      | error / verbatim     |
//!
//! Every hop is an index lookup. A walk takes at most one hop per indexed
//! element; a longer walk can only be a reference cycle.

use crate::config::{
    PROP_PARENT_COMPONENT_ID, PROP_PARENT_ID, PROP_PARENT_PAGE_ID, PROP_PARENT_SLOT_ID,
};
use crate::error::{Result, SplitterError};
use crate::index::NodeIndex;
use crate::types::{identifier, string_property, CollectionKind, Element, Owner};

/// One position in a parent chain.
#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    Page(&'a Element),
    Component(&'a Element),
    Slot(&'a Element),
}

/// What a single hop produced: the walk either ends or moves on.
enum Hop<'a> {
    Done(Owner),
    Next(Step<'a>),
}

/// Resolves the owning top-level page of any indexed element.
#[derive(Debug, Clone, Copy)]
pub struct OwnerResolver<'i, 'a> {
    index: &'i NodeIndex<'a>,
}

impl<'i, 'a> OwnerResolver<'i, 'a> {
    #[must_use]
    pub fn new(index: &'i NodeIndex<'a>) -> Self {
        Self { index }
    }

    /// Owner of any element of the given kind.
    pub fn owner_of(&self, kind: CollectionKind, element: &'a Element) -> Result<Owner> {
        match kind {
            CollectionKind::Pages => self.owner_of_page(element),
            CollectionKind::Components => self.owner_of_component(element),
            CollectionKind::Slots => self.owner_of_slot(element),
            CollectionKind::Workflows => self.owner_of_workflow(element),
        }
    }

    /// The root ancestor of a page, following `parentPageId`.
    pub fn owner_of_page(&self, page: &'a Element) -> Result<Owner> {
        self.walk(Step::Page(page))
    }

    /// The owner of a component's slot, or unowned when it has none or the
    /// slot is not part of the export.
    pub fn owner_of_component(&self, component: &'a Element) -> Result<Owner> {
        self.walk(Step::Component(component))
    }

    /// The owner of a slot's page, else of its component, else unowned.
    pub fn owner_of_slot(&self, slot: &'a Element) -> Result<Owner> {
        self.walk(Step::Slot(slot))
    }

    /// The owner of a workflow's page, else its `parentId` taken as is.
    pub fn owner_of_workflow(&self, workflow: &'a Element) -> Result<Owner> {
        if let Some(page_id) = string_property(workflow, PROP_PARENT_PAGE_ID) {
            let page = self.strict(
                CollectionKind::Workflows,
                workflow,
                PROP_PARENT_PAGE_ID,
                CollectionKind::Pages,
                page_id,
            )?;
            return self.owner_of_page(page);
        }

        Ok(string_property(workflow, PROP_PARENT_ID)
            .unwrap_or_default()
            .to_string())
    }

    fn walk(&self, start: Step<'a>) -> Result<Owner> {
        let mut step = start;
        for _ in 0..=self.index.len() {
            match self.hop(step)? {
                Hop::Done(owner) => return Ok(owner),
                Hop::Next(next) => step = next,
            }
        }

        let (collection, element) = match start {
            Step::Page(e) => (CollectionKind::Pages, e),
            Step::Component(e) => (CollectionKind::Components, e),
            Step::Slot(e) => (CollectionKind::Slots, e),
        };
        Err(SplitterError::CyclicReference {
            collection,
            id: identifier(element).unwrap_or_default().to_string(),
        })
    }

    fn hop(&self, step: Step<'a>) -> Result<Hop<'a>> {
        match step {
            Step::Page(page) => match string_property(page, PROP_PARENT_PAGE_ID) {
                None => Ok(Hop::Done(
                    identifier(page).unwrap_or_default().to_string(),
                )),
                Some(parent_id) => self
                    .strict(
                        CollectionKind::Pages,
                        page,
                        PROP_PARENT_PAGE_ID,
                        CollectionKind::Pages,
                        parent_id,
                    )
                    .map(|parent| Hop::Next(Step::Page(parent))),
            },

            Step::Component(component) => {
                let Some(slot_id) = string_property(component, PROP_PARENT_SLOT_ID) else {
                    return Ok(Hop::Done(Owner::new()));
                };
                match self.index.get(CollectionKind::Slots, slot_id) {
                    Some(slot) => Ok(Hop::Next(Step::Slot(slot))),
                    None => {
                        tracing::debug!(
                            component = identifier(component).unwrap_or_default(),
                            slot = slot_id,
                            "Component refers to a slot outside the export, leaving it unowned"
                        );
                        Ok(Hop::Done(Owner::new()))
                    }
                }
            }

            Step::Slot(slot) => {
                if let Some(page_id) = string_property(slot, PROP_PARENT_PAGE_ID) {
                    let page = self.strict(
                        CollectionKind::Slots,
                        slot,
                        PROP_PARENT_PAGE_ID,
                        CollectionKind::Pages,
                        page_id,
                    )?;
                    return Ok(Hop::Next(Step::Page(page)));
                }
                if let Some(component_id) = string_property(slot, PROP_PARENT_COMPONENT_ID) {
                    let component = self.strict(
                        CollectionKind::Slots,
                        slot,
                        PROP_PARENT_COMPONENT_ID,
                        CollectionKind::Components,
                        component_id,
                    )?;
                    return Ok(Hop::Next(Step::Component(component)));
                }
                Ok(Hop::Done(Owner::new()))
            }
        }
    }

    /// Look up a parent that must exist.
    fn strict(
        &self,
        from: CollectionKind,
        element: &Element,
        field: &'static str,
        target_kind: CollectionKind,
        target: &str,
    ) -> Result<&'a Element> {
        self.index
            .get(target_kind, target)
            .ok_or_else(|| SplitterError::DanglingReference {
                collection: from,
                id: identifier(element).unwrap_or_default().to_string(),
                field,
                target: target.to_string(),
            })
    }
}
