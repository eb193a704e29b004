use crate::dom::node::{NodeId, PageDom};
use crate::identity::manager::ensure_uid;
use crate::page::error::PerceptionError;
use crate::page::session::PageSession;
use crate::snapshot::record::{extract_record, ElementRecord};

// ============================================================================
// Tree walker
// ============================================================================

/// Whether this element hides its entire subtree from assistive technology.
pub fn hides_subtree(dom: &PageDom, node: NodeId) -> bool {
    dom.element(node)
        .is_some_and(|el| el.attr("aria-hidden") == Some("true"))
}

/// Walk the page and produce one record per visited element: the root first,
/// then a depth-first pre-order pass over its descendants in document order.
///
/// Identity is ensured for every visited element, so repeated snapshots of an
/// unchanged tree yield identical uids. An element marked `aria-hidden=true`
/// is itself recorded but its descendants are never visited. Text and comment
/// nodes are skipped.
pub fn snapshot(
    dom: &mut PageDom,
    session: &mut PageSession,
) -> Result<Vec<ElementRecord>, PerceptionError> {
    let root = dom.root();
    ensure_uid(dom, session, root)?;

    let mut records = Vec::new();
    if let Some(record) = extract_record(dom, root) {
        records.push(record);
    }

    // Explicit stack, children pushed in reverse so they pop in document
    // order. Bounds stack depth on pathologically deep trees.
    let mut to_visit: Vec<NodeId> = Vec::new();
    if !hides_subtree(dom, root) {
        for child in dom.child_elements(root).into_iter().rev() {
            to_visit.push(child);
        }
    }

    while let Some(node) = to_visit.pop() {
        ensure_uid(dom, session, node)?;
        if let Some(record) = extract_record(dom, node) {
            records.push(record);
        }

        if hides_subtree(dom, node) {
            continue;
        }
        for child in dom.child_elements(node).into_iter().rev() {
            to_visit.push(child);
        }
    }

    Ok(records)
}
