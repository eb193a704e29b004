use crate::dom::node::{NodeId, PageDom};
use crate::page::error::PerceptionError;
use crate::page::session::PageSession;

// ============================================================================
// Identity manager
// ============================================================================
//
// Every element observed by the walker gets a uid that survives repeated
// snapshots for as long as the element stays in the tree. Uids are stamped
// onto the element (out-of-band annotation) and mirrored in the session's
// side-table. No other component writes identity fields.

/// Ensure `node` carries a uid, assigning one if needed, and return it.
///
/// Idempotent: an element that already carries a uid is returned unchanged.
/// Assignment stamps the parent chain first, so `parent_uid` always refers to
/// a uid that exists by the time the child's uid does. The root element gets
/// parent uid -1.
pub fn ensure_uid(
    dom: &mut PageDom,
    session: &mut PageSession,
    node: NodeId,
) -> Result<i64, PerceptionError> {
    if dom.element(node).is_none() {
        return Err(PerceptionError::MissingElement {
            context: format!("ensure_uid on node {:?}", node),
        });
    }

    // Collect the unassigned chain from `node` up to the nearest annotated
    // ancestor (or the root), then assign top-down. Keeps parents stamped
    // before children without recursing.
    let mut chain = Vec::new();
    let mut cursor = Some(node);
    while let Some(id) = cursor {
        match dom.element(id) {
            Some(el) if el.uid.is_some() => break,
            Some(_) => {
                chain.push(id);
                cursor = dom.parent_element(id);
            }
            None => {
                cursor = dom.parent_element(id);
            }
        }
    }

    for id in chain.into_iter().rev() {
        let parent_uid = match dom.parent_element(id) {
            Some(pid) => dom
                .element(pid)
                .and_then(|el| el.uid)
                .unwrap_or(-1),
            None => -1,
        };
        let uid = session.alloc_uid(dom);
        if let Some(el) = dom.element_mut(id) {
            el.uid = Some(uid);
            el.parent_uid = Some(parent_uid);
        }
        session.register_uid(uid, id);
    }

    match dom.element(node).and_then(|el| el.uid) {
        Some(uid) => {
            session.register_uid(uid, node);
            Ok(uid)
        }
        None => Err(PerceptionError::MissingElement {
            context: format!("ensure_uid on node {:?}", node),
        }),
    }
}
