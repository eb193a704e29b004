use std::collections::HashMap;

use crate::dom::node::{NodeId, PageDom};

/// Counters and side-tables scoped to one page lifetime.
///
/// The uid and hide-uid sequences are process-wide state in the original
/// design; holding them here means two concurrently perceived pages never
/// collide. A full page reload is modeled by dropping the session.
#[derive(Debug, Default)]
pub struct PageSession {
    /// Last uid handed out. None until first seeded from the tree.
    next_uid: Option<i64>,
    next_hide_uid: i64,
    uid_table: HashMap<i64, NodeId>,
    hide_table: HashMap<i64, NodeId>,
}

impl PageSession {
    pub fn new() -> Self {
        PageSession::default()
    }

    /// Allocate the next uid, lazily seeding the counter from the maximum uid
    /// already present in the tree (-1 when none), so re-running against a
    /// partially annotated tree never collides with earlier assignments.
    pub(crate) fn alloc_uid(&mut self, dom: &PageDom) -> i64 {
        let current = match self.next_uid {
            Some(value) => value,
            None => Self::seed_from(dom),
        };
        let next = current + 1;
        self.next_uid = Some(next);
        next
    }

    fn seed_from(dom: &PageDom) -> i64 {
        dom.elements()
            .iter()
            .filter_map(|id| dom.element(*id).and_then(|el| el.uid))
            .max()
            .unwrap_or(-1)
    }

    pub(crate) fn register_uid(&mut self, uid: i64, node: NodeId) {
        self.uid_table.insert(uid, node);
    }

    /// Look up the backing node for a uid. Stale entries (the host page
    /// replaced the node since it was stamped) resolve to None.
    pub fn node_by_uid(&self, dom: &PageDom, uid: i64) -> Option<NodeId> {
        let id = *self.uid_table.get(&uid)?;
        match dom.element(id) {
            Some(el) if el.uid == Some(uid) => Some(id),
            _ => None,
        }
    }

    pub(crate) fn alloc_hide_uid(&mut self) -> i64 {
        let id = self.next_hide_uid;
        self.next_hide_uid += 1;
        id
    }

    pub(crate) fn register_hide_uid(&mut self, hide_uid: i64, node: NodeId) {
        self.hide_table.insert(hide_uid, node);
    }

    pub fn node_by_hide_uid(&self, dom: &PageDom, hide_uid: i64) -> Option<NodeId> {
        let id = *self.hide_table.get(&hide_uid)?;
        match dom.element(id) {
            Some(el) if el.hide_uid == Some(hide_uid) => Some(id),
            _ => None,
        }
    }
}
