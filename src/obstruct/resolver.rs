use std::collections::HashMap;

use crate::dom::node::{NodeId, PageDom};
use crate::obstruct::rect::Rect;
use crate::page::error::PerceptionError;
use crate::page::session::PageSession;
use crate::selector::matcher::{parse, query_first};

// ============================================================================
// Obstruction suppression
// ============================================================================
//
// Before an interaction, transient overlays (cookie banners, sticky headers)
// that cover an interesting element are hidden so visible-interaction logic
// does not trip over them. Hiding is reversible: every touched element gets a
// hide-uid and its prior hidden flag goes into a ledger the caller replays to
// restore the page.

/// Map from hide-uid to the element's hidden flag before suppression.
pub type ObstructionLedger = HashMap<i64, bool>;

fn page_rect(dom: &PageDom, node: NodeId) -> Rect {
    match dom.element(node).and_then(|el| el.layout) {
        Some(layout) => Rect::from_bounding(&layout.rect, dom.scroll_x, dom.scroll_y),
        // Detached or unrendered: a zero box that can never conflict
        None => Rect::new(0.0, 0.0, 0.0, 0.0),
    }
}

/// Hide every element whose on-screen rectangle conflicts with one of the
/// interesting elements.
///
/// An element is hidden iff it overlaps an interesting element with positive
/// area, does not contain any interesting element as a descendant, and is not
/// itself interesting. Returns the restoration ledger.
pub fn suppress_obstructions(
    dom: &mut PageDom,
    session: &mut PageSession,
    interesting: &[NodeId],
) -> ObstructionLedger {
    let mut ledger = ObstructionLedger::new();
    if interesting.is_empty() {
        return ledger;
    }

    let interesting_rects: Vec<Rect> = interesting.iter().map(|id| page_rect(dom, *id)).collect();

    // The root element hosts everything interesting, so it is exempt by the
    // containment rule anyway; skip it outright.
    let candidates: Vec<NodeId> = dom.descendant_elements(dom.root());

    for node in candidates {
        if interesting.contains(&node) {
            continue;
        }

        let rect = page_rect(dom, node);
        let conflicting = interesting_rects
            .iter()
            .any(|interesting_rect| rect.conflicts_with(interesting_rect));
        if !conflicting {
            continue;
        }

        // Don't hide an element that contains an interesting element
        if interesting.iter().any(|target| dom.contains(node, *target)) {
            continue;
        }

        let hide_uid = match dom.element(node).and_then(|el| el.hide_uid) {
            Some(existing) => existing,
            None => {
                let fresh = session.alloc_hide_uid();
                if let Some(el) = dom.element_mut(node) {
                    el.hide_uid = Some(fresh);
                }
                fresh
            }
        };
        session.register_hide_uid(hide_uid, node);

        if let Some(el) = dom.element_mut(node) {
            ledger.insert(hide_uid, el.hidden);
            el.hidden = true;
        }
    }

    ledger
}

/// Replay a ledger, returning every affected element's hidden flag to its
/// pre-suppression value. Consumes the ledger; elements the host page removed
/// in the meantime are skipped.
pub fn restore_obstructions(dom: &mut PageDom, session: &PageSession, ledger: ObstructionLedger) {
    for (hide_uid, was_hidden) in ledger {
        if let Some(node) = session.node_by_hide_uid(dom, hide_uid) {
            if let Some(el) = dom.element_mut(node) {
                el.hidden = was_hidden;
            }
        }
    }
}

/// Resolve CSS selectors to their first matches and suppress obstructions for
/// the resolved set. A selector matching nothing is skipped (empty-result
/// semantics); a selector that fails to parse is caller misuse and fails the
/// whole call.
pub fn suppress_for_selectors(
    dom: &mut PageDom,
    session: &mut PageSession,
    selectors: &[String],
) -> Result<ObstructionLedger, PerceptionError> {
    let mut interesting = Vec::new();
    for selector in selectors {
        let parsed = parse(selector)?;
        if let Some(node) = query_first(dom, &parsed) {
            interesting.push(node);
        }
    }
    Ok(suppress_obstructions(dom, session, &interesting))
}
