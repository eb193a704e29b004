use std::collections::HashSet;

use crate::active::visibility::{is_hidden, is_hidden_by_overflow};
use crate::dom::node::{NodeId, PageDom};
use crate::listeners::registry::ListenerRegistry;
use crate::snapshot::walker::hides_subtree;

// ============================================================================
// Interactivity classification
// ============================================================================

/// Input `type` values that behave like buttons.
const BUTTON_INPUT_TYPES: [&str; 4] = ["button", "submit", "reset", "image"];

/// Structural container tags that are never directly clickable.
const UNCLICKABLE_TAGS: [&str; 4] = ["form", "body", "nav", "aside"];

/// Tags the automation layer treats a priori as interactable when building
/// the input-candidate set.
const INTERACTABLE_TAGS: [&str; 5] = ["a", "button", "select", "input", "label"];

fn is_button_input_type(value: &str) -> bool {
    BUTTON_INPUT_TYPES.contains(&value)
}

/// All elements whose tag is a priori interactable (inputs, anchors, labels).
/// Callers pass this as the input-candidate set.
pub fn interactable_inputs(dom: &PageDom) -> HashSet<NodeId> {
    dom.elements()
        .into_iter()
        .filter(|id| {
            dom.element(*id)
                .is_some_and(|el| INTERACTABLE_TAGS.contains(&el.tag.as_str()))
        })
        .collect()
}

/// Decide whether the automation layer should treat `node` as actionable.
///
/// The rules run in a fixed order and the first match decides. Candidate-set
/// membership is tested before the structural deny-list, so an externally
/// detected listener can override a tag exclusion.
pub fn is_active(
    dom: &PageDom,
    node: NodeId,
    inputs: &HashSet<NodeId>,
    listeners: &HashSet<NodeId>,
) -> bool {
    let Some(el) = dom.element(node) else {
        return false;
    };
    let tag = el.tag.as_str();

    // EXPLICIT EXCLUSION RULES

    // Invisible/inaccessible elements can't be clickable
    if is_hidden(dom, node) {
        return false;
    }

    // Never observed by the walker, so it has no identity to report
    if el.uid.is_none() {
        return false;
    }

    // Nothing on this page is considered a priori interactable
    if inputs.is_empty() && listeners.is_empty() {
        return false;
    }

    if inputs.contains(&node) || listeners.contains(&node) {
        return true;
    }

    if UNCLICKABLE_TAGS.contains(&tag) {
        return false;
    }

    // Consciously exclude the non-button inputs (forms etc.)
    if tag == "input" {
        if let Some(type_attr) = el.attr("type") {
            if !is_button_input_type(type_attr) {
                return false;
            }
        }
    }

    // ELEMENT INCLUSION RULES

    // Legacy single-slot click handler
    if el.has_onclick {
        return true;
    }

    if tag == "button" {
        return true;
    }

    if tag == "input" && el.attr("type").is_some_and(is_button_input_type) {
        return true;
    }

    if tag == "a" && el.attr("href").is_some() {
        return true;
    }

    false
}

/// Collect the uids of all currently actionable elements, in document order.
///
/// Walks the tree pre-order, skipping `aria-hidden` subtrees and children
/// clipped away by the overflow heuristic. Classification runs over the
/// already-identified tree; elements the walker never observed carry no uid
/// and are excluded by rule.
pub fn find_active_elements(dom: &PageDom, registry: &ListenerRegistry) -> Vec<i64> {
    let inputs = interactable_inputs(dom);
    let listeners = registry.nodes_with_any_listener();

    let mut result = Vec::new();
    let mut to_visit = vec![dom.root()];

    while let Some(node) = to_visit.pop() {
        let uid = dom.element(node).and_then(|el| el.uid);
        if let Some(uid) = uid {
            if is_active(dom, node, &inputs, &listeners) {
                result.push(uid);
            }
        }

        // "aria-hidden" hides the entire subtree
        if hides_subtree(dom, node) {
            continue;
        }

        for child in dom.child_elements(node).into_iter().rev() {
            if !is_hidden_by_overflow(dom, child) {
                to_visit.push(child);
            }
        }
    }

    result
}
