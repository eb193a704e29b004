use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::dom::node::{NodeId, PageDom};
use crate::page::error::PerceptionError;

// ============================================================================
// Selector generation
// ============================================================================

/// Web element selector based on CSS and XPath.
///
/// Built selectors are verbose positional chains; they pin down exactly one
/// element in the tree they were built from but make no promise of surviving
/// page mutation. Ordering prefers shorter css, then lexicographic xpath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub css: String,
    pub xpath: String,
}

impl PartialOrd for Selector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Selector {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.css.len().cmp(&other.css.len()) {
            Ordering::Equal => self.xpath.cmp(&other.xpath),
            ordering => ordering,
        }
    }
}

fn safe_tag_name(name: &str) -> &str {
    if name.contains(':') || name.contains('=') {
        "*"
    } else {
        name
    }
}

/// Compute css and xpath selectors for an element from its ancestor chain.
///
/// Each component carries an `nth-of-type` index only where the tag has
/// same-named element siblings; namespaced or otherwise unsafe tag names are
/// replaced by `*`.
pub fn build(dom: &PageDom, node: NodeId) -> Result<Selector, PerceptionError> {
    if dom.element(node).is_none() {
        return Err(PerceptionError::MissingElement {
            context: format!("Selector::build on node {:?}", node),
        });
    }

    // (tag, index) pairs from the element up to the root; index -1 means the
    // tag is unique among its same-named siblings.
    let mut components: Vec<(String, i64)> = Vec::new();
    let mut child = node;

    loop {
        let tag = match dom.element(child) {
            Some(el) => el.tag.clone(),
            None => break,
        };

        match dom.parent_element(child) {
            Some(parent) => {
                let siblings: Vec<NodeId> = dom
                    .child_elements(parent)
                    .into_iter()
                    .filter(|id| dom.element(*id).is_some_and(|el| el.tag == tag))
                    .collect();
                let index = siblings.iter().position(|id| *id == child).map(|p| p + 1);
                let index = match index {
                    Some(i) if siblings.len() > 1 => i as i64,
                    _ => -1,
                };
                components.push((safe_tag_name(&tag).to_string(), index));
                child = parent;
            }
            None => {
                components.push((safe_tag_name(&tag).to_string(), -1));
                break;
            }
        }
    }

    let css = components
        .iter()
        .rev()
        .map(|(name, index)| {
            if *index == -1 {
                name.clone()
            } else {
                format!("{}:nth-of-type({})", name, index)
            }
        })
        .collect::<Vec<_>>()
        .join(">");

    let xpath_body = components
        .iter()
        .rev()
        .map(|(name, index)| {
            if *index == -1 {
                name.clone()
            } else {
                format!("{}[{}]", name, index)
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    Ok(Selector {
        css,
        xpath: format!("/{}", xpath_body),
    })
}
