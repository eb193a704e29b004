use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::node::{NodeId, NodeKind, PageDom};

// ============================================================================
// Element metadata records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordSize {
    pub width: f64,
    pub height: f64,
}

/// Top-left position in page coordinates (viewport position plus scroll).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordLocation {
    pub x: f64,
    pub y: f64,
}

/// One element's snapshot: geometry, visual state and content at a point in
/// time. Recomputed on every snapshot pass; never retained between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub uid: i64,
    pub parent_uid: i64,
    pub id: Option<String>,
    pub tag: String,
    pub class: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub r#type: Option<String>,
    pub href: Option<String>,
    pub size: RecordSize,
    pub location: RecordLocation,
    pub text: String,
    pub text_local: String,
    pub children_count: usize,
    pub num_imgs: usize,
    pub num_svgs: usize,
    pub background: String,
    pub background_image: String,
    pub fixed_pos: bool,
    pub display: String,
    pub visibility: String,
    pub font_weight: String,
    pub font_size: String,
}

/// Build the record for a single element. Geometry and style are best-effort:
/// a detached node yields zeroed geometry rather than failing the snapshot.
/// The element must already carry identity annotations.
pub fn extract_record(dom: &PageDom, node: NodeId) -> Option<ElementRecord> {
    let el = dom.element(node)?;

    let (size, location) = match el.layout {
        Some(layout) => (
            RecordSize {
                width: layout.rect.width,
                height: layout.rect.height,
            },
            RecordLocation {
                x: layout.rect.x + dom.scroll_x,
                y: layout.rect.y + dom.scroll_y,
            },
        ),
        None => (RecordSize::default(), RecordLocation::default()),
    };

    let text = if el.tag == "input" {
        el.value.clone().unwrap_or_default()
    } else {
        inner_text(dom, node)
    };

    let (num_imgs, num_svgs) = image_counts(dom, node);

    Some(ElementRecord {
        uid: el.uid.unwrap_or(-1),
        parent_uid: el.parent_uid.unwrap_or(-1),
        id: el.attr("id").map(str::to_string),
        tag: el.tag.clone(),
        class: el.attr("class").map(str::to_string),
        attributes: el.attributes.clone(),
        r#type: el.attr("type").map(str::to_string),
        href: el.attr("href").map(str::to_string),
        size,
        location,
        text,
        text_local: local_text(dom, node),
        children_count: dom.child_elements(node).len(),
        num_imgs,
        num_svgs,
        background: el.style.background.clone(),
        background_image: el.style.background_image.clone(),
        fixed_pos: is_fixed_position(dom, node),
        display: el.style.display.clone(),
        visibility: el.style.visibility.clone(),
        font_weight: el.style.font_weight.clone(),
        font_size: el.style.font_size.clone(),
    })
}

/// Text contributed by the whole subtree, whitespace-collapsed.
fn inner_text(dom: &PageDom, node: NodeId) -> String {
    let mut chunks = Vec::new();
    let mut stack: Vec<NodeId> = dom.children(node).iter().rev().copied().collect();
    while let Some(current) = stack.pop() {
        match dom.node(current).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            }
            Some(NodeKind::Element(_)) => {
                for child in dom.children(current).iter().rev() {
                    stack.push(*child);
                }
            }
            _ => {}
        }
    }
    chunks.join(" ")
}

/// Text contributed directly by this element's own text-node children,
/// excluding descendant elements' text.
fn local_text(dom: &PageDom, node: NodeId) -> String {
    let mut joined = String::new();
    for child in dom.children(node) {
        if let Some(NodeKind::Text(text)) = dom.node(*child).map(|n| &n.kind) {
            joined.push_str(text);
        }
    }
    joined.trim().to_string()
}

/// Counts of image-like and vector-like content below (and, for svg, at)
/// this element. An `img` whose src ends in `.svg` counts as a vector.
fn image_counts(dom: &PageDom, node: NodeId) -> (usize, usize) {
    let mut imgs = 0usize;
    let mut svg_imgs = 0usize;
    let mut svgs = 0usize;

    for id in dom.descendant_elements(node) {
        let Some(el) = dom.element(id) else { continue };
        match el.tag.as_str() {
            "img" => {
                imgs += 1;
                if el.attr("src").is_some_and(|src| src.ends_with(".svg")) {
                    svg_imgs += 1;
                }
            }
            "svg" => svgs += 1,
            _ => {}
        }
    }

    let self_svg = dom
        .element(node)
        .is_some_and(|el| el.tag == "svg") as usize;

    (imgs - svg_imgs, svgs + svg_imgs + self_svg)
}

/// True when this element or any ancestor is positioned fixed or sticky.
/// Checking only the element's own computed position is not enough; a child
/// of a fixed header scrolls with it.
pub fn is_fixed_position(dom: &PageDom, node: NodeId) -> bool {
    let mut cursor = Some(node);
    while let Some(id) = cursor {
        if let Some(el) = dom.element(id) {
            if el.style.position == "fixed" || el.style.position == "sticky" {
                return true;
            }
        }
        cursor = dom.parent_element(id);
    }
    false
}
