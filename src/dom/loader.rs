use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::dom::node::{
    BoundingRect, ComputedStyle, ElementData, LayoutBox, NodeId, OffsetBox, PageDom,
};
use crate::listeners::registry::ListenerRegistry;
use crate::page::error::PerceptionError;

// ============================================================================
// Page capture loading
// ============================================================================
//
// A capture is one JSON document produced by host-side extraction tooling: the
// rendered tree with per-element attributes, computed-style signals, layout
// boxes and tracked listeners, plus page scroll offsets. Loading it is the
// crate's consumed interface to the host rendering environment.

#[derive(Debug, Deserialize)]
pub struct PageCapture {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub scroll: CapturedScroll,
    pub root: CapturedElement,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct CapturedScroll {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// One node of the captured tree: a bare string is a text node.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CapturedNode {
    Text(String),
    Element(Box<CapturedElement>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedElement {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: CapturedStyle,
    #[serde(default)]
    pub rect: Option<BoundingRect>,
    #[serde(default)]
    pub offset: Option<CapturedOffset>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub has_onclick: bool,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub listeners: Vec<String>,
    #[serde(default)]
    pub children: Vec<CapturedNode>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedOffset {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_true")]
    pub has_offset_parent: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedStyle {
    #[serde(default = "default_display")]
    pub display: String,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default = "default_overflow")]
    pub overflow_x: String,
    #[serde(default = "default_overflow")]
    pub overflow_y: String,
    #[serde(default)]
    pub background: String,
    #[serde(default = "default_background_image")]
    pub background_image: String,
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    #[serde(default = "default_font_size")]
    pub font_size: String,
}

impl Default for CapturedStyle {
    fn default() -> Self {
        CapturedStyle {
            display: default_display(),
            visibility: default_visibility(),
            position: default_position(),
            overflow_x: default_overflow(),
            overflow_y: default_overflow(),
            background: String::new(),
            background_image: default_background_image(),
            font_weight: default_font_weight(),
            font_size: default_font_size(),
        }
    }
}

// Serde default helpers
fn default_true() -> bool { true }
fn default_display() -> String { "block".to_string() }
fn default_visibility() -> String { "visible".to_string() }
fn default_position() -> String { "static".to_string() }
fn default_overflow() -> String { "visible".to_string() }
fn default_background_image() -> String { "none".to_string() }
fn default_font_weight() -> String { "400".to_string() }
fn default_font_size() -> String { "16px".to_string() }

/// A capture materialized into the page model plus its listener bookkeeping.
#[derive(Debug)]
pub struct LoadedPage {
    pub dom: PageDom,
    pub registry: ListenerRegistry,
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Read and materialize a capture file.
pub fn load_capture(path: &Path) -> Result<LoadedPage, PerceptionError> {
    let content = std::fs::read_to_string(path).map_err(|e| PerceptionError::CaptureIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_capture(&content)
}

/// Materialize a capture from its JSON text.
pub fn parse_capture(json: &str) -> Result<LoadedPage, PerceptionError> {
    let capture: PageCapture =
        serde_json::from_str(json).map_err(|e| PerceptionError::CaptureFormat {
            context: "page capture".to_string(),
            source: e,
        })?;

    let PageCapture {
        url,
        title,
        scroll,
        root,
    } = capture;

    let mut registry = ListenerRegistry::new();
    let (root_element, root_listeners, root_children) = materialize_element(root);

    let mut dom = PageDom::new(root_element);
    dom.scroll_x = scroll.x;
    dom.scroll_y = scroll.y;

    let root = dom.root();
    for event in &root_listeners {
        registry.register(root, event);
    }

    // LIFO worklist with children pushed in reverse keeps siblings in
    // document order.
    let mut worklist: Vec<(NodeId, CapturedNode)> = Vec::new();
    for child in root_children.into_iter().rev() {
        worklist.push((root, child));
    }

    while let Some((parent, node)) = worklist.pop() {
        match node {
            CapturedNode::Text(text) => {
                dom.add_text(parent, &text);
            }
            CapturedNode::Element(element) => {
                let (data, listeners, children) = materialize_element(*element);
                let id = dom.add_element(parent, data);
                for event in &listeners {
                    registry.register(id, event);
                }
                for child in children.into_iter().rev() {
                    worklist.push((id, child));
                }
            }
        }
    }

    Ok(LoadedPage {
        dom,
        registry,
        url,
        title,
    })
}

fn materialize_element(captured: CapturedElement) -> (ElementData, Vec<String>, Vec<CapturedNode>) {
    let layout = match (captured.rect, captured.offset) {
        (Some(rect), Some(offset)) => Some(LayoutBox {
            rect,
            offset: OffsetBox {
                left: offset.left,
                top: offset.top,
                width: offset.width,
                height: offset.height,
                has_offset_parent: offset.has_offset_parent,
            },
        }),
        // Offset box defaults to the bounding rect when the capture omits it
        (Some(rect), None) => Some(LayoutBox {
            rect,
            offset: OffsetBox {
                left: rect.x,
                top: rect.y,
                width: rect.width,
                height: rect.height,
                has_offset_parent: true,
            },
        }),
        (None, _) => None,
    };

    let data = ElementData {
        tag: captured.tag.to_lowercase(),
        attributes: captured.attributes,
        value: captured.value,
        hidden: captured.hidden,
        has_onclick: captured.has_onclick,
        style: ComputedStyle {
            display: captured.style.display,
            visibility: captured.style.visibility,
            position: captured.style.position,
            overflow_x: captured.style.overflow_x,
            overflow_y: captured.style.overflow_y,
            background: captured.style.background,
            background_image: captured.style.background_image,
            font_weight: captured.style.font_weight,
            font_size: captured.style.font_size,
        },
        layout,
        uid: None,
        parent_uid: None,
        hide_uid: None,
    };

    (data, captured.listeners, captured.children)
}
