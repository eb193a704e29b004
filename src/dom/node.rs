use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Arena-backed page tree
// ============================================================================
//
// The render tree is owned by the host page; this crate only observes and
// annotates it. `PageDom` is the in-process model of that tree: nodes live in
// an arena and are addressed by `NodeId`, so identity annotations can be kept
// in side-tables without holding references into the tree.

/// Handle to a node in a `PageDom` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Bounding rectangle in viewport coordinates, as reported by the host
/// rendering environment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Offset-box layout values for an element. `has_offset_parent` is false for
/// elements the host reports as having no layout ancestor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub has_offset_parent: bool,
}

/// Layout state of an element at capture time. A detached element has no
/// `LayoutBox` at all; extraction degrades to zeroed geometry for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub rect: BoundingRect,
    pub offset: OffsetBox,
}

impl LayoutBox {
    /// Layout for a normally rendered element where the offset box coincides
    /// with the bounding rectangle.
    pub fn sized(x: f64, y: f64, width: f64, height: f64) -> Self {
        LayoutBox {
            rect: BoundingRect {
                x,
                y,
                width,
                height,
            },
            offset: OffsetBox {
                left: x,
                top: y,
                width,
                height,
                has_offset_parent: true,
            },
        }
    }
}

/// Resolved style signals the perception passes depend on. This is not a CSS
/// cascade; values arrive pre-computed from the host environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub position: String,
    pub overflow_x: String,
    pub overflow_y: String,
    pub background: String,
    pub background_image: String,
    pub font_weight: String,
    pub font_size: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        ComputedStyle {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            position: "static".to_string(),
            overflow_x: "visible".to_string(),
            overflow_y: "visible".to_string(),
            background: String::new(),
            background_image: "none".to_string(),
            font_weight: "400".to_string(),
            font_size: "16px".to_string(),
        }
    }
}

/// One element of the page tree, together with the out-of-band identity
/// annotations this crate stamps onto it.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Current form value (inputs and friends).
    pub value: Option<String>,
    /// The DOM `hidden` flag. The obstruction resolver toggles this.
    pub hidden: bool,
    /// A legacy single-slot click handler (`onclick`) is attached.
    pub has_onclick: bool,
    pub style: ComputedStyle,
    pub layout: Option<LayoutBox>,

    // Identity annotations. Written only by the identity manager and the
    // obstruction resolver respectively.
    pub uid: Option<i64>,
    pub parent_uid: Option<i64>,
    pub hide_uid: Option<i64>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        ElementData {
            tag: tag.to_lowercase(),
            attributes: BTreeMap::new(),
            value: None,
            hidden: false,
            has_onclick: false,
            style: ComputedStyle::default(),
            layout: None,
            uid: None,
            parent_uid: None,
            hide_uid: None,
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_layout(mut self, layout: LayoutBox) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_onclick(mut self) -> Self {
        self.has_onclick = true;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

/// The modeled page: an arena of nodes plus page-level scroll offsets.
#[derive(Debug, Clone)]
pub struct PageDom {
    nodes: Vec<NodeData>,
    root: NodeId,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl PageDom {
    /// Create a page whose root is a fresh element with the given tag.
    pub fn new(root: ElementData) -> Self {
        PageDom {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Element(root),
            }],
            root: NodeId(0),
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    /// Element view of a node; None for text/comment nodes and stale handles.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Nearest ancestor that is an element. Text nodes only ever hang off
    /// elements, so in practice this is the direct parent.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.parent(id);
        while let Some(pid) = cursor {
            if self.element(pid).is_some() {
                return Some(pid);
            }
            cursor = self.parent(pid);
        }
        None
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Direct children that are elements, in document order.
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
            .collect()
    }

    pub fn add_element(&mut self, parent: NodeId, element: ElementData) -> NodeId {
        self.add_node(parent, NodeKind::Element(element))
    }

    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.add_node(parent, NodeKind::Text(text.to_string()))
    }

    pub fn add_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.add_node(parent, NodeKind::Comment(text.to_string()))
    }

    fn add_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            parent_node.children.push(id);
        }
        id
    }

    /// Detach a subtree from its parent, as the host page would when removing
    /// an element. The arena slot stays allocated; the node simply becomes
    /// unreachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        let parent = self.parent(id);
        if let Some(pid) = parent {
            if let Some(parent_node) = self.nodes.get_mut(pid.0) {
                parent_node.children.retain(|c| *c != id);
            }
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
        }
    }

    /// All element nodes reachable from the root, in document (pre-order)
    /// order.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if self.element(id).is_some() {
                out.push(id);
                for child in self.children(id).iter().rev() {
                    stack.push(*child);
                }
            }
        }
        out
    }

    /// Element descendants of `id`, excluding `id` itself, in document order.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.element(current).is_some() {
                out.push(current);
                for child in self.children(current).iter().rev() {
                    stack.push(*child);
                }
            }
        }
        out
    }

    /// True when `descendant` sits somewhere below `ancestor`.
    pub fn contains(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        let mut cursor = self.parent(descendant);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }
}
