use crate::dom::node::{NodeId, PageDom};

// ============================================================================
// Visibility heuristics
// ============================================================================

/// Whether the element is currently invisible or inaccessible: no layout box,
/// zero rendered size, hidden/collapsed styles, the `hidden` flag, or
/// `aria-hidden`. Non-elements count as hidden.
pub fn is_hidden(dom: &PageDom, node: NodeId) -> bool {
    let Some(el) = dom.element(node) else {
        return true;
    };

    let Some(layout) = el.layout else {
        return true;
    };

    !layout.offset.has_offset_parent
        || layout.offset.width == 0.0
        || layout.offset.height == 0.0
        || layout.rect.width == 0.0
        || layout.rect.height == 0.0
        || el.style.visibility == "hidden"
        || el.style.display == "none"
        || el.hidden
        || el.attr("aria-hidden") == Some("true")
}

/// Best-effort check for a child clipped away by its parent's overflow
/// handling. A child the same size as its parent is exempt; otherwise the
/// child must start inside the parent's box on every axis whose overflow is
/// not `visible`. Does not handle scroll-clipped siblings in general.
pub fn is_hidden_by_overflow(dom: &PageDom, child: NodeId) -> bool {
    let Some(child_el) = dom.element(child) else {
        return false;
    };
    let Some(parent) = dom.parent_element(child) else {
        return false;
    };
    let Some(parent_el) = dom.element(parent) else {
        return false;
    };

    let (Some(child_layout), Some(parent_layout)) = (child_el.layout, parent_el.layout) else {
        return false;
    };

    if child_layout.offset.width == parent_layout.offset.width
        && child_layout.offset.height == parent_layout.offset.height
    {
        return false;
    }

    let x_visible = parent_el.style.overflow_x == "visible"
        || child_layout.offset.left < parent_layout.rect.width;
    let y_visible = parent_el.style.overflow_y == "visible"
        || child_layout.offset.top < parent_layout.rect.height;

    !(x_visible && y_visible)
}
