use page_perception::dom::node::{ElementData, LayoutBox, PageDom};

/// Element with a rendered layout box at an arbitrary on-screen position.
pub fn rendered(tag: &str) -> ElementData {
    ElementData::new(tag).with_layout(LayoutBox::sized(0.0, 0.0, 100.0, 20.0))
}

/// Element rendered at an explicit position and size.
pub fn rendered_at(tag: &str, x: f64, y: f64, width: f64, height: f64) -> ElementData {
    ElementData::new(tag).with_layout(LayoutBox::sized(x, y, width, height))
}

/// A fresh page with a rendered `html` root.
pub fn page() -> PageDom {
    PageDom::new(rendered_at("html", 0.0, 0.0, 1280.0, 720.0))
}

/// Absolute path to a capture fixture under `tests/fixtures`.
pub fn fixture(name: &str) -> std::path::PathBuf {
    let base = std::env::current_dir().unwrap();
    base.join("tests").join("fixtures").join(name)
}
