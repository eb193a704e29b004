mod common;

use common::utils::{page, rendered, rendered_at};
use page_perception::dom::node::{ComputedStyle, ElementData};
use page_perception::page::session::PageSession;
use page_perception::snapshot::walker::snapshot;

// =========================================================================
// Traversal completeness and order
// =========================================================================

#[test]
fn snapshot_visits_every_element_exactly_once() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    let header = dom.add_element(body, rendered("header"));
    dom.add_element(header, rendered("h1"));
    let main = dom.add_element(body, rendered("main"));
    dom.add_element(main, rendered("p"));
    dom.add_element(main, rendered("p"));
    dom.add_element(body, rendered("footer"));

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    assert_eq!(records.len(), 8, "One record per element");
}

#[test]
fn snapshot_order_is_preorder_document_order() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    let first = dom.add_element(body, rendered("section"));
    dom.add_element(first, rendered("h2"));
    dom.add_element(first, rendered("p"));
    let second = dom.add_element(body, rendered("aside"));
    dom.add_element(second, rendered("span"));

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let tags: Vec<&str> = records.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(
        tags,
        vec!["html", "body", "section", "h2", "p", "aside", "span"],
        "Root first, then depth-first in left-to-right document order"
    );
}

#[test]
fn every_record_appears_after_its_parent() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    for _ in 0..3 {
        let div = dom.add_element(body, rendered("div"));
        let inner = dom.add_element(div, rendered("ul"));
        dom.add_element(inner, rendered("li"));
    }

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    for (position, record) in records.iter().enumerate() {
        if record.parent_uid == -1 {
            continue;
        }
        let parent_position = records
            .iter()
            .position(|r| r.uid == record.parent_uid)
            .expect("parent record exists");
        assert!(
            parent_position < position,
            "Record for uid {} precedes its child {}",
            record.parent_uid,
            record.uid
        );
    }
}

#[test]
fn text_and_comment_nodes_are_skipped() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    dom.add_text(body, "stray text");
    dom.add_comment(body, "a comment");
    dom.add_element(body, rendered("p"));

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    assert_eq!(records.len(), 3, "Only elements produce records");
}

// =========================================================================
// Subtree pruning
// =========================================================================

#[test]
fn aria_hidden_prunes_descendants_but_not_the_element() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    let banner = dom.add_element(body, rendered("div").with_attr("aria-hidden", "true"));
    dom.add_element(banner, rendered("span"));
    dom.add_element(banner, rendered("button"));
    dom.add_element(body, rendered("p"));

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let tags: Vec<&str> = records.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(
        tags,
        vec!["html", "body", "div", "p"],
        "Hidden subtree contributes no records, the element itself does"
    );
}

// =========================================================================
// Record contents
// =========================================================================

#[test]
fn record_geometry_uses_page_coordinates() {
    let mut dom = page();
    dom.scroll_x = 10.0;
    dom.scroll_y = 300.0;
    let body = dom.add_element(dom.root(), rendered("body"));
    dom.add_element(body, rendered_at("div", 50.0, 40.0, 200.0, 100.0));

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let div = records.iter().find(|r| r.tag == "div").unwrap();
    assert_eq!(div.location.x, 60.0, "Viewport x plus horizontal scroll");
    assert_eq!(div.location.y, 340.0, "Viewport y plus vertical scroll");
    assert_eq!(div.size.width, 200.0, "Width from the bounding rect");
    assert_eq!(div.size.height, 100.0, "Height from the bounding rect");
}

#[test]
fn detached_element_degrades_to_zeroed_geometry() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    dom.add_element(body, ElementData::new("div"));

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let div = records.iter().find(|r| r.tag == "div").unwrap();
    assert_eq!(div.size.width, 0.0, "No layout box, zero width");
    assert_eq!(div.location.x, 0.0, "No layout box, zero location");
    assert_eq!(records.len(), 3, "The snapshot still completes");
}

#[test]
fn text_fields_split_own_and_subtree_text() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    let card = dom.add_element(body, rendered("div"));
    dom.add_text(card, "  headline ");
    let inner = dom.add_element(card, rendered("em"));
    dom.add_text(inner, "detail");

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let div = records.iter().find(|r| r.tag == "div").unwrap();
    assert_eq!(div.text, "headline detail", "Subtree text, collapsed");
    assert_eq!(div.text_local, "headline", "Own text-node children only, trimmed");
}

#[test]
fn input_text_comes_from_its_value() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    dom.add_element(
        body,
        rendered("input")
            .with_attr("type", "text")
            .with_value("typed so far"),
    );

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let input = records.iter().find(|r| r.tag == "input").unwrap();
    assert_eq!(input.text, "typed so far", "Inputs report their value");
    assert_eq!(input.r#type.as_deref(), Some("text"));
}

#[test]
fn image_and_vector_counts() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    let gallery = dom.add_element(body, rendered("div"));
    dom.add_element(gallery, rendered("img").with_attr("src", "photo.png"));
    dom.add_element(gallery, rendered("img").with_attr("src", "icon.svg"));
    let figure = dom.add_element(gallery, rendered("figure"));
    dom.add_element(figure, rendered("svg"));

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let div = records.iter().find(|r| r.tag == "div").unwrap();
    assert_eq!(div.num_imgs, 1, "Raster images only");
    assert_eq!(div.num_svgs, 2, "Inline svg plus svg-sourced img");
    assert_eq!(div.children_count, 3, "Direct element children");

    let svg = records.iter().find(|r| r.tag == "svg").unwrap();
    assert_eq!(svg.num_svgs, 1, "An svg element counts itself");
}

#[test]
fn fixed_position_is_inherited_from_ancestors() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    let sticky_header = dom.add_element(
        body,
        rendered("header").with_style(ComputedStyle {
            position: "sticky".to_string(),
            ..ComputedStyle::default()
        }),
    );
    dom.add_element(sticky_header, rendered("button"));
    dom.add_element(body, rendered("p"));

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let button = records.iter().find(|r| r.tag == "button").unwrap();
    assert!(button.fixed_pos, "Child of a sticky ancestor is fixed_pos");
    let p = records.iter().find(|r| r.tag == "p").unwrap();
    assert!(!p.fixed_pos, "Statically positioned content is not");
}

#[test]
fn records_carry_attributes_and_style_signals() {
    let mut dom = page();
    let body = dom.add_element(dom.root(), rendered("body"));
    dom.add_element(
        body,
        rendered("a")
            .with_attr("href", "/checkout")
            .with_attr("class", "cta primary")
            .with_attr("id", "buy")
            .with_style(ComputedStyle {
                font_weight: "700".to_string(),
                background: "rgb(0, 128, 0)".to_string(),
                ..ComputedStyle::default()
            }),
    );

    let mut session = PageSession::new();
    let records = snapshot(&mut dom, &mut session).unwrap();

    let link = records.iter().find(|r| r.tag == "a").unwrap();
    assert_eq!(link.href.as_deref(), Some("/checkout"));
    assert_eq!(link.class.as_deref(), Some("cta primary"));
    assert_eq!(link.id.as_deref(), Some("buy"));
    assert_eq!(link.font_weight, "700");
    assert_eq!(link.background, "rgb(0, 128, 0)");
    assert_eq!(link.attributes.get("href").map(String::as_str), Some("/checkout"));
}
