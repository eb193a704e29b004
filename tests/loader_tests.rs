mod common;

use common::utils::fixture;
use page_perception::dom::loader::{load_capture, parse_capture};
use page_perception::obstruct::resolver::suppress_for_selectors;
use page_perception::page::error::PerceptionError;
use page_perception::page::session::PageSession;
use page_perception::perceive;
use page_perception::selector::matcher::{parse, query_first, query_unique};

// =========================================================================
// Capture parsing
// =========================================================================

#[test]
fn minimal_capture_gets_defaults() {
    let page = parse_capture(r#"{ "root": { "tag": "HTML" } }"#).unwrap();

    let root = page.dom.root();
    let el = page.dom.element(root).unwrap();
    assert_eq!(el.tag, "html", "Tags are lowercased");
    assert_eq!(el.style.display, "block", "Default display");
    assert_eq!(el.style.visibility, "visible", "Default visibility");
    assert_eq!(el.style.position, "static", "Default position");
    assert!(el.layout.is_none(), "No rect means no layout box");
    assert_eq!(page.dom.scroll_x, 0.0, "Default scroll");
    assert!(page.url.is_none());
}

#[test]
fn bare_strings_become_text_nodes() {
    let page = parse_capture(
        r#"{
            "root": {
                "tag": "html",
                "children": [
                    { "tag": "body", "children": ["hello", { "tag": "b", "children": ["world"] }] }
                ]
            }
        }"#,
    )
    .unwrap();

    let body = query_unique(&page.dom, "body").unwrap();
    assert_eq!(page.dom.children(body).len(), 2, "Text and element children");
    assert_eq!(
        page.dom.child_elements(body).len(),
        1,
        "Only the element child counts as an element"
    );
}

#[test]
fn offset_box_defaults_to_the_bounding_rect() {
    let page = parse_capture(
        r#"{
            "root": {
                "tag": "html",
                "rect": { "x": 3, "y": 4, "width": 100, "height": 50 }
            }
        }"#,
    )
    .unwrap();

    let layout = page.dom.element(page.dom.root()).unwrap().layout.unwrap();
    assert_eq!(layout.offset.left, 3.0);
    assert_eq!(layout.offset.top, 4.0);
    assert_eq!(layout.offset.width, 100.0);
    assert_eq!(layout.offset.height, 50.0);
    assert!(layout.offset.has_offset_parent, "Assumed laid out");
}

#[test]
fn listeners_populate_the_registry() {
    let page = parse_capture(
        r#"{
            "root": {
                "tag": "html",
                "children": [
                    { "tag": "div", "listeners": ["click", "mouseover"] }
                ]
            }
        }"#,
    )
    .unwrap();

    let div = query_unique(&page.dom, "div").unwrap();
    assert!(page.registry.has(div, "click"));
    assert!(page.registry.has(div, "mouseover"));
    assert!(!page.registry.has(div, "keydown"));
    assert_eq!(page.registry.nodes_with("click").len(), 1);
}

#[test]
fn malformed_capture_is_a_format_error() {
    match parse_capture("{ not json") {
        Err(PerceptionError::CaptureFormat { .. }) => {}
        other => panic!("Expected CaptureFormat, got {:?}", other),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    match load_capture(std::path::Path::new("no/such/capture.json")) {
        Err(PerceptionError::CaptureIo { .. }) => {}
        other => panic!("Expected CaptureIo, got {:?}", other),
    }
}

// =========================================================================
// Fixture end-to-end
// =========================================================================

#[test]
fn login_fixture_full_pipeline() {
    let mut page = load_capture(&fixture("login_page.json")).unwrap();
    let mut session = PageSession::new();

    let perception = perceive(&mut page, &mut session).unwrap();

    assert_eq!(
        perception.records.len(),
        20,
        "Every element except the aria-hidden footer's children"
    );
    assert!(
        !perception
            .records
            .iter()
            .any(|r| r.href.as_deref() == Some("/privacy")),
        "Footer subtree pruned"
    );

    let root = &perception.records[0];
    assert_eq!(root.uid, 0, "Root uid");
    assert_eq!(root.parent_uid, -1, "Root parent uid");

    assert_eq!(perception.active_uids.len(), 10, "Actionable subset");
    let email = perception
        .records
        .iter()
        .find(|r| r.id.as_deref() == Some("email"))
        .unwrap();
    assert!(
        perception.active_uids.contains(&email.uid),
        "The email input is actionable"
    );
    let banner = perception
        .records
        .iter()
        .find(|r| r.id.as_deref() == Some("cookie-banner"))
        .unwrap();
    assert!(
        perception.active_uids.contains(&banner.uid),
        "The listener-bearing overlay is actionable"
    );
    assert!(banner.fixed_pos, "The overlay is fixed-positioned");

    let main = perception.records.iter().find(|r| r.tag == "main").unwrap();
    assert_eq!(main.num_imgs, 1, "One raster image below main");
    assert_eq!(main.num_svgs, 1, "The svg-sourced badge counts as a vector");
}

#[test]
fn login_fixture_uids_are_stable_across_passes() {
    let mut page = load_capture(&fixture("login_page.json")).unwrap();
    let mut session = PageSession::new();

    let first = perceive(&mut page, &mut session).unwrap();
    let second = perceive(&mut page, &mut session).unwrap();

    let first_uids: Vec<i64> = first.records.iter().map(|r| r.uid).collect();
    let second_uids: Vec<i64> = second.records.iter().map(|r| r.uid).collect();
    assert_eq!(first_uids, second_uids, "Snapshot uids stable");
    assert_eq!(first.active_uids, second.active_uids, "Active set stable");
}

#[test]
fn login_fixture_suppresses_the_cookie_banner() {
    let mut page = load_capture(&fixture("login_page.json")).unwrap();
    let mut session = PageSession::new();
    perceive(&mut page, &mut session).unwrap();

    let ledger = suppress_for_selectors(
        &mut page.dom,
        &mut session,
        &["#login button".to_string()],
    )
    .unwrap();

    let banner = query_first(&page.dom, &parse("#cookie-banner").unwrap()).unwrap();
    assert!(
        page.dom.element(banner).unwrap().hidden,
        "The overlay covering the submit button is suppressed"
    );

    let form = query_first(&page.dom, &parse("#login").unwrap()).unwrap();
    assert!(
        !page.dom.element(form).unwrap().hidden,
        "The form containing the button is never suppressed"
    );
    assert!(!ledger.is_empty(), "The ledger records what was hidden");
}
