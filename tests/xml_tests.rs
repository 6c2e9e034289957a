//! Builder/parser tests, including property-based round trips.
//!
//! Run with: `cargo test --test xml_tests`

use chrono::NaiveDate;
use proptest::prelude::*;
use szamla_agent::xml::*;

fn wrap(body: &str) -> String {
    format!("<root>\n{body}</root>")
}

fn text_at<'a>(doc: &'a XmlNode, path: &str) -> Option<&'a str> {
    doc.path(path).and_then(XmlValue::as_text)
}

// ---------------------------------------------------------------------------
// Builder edge cases
// ---------------------------------------------------------------------------

#[test]
fn absent_pair_renders_empty_string() {
    assert_eq!(render(&ElementTree::new().with("a", None::<&str>), 0), "");
}

#[test]
fn empty_tree_renders_empty_string() {
    assert_eq!(render(&ElementTree::new(), 4), "");
}

#[test]
fn escaping_example() {
    let out = render(&ElementTree::new().with("x", "<a&b>"), 0);
    assert_eq!(out, "<x>&lt;a&amp;b&gt;</x>\n");
}

#[test]
fn absent_nested_children_keep_parent() {
    let tree = ElementTree::new().with(
        "vevo",
        ElementTree::new()
            .with("nev", "Kovács Kft.")
            .with("adoszam", None::<String>),
    );
    let out = render(&tree, 0);
    assert_eq!(out, "<vevo>\n  <nev>Kovács Kft.</nev>\n</vevo>\n");
}

#[test]
fn indentation_does_not_change_parsed_values() {
    let tree = ElementTree::new()
        .with("a", "1")
        .with("b", ElementTree::new().with("c", "2"));
    let shallow = parse(&wrap(&render(&tree, 0))).unwrap();
    let deep = parse(&wrap(&render(&tree, 7))).unwrap();
    assert_eq!(shallow, deep);
}

#[test]
fn project_flattens_selected_leaves() {
    let doc = parse(
        "<xmlszamlavalasz><sikeres>true</sikeres><szamlaszam>E-1</szamlaszam><pdf>QQ==</pdf></xmlszamlavalasz>",
    )
    .unwrap();
    let flat = project(
        &doc,
        &[
            ("xmlszamlavalasz.szamlaszam", "invoiceId"),
            ("xmlszamlavalasz.pdf", "pdf"),
            ("xmlszamlavalasz.vevoifiokurl", "customerAccountUrl"),
        ],
    );
    assert_eq!(flat.len(), 2);
    assert_eq!(flat["invoiceId"].as_text(), Some("E-1"));
    assert!(!flat.contains_key("customerAccountUrl"));
}

#[test]
fn repeated_nested_elements_take_first_in_paths() {
    let doc = parse("<r><t><n>1</n></t><t><n>2</n></t></r>").unwrap();
    assert_eq!(text_at(&doc, "r.t.n"), Some("1"));
    let all: Vec<_> = doc
        .first_node("r")
        .unwrap()
        .all("t")
        .iter()
        .filter_map(|t| t.as_node()?.first_text("n"))
        .collect();
    assert_eq!(all, ["1", "2"]);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

/// Text without leading/trailing whitespace (the parser trims it).
fn scalar_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9áéőű<>&'\".,;:/+=-]{1,24}"
}

fn scalar_field() -> impl Strategy<Value = Option<String>> {
    prop::option::weighted(0.8, scalar_text())
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn render_round_trips_scalars(values in prop::collection::vec(scalar_field(), 1..12), indent in 0usize..4) {
        let mut tree = ElementTree::new();
        for (i, value) in values.iter().enumerate() {
            tree.push(format!("f{i}"), value.clone());
        }
        let doc = parse(&wrap(&render(&tree, indent))).unwrap();
        for (i, value) in values.iter().enumerate() {
            let path = format!("root.f{i}");
            prop_assert_eq!(text_at(&doc, &path), value.as_deref());
        }
    }

    #[test]
    fn render_round_trips_nested(outer in scalar_text(), inner in prop::collection::vec(scalar_text(), 1..6)) {
        let mut children = ElementTree::new();
        for value in &inner {
            children.push("item", value.as_str());
        }
        let tree = ElementTree::new().with("head", outer.as_str()).with("items", children);
        let doc = parse(&wrap(&render(&tree, 1))).unwrap();

        prop_assert_eq!(text_at(&doc, "root.head"), Some(outer.as_str()));
        let items = doc.path("root.items").and_then(XmlValue::as_node).unwrap();
        let read: Vec<&str> = items.all("item").iter().filter_map(XmlValue::as_text).collect();
        let expected: Vec<&str> = inner.iter().map(String::as_str).collect();
        prop_assert_eq!(read, expected);
    }

    #[test]
    fn dates_render_iso(date in any_date()) {
        let out = render(&ElementTree::new().with("d", date), 0);
        prop_assert_eq!(out.len(), "<d>YYYY-MM-DD</d>\n".len());
        let doc = parse(&out).unwrap();
        let parsed = NaiveDate::parse_from_str(doc.first_text("d").unwrap(), "%Y-%m-%d").unwrap();
        prop_assert_eq!(parsed, date);
    }

    #[test]
    fn parser_never_panics(input in "\\PC{0,64}") {
        let _ = parse(&input);
    }
}
