//! Stanza builders and assertions for roster tests.

#![allow(dead_code)]

use slxmpp_proto::{Element, ns};

pub fn roster_get(id: &str) -> Element {
    Element::new("iq")
        .with_attr("id", id)
        .with_attr("type", "get")
        .with_child(Element::with_ns("query", ns::ROSTER))
}

pub fn roster_set(id: &str, items: Vec<Element>) -> Element {
    Element::new("iq")
        .with_attr("id", id)
        .with_attr("type", "set")
        .with_child(Element::with_ns("query", ns::ROSTER).with_children(items))
}

/// `<item jid=.../>` with optional name and groups.
pub fn item(jid: &str, name: Option<&str>, groups: &[&str]) -> Element {
    Element::new("item")
        .with_attr("jid", jid)
        .with_opt_attr("name", name)
        .with_children(groups.iter().map(|g| Element::new("group").with_text(*g)))
}

pub fn removal(jid: &str) -> Element {
    Element::new("item")
        .with_attr("jid", jid)
        .with_attr("subscription", "remove")
}

/// The stanza error condition of an error reply.
pub fn error_condition(reply: &Element) -> Option<(String, String)> {
    if reply.attr("type") != Some("error") {
        return None;
    }
    let error = reply.children_named("error").next()?;
    let condition = error.children().first()?;
    Some((condition.name().to_owned(), error.attr("type")?.to_owned()))
}

/// The single item of a roster push.
pub fn pushed_item(push: &Element) -> &Element {
    assert_eq!(push.name(), "iq");
    assert_eq!(push.attr("type"), Some("set"));
    let query = push
        .children_ns("query", ns::ROSTER)
        .next()
        .expect("push carries a roster query");
    let mut items = query.children_named("item");
    let item = items.next().expect("push carries an item");
    assert!(items.next().is_none(), "push carries exactly one item");
    item
}

/// Group labels of an item, in document order.
pub fn groups(item: &Element) -> Vec<String> {
    item.children_named("group").map(|g| g.text().to_owned()).collect()
}
