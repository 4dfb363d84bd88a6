//! Right-to-left selector matching.

use super::parser::{AttrOp, AttrSelector, Combinator, ComplexSelector, Compound, Pseudo, Simple};
use crate::document::Document;
use crate::node::{ElementData, NodeId, NodeKind};

pub(crate) fn matches_complex(doc: &Document, element: NodeId, selector: &ComplexSelector) -> bool {
    match selector.compounds.len() {
        0 => false,
        n => matches_at(doc, element, selector, n - 1),
    }
}

/// Match `compounds[index]` against `element`, then walk left through the
/// combinators, backtracking over every candidate ancestor or sibling.
fn matches_at(doc: &Document, element: NodeId, selector: &ComplexSelector, index: usize) -> bool {
    if !matches_compound(doc, element, &selector.compounds[index]) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let next = index - 1;
    match selector.combinators[next] {
        Combinator::Child => doc
            .parent_element(element)
            .is_some_and(|p| matches_at(doc, p, selector, next)),
        Combinator::Descendant => doc
            .ancestors(element)
            .filter(|a| doc.is_element(*a))
            .any(|a| matches_at(doc, a, selector, next)),
        Combinator::Adjacent => previous_siblings(doc, element)
            .first()
            .is_some_and(|s| matches_at(doc, *s, selector, next)),
        Combinator::Sibling => previous_siblings(doc, element)
            .into_iter()
            .any(|s| matches_at(doc, s, selector, next)),
    }
}

/// Element siblings before `element`, nearest first.
fn previous_siblings(doc: &Document, element: NodeId) -> Vec<NodeId> {
    let Some(parent) = doc.parent(element) else {
        return Vec::new();
    };
    let siblings = doc.element_children(parent);
    let Some(at) = siblings.iter().position(|s| *s == element) else {
        return Vec::new();
    };
    siblings[..at].iter().rev().copied().collect()
}

fn matches_compound(doc: &Document, element: NodeId, compound: &Compound) -> bool {
    let Some(el) = doc.element(element) else {
        return false;
    };
    if compound.tag.as_deref().is_some_and(|t| t != el.tag) {
        return false;
    }
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(doc, element, el, simple))
}

fn matches_simple(doc: &Document, element: NodeId, el: &ElementData, simple: &Simple) -> bool {
    match simple {
        Simple::Id(id) => el.attribute("id") == Some(id.as_str()),
        Simple::Class(class) => el.has_class(class),
        Simple::Attr(attr) => matches_attribute(el, attr),
        Simple::Pseudo(pseudo) => matches_pseudo(doc, element, pseudo),
    }
}

fn matches_attribute(el: &ElementData, attr: &AttrSelector) -> bool {
    let Some(actual) = el.attribute(&attr.name) else {
        return false;
    };
    let (actual, expected) = if attr.case_insensitive {
        (actual.to_lowercase(), attr.value.to_lowercase())
    } else {
        (actual.to_string(), attr.value.clone())
    };

    match attr.op {
        AttrOp::Exists => true,
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => {
            !expected.is_empty()
                && !expected.contains(char::is_whitespace)
                && actual.split_ascii_whitespace().any(|w| w == expected)
        }
        AttrOp::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttrOp::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttrOp::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttrOp::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}

/// 1-based position among element siblings, counted from the front or back,
/// optionally only among siblings with the same tag.
fn position(doc: &Document, element: NodeId, from_end: bool, same_type: bool) -> Option<usize> {
    let parent = doc.parent(element)?;
    let tag = doc.tag_name(element)?;
    let mut siblings: Vec<NodeId> = doc
        .element_children(parent)
        .into_iter()
        .filter(|s| !same_type || doc.tag_name(*s) == Some(tag))
        .collect();
    if from_end {
        siblings.reverse();
    }
    siblings.iter().position(|s| *s == element).map(|i| i + 1)
}

fn matches_pseudo(doc: &Document, element: NodeId, pseudo: &Pseudo) -> bool {
    let at = |from_end, same_type| position(doc, element, from_end, same_type);
    match pseudo {
        Pseudo::NthChild(nth) => at(false, false).is_some_and(|p| nth.matches(p)),
        Pseudo::NthLastChild(nth) => at(true, false).is_some_and(|p| nth.matches(p)),
        Pseudo::NthOfType(nth) => at(false, true).is_some_and(|p| nth.matches(p)),
        Pseudo::NthLastOfType(nth) => at(true, true).is_some_and(|p| nth.matches(p)),
        Pseudo::FirstChild => at(false, false) == Some(1),
        Pseudo::LastChild => at(true, false) == Some(1),
        Pseudo::OnlyChild => at(false, false) == Some(1) && at(true, false) == Some(1),
        Pseudo::FirstOfType => at(false, true) == Some(1),
        Pseudo::LastOfType => at(true, true) == Some(1),
        Pseudo::OnlyOfType => at(false, true) == Some(1) && at(true, true) == Some(1),
        Pseudo::Root => element == doc.document_element(),
        Pseudo::Empty => doc.children(element).iter().all(|c| match doc.kind(*c) {
            Some(NodeKind::Text(text)) => text.is_empty(),
            Some(NodeKind::Element(_)) => false,
            _ => true,
        }),
        Pseudo::Not(list) => !list.iter().any(|s| matches_complex(doc, element, s)),
    }
}
