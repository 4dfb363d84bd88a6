//! Coordinate hit testing.

use crate::document::Document;
use crate::node::NodeId;

impl Document {
    /// Topmost element at viewport coordinates `(x, y)`.
    ///
    /// Paint order is tree order: the last rendered element whose rectangle
    /// contains the point wins. Subtrees with `display: none` are skipped,
    /// elements with `pointer-events: none` and empty rectangles are never
    /// hit. Points inside the viewport that miss every element land on the
    /// body, points outside it hit nothing.
    pub fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        if !self.viewport().contains(x, y) {
            return None;
        }

        let mut hit = None;
        let mut stack = vec![self.document_element()];
        while let Some(id) = stack.pop() {
            let Some(el) = self.element(id) else {
                continue;
            };
            if el.style.get("display") == Some("none") {
                continue;
            }
            let hittable = el.style.get("pointer-events") != Some("none")
                && !el.rect.is_empty()
                && el.rect.contains(x, y);
            if hittable {
                hit = Some(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }

        hit.or(Some(self.body()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    fn boxed(doc: &mut Document, parent: NodeId, tag: &str, rect: BoundingBox) -> NodeId {
        let id = doc.create_element(tag);
        doc.append_child(parent, id).unwrap();
        doc.set_rect(id, rect).unwrap();
        id
    }

    #[test]
    fn test_later_sibling_paints_on_top() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let _first = boxed(&mut doc, body, "div", BoundingBox::new(0.0, 0.0, 200.0, 200.0));
        let second = boxed(&mut doc, body, "div", BoundingBox::new(50.0, 50.0, 200.0, 200.0));

        assert_eq!(doc.element_from_point(100.0, 100.0), Some(second));
    }

    #[test]
    fn test_child_beats_parent() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let outer = boxed(&mut doc, body, "div", BoundingBox::new(0.0, 0.0, 300.0, 300.0));
        let inner = boxed(&mut doc, outer, "span", BoundingBox::new(10.0, 10.0, 20.0, 20.0));

        assert_eq!(doc.element_from_point(15.0, 15.0), Some(inner));
        assert_eq!(doc.element_from_point(100.0, 100.0), Some(outer));
    }

    #[test]
    fn test_hidden_and_transparent_elements_are_skipped() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let base = boxed(&mut doc, body, "div", BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        let hidden = boxed(&mut doc, body, "div", BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        doc.set_style(hidden, "display", "none").unwrap();
        let overlay = boxed(&mut doc, body, "div", BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        doc.set_style(overlay, "pointer-events", "none").unwrap();

        assert_eq!(doc.element_from_point(50.0, 50.0), Some(base));
    }

    #[test]
    fn test_outside_viewport_hits_nothing() {
        let doc = Document::new("https://example.com/");
        assert_eq!(doc.element_from_point(-1.0, 5.0), None);
        assert_eq!(doc.element_from_point(5.0, 10_000.0), None);
    }

    #[test]
    fn test_empty_area_falls_back_to_body() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        boxed(&mut doc, body, "div", BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(doc.element_from_point(500.0, 500.0), Some(body));
    }
}
