    use super::*;

    fn doc_with_list(n: usize) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let list = doc.create_element("ul");
        doc.append_child(body, list).unwrap();
        let items = (0..n)
            .map(|_| {
                let li = doc.create_element("li");
                doc.append_child(list, li).unwrap();
                li
            })
            .collect();
        (doc, list, items)
    }

    #[test]
    fn test_new_document_structure() {
        let doc = Document::new("https://example.com/");
        assert_eq!(doc.tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.tag_name(doc.head()), Some("head"));
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert_eq!(doc.parent(doc.document_element()), Some(doc.root()));
        assert_eq!(doc.parent_element(doc.document_element()), None);
        assert_eq!(doc.ready_state(), ReadyState::Complete);
        assert_eq!(doc.bounding_rect(doc.body()).unwrap().width, 1280.0);
    }

    #[test]
    fn test_element_index_and_children() {
        let (mut doc, list, items) = doc_with_list(3);
        let text = doc.create_text("x");
        doc.insert_before(list, text, Some(items[1])).unwrap();

        assert_eq!(doc.children(list).len(), 4);
        assert_eq!(doc.element_children(list), items);
        assert_eq!(doc.element_index(items[2]), Some(2));
    }

    #[test]
    fn test_remove_invalidates_subtree_handles() {
        let (mut doc, list, items) = doc_with_list(2);
        doc.remove(list).unwrap();

        assert!(!doc.exists(list));
        assert!(items.iter().all(|i| !doc.exists(*i)));
        assert_eq!(doc.remove(list), Err(DomError::StaleNode(list)));

        // Recycled slots hand out new generations.
        let fresh = doc.create_element("div");
        assert_ne!(fresh, list);
        assert_ne!(Some(fresh), items.first().copied());
        assert!(doc.tag_name(list).is_none());
    }

    #[test]
    fn test_structure_nodes_cannot_be_removed() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        assert!(matches!(doc.remove(body), Err(DomError::HierarchyRequest { .. })));
        assert!(doc.exists(body));
    }

    #[test]
    fn test_append_moves_and_rejects_cycles() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(body, a).unwrap();
        doc.append_child(a, b).unwrap();

        assert!(matches!(
            doc.append_child(b, a),
            Err(DomError::HierarchyRequest { .. })
        ));

        doc.append_child(body, b).unwrap();
        assert_eq!(doc.parent(b), Some(body));
        assert!(doc.children(a).is_empty());
    }

    #[test]
    fn test_detached_nodes_are_not_connected() {
        let mut doc = Document::new("https://example.com/");
        let div = doc.create_element("div");
        assert!(!doc.is_connected(div));
        assert!(doc.query_selector_all("div").unwrap().is_empty());

        let body = doc.body();
        doc.append_child(body, div).unwrap();
        assert!(doc.is_connected(div));
        assert!(doc.contains(body, div));
        assert!(doc.contains(div, div));
    }

    #[test]
    fn test_text_content() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let p = doc.create_element("p");
        doc.append_child(body, p).unwrap();
        doc.set_text_content(p, "Hello ").unwrap();
        let b = doc.create_element("b");
        doc.append_child(p, b).unwrap();
        doc.set_text_content(b, "world").unwrap();

        assert_eq!(doc.text_content(p), "Hello world");
        doc.set_text_content(p, "").unwrap();
        assert!(doc.children(p).is_empty());
    }

    #[test]
    fn test_style_and_rendering() {
        let (mut doc, list, items) = doc_with_list(1);
        assert!(doc.is_rendered(items[0]));

        doc.set_style(list, "display", "none").unwrap();
        assert!(!doc.is_rendered(items[0]));
        assert_eq!(doc.style_property(list, "display"), Some("none"));

        doc.set_style(list, "display", "").unwrap();
        assert!(doc.is_rendered(items[0]));
    }

    #[test]
    fn test_attribute_errors_on_text_and_stale_nodes() {
        let mut doc = Document::new("https://example.com/");
        let text = doc.create_text("t");
        assert_eq!(
            doc.set_attribute(text, "id", "x"),
            Err(DomError::NotAnElement(text))
        );

        let div = doc.create_element("div");
        let body = doc.body();
        doc.append_child(body, div).unwrap();
        doc.remove(div).unwrap();
        assert_eq!(doc.set_style(div, "opacity", "0"), Err(DomError::StaleNode(div)));
    }

    #[test]
    fn test_get_element_by_id_returns_first_match() {
        let (mut doc, _list, items) = doc_with_list(2);
        doc.set_attribute(items[0], "id", "dup").unwrap();
        doc.set_attribute(items[1], "id", "dup").unwrap();
        assert_eq!(doc.get_element_by_id("dup"), Some(items[0]));
        assert_eq!(doc.get_element_by_id(""), None);
    }

    #[test]
    fn test_mutation_records_only_under_body() {
        let mut doc = Document::new("https://example.com/");
        doc.observe_body_mutations();

        let style = doc.create_element("style");
        let head = doc.head();
        doc.append_child(head, style).unwrap();
        assert!(!doc.has_pending_mutations());

        let body = doc.body();
        let div = doc.create_element("div");
        doc.append_child(body, div).unwrap();
        let span = doc.create_element("span");
        doc.append_child(div, span).unwrap();
        doc.remove(div).unwrap();

        let records = doc.take_mutation_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].added, vec![div]);
        assert_eq!(records[1].target, div);
        assert_eq!(records[1].added, vec![span]);
        assert_eq!(records[2].removed, vec![div]);
        assert!(!doc.has_pending_mutations());
    }

    #[test]
    fn test_disconnect_stops_recording() {
        let mut doc = Document::new("https://example.com/");
        doc.observe_body_mutations();
        assert!(doc.is_observing());
        doc.disconnect_observer();

        let body = doc.body();
        let div = doc.create_element("div");
        doc.append_child(body, div).unwrap();
        assert!(!doc.has_pending_mutations());
    }
