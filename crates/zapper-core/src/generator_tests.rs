    use super::*;
    use zapper_dom::Document;

    fn add(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = doc.create_element(tag);
        doc.append_child(parent, id).unwrap();
        for (name, value) in attrs {
            doc.set_attribute(id, name, value).unwrap();
        }
        id
    }

    fn resolves_to(doc: &Document, selector: &str, element: NodeId) -> bool {
        doc.query_selector_all(selector).unwrap().contains(&element)
    }

    #[test]
    fn test_unique_id_wins() {
        let mut doc = Document::new("https://news.example.com/a");
        let body = doc.body();
        let ad = add(&mut doc, body, "div", &[("id", "ad-123"), ("class", "ad banner")]);

        let generator = SelectorGenerator::default();
        assert_eq!(generator.generate(&doc, ad), "#ad-123");
    }

    #[test]
    fn test_id_is_escaped() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let el = add(&mut doc, body, "div", &[("id", "1st item")]);

        let selector = SelectorGenerator::default().generate(&doc, el);
        assert_eq!(selector, "#\\31 st\\ item");
        assert_eq!(doc.query_selector_all(&selector).unwrap(), vec![el]);
    }

    #[test]
    fn test_duplicate_id_falls_through_to_classes() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let first = add(&mut doc, body, "div", &[("id", "dup"), ("class", "promo")]);
        add(&mut doc, body, "div", &[("id", "dup")]);

        assert_eq!(SelectorGenerator::default().generate(&doc, first), "div.promo");
    }

    #[test]
    fn test_classes_skip_state_variants() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let classes = "card hover:shadow  md:flex featured";
        let el = add(&mut doc, body, "section", &[("class", classes)]);

        assert_eq!(
            SelectorGenerator::default().generate(&doc, el),
            "section.card.featured"
        );
    }

    #[test]
    fn test_non_unique_classes_fall_back_to_path() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let list = add(&mut doc, body, "ul", &[]);
        add(&mut doc, list, "li", &[("class", "item")]);
        let second = add(&mut doc, list, "li", &[("class", "item")]);

        let selector = SelectorGenerator::default().generate(&doc, second);
        assert_eq!(selector, "ul:nth-child(1) > li:nth-child(2)");
        assert!(resolves_to(&doc, &selector, second));
    }

    #[test]
    fn test_path_stops_at_ancestor_with_id() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let outer = add(&mut doc, body, "div", &[]);
        let main = add(&mut doc, outer, "main", &[("id", "content")]);
        add(&mut doc, main, "p", &[]);
        let target = add(&mut doc, main, "p", &[]);

        let selector = SelectorGenerator::default().generate(&doc, target);
        assert_eq!(selector, "main#content > p:nth-child(2)");
        assert_eq!(doc.query_selector_all(&selector).unwrap(), vec![target]);
    }

    #[test]
    fn test_path_is_bounded_by_max_depth() {
        let mut doc = Document::new("https://example.com/");
        let mut parent = doc.body();
        for _ in 0..15 {
            parent = add(&mut doc, parent, "div", &[]);
        }

        let generator = SelectorGenerator::default();
        let selector = generator.generate(&doc, parent);
        assert_eq!(selector.split(" > ").count(), 10);
        assert!(resolves_to(&doc, &selector, parent));

        let shallow = SelectorGenerator::new(&SelectorConfig { max_depth: 3 });
        assert_eq!(shallow.generate(&doc, parent).split(" > ").count(), 3);
    }

    #[test]
    fn test_body_falls_back_to_tag() {
        let doc = Document::new("https://example.com/");
        assert_eq!(SelectorGenerator::default().generate(&doc, doc.body()), "body");
    }

    #[test]
    fn test_generated_selectors_resolve_to_their_element() {
        let mut doc = Document::new("https://example.com/");
        let body = doc.body();
        let header = add(&mut doc, body, "header", &[("class", "top")]);
        let nav = add(&mut doc, header, "nav", &[]);
        let mut elements = vec![header, nav];
        for i in 0..4 {
            let class = if i % 2 == 0 { "even" } else { "odd" };
            elements.push(add(&mut doc, nav, "a", &[("class", class), ("href", "/x")]));
        }
        let footer = add(&mut doc, body, "footer", &[("id", "foot")]);
        elements.push(footer);
        elements.push(add(&mut doc, footer, "span", &[("class", "weird.class[1]")]));

        let generator = SelectorGenerator::default();
        for element in elements {
            let selector = generator.generate(&doc, element);
            assert!(resolves_to(&doc, &selector, element), "{selector} missed {element}");
        }
    }
