mod node_data {
    use msh::prelude::*;

    fn setup_document() -> Document {
        let mut doc = Document::default();

        let mut nodes = NodeBlock::new(3, 1);
        for (tag, xyz) in [
            (1, [0., 0., 0.]),
            (2, [1., 0., 0.]),
            (3, [0., 1., 0.]),
            (4, [0., 0., 1.]),
        ] {
            nodes.push(tag, &xyz).unwrap();
        }
        doc.node_blocks.push(nodes);

        let mut tets = ElementBlock::new(3, 1, ElementType::Tetrahedron4);
        tets.push(1, &[1, 2, 3, 4]).unwrap();
        doc.element_blocks.push(tets);

        let displacement = ndarray::arr2(&[
            [0.0, 0.0, 0.0],
            [0.1, 0.0, 0.0],
            [0.0, 0.2, 0.0],
            [0.0, 0.0, 0.3],
        ]);

        let mut section = DataSection::new(DataKind::Node, "displacement", 1.5, 4, 3);
        for (tag, row) in (1..).zip(displacement.outer_iter()) {
            section.push_entry(tag, row.as_slice().unwrap()).unwrap();
        }
        doc.data_sections.push(section);

        doc
    }

    fn round_trip(doc: &Document, encoding: Encoding) -> Document {
        let mut bytes = Vec::new();
        msh::write_msh_with(&mut bytes, doc, &WriteOptions::default().encoding(encoding)).unwrap();
        msh::parse_msh(bytes.as_slice()).unwrap()
    }

    #[test]
    fn vector_field_ascii() {
        let doc = setup_document();
        let parsed = round_trip(&doc, Encoding::Ascii);

        let section = parsed.node_data().next().unwrap();
        assert_eq!(section.name(), Some("displacement"));
        assert_eq!(section.time(), Some(1.5));
        assert_eq!(section.time_step(), Some(4));
        assert_eq!(section.header.int_tags, vec![4, 3, 4]);
        assert_eq!(section.values.shape(), (4, 3));
        assert_eq!(section.values.view()[[3, 2]], 0.3);

        assert_eq!(parsed.data_sections, doc.data_sections);
    }

    #[test]
    fn vector_field_binary() {
        let doc = setup_document();
        let parsed = round_trip(&doc, Encoding::Binary);

        let expected = doc.data_sections[0].values.to_array2();
        let actual = parsed.data_sections[0].values.clone().into_array2();
        dbg!(&actual);

        assert_eq!(actual, expected);
        assert_eq!(parsed.data_sections, doc.data_sections);
    }

    #[test]
    fn header_tags_beyond_the_convention_survive() {
        let mut doc = setup_document();
        let header = &mut doc.data_sections[0].header;
        header.string_tags.push("interpolation".into());
        header.real_tags.push(0.75);
        // partition index
        header.int_tags.push(2);

        for encoding in [Encoding::Ascii, Encoding::Binary] {
            let parsed = round_trip(&doc, encoding);
            let header = &parsed.data_sections[0].header;

            assert_eq!(header.string_tags, vec!["displacement", "interpolation"]);
            assert_eq!(header.real_tags, vec![1.5, 0.75]);
            assert_eq!(header.int_tags, vec![4, 3, 4, 2]);
        }
    }

    #[test]
    fn several_time_steps() {
        let mut doc = setup_document();
        for step in 5..8 {
            let mut section =
                DataSection::new(DataKind::Node, "displacement", step as f64 * 0.5, step, 3);
            section.push_entry(4, &[0.0, 0.0, step as f64]).unwrap();
            doc.data_sections.push(section);
        }

        let parsed = round_trip(&doc, Encoding::Binary);
        let steps: Vec<_> = parsed.node_data().filter_map(|data| data.time_step()).collect();
        assert_eq!(steps, vec![4, 5, 6, 7]);
        assert_eq!(parsed, {
            let mut expected = doc.clone();
            expected.format.encoding = Encoding::Binary;
            expected
        });
    }
}

mod element_data {
    use msh::prelude::*;

    fn setup_document() -> Document {
        let mut doc = Document::default();

        let mut nodes = NodeBlock::new(2, 1);
        for (tag, xyz) in [
            (1, [0., 0., 0.]),
            (2, [1., 0., 0.]),
            (3, [1., 1., 0.]),
            (4, [0., 1., 0.]),
        ] {
            nodes.push(tag, &xyz).unwrap();
        }
        doc.node_blocks.push(nodes);

        let mut triangles = ElementBlock::new(2, 1, ElementType::Triangle3);
        triangles.push(1, &[1, 2, 3]).unwrap();
        triangles.push(2, &[1, 3, 4]).unwrap();
        doc.element_blocks.push(triangles);

        let mut area = DataSection::new(DataKind::Element, "area", 0.0, 0, 1);
        area.push_entry(1, &[0.5]).unwrap();
        area.push_entry(2, &[0.5]).unwrap();
        doc.data_sections.push(area);

        let mut gradient = DataSection::new(DataKind::ElementNode, "gradient", 0.0, 0, 2);
        gradient.push_entry(1, &[1., 0., 1., 0., 1., 0.]).unwrap();
        gradient.push_entry(2, &[0., 1., 0., 1., 0., 1.]).unwrap();
        doc.data_sections.push(gradient);

        doc
    }

    #[test]
    fn element_and_element_node_sections() {
        let doc = setup_document();

        for options in [
            WriteOptions::default(),
            WriteOptions::default().encoding(Encoding::Binary),
            WriteOptions::default()
                .encoding(Encoding::Binary)
                .int_size(IntSize::Four),
            WriteOptions::default().version(Version::V2_2),
        ] {
            let mut bytes = Vec::new();
            msh::write_msh_with(&mut bytes, &doc, &options).unwrap();
            let parsed = msh::parse_msh(bytes.as_slice()).unwrap();

            assert_eq!(parsed.data_sections, doc.data_sections);

            let gradient = parsed.element_node_data().next().unwrap();
            assert_eq!(gradient.nodes_per_element, 3);
            assert_eq!(gradient.entry_width(), 6);
            assert_eq!(gradient.entry(1), Some((2, &[0., 1., 0., 1., 0., 1.][..])));

            let area = parsed.element_data().next().unwrap();
            assert_eq!(area.values.view().sum(), 1.0);
        }
    }

    #[test]
    fn element_node_layout_is_text_per_node() {
        let doc = setup_document();
        let mut bytes = Vec::new();
        msh::write_msh(&mut bytes, &doc).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("$ElementNodeData\n1\n\"gradient\"\n1\n0.0\n3\n0\n2\n2\n"));
        assert!(text.contains("\n1 3 1.0 0.0 1.0 0.0 1.0 0.0\n2 3 0.0 1.0 0.0 1.0 0.0 1.0\n$EndElementNodeData\n"));
    }
}
