//! Property tests over generated SVG documents.

use std::collections::HashSet;

use proptest::prelude::*;
use svgjsx::{
    CleaningOptions, Document, GenerationOptions, clean, cleanup_definitions, format_markup,
    generate, parse_svg, reachable_ids, remove_duplicates, serialize,
};

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(r#"<circle r="5" fill="red"/>"#.to_string()),
        Just(r#"<rect width="1.23456" fill="rgb(10, 20, 30)"/>"#.to_string()),
        Just(r#"<rect fill="url(#g1)"/>"#.to_string()),
        Just(r#"<path d="M0 0 L1 1 L2 2 Z Z" stroke="url(#g3)"/>"#.to_string()),
        Just(r##"<use href="#g2"/>"##.to_string()),
        Just("<text> a &amp; b </text>".to_string()),
        Just("<style>  </style>".to_string()),
        Just("<!-- note -->".to_string()),
        Just(" \n ".to_string()),
    ]
}

fn content() -> impl Strategy<Value = String> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(|children| format!("<g>{}</g>", children.concat()))
    })
}

fn definition() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(r#"<linearGradient id="g1"/>"#.to_string()),
        Just(r##"<linearGradient id="g2" href="#g3"/>"##.to_string()),
        Just(r#"<pattern id="g3"><rect fill="url(#g4)"/></pattern>"#.to_string()),
        Just(r#"<linearGradient id="g4"/>"#.to_string()),
        Just(r#"<g id="g5"><linearGradient id="g1"/></g>"#.to_string()),
        Just(r#"<mask id="g6"/>"#.to_string()),
        Just(r#"<linearGradient id="g7"/>"#.to_string()),
        Just("<style>.c{fill:url(#g7)}</style>".to_string()),
    ]
}

fn svg_document() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(definition(), 0..5),
        prop::collection::vec(content(), 0..6),
    )
        .prop_map(|(defs, body)| {
            format!(
                r#"<svg viewBox="0 0 10 10"><defs>{}</defs>{}</svg>"#,
                defs.concat(),
                body.concat()
            )
        })
}

fn element_ids(doc: &Document) -> HashSet<String> {
    doc.element_ids()
        .into_iter()
        .filter_map(|id| doc.element(id)?.get_attr("id").map(str::to_string))
        .collect()
}

proptest! {
    #[test]
    fn dedup_is_idempotent(svg in svg_document()) {
        let mut doc = parse_svg(&svg).unwrap();
        remove_duplicates(&mut doc);
        let once = serialize(&doc);

        prop_assert_eq!(remove_duplicates(&mut doc), 0);
        prop_assert_eq!(serialize(&doc), once);
    }

    #[test]
    fn cleanup_keeps_references_resolvable(svg in svg_document()) {
        let mut doc = parse_svg(&svg).unwrap();
        let ids_before = element_ids(&doc);
        let resolved_before: HashSet<String> =
            reachable_ids(&doc).intersection(&ids_before).cloned().collect();

        cleanup_definitions(&mut doc);

        let ids_after = element_ids(&doc);
        let reachable = reachable_ids(&doc);

        // No reference that resolved before dangles now.
        for id in reachable.iter().filter(|id| resolved_before.contains(*id)) {
            prop_assert!(ids_after.contains(id), "reference to {} now dangles", id);
        }

        // Every surviving definition is referenced, itself or below.
        for node in doc.element_ids() {
            let Some(id) = doc.element(node).and_then(|e| e.get_attr("id")) else {
                continue;
            };
            if !doc.has_ancestor(node, "defs") {
                continue;
            }
            let referenced = doc.descendants(node).any(|n| {
                doc.element(n)
                    .and_then(|e| e.get_attr("id"))
                    .is_some_and(|i| reachable.contains(i))
            });
            prop_assert!(referenced, "unreferenced definition {} survived", id);
        }
    }

    #[test]
    fn cleaned_output_round_trips(svg in svg_document()) {
        let options = CleaningOptions { merge_paths: true, ..CleaningOptions::default() };
        let cleaned = clean(&svg, &options).unwrap().cleaned_svg;
        let reparsed = serialize(&parse_svg(&cleaned).unwrap());
        prop_assert_eq!(reparsed, cleaned);
    }

    #[test]
    fn size_reduction_matches_lengths(svg in svg_document()) {
        let result = clean(&svg, &CleaningOptions::default()).unwrap();
        let expected =
            (svg.len() as f64 - result.cleaned_svg.len() as f64) / svg.len() as f64 * 100.0;
        prop_assert!((result.size_reduction - expected).abs() < 1e-9);
    }

    #[test]
    fn generation_is_deterministic(svg in svg_document(), keep_comments in any::<bool>()) {
        let doc = parse_svg(&svg).unwrap();
        let options = GenerationOptions {
            strip_comments: !keep_comments,
            pre_optimize: !keep_comments,
            ..GenerationOptions::default()
        };
        prop_assert_eq!(generate(&doc, &options).unwrap(), generate(&doc, &options).unwrap());
    }

    #[test]
    fn formatting_is_idempotent(markup in "[<>/a-z{}\"'` =\n]{0,60}") {
        let once = format_markup(&markup);
        prop_assert_eq!(format_markup(&once), once);
    }
}
