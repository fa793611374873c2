//! Round trips between the block document and the visual-editor HTML.

use stanza::application::editor::{blocks_to_html, html_to_blocks};
use stanza::domain::blocks::{BlockKind, CalloutVariant, ContentBlock, ListStyle, StatItem};

fn round_trip(document: &[ContentBlock]) -> Vec<BlockKind> {
    let html = blocks_to_html(document);
    html_to_blocks(&html)
        .expect("rendered html parses back")
        .into_iter()
        .map(|block| block.kind)
        .collect()
}

#[test]
fn simple_blocks_survive_a_full_round_trip() {
    let document = vec![
        ContentBlock::new(
            "a0",
            BlockKind::Heading {
                level: 1,
                content: "Field guide".to_string(),
            },
        ),
        ContentBlock::new(
            "a1",
            BlockKind::Heading {
                level: 2,
                content: "Getting started".to_string(),
            },
        ),
        ContentBlock::new(
            "a2",
            BlockKind::Paragraph {
                content: "install the <strong>latest</strong> release".to_string(),
            },
        ),
        ContentBlock::new(
            "a2b",
            BlockKind::Heading {
                level: 3,
                content: "Prerequisites".to_string(),
            },
        ),
        ContentBlock::new(
            "a2c",
            BlockKind::List {
                style: ListStyle::Ordered,
                items: vec!["clone".to_string(), "build".to_string(), "run".to_string()],
            },
        ),
        ContentBlock::new(
            "a2d",
            BlockKind::Heading {
                level: 4,
                content: "Notes".to_string(),
            },
        ),
        ContentBlock::new(
            "a3",
            BlockKind::Code {
                language: "rust".to_string(),
                code: "fn main() { println!(\"hi\"); }".to_string(),
                filename: Some("main.rs".to_string()),
            },
        ),
        ContentBlock::new(
            "a4",
            BlockKind::Image {
                src: "/img/cover.png".to_string(),
                alt: "cover".to_string(),
                caption: Some("The cover".to_string()),
            },
        ),
        ContentBlock::new(
            "a5",
            BlockKind::List {
                style: ListStyle::Unordered,
                items: vec!["one".to_string(), "two".to_string()],
            },
        ),
        ContentBlock::new("a6", BlockKind::Divider),
        ContentBlock::new(
            "a7",
            BlockKind::Callout {
                variant: CalloutVariant::Warning,
                content: "mind the gap".to_string(),
                title: Some("Careful".to_string()),
            },
        ),
    ];

    let kinds = round_trip(&document);
    let expected: Vec<BlockKind> = document.into_iter().map(|block| block.kind).collect();
    assert_eq!(kinds, expected);
}

#[test]
fn quote_author_round_trips_through_cite() {
    let document = vec![ContentBlock::new(
        "q1",
        BlockKind::Quote {
            content: "Talk is cheap".to_string(),
            author: Some("Linus".to_string()),
        },
    )];

    assert_eq!(
        round_trip(&document),
        vec![BlockKind::Quote {
            content: "Talk is cheap".to_string(),
            author: Some("Linus".to_string()),
        }]
    );
}

#[test]
fn escaped_code_round_trips_to_the_original_source() {
    let source = "if a < b && b > 0 { emit(\"x\"); }";
    let document = vec![ContentBlock::new(
        "c1",
        BlockKind::Code {
            language: "rust".to_string(),
            code: source.to_string(),
            filename: None,
        },
    )];

    assert_eq!(
        round_trip(&document),
        vec![BlockKind::Code {
            language: "rust".to_string(),
            code: source.to_string(),
            filename: None,
        }]
    );
}

#[test]
fn advanced_blocks_are_lost_on_the_way_back() {
    let document = vec![
        ContentBlock::new(
            "p1",
            BlockKind::Paragraph {
                content: "before".to_string(),
            },
        ),
        ContentBlock::new(
            "s1",
            BlockKind::Stats {
                items: vec![StatItem {
                    value: stanza::domain::blocks::StatValue::Text("99%".to_string()),
                    label: "uptime".to_string(),
                    prefix: None,
                    suffix: None,
                    color: None,
                }],
                columns: Some(2),
            },
        ),
        ContentBlock::new(
            "p2",
            BlockKind::Paragraph {
                content: "after".to_string(),
            },
        ),
    ];

    let html = blocks_to_html(&document);
    assert!(html.contains("<!-- block:stats"));

    assert_eq!(
        round_trip(&document),
        vec![
            BlockKind::Paragraph {
                content: "before".to_string()
            },
            BlockKind::Paragraph {
                content: "after".to_string()
            },
        ]
    );
}

#[test]
fn converted_ids_are_fresh_and_sequential() {
    let document = vec![
        ContentBlock::new(
            "x9",
            BlockKind::Paragraph {
                content: "first".to_string(),
            },
        ),
        ContentBlock::new("y7", BlockKind::Divider),
    ];

    let html = blocks_to_html(&document);
    let blocks = html_to_blocks(&html).expect("convert");
    let ids: Vec<&str> = blocks.iter().map(|block| block.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b2"]);
}
