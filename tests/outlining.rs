#[cfg(feature = "outlining")]
use std::{sync::Arc, time::Duration};

#[cfg(feature = "outlining")]
use ko_html_tools::{HTMLLanguageService, Region, RegionTagger, Span, TextBuffer, TextSource};
#[cfg(feature = "outlining")]
use lsp_types::{Position, Range, TextDocumentContentChangeEvent};
#[cfg(feature = "outlining")]
use tokio::sync::RwLock;

#[cfg(feature = "outlining")]
fn parse(lines: &[&str]) -> Vec<Region> {
    let buffer = TextBuffer::new("html", 0, &lines.join("\n"));
    let mut tagger = HTMLLanguageService::create_region_tagger(&buffer);
    tagger.reparse(&buffer);
    tagger.regions().to_vec()
}

#[cfg(feature = "outlining")]
fn r(level: u32, start_line: usize, end_line: usize, start_offset: usize) -> Region {
    Region {
        level,
        start_line,
        end_line,
        start_offset,
    }
}

#[cfg(feature = "outlining")]
fn edit(start: (u32, u32), end: (u32, u32), text: &str) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: Some(Range::new(
            Position::new(start.0, start.1),
            Position::new(end.0, end.1),
        )),
        range_length: None,
        text: text.to_string(),
    }
}

#[cfg(feature = "outlining")]
fn lines(start: u32, end: u32) -> Range {
    Range::new(Position::new(start, 0), Position::new(end, 0))
}

#[cfg(feature = "outlining")]
const LIST: &[&str] = &[
    "<ul>",                         // 0
    "  <!-- ko foreach: items -->", // 1
    "  <li></li>",                  // 2
    "  <!-- /ko -->",               // 3
    "</ul>",                        // 4
];

#[cfg(feature = "outlining")]
#[test]
fn nested_regions_close_inner_first() {
    let regions = parse(&[
        "<div>",                      // 0
        "  <!-- ko if: a -->",        // 1
        "    <!-- ko foreach: b -->", // 2
        "      <span></span>",        // 3
        "    <!-- /ko -->",           // 4
        "  <!-- /ko -->",             // 5
        "</div>",                     // 6
    ]);
    assert_eq!(regions, vec![r(2, 2, 4, 4), r(1, 1, 5, 2)]);
}

#[cfg(feature = "outlining")]
#[test]
fn same_level_start_closes_previous_sibling() {
    let regions = parse(&[
        "<!-- ko 1 -->", // 0
        "a",             // 1
        "<!-- ko 1 -->", // 2
        "b",             // 3
        "<!-- /ko -->",  // 4
    ]);
    assert_eq!(regions, vec![r(1, 0, 2, 0), r(1, 2, 4, 0)]);
}

#[cfg(feature = "outlining")]
#[test]
fn sibling_keeps_the_enclosing_region_open() {
    let regions = parse(&[
        "<!-- ko -->",   // 0
        "<!-- ko 2 -->", // 1
        "<!-- ko 2 -->", // 2
        "<!-- /ko -->",  // 3
        "<!-- /ko -->",  // 4
    ]);
    assert_eq!(regions, vec![r(2, 1, 2, 0), r(2, 2, 3, 0), r(1, 0, 4, 0)]);
}

#[cfg(feature = "outlining")]
#[test]
fn mismatched_close_is_ignored() {
    let regions = parse(&[
        "<!-- ko -->",    // 0
        "<!-- /ko 3 -->", // 1
        "x",              // 2
        "<!-- /ko -->",   // 3
    ]);
    assert_eq!(regions, vec![r(1, 0, 3, 0)]);
}

#[cfg(feature = "outlining")]
#[test]
fn explicit_close_level() {
    let regions = parse(&[
        "<!-- ko -->",    // 0
        "<!-- ko -->",    // 1
        "<!-- /ko 2 -->", // 2
        "<!-- /ko 1 -->", // 3
    ]);
    assert_eq!(regions, vec![r(2, 1, 2, 0), r(1, 0, 3, 0)]);
}

#[cfg(feature = "outlining")]
#[test]
fn unterminated_and_unopened_markers_produce_nothing() {
    assert_eq!(parse(&["<!-- ko if: x -->", "text"]), vec![]);
    assert_eq!(parse(&["text", "<!-- /ko -->"]), vec![]);
    assert_eq!(
        parse(&["<!-- ko -->", "<!-- ko -->", "<!-- /ko -->"]),
        vec![r(2, 1, 2, 0)]
    );
}

#[cfg(feature = "outlining")]
#[test]
fn compact_markers() {
    assert_eq!(
        parse(&["  <!--ko if: x-->", "<!--/ko-->"]),
        vec![r(1, 0, 1, 2)]
    );
}

#[cfg(feature = "outlining")]
#[test]
fn huge_explicit_level_does_not_break_nesting() {
    let regions = parse(&[
        "<!-- ko 4294967295 -->", // 0
        "<!-- ko -->",            // 1
        "<!-- /ko -->",           // 2
    ]);
    assert_eq!(regions, [r(u32::MAX, 0, 2, 0)]);
}

#[cfg(feature = "outlining")]
#[test]
fn regions_never_end_before_they_start() {
    let regions = parse(&[
        "<!-- ko 1 -->",
        "<!-- ko -->",
        "<!-- /ko 5 -->",
        "<!-- ko 2 -->",
        "<!-- /ko -->",
        "<!-- ko 1 -->",
        "<!-- /ko -->",
        "<!-- /ko -->",
        "<!-- ko 3 -->",
    ]);
    assert!(!regions.is_empty());
    for region in regions {
        assert!(region.start_line <= region.end_line, "{region:?}");
    }
}

#[cfg(feature = "outlining")]
#[test]
fn tags_carry_hover_text() {
    let buffer = TextBuffer::new("html", 0, &LIST.join("\n"));
    let mut tagger = RegionTagger::new(&buffer);
    tagger.reparse(&buffer);

    let tags = tagger.get_tags(&[lines(0, 4)]);
    assert_eq!(tags.len(), 1);
    let tag = &tags[0];
    assert_eq!(
        tag.hover_text,
        "<!-- ko foreach: items -->\n  <li></li>\n  <!-- /ko -->"
    );
    assert_eq!(tag.binding, "foreach: items");
    assert_eq!(tag.collapsed_form, "<!-- ko -->...<!-- /ko -->");
    assert_eq!(tag.range, Range::new(Position::new(1, 2), Position::new(3, 14)));
    assert!(!tag.is_default_collapsed);
    assert!(tag.is_implementation);
}

#[cfg(feature = "outlining")]
#[test]
fn tags_only_for_intersecting_lines() {
    let buffer = TextBuffer::new("html", 0, &LIST.join("\n"));
    let mut tagger = RegionTagger::new(&buffer);
    tagger.reparse(&buffer);

    assert!(tagger.get_tags(&[]).is_empty());
    assert!(tagger.get_tags(&[lines(0, 0)]).is_empty());
    assert!(tagger.get_tags(&[lines(4, 4)]).is_empty());
    assert_eq!(tagger.get_tags(&[lines(2, 2)]).len(), 1);
    assert_eq!(tagger.get_tags(&[lines(0, 0), lines(4, 4)]).len(), 1);
    assert_eq!(tagger.get_tags(&[lines(3, 90)]).len(), 1);
}

#[cfg(feature = "outlining")]
#[test]
fn tags_wait_for_a_reparse() {
    let mut buffer = TextBuffer::new("html", 0, "");
    let mut tagger = RegionTagger::new(&buffer);
    tagger.reparse(&buffer);

    buffer.set_content(&LIST.join("\n"), 1);
    assert!(tagger.get_tags(&[lines(0, 4)]).is_empty());
    assert_eq!(tagger.snapshot().version(), 0);

    tagger.reparse(&buffer);
    assert_eq!(tagger.get_tags(&[lines(0, 4)]).len(), 1);
}

#[cfg(feature = "outlining")]
#[test]
fn reparse_is_idempotent() {
    let buffer = TextBuffer::new("html", 0, &LIST.join("\n"));
    let mut tagger = RegionTagger::new(&buffer);

    let first = tagger.reparse(&buffer).unwrap();
    assert_eq!(
        first.range,
        Range::new(Position::new(1, 2), Position::new(3, 14))
    );
    let regions = tagger.regions().to_vec();

    assert_eq!(tagger.reparse(&buffer), None);
    assert_eq!(tagger.regions(), regions.as_slice());
}

#[cfg(feature = "outlining")]
#[test]
fn edits_outside_regions_are_not_reported() {
    let mut buffer = TextBuffer::new("html", 0, &LIST.join("\n"));
    let mut tagger = RegionTagger::new(&buffer);
    tagger.reparse(&buffer);

    buffer.update(&[edit((0, 3), (0, 3), " class=\"list\"")], 1);
    assert_eq!(tagger.reparse(&buffer), None);

    buffer.update(&[edit((0, 0), (0, 0), "<h1>Items</h1>\n\n")], 2);
    assert_eq!(tagger.reparse(&buffer), None);

    buffer.update(&[edit((6, 5), (6, 5), "\n<p>footer</p>")], 3);
    assert_eq!(tagger.reparse(&buffer), None);
    assert_eq!(tagger.regions(), &[r(1, 3, 5, 2)]);
}

#[cfg(feature = "outlining")]
#[test]
fn removed_region_is_reported() {
    let mut buffer = TextBuffer::new("html", 0, &LIST.join("\n"));
    let mut tagger = RegionTagger::new(&buffer);
    let mut changes = tagger.subscribe();
    tagger.reparse(&buffer);
    assert!(changes.try_recv().is_ok());

    // drop the closing comment
    buffer.update(&[edit((3, 2), (3, 14), "")], 1);
    let changed = tagger.reparse(&buffer).unwrap();
    assert!(tagger.regions().is_empty());
    assert_eq!(changed.version, 1);
    assert_eq!(changed.range.start, Position::new(1, 2));
    assert_eq!(changes.try_recv().ok(), Some(changed));
}

#[cfg(feature = "outlining")]
#[test]
fn changed_range_covers_old_and_new_regions() {
    let mut buffer = TextBuffer::new("html", 0, &LIST.join("\n"));
    let mut tagger = RegionTagger::new(&buffer);
    tagger.reparse(&buffer);

    // a second list below the first one
    buffer.update(
        &[edit(
            (4, 5),
            (4, 5),
            "\n<ol>\n  <!-- ko foreach: more -->\n  <li></li>\n  <!-- /ko -->\n</ol>",
        )],
        1,
    );
    let changed = tagger.reparse(&buffer).unwrap();
    assert_eq!(tagger.regions().len(), 2);
    assert_eq!(changed.range.start, Position::new(1, 2));
    assert_eq!(changed.range.end, Position::new(8, 14));
}

#[cfg(feature = "outlining")]
#[test]
fn nested_region_removal_is_reported() {
    let mut buffer = TextBuffer::new(
        "html",
        0,
        &[
            "<!-- ko if: a -->", // 0
            "<!-- ko if: b -->", // 1
            "<!-- /ko -->",      // 2
            "<!-- /ko -->",      // 3
        ]
        .join("\n"),
    );
    let mut tagger = RegionTagger::new(&buffer);
    tagger.reparse(&buffer);
    assert_eq!(tagger.regions().len(), 2);

    // the inner end marker now closes the outer region
    buffer.update(&[edit((1, 0), (1, 17), "text")], 1);
    assert!(tagger.reparse(&buffer).is_some());
    assert_eq!(tagger.regions(), &[r(1, 0, 2, 0)]);
}

#[cfg(feature = "outlining")]
#[test]
fn translated_spans_follow_edits() {
    let mut buffer = TextBuffer::new("html", 0, "abc\ndef");
    buffer.update(&[edit((0, 0), (0, 0), "xx")], 1);
    buffer.update(&[edit((1, 0), (1, 1), "")], 2);
    assert_eq!(buffer.translate_span(Span::new(4, 7), 0), Span::new(6, 8));
    assert_eq!(buffer.current_snapshot().text(), "xxabc\nef");
}

#[cfg(feature = "outlining")]
#[tokio::test]
async fn worker_follows_buffer_changes() {
    let buffer = Arc::new(RwLock::new(TextBuffer::new("html", 0, &LIST.join("\n"))));
    let worker = HTMLLanguageService::create_outlining_worker(Arc::clone(&buffer)).await;
    let tagger = worker.tagger();
    let mut changes = tagger.write().await.subscribe();
    let handle = tokio::spawn(worker.run());

    let first = changes.recv().await.unwrap();
    assert_eq!(first.version, 0);
    assert_eq!(tagger.read().await.regions().len(), 1);

    buffer
        .write()
        .await
        .update(&[edit((4, 5), (4, 5), "\n<p></p>")], 1);
    buffer
        .write()
        .await
        .update(&[edit((3, 2), (3, 14), "")], 2);

    let next = changes.recv().await.unwrap();
    assert_eq!(next.version, 2);
    assert!(tagger.read().await.regions().is_empty());

    buffer.write().await.detach();
    handle.await.unwrap();
    assert_eq!(buffer.read().await.history_len(), 0);
}

#[cfg(feature = "outlining")]
#[tokio::test]
async fn worker_does_not_hold_the_buffer_while_waiting_for_the_tagger() {
    let buffer = Arc::new(RwLock::new(TextBuffer::new("html", 0, &LIST.join("\n"))));
    let worker = HTMLLanguageService::create_outlining_worker(Arc::clone(&buffer)).await;
    let tagger = worker.tagger();
    let mut changes = tagger.write().await.subscribe();
    let handle = tokio::spawn(worker.run());
    assert_eq!(changes.recv().await.unwrap().version, 0);

    buffer
        .write()
        .await
        .update(&[edit((3, 2), (3, 14), "")], 1);

    // let the worker pick up the change and queue for the tagger
    let tags = tagger.read().await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    tokio::time::timeout(Duration::from_secs(5), async {
        buffer
            .write()
            .await
            .update(&[edit((4, 5), (4, 5), "\n<p></p>")], 2);
    })
    .await
    .unwrap();
    drop(tags);

    assert_eq!(changes.recv().await.unwrap().version, 1);

    buffer.write().await.detach();
    handle.await.unwrap();
    assert!(tagger.read().await.regions().is_empty());
    assert_eq!(tagger.read().await.snapshot().version(), 2);
    assert_eq!(buffer.read().await.history_len(), 0);
}

#[cfg(feature = "outlining")]
#[tokio::test]
async fn worker_keeps_the_edit_history_short() {
    let buffer = Arc::new(RwLock::new(TextBuffer::new("html", 0, &LIST.join("\n"))));
    let worker = HTMLLanguageService::create_outlining_worker(Arc::clone(&buffer)).await;
    let handle = tokio::spawn(worker.run());

    for version in 1..=200 {
        buffer
            .write()
            .await
            .update(&[edit((4, 5), (4, 5), " ")], version);
        tokio::task::yield_now().await;
        assert!(buffer.read().await.history_len() <= 4);
    }

    buffer.write().await.detach();
    handle.await.unwrap();
    assert_eq!(buffer.read().await.history_len(), 0);
}
