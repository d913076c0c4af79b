use std::sync::Arc;

use lsp_types::Range;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::region_parser::{binding_text, parse_regions, Region};
use crate::text::{
    span::{Span, SpanSet},
    text_buffer::{TextSnapshot, TextSource},
};

/// Text shown in place of a collapsed region
pub const COLLAPSED_FORM: &str = "<!-- ko -->...<!-- /ko -->";

/// A region ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutliningTag {
    pub range: Range,
    pub span: Span,
    pub level: u32,
    pub collapsed_form: &'static str,
    /// Source text from the opening marker to the end of the closing line
    pub hover_text: String,
    /// Binding of the opening comment, empty if there is none
    pub binding: String,
    pub is_default_collapsed: bool,
    pub is_implementation: bool,
}

/// Everything inside `range` must be redrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagsChanged {
    pub version: i32,
    pub span: Span,
    pub range: Range,
}

/// A parse result, the snapshot and the regions found in it always travel together
#[derive(Debug)]
struct OutliningState {
    snapshot: Arc<TextSnapshot>,
    regions: Vec<Region>,
}

/// Tracks the knockout comment regions of one buffer
pub struct RegionTagger {
    state: Arc<OutliningState>,
    listeners: Vec<UnboundedSender<TagsChanged>>,
}

impl RegionTagger {
    /// The tagger starts without regions, call `reparse` to fill it
    pub fn new(source: &impl TextSource) -> RegionTagger {
        RegionTagger {
            state: Arc::new(OutliningState {
                snapshot: source.current_snapshot(),
                regions: vec![],
            }),
            listeners: vec![],
        }
    }

    /// The snapshot of the last completed parse
    pub fn snapshot(&self) -> Arc<TextSnapshot> {
        Arc::clone(&self.state.snapshot)
    }

    pub fn regions(&self) -> &[Region] {
        &self.state.regions
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<TagsChanged> {
        let (sender, receiver) = unbounded_channel();
        self.listeners.push(sender);
        receiver
    }

    /// Parse the current content of `source` and replace the state.
    ///
    /// Returns the notification sent to subscribers, `None` if no region changed.
    pub fn reparse(&mut self, source: &impl TextSource) -> Option<TagsChanged> {
        let new_snapshot = source.current_snapshot();
        let new_regions = parse_regions(&new_snapshot);

        let old_version = self.state.snapshot.version();
        let old_spans = SpanSet::new(self.state.regions.iter().map(|region| {
            source.translate_span(region_span(region, &self.state.snapshot), old_version)
        }));
        let new_spans = SpanSet::new(
            new_regions
                .iter()
                .map(|region| region_span(region, &new_snapshot)),
        );

        let changed = old_spans
            .symmetric_difference(&new_spans)
            .bounds()
            .map(|changed| match new_spans.bounds() {
                Some(all) => changed.union(&all),
                None => changed,
            });

        tracing::debug!(
            version = new_snapshot.version(),
            regions = new_regions.len(),
            changed = ?changed,
            "Reparsed outlining regions"
        );

        self.state = Arc::new(OutliningState {
            snapshot: new_snapshot,
            regions: new_regions,
        });

        let changed = changed?;
        let snapshot = &self.state.snapshot;
        let event = TagsChanged {
            version: snapshot.version(),
            span: changed,
            range: Range::new(
                snapshot.position_at(changed.start),
                snapshot.position_at(changed.end),
            ),
        };
        self.listeners.retain(|listener| listener.send(event).is_ok());
        Some(event)
    }

    /// Tags for every region crossing the lines covered by `ranges`.
    ///
    /// Only the last completed parse is consulted, line numbers in `ranges`
    /// refer to its snapshot.
    pub fn get_tags(&self, ranges: &[Range]) -> Vec<OutliningTag> {
        if ranges.is_empty() {
            return vec![];
        }

        let state = Arc::clone(&self.state);
        let snapshot = &state.snapshot;
        let last_line = snapshot.line_count() - 1;
        let start_line = ranges
            .iter()
            .map(|r| r.start.line as usize)
            .min()
            .unwrap_or(0)
            .min(last_line);
        let end_line = ranges
            .iter()
            .map(|r| r.end.line as usize)
            .max()
            .unwrap_or(0)
            .min(last_line);

        state
            .regions
            .iter()
            .filter(|region| region.start_line <= end_line && region.end_line >= start_line)
            .map(|region| {
                let span = region_span(region, snapshot);
                let hover_text = snapshot.get_text(span).to_string();
                OutliningTag {
                    range: Range::new(
                        snapshot.position_at(span.start),
                        snapshot.position_at(span.end),
                    ),
                    span,
                    level: region.level,
                    collapsed_form: COLLAPSED_FORM,
                    binding: binding_text(hover_text.lines().next().unwrap_or_default()),
                    hover_text,
                    is_default_collapsed: false,
                    is_implementation: true,
                }
            })
            .collect()
    }
}

/// From the opening marker to the end of the closing line
fn region_span(region: &Region, snapshot: &TextSnapshot) -> Span {
    let start = snapshot.line_start(region.start_line) + region.start_offset;
    let end = snapshot.line_end(region.end_line);
    Span::new(start.min(end), end)
}
