use std::sync::Arc;

use lsp_textdocument::FullTextDocument;
use lsp_types::{Position, TextDocumentContentChangeEvent};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::span::{OffsetEdit, Span};

/// Immutable view of the buffer content at one version
#[derive(Debug)]
pub struct TextSnapshot {
    document: FullTextDocument,
}

impl TextSnapshot {
    pub fn new(language_id: &str, version: i32, text: String) -> TextSnapshot {
        TextSnapshot {
            document: FullTextDocument::new(language_id.to_string(), version, text),
        }
    }

    pub fn document(&self) -> &FullTextDocument {
        &self.document
    }

    pub fn version(&self) -> i32 {
        self.document.version()
    }

    pub fn text(&self) -> &str {
        self.document.get_content(None)
    }

    pub fn len(&self) -> usize {
        self.text().len()
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.document.line_count() as usize
    }

    /// Offset of the first character of `line`, clamped to the last line
    pub fn line_start(&self, line: usize) -> usize {
        let line = line.min(self.line_count() - 1);
        self.document.offset_at(Position::new(line as u32, 0)) as usize
    }

    /// Offset of the end of `line`, excluding the line break
    pub fn line_end(&self, line: usize) -> usize {
        let line = line.min(self.line_count() - 1);
        if line + 1 == self.line_count() {
            return self.len();
        }
        let mut end = self.line_start(line + 1);
        let bytes = self.text().as_bytes();
        if end > 0 && bytes[end - 1] == b'\n' {
            end -= 1;
        }
        if end > 0 && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        end.max(self.line_start(line))
    }

    pub fn line_text(&self, line: usize) -> &str {
        &self.text()[self.line_start(line)..self.line_end(line)]
    }

    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        (0..self.line_count()).map(move |line| (line, self.line_text(line)))
    }

    pub fn position_at(&self, offset: usize) -> Position {
        self.document.position_at(offset as u32)
    }

    pub fn offset_at(&self, position: Position) -> usize {
        self.document.offset_at(position) as usize
    }

    pub fn get_text(&self, span: Span) -> &str {
        let text = self.text();
        let end = span.end.min(text.len());
        let start = span.start.min(end);
        text.get(start..end).unwrap_or_default()
    }
}

/// Fired after every accepted edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferChanged {
    pub version: i32,
}

/// What the outlining tracker needs from a buffer
pub trait TextSource {
    fn current_snapshot(&self) -> Arc<TextSnapshot>;

    /// Map `span`, taken from the snapshot at `from_version`, onto the current content
    fn translate_span(&self, span: Span, from_version: i32) -> Span;
}

/// (version after the edits, edits applied to reach that version)
type EditHistory = Vec<(i32, Vec<OffsetEdit>)>;

fn translate(history: &EditHistory, span: Span, from_version: i32) -> Span {
    history
        .iter()
        .filter(|(version, _)| *version > from_version)
        .flat_map(|(_, edits)| edits)
        .fold(span, |span, edit| edit.map_span(span))
}

/// The current snapshot and the edits recorded after some version.
///
/// Detached from the buffer, so it can be parsed after the buffer lock is released.
#[derive(Debug, Clone)]
pub struct BufferState {
    snapshot: Arc<TextSnapshot>,
    history: EditHistory,
}

impl TextSource for BufferState {
    fn current_snapshot(&self) -> Arc<TextSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Spans older than the version the state was taken from are not translated
    fn translate_span(&self, span: Span, from_version: i32) -> Span {
        translate(&self.history, span, from_version)
    }
}

/// Mutable text buffer backed by a `FullTextDocument`.
///
/// Every update records the offset edits it applied so that spans taken from
/// older snapshots can be mapped onto newer ones. The history is kept until
/// `discard_history_through` drops it.
pub struct TextBuffer {
    document: FullTextDocument,
    snapshot: Arc<TextSnapshot>,
    history: EditHistory,
    listeners: Vec<UnboundedSender<BufferChanged>>,
}

impl TextBuffer {
    pub fn new(language_id: &str, version: i32, content: &str) -> TextBuffer {
        let document =
            FullTextDocument::new(language_id.to_string(), version, content.to_string());
        let snapshot = Arc::new(TextSnapshot::new(language_id, version, content.to_string()));
        TextBuffer {
            document,
            snapshot,
            history: vec![],
            listeners: vec![],
        }
    }

    pub fn document(&self) -> &FullTextDocument {
        &self.document
    }

    pub fn version(&self) -> i32 {
        self.snapshot.version()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<BufferChanged> {
        let (sender, receiver) = unbounded_channel();
        self.listeners.push(sender);
        receiver
    }

    /// Apply LSP content changes, in order, and move to `version`.
    ///
    /// Updates that do not move the version forward are dropped.
    pub fn update(&mut self, changes: &[TextDocumentContentChangeEvent], version: i32) {
        if version <= self.version() {
            tracing::warn!(
                current = self.version(),
                version,
                "Ignoring buffer update with a stale version"
            );
            return;
        }

        let mut edits = Vec::with_capacity(changes.len());
        for change in changes {
            let old_len = self.document.get_content(None).len();
            let (start, old_end) = match change.range {
                Some(range) => {
                    let start = self.document.offset_at(range.start) as usize;
                    let end = self.document.offset_at(range.end) as usize;
                    (start.min(old_len), end.clamp(start, old_len))
                }
                None => (0, old_len),
            };
            self.document.update(std::slice::from_ref(change), version);
            edits.push(OffsetEdit::new(start, old_end, start + change.text.len()));
        }

        self.history.push((version, edits));
        self.snapshot = Arc::new(TextSnapshot::new(
            self.document.language_id(),
            version,
            self.document.get_content(None).to_string(),
        ));

        let event = BufferChanged { version };
        self.listeners.retain(|listener| listener.send(event).is_ok());
    }

    /// The current snapshot with the edits needed to translate spans from `version`
    pub fn state_since(&self, version: i32) -> BufferState {
        BufferState {
            snapshot: Arc::clone(&self.snapshot),
            history: self
                .history
                .iter()
                .filter(|(v, _)| *v > version)
                .cloned()
                .collect(),
        }
    }

    /// Forget the edits up to and including `version`.
    ///
    /// Spans from snapshots at or before `version` can no longer be translated.
    pub fn discard_history_through(&mut self, version: i32) {
        self.history.retain(|(v, _)| *v > version);
    }

    /// Number of versions whose edits are still recorded
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drop every subscriber, their receivers see the channel close
    pub fn detach(&mut self) {
        self.listeners.clear();
    }

    /// Replace the whole content
    pub fn set_content(&mut self, content: &str, version: i32) {
        self.update(
            &[TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: content.to_string(),
            }],
            version,
        );
    }
}

impl TextSource for TextBuffer {
    fn current_snapshot(&self) -> Arc<TextSnapshot> {
        Arc::clone(&self.snapshot)
    }

    fn translate_span(&self, span: Span, from_version: i32) -> Span {
        translate(&self.history, span, from_version)
    }
}
