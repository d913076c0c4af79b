use lazy_static::lazy_static;
use regex::Regex;

use crate::text::text_buffer::TextSnapshot;

lazy_static! {
    static ref REG_START: Regex = Regex::new(r"<!-- ?ko").unwrap();
    static ref REG_END: Regex = Regex::new(r"/ko(?:[ \t]+\d+)?[ \t]?-->").unwrap();
    static ref REG_LEVEL: Regex = Regex::new(r"^[ \t]+(\d+)(?:[ \t-]|$)").unwrap();
    static ref REG_BINDING: Regex = Regex::new(r"ko\b(.*?)-->").unwrap();
}

/// A foldable region closed by a matching end marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub level: u32,
    pub start_line: usize,
    pub end_line: usize,
    /// Offset of the opening marker inside `start_line`
    pub start_offset: usize,
}

#[derive(Debug, Clone, Copy)]
struct PartialRegion {
    level: u32,
    start_line: usize,
    start_offset: usize,
}

impl PartialRegion {
    fn close(self, end_line: usize) -> Region {
        Region {
            level: self.level,
            start_line: self.start_line,
            end_line,
            start_offset: self.start_offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Start { offset: usize, level: Option<u32> },
    End { offset: usize, level: Option<u32> },
}

/// Scan a single line for a region marker, start markers win
fn find_marker(text: &str) -> Option<Marker> {
    if let Some(m) = REG_START.find(text) {
        return Some(Marker::Start {
            offset: m.start(),
            level: explicit_level(&text[m.end()..]),
        });
    }
    let m = REG_END.find(text)?;
    // "/ko" is three bytes, any explicit level sits right after it
    Some(Marker::End {
        offset: m.start(),
        level: explicit_level(&text[m.start() + 3..]),
    })
}

/// Level written right after the marker keyword, `rest` starts after `ko`.
///
/// Accepted: `<!-- ko 2 -->`, `<!-- ko 2 foreach: x -->`, `<!-- /ko 2 -->`,
/// `<!--/ko 2-->`. The number needs whitespace before it, so `<!-- ko2 -->`
/// and bindings such as `<!-- ko if: 1 -->` carry no level. Zero and
/// numbers that do not fit a `u32` count as no level.
fn explicit_level(rest: &str) -> Option<u32> {
    let caps = REG_LEVEL.captures(rest)?;
    caps[1].parse::<u32>().ok().filter(|level| *level > 0)
}

/// Parse every closed region of `snapshot`, in the order they are closed.
///
/// Open regions live on an explicit stack, the innermost on top. Unmatched
/// end markers are ignored and regions left open at the end are dropped.
pub fn parse_regions(snapshot: &TextSnapshot) -> Vec<Region> {
    let mut regions = vec![];
    let mut stack: Vec<PartialRegion> = vec![];

    for (line_number, text) in snapshot.lines() {
        match find_marker(text) {
            Some(Marker::Start { offset, level }) => {
                let current_level = stack.last().map(|r| r.level);
                let Some(new_level) = level.or_else(|| match current_level {
                    Some(l) => l.checked_add(1),
                    None => Some(1),
                }) else {
                    tracing::trace!(line = line_number, "Ignoring region start nested too deep");
                    continue;
                };

                // same level: the open region ends here and a sibling starts
                if current_level == Some(new_level) {
                    if let Some(current) = stack.pop() {
                        regions.push(current.close(line_number));
                    }
                }
                stack.push(PartialRegion {
                    level: new_level,
                    start_line: line_number,
                    start_offset: offset,
                });
            }
            Some(Marker::End { level, .. }) => {
                let Some(current) = stack.last() else {
                    continue;
                };
                let closing_level = level.unwrap_or(current.level);
                if closing_level == current.level {
                    if let Some(current) = stack.pop() {
                        regions.push(current.close(line_number));
                    }
                } else {
                    tracing::trace!(
                        line = line_number,
                        open = current.level,
                        closing = closing_level,
                        "Ignoring mismatched region end"
                    );
                }
            }
            None => {}
        }
    }

    if !stack.is_empty() {
        tracing::trace!(unterminated = stack.len(), "Dropping unterminated regions");
    }

    regions
}

/// The binding written after `ko` on the opening line, e.g. `foreach: items`
pub fn binding_text(text: &str) -> String {
    REG_BINDING
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
