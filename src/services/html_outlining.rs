use std::cmp::Ordering;

use lsp_types::{FoldingRange, FoldingRangeKind};

use crate::outlining::region_tagger::{RegionTagger, COLLAPSED_FORM};

/// Knockout regions of the last parse as LSP folding ranges
pub fn get_folding_ranges(
    tagger: &RegionTagger,
    context: &FoldingRangeContext,
) -> Vec<FoldingRange> {
    let snapshot = tagger.snapshot();
    let mut ranges: Vec<FoldingRange> = tagger
        .regions()
        .iter()
        .filter(|region| region.end_line > region.start_line)
        .map(|region| {
            let line_start = snapshot.line_start(region.start_line);
            let start = snapshot.position_at(line_start + region.start_offset);
            FoldingRange {
                start_line: region.start_line as u32,
                start_character: Some(start.character),
                end_line: region.end_line as u32,
                kind: Some(FoldingRangeKind::Region),
                collapsed_text: Some(COLLAPSED_FORM.to_string()),
                ..Default::default()
            }
        })
        .collect();

    ranges.sort_by(|r1, r2| {
        let order = r1.start_line.cmp(&r2.start_line);
        if order == Ordering::Equal {
            r2.end_line.cmp(&r1.end_line)
        } else {
            order
        }
    });

    let range_limit = context.range_limit.unwrap_or(usize::MAX);
    if ranges.len() > range_limit {
        limit_ranges(ranges, range_limit)
    } else {
        ranges
    }
}

/// Keep at most `range_limit` ranges, dropping the most deeply nested first.
///
/// `ranges` must be sorted by start line, outer ranges first.
fn limit_ranges(ranges: Vec<FoldingRange>, range_limit: usize) -> Vec<FoldingRange> {
    // end lines of the ranges enclosing the current one
    let mut open: Vec<u32> = vec![];
    let mut nesting_levels = Vec::with_capacity(ranges.len());
    let mut nesting_level_counts: Vec<usize> = vec![];

    for range in &ranges {
        while open.last().is_some_and(|end| range.start_line > *end) {
            open.pop();
        }
        let level = open.len();
        open.push(range.end_line);
        nesting_levels.push(level);
        if nesting_level_counts.len() <= level {
            nesting_level_counts.resize(level + 1, 0);
        }
        nesting_level_counts[level] += 1;
    }

    // deepest level that still fits, it may only fit partially
    let mut entries = 0;
    let mut max_level = nesting_level_counts.len();
    for (level, count) in nesting_level_counts.iter().enumerate() {
        if entries + count > range_limit {
            max_level = level;
            break;
        }
        entries += count;
    }

    let mut result = vec![];
    for (range, level) in ranges.into_iter().zip(nesting_levels) {
        if level < max_level {
            result.push(range);
        } else if level == max_level && entries < range_limit {
            result.push(range);
            entries += 1;
        }
    }
    result
}

#[derive(Debug, Default, Clone)]
pub struct FoldingRangeContext {
    pub range_limit: Option<usize>,
}
