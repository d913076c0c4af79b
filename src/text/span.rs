use std::cmp::Ordering;

/// Half-open byte range `[start, end)` into a text snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        if end < start {
            Span { start, end: start }
        } else {
            Span { start, end }
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both
    pub fn union(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A single replacement recorded against a buffer version.
///
/// `[start, old_end)` in the old text became `[start, new_end)` in the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetEdit {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl OffsetEdit {
    pub fn new(start: usize, old_end: usize, new_end: usize) -> OffsetEdit {
        OffsetEdit {
            start,
            old_end,
            new_end,
        }
    }

    /// Map a point across the edit.
    ///
    /// Points inside the replaced text move to the end of the inserted text when
    /// `positive` is set, otherwise to its start.
    pub fn map_point(&self, point: usize, positive: bool) -> usize {
        if point < self.start {
            point
        } else if point > self.old_end {
            point - self.old_end + self.new_end
        } else if positive {
            self.new_end
        } else {
            self.start
        }
    }

    /// Edge exclusive tracking, the span never grows from insertions at its edges
    pub fn map_span(&self, span: Span) -> Span {
        let start = self.map_point(span.start, true);
        let end = self.map_point(span.end, false);
        if end < start {
            // content fully deleted or replaced
            let point = self.map_point(span.start, false);
            Span::new(point, point)
        } else {
            Span::new(start, end)
        }
    }
}

/// Sorted set of distinct spans. Nested and overlapping spans are kept apart,
/// a region inside another region is still its own member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpanSet {
    spans: Vec<Span>,
}

impl SpanSet {
    pub fn new(spans: impl IntoIterator<Item = Span>) -> SpanSet {
        let mut spans: Vec<Span> = spans.into_iter().collect();
        spans.sort_by(compare);
        spans.dedup();
        SpanSet { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn contains(&self, span: &Span) -> bool {
        self.spans.binary_search_by(|probe| compare(probe, span)).is_ok()
    }

    /// Members of `self` that are not members of `other`
    pub fn difference(&self, other: &SpanSet) -> SpanSet {
        SpanSet {
            spans: self
                .spans
                .iter()
                .filter(|span| !other.contains(span))
                .copied()
                .collect(),
        }
    }

    /// Members of exactly one of the two sets
    pub fn symmetric_difference(&self, other: &SpanSet) -> SpanSet {
        SpanSet::new(
            self.difference(other)
                .spans
                .into_iter()
                .chain(other.difference(self).spans),
        )
    }

    /// The smallest span covering every member
    pub fn bounds(&self) -> Option<Span> {
        self.spans
            .iter()
            .copied()
            .reduce(|bounds, span| bounds.union(&span))
    }
}

fn compare(a: &Span, b: &Span) -> Ordering {
    a.start.cmp(&b.start).then(a.end.cmp(&b.end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(pairs: &[(usize, usize)]) -> SpanSet {
        SpanSet::new(pairs.iter().map(|(s, e)| Span::new(*s, *e)))
    }

    #[test]
    fn set_is_sorted_and_deduplicated() {
        let set = spans(&[(10, 20), (0, 5), (10, 20), (12, 15)]);
        assert_eq!(
            set.spans(),
            &[Span::new(0, 5), Span::new(10, 20), Span::new(12, 15)]
        );
    }

    #[test]
    fn nested_member_is_its_own_difference() {
        let old = spans(&[(0, 100), (10, 20)]);
        let new = spans(&[(0, 100)]);
        assert_eq!(old.difference(&new).spans(), &[Span::new(10, 20)]);
        assert!(new.difference(&old).is_empty());
    }

    #[test]
    fn symmetric_difference_of_equal_sets_is_empty() {
        let a = spans(&[(3, 9), (12, 40)]);
        assert!(a.symmetric_difference(&a.clone()).is_empty());
    }

    #[test]
    fn symmetric_difference_bounds() {
        let a = spans(&[(0, 10), (20, 30)]);
        let b = spans(&[(0, 10), (20, 35)]);
        let diff = a.symmetric_difference(&b);
        assert_eq!(diff.spans(), &[Span::new(20, 30), Span::new(20, 35)]);
        assert_eq!(diff.bounds(), Some(Span::new(20, 35)));
        assert_eq!(SpanSet::default().bounds(), None);
    }

    #[test]
    fn edit_before_span_shifts_it() {
        let edit = OffsetEdit::new(2, 2, 7);
        assert_eq!(edit.map_span(Span::new(10, 20)), Span::new(15, 25));
    }

    #[test]
    fn insert_at_edges_is_exclusive() {
        let at_start = OffsetEdit::new(10, 10, 13);
        assert_eq!(at_start.map_span(Span::new(10, 20)), Span::new(13, 23));
        let at_end = OffsetEdit::new(20, 20, 23);
        assert_eq!(at_end.map_span(Span::new(10, 20)), Span::new(10, 20));
    }

    #[test]
    fn delete_covering_span_collapses_it() {
        let edit = OffsetEdit::new(5, 30, 5);
        assert_eq!(edit.map_span(Span::new(10, 20)), Span::new(5, 5));
    }
}
