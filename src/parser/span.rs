use std::fmt;

/// A byte-offset range into the source buffer.
///
/// `start` is inclusive, `end` is exclusive. All AST nodes carry one of these;
/// line/column pairs are derived on demand through [`LineIndex`] only when a
/// diagnostic is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// An empty span anchored at a single offset.
    pub fn at(offset: u32) -> Self {
        Self { start: offset, end: offset }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Slice the source text that produced this span.
    pub fn source_text<'a>(&self, source: &'a str) -> &'a str {
        let start = (self.start as usize).min(source.len());
        let end = (self.end as usize).min(source.len());
        &source[start..end]
    }

    /// Pack into the single 64-bit cell used on the identifier stack.
    pub fn pack(&self) -> u64 {
        ((self.start as u64) << 32) | self.end as u64
    }

    /// Inverse of [`Span::pack`].
    pub fn unpack(packed: u64) -> Self {
        Span {
            start: (packed >> 32) as u32,
            end: (packed & 0xFFFF_FFFF) as u32,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

/// A line/column position, 1-indexed, derived from a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Precomputed newline offsets for offset → line/column translation.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self { line_starts }
    }

    pub fn line_col(&self, offset: u32) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        LineCol {
            line: line + 1,
            column: (offset - self.line_starts[line]) as usize + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_round_trip() {
        let span = Span::new(17, 423);
        assert_eq!(Span::unpack(span.pack()), span);
    }

    #[test]
    fn test_cover() {
        let a = Span::new(10, 20);
        let b = Span::new(15, 30);
        assert_eq!(a.cover(b), Span::new(10, 30));
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_col(0), LineCol { line: 1, column: 1 });
        assert_eq!(index.line_col(3), LineCol { line: 2, column: 1 });
        assert_eq!(index.line_col(4), LineCol { line: 2, column: 2 });
        assert_eq!(index.line_col(6), LineCol { line: 3, column: 1 });
        assert_eq!(index.line_col(7), LineCol { line: 4, column: 1 });
    }
}
