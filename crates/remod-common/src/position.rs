//! Line/column lookup for byte offsets.

use memchr::memchr_iter;

/// 1-based line and column of a byte offset, for error display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Precomputed newline index over one source text.
///
/// Built once per file; lookups are a binary search over line starts.
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> LineMap {
        let mut line_starts = vec![0u32];
        for pos in memchr_iter(b'\n', source.as_bytes()) {
            line_starts.push(pos as u32 + 1);
        }
        LineMap { line_starts }
    }

    pub fn position(&self, offset: u32) -> Position {
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Position {
            line: line_index as u32 + 1,
            column: offset - self.line_starts[line_index] + 1,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions() {
        let map = LineMap::new("ab\ncd\n\nef");
        assert_eq!(map.position(0), Position { line: 1, column: 1 });
        assert_eq!(map.position(1), Position { line: 1, column: 2 });
        assert_eq!(map.position(3), Position { line: 2, column: 1 });
        assert_eq!(map.position(6), Position { line: 3, column: 1 });
        assert_eq!(map.position(8), Position { line: 4, column: 2 });
        assert_eq!(map.line_count(), 4);
    }
}
