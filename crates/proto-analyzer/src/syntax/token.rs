//! Tokens, spans, and position geometry.

use tower_lsp::lsp_types::{Position, Range};

/// Index of a token in a [`SyntaxTree`](crate::syntax::SyntaxTree)'s token
/// stream. Ordering follows source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub(crate) u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One lexed token with its position. Lines and columns are 0-based;
/// columns count UTF-16 code units, matching editor positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub text: String,
    pub line: u32,
    pub character: u32,
}

impl TokenInfo {
    /// Width of the token in UTF-16 code units.
    pub fn len_utf16(&self) -> u32 {
        self.text.encode_utf16().count() as u32
    }

    pub fn start(&self) -> Position {
        Position::new(self.line, self.character)
    }

    /// Position one past the last character of the token.
    pub fn end(&self) -> Position {
        Position::new(self.line, self.character + self.len_utf16())
    }

    pub fn range(&self) -> Range {
        Range::new(self.start(), self.end())
    }
}

/// Inclusive token span covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: TokenId,
    pub end: TokenId,
}

impl SourceSpan {
    pub fn new(
        start: TokenId,
        end: TokenId,
    ) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
        }
    }

    pub fn of(token: TokenId) -> Self {
        Self {
            start: token,
            end: token,
        }
    }

    pub fn contains(
        &self,
        token: TokenId,
    ) -> bool {
        self.start <= token && token <= self.end
    }

    pub fn intersects(
        &self,
        other: SourceSpan,
    ) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest span covering both.
    pub fn join(
        self,
        other: SourceSpan,
    ) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

pub fn position_le(
    a: Position,
    b: Position,
) -> bool {
    (a.line, a.character) <= (b.line, b.character)
}

pub fn position_lt(
    a: Position,
    b: Position,
) -> bool {
    (a.line, a.character) < (b.line, b.character)
}

/// Whether a position falls inside a range, ends inclusive. Editors treat
/// the caret sitting just past the last character as still "on" the range.
pub fn range_contains(
    range: Range,
    position: Position,
) -> bool {
    position_le(range.start, position) && position_le(position, range.end)
}

/// Whether two ranges overlap (ends inclusive).
pub fn ranges_intersect(
    a: Range,
    b: Range,
) -> bool {
    position_le(a.start, b.end) && position_le(b.start, a.end)
}

/// Byte offset of an editor position in `source`. Character offsets are
/// UTF-16 code-unit counts, per the protocol.
pub fn byte_offset_from_position(
    source: &str,
    position: Position,
) -> Option<usize> {
    let mut lines = source.split('\n');
    let mut byte_offset = 0usize;

    for _ in 0..position.line {
        let line = lines.next()?;
        byte_offset += line.len() + 1;
    }

    let line = lines.next()?;
    let mut utf16_offset = 0u32;
    let mut char_offset = 0usize;
    for ch in line.chars() {
        if utf16_offset >= position.character {
            break;
        }
        utf16_offset += ch.len_utf16() as u32;
        char_offset += ch.len_utf8();
    }

    Some(byte_offset + char_offset)
}

/// Editor position of a byte offset in `source`.
pub fn position_from_byte_offset(
    source: &str,
    byte_offset: usize,
) -> Position {
    let mut remaining = byte_offset.min(source.len());

    for (line_index, line) in source.split('\n').enumerate() {
        if remaining <= line.len() {
            let mut utf16_column = 0u32;
            let mut consumed = 0usize;
            for ch in line.chars() {
                if consumed >= remaining {
                    break;
                }
                utf16_column += ch.len_utf16() as u32;
                consumed += ch.len_utf8();
            }
            return Position::new(line_index as u32, utf16_column);
        }
        remaining = remaining.saturating_sub(line.len() + 1);
    }

    Position::new(0, 0)
}

#[cfg(test)]
#[path = "../../tests/src/syntax/token_tests.rs"]
mod tests;
