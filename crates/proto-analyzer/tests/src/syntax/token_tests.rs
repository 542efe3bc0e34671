use tower_lsp::lsp_types::{Position, Range};

use super::*;

#[test]
fn byte_offset_round_trips_through_positions() {
    let source = "message Foo {\n  int32 n = 1;\n}\n";
    let offset = byte_offset_from_position(source, Position::new(1, 8)).unwrap();
    assert_eq!(&source[offset..offset + 1], "n");
    assert_eq!(position_from_byte_offset(source, offset), Position::new(1, 8));
}

#[test]
fn byte_offset_counts_utf16_units() {
    // '👍' is two UTF-16 code units and four UTF-8 bytes.
    let source = "// 👍 ok\n";
    let offset = byte_offset_from_position(source, Position::new(0, 6)).unwrap();
    assert_eq!(&source[offset..offset + 2], "ok");
    assert_eq!(position_from_byte_offset(source, offset), Position::new(0, 6));
}

#[test]
fn positions_past_the_last_line_are_rejected() {
    assert!(byte_offset_from_position("one line", Position::new(3, 0)).is_none());
}

#[test]
fn span_containment_is_inclusive() {
    let span = SourceSpan::new(TokenId(1), TokenId(3));
    assert!(span.contains(TokenId(1)));
    assert!(span.contains(TokenId(3)));
    assert!(!span.contains(TokenId(4)));
    assert!(span.intersects(SourceSpan::new(TokenId(3), TokenId(9))));
    assert!(!span.intersects(SourceSpan::new(TokenId(4), TokenId(9))));
}

#[test]
fn range_containment_allows_the_trailing_caret() {
    let range = Range::new(Position::new(2, 4), Position::new(2, 7));
    assert!(range_contains(range, Position::new(2, 7)));
    assert!(!range_contains(range, Position::new(2, 8)));
    assert!(ranges_intersect(range, Range::new(Position::new(2, 7), Position::new(2, 9))));
    assert!(!ranges_intersect(range, Range::new(Position::new(3, 0), Position::new(3, 1))));
}
