use tower_lsp::lsp_types::Position;

use super::{SemanticItem, TokenLanguage, find_narrowest_semantic_token};
use crate::syntax::SyntaxTreeBuilder;

fn fixture() -> (crate::syntax::SyntaxTree, crate::syntax::NodeId, crate::syntax::NodeId) {
    let mut builder = SyntaxTreeBuilder::new();
    let t_name = builder.token("Foo", 0, 8);
    let t_brace = builder.token("{", 0, 12);
    let ident = builder.ident(t_name);
    let brace = builder.rune(t_brace);
    let tree = builder.file(None, vec![]);
    (tree, ident, brace)
}

fn item(
    line: u32,
    start: u32,
    len: u32,
    node: Option<crate::syntax::NodeId>,
    lang: TokenLanguage,
) -> SemanticItem {
    SemanticItem {
        line,
        start,
        len,
        node,
        lang,
    }
}

#[test]
fn selects_token_under_cursor() {
    let (tree, ident, _) = fixture();
    let tokens = vec![item(0, 8, 3, Some(ident), TokenLanguage::Proto)];
    let found = find_narrowest_semantic_token(&tree, &tokens, Position::new(0, 9)).unwrap();
    assert_eq!(found.node, Some(ident));
}

#[test]
fn caret_just_past_token_still_selects_it() {
    let (tree, ident, _) = fixture();
    let tokens = vec![item(0, 8, 3, Some(ident), TokenLanguage::Proto)];
    let found = find_narrowest_semantic_token(&tree, &tokens, Position::new(0, 11)).unwrap();
    assert_eq!(found.node, Some(ident));
}

#[test]
fn caret_one_further_does_not_select() {
    let (tree, ident, _) = fixture();
    let tokens = vec![item(0, 8, 3, Some(ident), TokenLanguage::Proto)];
    assert!(find_narrowest_semantic_token(&tree, &tokens, Position::new(0, 12)).is_none());
}

#[test]
fn skips_rune_tokens() {
    let (tree, _, brace) = fixture();
    let tokens = vec![item(0, 12, 1, Some(brace), TokenLanguage::Proto)];
    assert!(find_narrowest_semantic_token(&tree, &tokens, Position::new(0, 12)).is_none());
}

#[test]
fn skips_tokens_without_node_and_zero_length() {
    let (tree, ident, _) = fixture();
    let tokens = vec![
        item(0, 8, 0, Some(ident), TokenLanguage::Proto),
        item(0, 8, 3, None, TokenLanguage::Proto),
    ];
    assert!(find_narrowest_semantic_token(&tree, &tokens, Position::new(0, 9)).is_none());
}

#[test]
fn ignores_embedded_language_tokens() {
    let (tree, ident, _) = fixture();
    let tokens = vec![item(0, 8, 3, Some(ident), TokenLanguage::Cel)];
    assert!(find_narrowest_semantic_token(&tree, &tokens, Position::new(0, 9)).is_none());
}

#[test]
fn stops_after_passing_the_target_line() {
    let (tree, ident, _) = fixture();
    let tokens = vec![
        item(2, 0, 3, Some(ident), TokenLanguage::Proto),
        item(3, 0, 3, Some(ident), TokenLanguage::Proto),
    ];
    assert!(find_narrowest_semantic_token(&tree, &tokens, Position::new(1, 0)).is_none());
}
