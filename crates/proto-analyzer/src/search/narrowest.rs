//! Narrowest-token lookup over the semantic token stream.

use tower_lsp::lsp_types::Position;

use crate::syntax::{Node, NodeId, SyntaxTree};

/// Which grammar a semantic token belongs to. Option values may embed
/// expression snippets in a different language; those never resolve to
/// proto descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLanguage {
    Proto,
    Cel,
}

/// One entry of the flat semantic token array, ordered by position.
#[derive(Debug, Clone, Copy)]
pub struct SemanticItem {
    pub line: u32,
    pub start: u32,
    pub len: u32,
    pub node: Option<NodeId>,
    pub lang: TokenLanguage,
}

/// Find the narrowest proto token containing the position that has an
/// associated non-rune node. The cursor may sit at the end of a token and
/// still select it, matching common editor behavior.
pub fn find_narrowest_semantic_token(
    tree: &SyntaxTree,
    tokens: &[SemanticItem],
    position: Position,
) -> Option<SemanticItem> {
    for token in tokens {
        if token.lang != TokenLanguage::Proto {
            continue;
        }
        if token.line != position.line {
            if token.line > position.line {
                break;
            }
            continue;
        }
        if token.len == 0 {
            continue;
        }
        if token.start + token.len < position.character {
            continue;
        }
        if token.start > position.character {
            break;
        }
        let Some(node) = token.node else {
            continue;
        };
        if matches!(tree.node(node), Node::Rune(_)) {
            continue;
        }
        return Some(*token);
    }
    None
}

#[cfg(test)]
#[path = "../../tests/src/search/narrowest_tests.rs"]
mod tests;
