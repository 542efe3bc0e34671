//! Locating ancestor paths by position or token range.

use tower_lsp::lsp_types::{Position, Range};

use crate::syntax::node::{Node, NodeId, SyntaxTree};
use crate::syntax::token::{TokenId, position_lt, range_contains};
use crate::syntax::walk::{WalkOptions, inspect};

/// Node kinds that open a resolution scope; paths reported by the locators
/// below always end at one of these (or at a sub-node the special cases
/// insert).
fn is_scope_kind(node: &Node) -> bool {
    matches!(
        node,
        Node::Import(_)
            | Node::Syntax(_)
            | Node::Message(_)
            | Node::Enum(_)
            | Node::EnumValue(_)
            | Node::Service(_)
            | Node::Rpc(_)
            | Node::Extend(_)
            | Node::Option(_)
            | Node::MessageLiteral(_)
            | Node::OptionName(_)
            | Node::MessageField(_)
            | Node::CompactOptions(_)
            | Node::Field(_)
            | Node::FieldReference(_)
            | Node::RpcType(_)
            | Node::Package(_)
            | Node::Error(_)
    )
}

fn intersects_location(
    tree: &SyntaxTree,
    node: NodeId,
    location: Position,
) -> bool {
    range_contains(tree.node_range(node), location)
}

/// Intersection against `[start, end_exclusive)` where the upper bound is
/// the end of the terminator token. A missing or virtual terminator falls
/// back to the node's inclusive span.
fn intersects_location_exclusive(
    tree: &SyntaxTree,
    node: NodeId,
    end: Option<NodeId>,
    location: Position,
) -> bool {
    let Some(end) = end else {
        return intersects_location(tree, node, location);
    };
    if tree.is_virtual_rune(end) {
        return intersects_location(tree, node, location);
    }
    let start = tree.node_range(node).start;
    let end_position = tree.node_range(end).end;
    range_contains(
        Range::new(start, end_position),
        location,
    ) && position_lt(location, end_position)
}

/// Walk the tree and return the longest ancestor path whose innermost node
/// is a recognized scope containing the location. Ties go to the path
/// encountered last, i.e. the deepest subtree reached.
pub fn find_path_intersecting_location(
    tree: &SyntaxTree,
    token_at_offset: Option<TokenId>,
    location: Position,
) -> Option<Vec<NodeId>> {
    let mut paths: Vec<Vec<NodeId>> = Vec::new();

    let options = match token_at_offset {
        Some(token) => WalkOptions::intersecting(token),
        None => WalkOptions::default(),
    };

    inspect(tree, options, &mut |tree, id, tracker| {
        match tree.node(id) {
            Node::Import(import) => {
                if intersects_location_exclusive(tree, id, import.semicolon, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Syntax(syntax) => {
                if intersects_location_exclusive(tree, id, syntax.semicolon, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Message(message) => {
                if intersects_location_exclusive(tree, id, message.close_brace, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Enum(decl) => {
                if intersects_location_exclusive(tree, id, decl.close_brace, location) {
                    paths.push(tracker.path());
                }
            },
            Node::EnumValue(value) => {
                if intersects_location_exclusive(tree, id, value.semicolon, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Service(service) => {
                if intersects_location_exclusive(tree, id, service.close_brace, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Rpc(rpc) => {
                // An RPC is terminated by either a semicolon or a body's
                // closing brace; both bound the scope.
                if let Some(end) = rpc.semicolon.or(rpc.close_brace)
                    && intersects_location_exclusive(tree, id, Some(end), location)
                {
                    paths.push(tracker.path());
                }
            },
            Node::Extend(extend) => {
                if extend.is_incomplete() {
                    if intersects_location(tree, id, location) {
                        paths.push(tracker.path());
                    }
                } else if intersects_location_exclusive(tree, id, extend.close_brace, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Option(option) => {
                if intersects_location_exclusive(tree, id, option.semicolon, location) {
                    paths.push(tracker.path());
                }
            },
            Node::MessageLiteral(literal) => {
                if intersects_location_exclusive(tree, id, literal.close, location) {
                    paths.push(tracker.path());
                }
            },
            Node::OptionName(_) => {
                if intersects_location(tree, id, location) {
                    paths.push(tracker.path());
                }
            },
            Node::MessageField(field) => {
                if intersects_location(tree, id, location) {
                    paths.push(tracker.path());
                }
                // The separator rune has no children, so the walker will
                // not go past it; report the path as ending at the field
                // reference so keys still resolve with the cursor on `:`.
                if let Some(sep) = field.sep
                    && let Node::Rune(rune) = tree.node(sep)
                    && token_at_offset == Some(rune.token)
                {
                    let mut path = tracker.path();
                    path.push(field.name);
                    paths.push(path);
                }
            },
            Node::CompactOptions(options) => {
                if intersects_location_exclusive(tree, id, options.close_bracket, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Field(field) => {
                if intersects_location_exclusive(tree, id, field.semicolon, location) {
                    paths.push(tracker.path());
                }
            },
            Node::FieldReference(_) => {
                if intersects_location(tree, id, location) {
                    paths.push(tracker.path());
                }
            },
            Node::RpcType(rpc_type) => {
                if intersects_location_exclusive(tree, id, rpc_type.close_paren, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Package(package) => {
                if intersects_location_exclusive(tree, id, package.semicolon, location) {
                    paths.push(tracker.path());
                }
            },
            Node::Error(_) => {
                if intersects_location(tree, id, location) {
                    paths.push(tracker.path());
                }
            },
            _ => {},
        }
        true
    });

    let mut longest: Option<Vec<NodeId>> = None;
    for path in paths {
        if longest.as_ref().is_none_or(|best| path.len() >= best.len()) {
            longest = Some(path);
        }
    }
    longest
}

/// The full root-to-leaf ancestor path of the node owning a token,
/// terminal nodes included. Position queries hand this to the descriptor
/// resolver; the scope-limited paths above serve features that want
/// enclosing declarations instead.
pub fn ancestor_path_at_token(
    tree: &SyntaxTree,
    token: TokenId,
) -> Option<Vec<NodeId>> {
    let mut deepest: Option<Vec<NodeId>> = None;
    inspect(tree, WalkOptions::intersecting(token), &mut |_, _, tracker| {
        if deepest.as_ref().is_none_or(|best| tracker.depth() >= best.len()) {
            deepest = Some(tracker.path());
        }
        true
    });
    deepest
}

/// Collect the ancestor paths of every scope node intersecting the token
/// range, trimmed to the deepest coverings.
pub fn find_paths_enclosing_range(
    tree: &SyntaxTree,
    start: TokenId,
    end: TokenId,
) -> Option<Vec<Vec<NodeId>>> {
    let mut paths: Vec<Vec<NodeId>> = Vec::new();

    inspect(tree, WalkOptions::range(start, end), &mut |tree, id, tracker| {
        match tree.node(id) {
            Node::File(_) => true,
            node if is_scope_kind(node) => {
                if paths.last().is_none_or(|last| tracker.depth() >= last.len()) {
                    paths.push(tracker.path());
                }
                true
            },
            _ => false,
        }
    });

    if paths.is_empty() {
        return None;
    }

    let mut lower_bound = paths.len() - 1;
    for i in (0..paths.len() - 1).rev() {
        if paths[i].len() < paths[lower_bound].len() {
            break;
        }
        lower_bound = i;
    }
    Some(paths.split_off(lower_bound))
}
