//! Tree walking with explicit ancestor tracking.

use crate::syntax::node::{NodeId, SyntaxTree};
use crate::syntax::token::TokenId;

/// Maintains the ordered path from the file root to the node currently
/// being visited. Snapshots taken during a walk remain valid after it.
#[derive(Debug, Default)]
pub struct AncestorTracker {
    path: Vec<NodeId>,
}

impl AncestorTracker {
    /// The current root-to-node path, root first.
    pub fn path(&self) -> Vec<NodeId> {
        self.path.clone()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Pruning applied while descending.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkOptions {
    /// Only descend into nodes whose span contains this token.
    pub intersects: Option<TokenId>,
    /// Only visit nodes whose span intersects this token range.
    pub range: Option<(TokenId, TokenId)>,
}

impl WalkOptions {
    pub fn intersecting(token: TokenId) -> Self {
        Self {
            intersects: Some(token),
            range: None,
        }
    }

    pub fn range(
        start: TokenId,
        end: TokenId,
    ) -> Self {
        Self {
            intersects: None,
            range: Some((start, end)),
        }
    }

    fn admits(
        &self,
        tree: &SyntaxTree,
        id: NodeId,
    ) -> bool {
        let span = tree.span(id);
        if let Some(token) = self.intersects
            && !span.contains(token)
        {
            return false;
        }
        if let Some((start, end)) = self.range
            && !(span.start <= end && start <= span.end)
        {
            return false;
        }
        true
    }
}

/// Depth-first visit of every node admitted by `options`, calling `visit`
/// with the tracker positioned at the node. Returning `false` from `visit`
/// skips the node's children.
pub fn inspect(
    tree: &SyntaxTree,
    options: WalkOptions,
    visit: &mut dyn FnMut(&SyntaxTree, NodeId, &AncestorTracker) -> bool,
) {
    let mut tracker = AncestorTracker::default();
    walk(tree, tree.root(), options, &mut tracker, visit);
}

fn walk(
    tree: &SyntaxTree,
    id: NodeId,
    options: WalkOptions,
    tracker: &mut AncestorTracker,
    visit: &mut dyn FnMut(&SyntaxTree, NodeId, &AncestorTracker) -> bool,
) {
    tracker.path.push(id);
    if visit(tree, id, tracker) {
        for child in tree.children(id) {
            if options.admits(tree, child) {
                walk(tree, child, options, tracker, visit);
            }
        }
    }
    tracker.path.pop();
}
