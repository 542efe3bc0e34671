//! Definition and reference lookup for resolved descriptors.

use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::mpsc;
use tracing::debug;

use crate::descriptor::graph::Descriptor;
use crate::error::SearchError;
use crate::link::{LinkResult, NodeReference};
use crate::syntax::Node;

/// Find the AST node declaring a descriptor: the declaration's `Name`
/// sub-node, or the file root for file descriptors.
pub fn find_definition(
    descriptor: &Descriptor,
    link: &dyn LinkResult,
) -> Result<NodeReference, SearchError> {
    let tree = link.ast();

    if let Descriptor::File(file) = descriptor {
        debug!(import = %file.path, "definition is an import");
        return Ok(NodeReference::new(file.path.clone(), tree.root(), tree.node_range(tree.root())));
    }

    let Some(decl) = link.decl_node(descriptor) else {
        return Err(SearchError::MissingDeclaration {
            full_name: descriptor.full_name().to_owned(),
        });
    };
    if matches!(tree.node(decl), Node::NoSource) {
        // Synthesized or loaded from a binary descriptor.
        return Err(SearchError::NoSource);
    }
    let Some(name) = tree.decl_name(decl) else {
        return Err(SearchError::MissingDeclaration {
            full_name: descriptor.full_name().to_owned(),
        });
    };

    Ok(NodeReference::new(link.parent_file().path.clone(), name, tree.node_range(name)))
}

/// Stream every node referencing the descriptor across the workspace.
///
/// One task per non-placeholder file; results are deduplicated by
/// reference key and the channel closes once all tasks finish. Dropping
/// the receiver cancels outstanding producers at their next send.
pub fn find_node_references(
    descriptor: &Descriptor,
    files: &[Arc<dyn LinkResult>],
) -> mpsc::Receiver<NodeReference> {
    let (tx, rx) = mpsc::channel(files.len().max(1));
    let seen: Arc<DashSet<String>> = Arc::new(DashSet::new());

    for result in files {
        if result.is_placeholder() {
            continue;
        }
        let tx = tx.clone();
        let seen = Arc::clone(&seen);
        let result = Arc::clone(result);
        let descriptor = descriptor.clone();
        tokio::spawn(async move {
            for reference in result.find_references(&descriptor) {
                if seen.insert(reference.key()) && tx.send(reference).await.is_err() {
                    return;
                }
            }
        });
    }

    rx
}
