//! Interfaces to the external parser and linker.
//!
//! The lexer, parser, and linker are collaborators; the position-query
//! algorithms consume their results through these traits without
//! prescribing how they are built.

use std::sync::Arc;

use tower_lsp::lsp_types::Range;

use crate::descriptor::graph::{Descriptor, FieldDescriptor, FileDescriptor, MessageDescriptor};
use crate::descriptor::proto::{ProtoDescriptor, UninterpretedOption, UninterpretedOptionNamePart};
use crate::syntax::{NodeId, SyntaxTree};

/// Output of parsing one file: the syntax tree plus the mapping from nodes
/// to the descriptor messages they were parsed into.
pub trait ParseResult: Send + Sync {
    fn ast(&self) -> &SyntaxTree;

    /// The descriptor message a node was parsed into, if any.
    fn proto_descriptor(
        &self,
        node: NodeId,
    ) -> Option<ProtoDescriptor<'_>>;
}

/// Output of linking one file against its dependencies.
pub trait LinkResult: ParseResult {
    fn parent_file(&self) -> Arc<FileDescriptor>;

    /// Placeholder results stand in for files that failed to load; they
    /// are skipped by workspace-wide queries.
    fn is_placeholder(&self) -> bool {
        false
    }

    /// The field an uninterpreted option assigns, resolved through the
    /// option's full name path.
    fn find_option_field_descriptor(
        &self,
        option: &UninterpretedOption,
    ) -> Option<Arc<FieldDescriptor>>;

    /// The field one segment of an option name denotes.
    fn find_option_name_field_descriptor(
        &self,
        part: &UninterpretedOptionNamePart,
    ) -> Option<Arc<FieldDescriptor>>;

    /// Resolve the extendee of an `extend` statement by fully qualified
    /// name.
    fn find_extendee_descriptor_by_name(
        &self,
        full_name: &str,
    ) -> Option<Arc<MessageDescriptor>>;

    /// Resolve a `[type.googleapis.com/…]` reference node to the message
    /// it names.
    fn find_message_descriptor_by_type_reference_url(
        &self,
        node: NodeId,
    ) -> Option<Arc<MessageDescriptor>>;

    /// Resolve a `[path.to.extension]` message-literal key to a fully
    /// qualified name (with leading dot), or `None` if unknown.
    fn resolve_message_literal_extension_name(
        &self,
        name: &str,
    ) -> Option<String>;

    fn find_descriptor_by_name(
        &self,
        full_name: &str,
    ) -> Option<Descriptor>;

    /// All nodes in this file that reference the descriptor.
    fn find_references(
        &self,
        descriptor: &Descriptor,
    ) -> Vec<NodeReference>;

    /// The declaration node of a descriptor defined in this file.
    fn decl_node(
        &self,
        descriptor: &Descriptor,
    ) -> Option<NodeId>;
}

/// A node in a particular file, as returned by definition and reference
/// queries.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeReference {
    /// Canonical path of the file containing the node.
    pub file: String,
    pub node: NodeId,
    pub range: Range,
}

impl NodeReference {
    pub fn new(
        file: impl Into<String>,
        node: NodeId,
        range: Range,
    ) -> Self {
        Self {
            file: file.into(),
            node,
            range,
        }
    }

    /// Stable key used to deduplicate references across files.
    pub fn key(&self) -> String {
        format!(
            "{}:{}:{}-{}:{}",
            self.file, self.range.start.line, self.range.start.character, self.range.end.line,
            self.range.end.character,
        )
    }
}
