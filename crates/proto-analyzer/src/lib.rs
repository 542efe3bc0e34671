pub mod config;
pub mod descriptor;
pub mod error;
pub mod link;
pub mod resolver;
pub mod search;
pub mod syntax;

pub use config::ResolverOptions;
pub use descriptor::{Descriptor, FieldKind, FileDescriptor, MessageDescriptor};
pub use error::{ResolveError, SearchError};
pub use link::{LinkResult, NodeReference, ParseResult};
pub use resolver::{
    DescriptorPrinter, FileAction, FileModification, ImportContext, ImportSource, Resolver, SearchResult,
    SearchSource, WorkspaceFolder,
};
pub use search::{
    SemanticItem, TokenLanguage, ancestor_path_at_token, deep_path_search, find_definition,
    find_narrowest_semantic_token, find_node_references, find_path_intersecting_location,
    find_paths_enclosing_range,
};
pub use syntax::{Node, NodeId, SourceSpan, SyntaxTree, SyntaxTreeBuilder, TokenId};
