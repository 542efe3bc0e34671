pub mod build;
pub mod node;
pub mod token;
pub mod walk;

pub use build::SyntaxTreeBuilder;
pub use node::{Node, NodeId, SyntaxTree};
pub use token::{SourceSpan, TokenId, TokenInfo};
pub use walk::{AncestorTracker, WalkOptions, inspect};
