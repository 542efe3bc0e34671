//! Algorithms that bridge source positions to linked descriptors.

pub mod deep_path;
pub mod intersect;
pub mod locate;
pub mod narrowest;

pub use deep_path::deep_path_search;
pub use intersect::{ancestor_path_at_token, find_path_intersecting_location, find_paths_enclosing_range};
pub use locate::{find_definition, find_node_references};
pub use narrowest::{SemanticItem, TokenLanguage, find_narrowest_semantic_token};
