//! Error values returned by position queries and import resolution.

use thiserror::Error;

/// Failure of a position query against the descriptor graph.
///
/// `NoDescriptor` and `UnresolvedDescriptor` are expected outcomes for many
/// cursor placements (punctuation, keywords, map keys); callers translate
/// them into empty responses and keep the details in debug logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The position maps to no semantic entity.
    #[error("no descriptor at this position")]
    NoDescriptor,

    /// A refinement rule could not produce a descriptor for a node it
    /// should have. Carries the type tags of the resolved ancestor and the
    /// node being refined.
    #[error("failed to find descriptor for {want} under {have}")]
    UnresolvedDescriptor {
        have: &'static str,
        want: &'static str,
    },

    /// The option name part denotes a language builtin such as `default`
    /// or `json_name`; these have no descriptor to jump to.
    #[error("option {name:?} is a language builtin")]
    LanguageBuiltin { name: String },

    /// The extendee of an extend statement with no declarations is
    /// undefined.
    #[error("extend declaration is invalid")]
    InvalidExtend,

    /// Option value lookup landed on a non-message, non-enum field.
    #[error("option value is a scalar type ({kind})")]
    ScalarOption { kind: &'static str },

    /// The definition exists but is not backed by source text.
    #[error("no source available")]
    NoSource,

    /// A descriptor has no recorded declaration node.
    #[error("failed to find node for {full_name:?}")]
    MissingDeclaration { full_name: String },
}

/// Failure of the import resolver strategy chain.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The path is unknown on disk and in every resolver strategy.
    #[error("path not found: {path:?}")]
    NotFound { path: String },

    /// The resolver was invoked in a workspace with no native module.
    #[error("no module found in workspace")]
    NoModule,

    /// The file exceeds the large-file threshold.
    #[error("refusing to load file {path:?} larger than 1MiB")]
    FileTooLarge { path: String, size: u64 },

    /// The language driver could not reconstruct a descriptor from
    /// generated native code.
    #[error("failed to synthesize {path}: {reason}")]
    Synthesis { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ResolveError {
    /// Whether the error means "keep trying other strategies" rather than
    /// "abort the chain".
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
