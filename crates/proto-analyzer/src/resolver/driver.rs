//! Interface to the native-language package system.
//!
//! Package discovery lives outside the core; the resolver only needs to
//! ask where a proto import lives inside the module graph and, when no
//! proto source exists, to reconstruct a descriptor from the generated
//! native code.

use std::path::{Path, PathBuf};

use tower_lsp::lsp_types::Url;

use crate::descriptor::proto::{FileDescriptorProto, FileOptions};
use crate::error::ResolveError;

/// Result of locating an import path inside a native module.
#[derive(Debug, Clone, Default)]
pub struct ModuleImport {
    /// Whether a `.proto` source file exists for the import.
    pub source_exists: bool,
    /// On-disk location of the proto source, when it exists.
    pub source_path: PathBuf,
    /// Canonical path of the module containing the import.
    pub module_path: String,
    /// A different canonical path the same file is known under, when the
    /// module declares one.
    pub known_alt_path: Option<String>,
}

/// One generated native source file and the imports it carries.
#[derive(Debug, Clone, Default)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub imports: Vec<GeneratedImport>,
}

/// An import line of a generated file, mapped back to the proto file that
/// produced the imported package.
#[derive(Debug, Clone)]
pub struct GeneratedImport {
    pub native_path: String,
    pub proto_path: String,
}

pub trait LanguageDriver: Send + Sync {
    /// Whether the workspace contains a native module at all.
    fn has_module(&self) -> bool;

    /// Canonical path of the workspace's own module.
    fn local_module_name(&self) -> &str;

    /// Package path implied by a file's location inside a local module.
    fn implicit_package_path(
        &self,
        filename: &Path,
    ) -> Result<String, ResolveError>;

    /// Locate an import path inside a local or cached module.
    fn import_from_module(
        &self,
        path: &str,
    ) -> Result<ModuleImport, ResolveError>;

    /// Reconstruct a file descriptor from the generated native code of a
    /// module that ships no proto sources.
    fn synthesize_from_source(
        &self,
        path: &str,
        import: &ModuleImport,
    ) -> Result<FileDescriptorProto, ResolveError>;

    /// The generated native files produced from a proto file.
    fn find_generated_files(
        &self,
        uri: &Url,
        options: Option<&FileOptions>,
        path: &str,
    ) -> Result<Vec<GeneratedFile>, ResolveError>;
}
