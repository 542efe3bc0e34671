//! Workspace import resolution.
//!
//! The resolver owns the bidirectional mapping between editor document
//! URIs and canonical import paths, and locates (or synthesizes) sources
//! for unresolved imports through an ordered strategy chain:
//!
//! 1. well-known standard library paths, served from the linked-in
//!    registry;
//! 2. files already known to the overlay file system;
//! 3. native modules, opening proto sources where they exist and
//!    synthesizing virtual files from generated code where they do not;
//! 4. the global registry again, for well-known paths that slipped past
//!    the first check;
//! 5. the `gogo.proto` module redirect.
//!
//! When all strategies fail and the importing file is known, two repairs
//! run: path translation relative to the importer, and a reverse lookup
//! through the importer's generated native files.

pub mod driver;
pub mod fs;
pub mod path_match;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use tower_lsp::lsp_types::Url;
use tracing::{debug, error, info, warn};

use crate::config::ResolverOptions;
use crate::descriptor::graph::FileDescriptor;
use crate::descriptor::proto::{FileDescriptorProto, FileOptions};
use crate::descriptor::well_known::{self, WELL_KNOWN_IMPORTS, is_well_known_path};
use crate::error::ResolveError;
use crate::link::LinkResult;
use crate::resolver::driver::{GeneratedFile, LanguageDriver};
use crate::resolver::fs::OverlayFs;

pub use driver::{GeneratedImport, ModuleImport};

/// How a file became known to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    WellKnown,
    RelativePath,
    LocalModule,
    ModuleCache,
    Synthetic,
}

/// The workspace folder the resolver serves.
#[derive(Debug, Clone)]
pub struct WorkspaceFolder {
    pub uri: Url,
    pub name: String,
}

impl WorkspaceFolder {
    fn root_path(&self) -> Option<PathBuf> {
        self.uri.to_file_path().ok()
    }
}

/// Outcome of a successful resolution: a canonical path plus either source
/// text or a pre-built descriptor.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub resolved_path: String,
    pub version: i32,
    pub source: SearchSource,
}

#[derive(Debug, Clone)]
pub enum SearchSource {
    Text(String),
    Proto(FileDescriptorProto),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Open,
    Close,
    Change,
    Save,
    Create,
    Delete,
}

/// One file-system or editor event to fold into the path tables.
#[derive(Debug, Clone)]
pub struct FileModification {
    pub uri: Url,
    pub action: FileAction,
    /// Editor-held content, when the event carries it.
    pub text: Option<String>,
}

/// The importing file, when resolution was triggered by an import
/// statement.
pub trait ImportContext: Send + Sync {
    fn file_descriptor(&self) -> &FileDescriptorProto;
}

/// Renders a linked file descriptor as proto source text for virtual
/// documents. Pretty-printing is an external collaborator.
pub trait DescriptorPrinter: Send + Sync {
    fn print_file(
        &self,
        file: &FileDescriptor,
    ) -> Result<String, ResolveError>;
}

#[derive(Debug, Default)]
struct PathTables {
    file_paths_by_uri: HashMap<Url, String>,
    file_uris_by_path: HashMap<String, Url>,
    import_sources_by_uri: HashMap<Url, ImportSource>,
    synthetic_file_original_names: HashMap<Url, String>,
    synthetic_files: HashMap<Url, String>,
}

impl PathTables {
    fn record(
        &mut self,
        uri: Url,
        path: String,
        source: ImportSource,
    ) {
        self.file_paths_by_uri.insert(uri.clone(), path.clone());
        self.file_uris_by_path.insert(path, uri.clone());
        self.import_sources_by_uri.insert(uri, source);
    }
}

pub struct Resolver<D: LanguageDriver> {
    folder: WorkspaceFolder,
    driver: D,
    printer: Box<dyn DescriptorPrinter>,
    overlay: OverlayFs,
    options: ResolverOptions,
    tables: RwLock<PathTables>,
}

impl<D: LanguageDriver> Resolver<D> {
    pub fn new(
        folder: WorkspaceFolder,
        driver: D,
        printer: Box<dyn DescriptorPrinter>,
    ) -> Self {
        Self::with_options(folder, driver, printer, ResolverOptions::default())
    }

    pub fn with_options(
        folder: WorkspaceFolder,
        driver: D,
        printer: Box<dyn DescriptorPrinter>,
        options: ResolverOptions,
    ) -> Self {
        Self {
            folder,
            driver,
            printer,
            overlay: OverlayFs::new(),
            options,
            tables: RwLock::new(PathTables::default()),
        }
    }

    pub fn overlay(&self) -> &OverlayFs {
        &self.overlay
    }

    fn read_tables(&self) -> std::sync::RwLockReadGuard<'_, PathTables> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_tables(&self) -> std::sync::RwLockWriteGuard<'_, PathTables> {
        let start = Instant::now();
        let guard = self.tables.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let waited = start.elapsed();
        if waited >= self.options.lock_warn {
            warn!(?waited, "path table lock contended");
        }
        guard
    }

    // ── path table queries ──────────────────────────────────────────────

    pub fn path_to_uri(
        &self,
        path: &str,
    ) -> Result<Url, ResolveError> {
        let tables = self.read_tables();
        // Strip a trailing `;packageName` directive.
        let path = path.split(';').next().unwrap_or(path);
        tables.file_uris_by_path.get(path).cloned().ok_or_else(|| ResolveError::NotFound {
            path: path.to_owned(),
        })
    }

    pub fn uri_to_path(
        &self,
        uri: &Url,
    ) -> Result<String, ResolveError> {
        let tables = self.read_tables();
        tables.file_paths_by_uri.get(uri).cloned().ok_or_else(|| ResolveError::NotFound {
            path: uri.to_string(),
        })
    }

    pub fn synthetic_file_contents(
        &self,
        uri: &Url,
    ) -> Result<String, ResolveError> {
        let tables = self.read_tables();
        tables.synthetic_files.get(uri).cloned().ok_or_else(|| ResolveError::NotFound {
            path: uri.to_string(),
        })
    }

    /// The name a synthesized file carried in its reconstructed
    /// descriptor, when it differs from the resolved path.
    pub fn synthetic_file_original_name(
        &self,
        uri: &Url,
    ) -> Option<String> {
        let tables = self.read_tables();
        tables.synthetic_file_original_names.get(uri).cloned()
    }

    /// All synthetic URIs, sorted for stable listings.
    pub fn synthetic_files(&self) -> Vec<Url> {
        let tables = self.read_tables();
        let mut uris: Vec<Url> = tables.synthetic_files.keys().cloned().collect();
        uris.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        uris
    }

    pub fn find_import_paths_by_prefix(
        &self,
        prefix: &str,
    ) -> HashMap<Url, String> {
        let tables = self.read_tables();
        tables
            .file_paths_by_uri
            .iter()
            .filter(|(_, path)| path.starts_with(prefix))
            .map(|(uri, path)| (uri.clone(), path.clone()))
            .collect()
    }

    /// Whether a URI names a regular file inside the workspace root, as
    /// opposed to synthetic, module-cache, or well-known content.
    pub fn is_real_workspace_local_file(
        &self,
        uri: &Url,
    ) -> bool {
        if uri.scheme() != "file" {
            return false;
        }

        let tables = self.read_tables();
        if tables.synthetic_files.contains_key(uri) {
            return false;
        }
        if let Some(source) = tables.import_sources_by_uri.get(uri)
            && matches!(source, ImportSource::Synthetic | ImportSource::ModuleCache | ImportSource::WellKnown)
        {
            return false;
        }
        drop(tables);

        if self.overlay.read(uri).is_err() {
            return false;
        }
        let Ok(filename) = uri.to_file_path() else {
            return false;
        };
        // Symlinks and other non-regular files are not workspace sources.
        let Ok(metadata) = std::fs::symlink_metadata(&filename) else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }

        match self.folder.root_path() {
            Some(root) => filename.starts_with(&root),
            None => false,
        }
    }

    // ── module inference ────────────────────────────────────────────────

    /// Canonical module path of a proto file: the location-implied package
    /// when the file sits inside a local module, otherwise the declared
    /// `go_package` option.
    pub fn lookup_module_path(
        &self,
        filename: &Path,
        source: &str,
    ) -> Result<String, ResolveError> {
        if !self.driver.has_module() {
            return Err(ResolveError::NoModule);
        }
        if let Ok(package) = self.driver.implicit_package_path(filename) {
            return Ok(package);
        }
        if let Some(package) = path_match::fast_lookup_go_package(source) {
            return Ok(package);
        }
        Err(ResolveError::NotFound {
            path: filename.display().to_string(),
        })
    }

    pub fn find_generated_files(
        &self,
        uri: &Url,
        options: Option<&FileOptions>,
        path: &str,
    ) -> Result<Vec<GeneratedFile>, ResolveError> {
        self.driver.find_generated_files(uri, options, path)
    }

    // ── file-system modification handling ───────────────────────────────

    pub fn update_uri_path_mappings(
        &self,
        modifications: &[FileModification],
    ) {
        let mut tables = self.write_tables();
        for modification in modifications {
            match modification.action {
                FileAction::Open | FileAction::Close => {},
                FileAction::Change | FileAction::Save => {
                    self.refresh_local_module_mapping(&mut tables, modification);
                },
                FileAction::Create => {
                    self.register_created_file(&mut tables, modification);
                },
                FileAction::Delete => {
                    if let Some(path) = tables.file_paths_by_uri.remove(&modification.uri) {
                        tables.file_uris_by_path.remove(&path);
                    }
                    tables.import_sources_by_uri.remove(&modification.uri);
                },
            }
        }
    }

    fn refresh_local_module_mapping(
        &self,
        tables: &mut PathTables,
        modification: &FileModification,
    ) {
        if tables.import_sources_by_uri.get(&modification.uri) != Some(&ImportSource::LocalModule) {
            return;
        }
        let existing = tables.file_paths_by_uri.get(&modification.uri).cloned().unwrap_or_default();
        let Ok(filename) = modification.uri.to_file_path() else {
            return;
        };
        let text = match &modification.text {
            Some(text) => text.clone(),
            None => match std::fs::read_to_string(&filename) {
                Ok(text) => text,
                Err(err) => {
                    error!(filename = %filename.display(), %err, "failed to open file");
                    return;
                },
            },
        };
        let module = match self.lookup_module_path(&filename, &text) {
            Ok(module) => module,
            Err(ResolveError::NoModule) => {
                info!(filename = %filename.display(), "module no longer present for file, removing from cache");
                tables.file_paths_by_uri.remove(&modification.uri);
                tables.file_uris_by_path.remove(&existing);
                tables.import_sources_by_uri.remove(&modification.uri);
                return;
            },
            Err(err) => {
                error!(filename = %filename.display(), %err, "failed to look up module");
                return;
            },
        };
        let updated = format!("{module}/{}", file_name(&filename));
        if updated != existing {
            debug!(%existing, %updated, "updating path mapping");
            tables.file_paths_by_uri.insert(modification.uri.clone(), updated.clone());
            tables.file_uris_by_path.insert(updated, modification.uri.clone());
            if !existing.is_empty() {
                tables.file_uris_by_path.remove(&existing);
            }
        }
    }

    fn register_created_file(
        &self,
        tables: &mut PathTables,
        modification: &FileModification,
    ) {
        let Ok(filename) = modification.uri.to_file_path() else {
            return;
        };
        let text = match std::fs::read_to_string(&filename) {
            Ok(text) => text,
            Err(err) => {
                error!(filename = %filename.display(), %err, "failed to open file");
                return;
            },
        };
        match self.lookup_module_path(&filename, &text) {
            Ok(package) => {
                let canonical = format!("{package}/{}", file_name(&filename));
                tables.record(modification.uri.clone(), canonical, ImportSource::LocalModule);
            },
            Err(ResolveError::NoModule) => {
                // No module anywhere; key the file by its workspace-relative
                // path instead.
                let relative = self
                    .folder
                    .root_path()
                    .and_then(|root| filename.strip_prefix(&root).ok().map(Path::to_path_buf))
                    .unwrap_or_else(|| filename.clone());
                let relative = relative.to_string_lossy().into_owned();
                tables.record(modification.uri.clone(), relative, ImportSource::RelativePath);
            },
            Err(err) => {
                error!(filename = %filename.display(), %err, "failed to look up module");
            },
        }
    }

    // ── synthetic file maintenance ──────────────────────────────────────

    /// Fill in source text for synthetic files whose descriptors were not
    /// fully linked when they were created. Returns the paths that must be
    /// compiled again now that they have text.
    pub fn check_incomplete_descriptors(
        &self,
        results: &[Arc<dyn LinkResult>],
    ) -> Vec<String> {
        let mut tables = self.write_tables();
        let mut compile_again = Vec::new();

        let pending: Vec<(Url, String)> = tables
            .file_paths_by_uri
            .iter()
            .filter(|(uri, _)| uri.scheme() == "proto")
            .filter(|(uri, _)| !tables.synthetic_files.contains_key(*uri))
            .map(|(uri, path)| (uri.clone(), path.clone()))
            .collect();

        for (uri, path) in pending {
            let Some(result) =
                results.iter().find(|result| !result.is_placeholder() && result.parent_file().path == path)
            else {
                continue;
            };
            match self.printer.print_file(&result.parent_file()) {
                Ok(text) => {
                    tables.synthetic_files.insert(uri, text);
                    // The file had no AST until now and needs a recompile.
                    compile_again.push(path);
                },
                Err(err) => {
                    error!(%uri, %err, "failed to generate synthetic file source");
                },
            }
        }
        compile_again
    }

    /// Warm the tables with every well-known import.
    pub fn preload_well_known_paths(&self) {
        let mut tables = self.write_tables();
        for import in WELL_KNOWN_IMPORTS {
            let _ = self.find_file_by_path_locked(&mut tables, import, None);
        }
    }

    // ── resolution ──────────────────────────────────────────────────────

    /// Resolve an import string through the strategy chain, then through
    /// the translation and reverse-lookup repairs when an import context
    /// is available.
    pub fn find_file_by_path(
        &self,
        path: &str,
        whence: Option<&dyn ImportContext>,
    ) -> Result<SearchResult, ResolveError> {
        let start = Instant::now();
        let mut tables = self.write_tables();

        let err = match self.find_file_by_path_locked(&mut tables, path, whence) {
            Ok(result) => return Ok(result),
            Err(err) => err,
        };
        let Some(whence) = whence else {
            debug!(elapsed = ?start.elapsed(), path, %err, "could not resolve path");
            return Err(err);
        };

        match self.translate_path_locked(&mut tables, path, whence) {
            Ok(translated) => {
                debug!(elapsed = ?start.elapsed(), path, %translated, "resolved path by translation from import context");
                if let Ok(mut result) = self.find_file_by_path_locked(&mut tables, &translated, Some(whence)) {
                    result.resolved_path = translated;
                    return Ok(result);
                }
            },
            Err(_) => {
                if let Ok(reversed) = self.try_reverse_lookup_locked(&tables, path, whence) {
                    debug!(elapsed = ?start.elapsed(), path, resolved = %reversed, "resolved by reverse lookup");
                    if let Ok(mut result) = self.find_file_by_path_locked(&mut tables, &reversed, Some(whence)) {
                        result.resolved_path = reversed;
                        return Ok(result);
                    }
                }
            },
        }

        debug!(elapsed = ?start.elapsed(), path, %err, "could not resolve path");
        Err(err)
    }

    fn find_file_by_path_locked(
        &self,
        tables: &mut PathTables,
        path: &str,
        _whence: Option<&dyn ImportContext>,
    ) -> Result<SearchResult, ResolveError> {
        let start = Instant::now();
        let is_synthetic =
            tables.file_uris_by_path.get(path).is_some_and(|uri| uri.scheme() == "proto");

        match self.check_well_known_import_path(tables, path) {
            Ok(result) => {
                debug!(elapsed = ?start.elapsed(), path, "resolved to well-known import path");
                return Ok(result);
            },
            Err(err) if !err.is_not_found() => {
                error!(path, %err, "failed to check well-known import path");
                return Err(err);
            },
            Err(_) => {},
        }

        if !is_synthetic {
            match self.check_fs(tables, path) {
                Ok(result) => {
                    debug!(elapsed = ?start.elapsed(), path, "resolved to cached file");
                    return Ok(result);
                },
                Err(err) if !err.is_not_found() => {
                    debug!(path, %err, "failed to check cached file");
                    return Err(err);
                },
                Err(_) => {},
            }
        }

        match self.check_module(tables, path) {
            Ok(result) => {
                debug!(elapsed = ?start.elapsed(), path, "resolved to native module");
                return Ok(result);
            },
            Err(err) if !err.is_not_found() && !matches!(err, ResolveError::NoModule) => {
                debug!(path, %err, "failed to check native module");
                return Err(err);
            },
            Err(_) => {},
        }

        if is_well_known_path(path) {
            match self.check_global_registry(tables, path) {
                Ok(result) => {
                    debug!(elapsed = ?start.elapsed(), path, "resolved to type in global descriptor registry");
                    return Ok(result);
                },
                Err(err) if !err.is_not_found() => {
                    debug!(path, %err, "failed to check global descriptor registry");
                    return Err(err);
                },
                Err(_) => {},
            }
        }

        if path_match::base(path) == "gogo.proto"
            && let Ok(result) = self.check_module(tables, "github.com/gogo/protobuf/gogoproto/gogo.proto")
        {
            debug!(elapsed = ?start.elapsed(), path, "resolved to special case (native module: gogo.proto)");
            return Ok(result);
        }

        Err(ResolveError::NotFound {
            path: path.to_owned(),
        })
    }

    fn check_well_known_import_path(
        &self,
        tables: &mut PathTables,
        path: &str,
    ) -> Result<SearchResult, ResolveError> {
        if is_well_known_path(path) {
            return self.check_global_registry(tables, path);
        }
        Err(ResolveError::NotFound {
            path: path.to_owned(),
        })
    }

    fn check_fs(
        &self,
        tables: &PathTables,
        path: &str,
    ) -> Result<SearchResult, ResolveError> {
        let Some(uri) = tables.file_uris_by_path.get(path) else {
            return Err(ResolveError::NotFound {
                path: path.to_owned(),
            });
        };
        let content = self.overlay.read(uri)?;
        if content.text.len() as u64 > self.options.max_file_size {
            return Err(ResolveError::FileTooLarge {
                path: path.to_owned(),
                size: content.text.len() as u64,
            });
        }
        Ok(SearchResult {
            resolved_path: path.to_owned(),
            version: content.version,
            source: SearchSource::Text(content.text),
        })
    }

    fn check_module(
        &self,
        tables: &mut PathTables,
        path: &str,
    ) -> Result<SearchResult, ResolveError> {
        if !self.driver.has_module() {
            return Err(ResolveError::NoModule);
        }
        // These files are vendored inside the gogo/protobuf module; serve
        // them from the registry to avoid conflicting symbols.
        if let Some(trimmed) = path.strip_prefix("github.com/gogo/googleapis/") {
            return self.check_well_known_import_path(tables, trimmed);
        }

        let import = self.driver.import_from_module(path)?;

        if import.source_exists {
            let text = std::fs::read_to_string(&import.source_path)?;
            let uri = Url::from_file_path(&import.source_path).map_err(|_| ResolveError::NotFound {
                path: import.source_path.display().to_string(),
            })?;
            let source = if import.module_path == self.driver.local_module_name() {
                ImportSource::LocalModule
            } else {
                ImportSource::ModuleCache
            };
            tables.record(uri, path.to_owned(), source);
            return Ok(SearchResult {
                resolved_path: path.to_owned(),
                version: 1,
                source: SearchSource::Text(text),
            });
        }

        let using_alt_path = import.known_alt_path.is_some();
        let file_uri = match &import.known_alt_path {
            Some(alt) => tables.file_uris_by_path.get(alt),
            None => tables.file_uris_by_path.get(path),
        };
        if let Some(uri) = file_uri
            && let Some(text) = tables.synthetic_files.get(uri)
        {
            debug!(alt_path = using_alt_path, %uri, "using cached synthetic file");
            let resolved = import.known_alt_path.clone().unwrap_or_else(|| path.to_owned());
            return Ok(SearchResult {
                resolved_path: resolved,
                version: 1,
                source: SearchSource::Text(text.clone()),
            });
        }
        debug!(alt_path = using_alt_path, "building new synthetic file");

        let start = Instant::now();
        let synthesized =
            self.driver.synthesize_from_source(path, &import).map_err(|err| ResolveError::Synthesis {
                path: path.to_owned(),
                reason: err.to_string(),
            })?;
        let (original, resolved) = match &import.known_alt_path {
            None => (synthesized.name.clone(), path.to_owned()),
            Some(alt) => (path.to_owned(), alt.clone()),
        };
        let uri = synthetic_uri(&resolved, &self.folder.name)?;
        debug!(
            elapsed = ?start.elapsed(),
            path,
            synthetic_uri = %uri,
            resolved_path = %resolved,
            original_name = %original,
            "synthesized proto from generated source",
        );
        tables.record(uri.clone(), resolved.clone(), ImportSource::Synthetic);
        tables.synthetic_file_original_names.insert(uri, original);
        Ok(SearchResult {
            resolved_path: resolved,
            version: 1,
            source: SearchSource::Proto(synthesized),
        })
    }

    fn check_global_registry(
        &self,
        tables: &mut PathTables,
        path: &str,
    ) -> Result<SearchResult, ResolveError> {
        let Some(entry) = well_known::global_files().find_file_by_path(path) else {
            return Err(ResolveError::NotFound {
                path: path.to_owned(),
            });
        };
        let uri = synthetic_uri(path, &self.folder.name)?;
        if let Some(text) = tables.synthetic_files.get(&uri) {
            return Ok(SearchResult {
                resolved_path: path.to_owned(),
                version: 1,
                source: SearchSource::Text(text.clone()),
            });
        }
        tables.file_paths_by_uri.insert(uri.clone(), path.to_owned());
        tables.file_uris_by_path.insert(path.to_owned(), uri.clone());
        match self.printer.print_file(&entry.descriptor) {
            Ok(text) => {
                tables.synthetic_files.insert(uri, text.clone());
                Ok(SearchResult {
                    resolved_path: path.to_owned(),
                    version: 0,
                    source: SearchSource::Text(text),
                })
            },
            // No readable rendition; hand the compiler the descriptor
            // directly.
            Err(_) => Ok(SearchResult {
                resolved_path: path.to_owned(),
                version: 0,
                source: SearchSource::Proto(entry.proto.clone()),
            }),
        }
    }

    // ── repairs ─────────────────────────────────────────────────────────

    /// Translate a path relative to the importing file or the workspace
    /// root, updating the URI mapping to match the importer's source.
    fn translate_path_locked(
        &self,
        tables: &mut PathTables,
        path: &str,
        whence: &dyn ImportContext,
    ) -> Result<String, ResolveError> {
        if tables.file_uris_by_path.contains_key(path) {
            return Ok(path.to_owned());
        }

        let importer = whence.file_descriptor();
        let uri = tables.file_uris_by_path.get(&importer.name).cloned().ok_or_else(|| {
            ResolveError::NotFound {
                path: importer.name.clone(),
            }
        })?;
        let filename = uri.to_file_path().map_err(|_| ResolveError::NotFound {
            path: uri.to_string(),
        })?;
        let filename_str = filename.to_string_lossy().into_owned();
        let dir = filename.parent().unwrap_or(Path::new("."));

        let mut translated: Option<PathBuf> = None;
        if path_match::is_local(path) {
            let mut candidates: Vec<PathBuf> = vec![dir.join(path)];
            // The importer's directory name may be duplicated as the path's
            // leading segment.
            if let Some(slash) = path.find('/')
                && slash > 0
                && dir.file_name().is_some_and(|name| name.to_string_lossy() == path[..slash])
                && let Some(grandparent) = dir.parent()
            {
                candidates.push(grandparent.join(path));
            }
            if let Some(matched) = path_match::find_suffix_matched_path(path, &filename_str) {
                candidates.push(PathBuf::from(matched));
            }
            if let Some(grandparent) = dir.parent() {
                candidates.push(grandparent.join(path));
            }

            for candidate in candidates {
                if std::fs::metadata(&candidate).is_ok_and(|metadata| metadata.is_file()) {
                    translated = Some(candidate);
                    break;
                }
            }
        }

        let translated = translated.ok_or_else(|| ResolveError::NotFound {
            path: path.to_owned(),
        })?;
        let translated_uri = Url::from_file_path(&translated).map_err(|_| ResolveError::NotFound {
            path: translated.display().to_string(),
        })?;

        match tables.import_sources_by_uri.get(&uri).copied() {
            Some(ImportSource::LocalModule) => {
                let text = std::fs::read_to_string(&translated)?;
                let package = self.lookup_module_path(&translated, &text)?;
                let canonical = format!("{package}/{}", file_name(&translated));
                tables.record(translated_uri, canonical.clone(), ImportSource::LocalModule);
                Ok(canonical)
            },
            Some(ImportSource::ModuleCache) => {
                // Apply the on-disk movement between the two files to the
                // importer's canonical package.
                let original_dir = dir.to_string_lossy();
                let translated_dir = translated.parent().unwrap_or(Path::new(".")).to_string_lossy();
                let relative =
                    path_match::relative_to(&original_dir, &translated_dir).ok_or_else(|| {
                        ResolveError::NotFound {
                            path: path.to_owned(),
                        }
                    })?;
                let original_package = tables.file_paths_by_uri.get(&uri).cloned().unwrap_or_default();
                let canonical = path_match::clean_join(&[
                    path_match::parent(&original_package),
                    &relative,
                    &file_name(&translated),
                ]);
                tables.record(translated_uri, canonical.clone(), ImportSource::ModuleCache);
                Ok(canonical)
            },
            Some(ImportSource::RelativePath) => {
                let original_dir = dir.to_string_lossy();
                let translated_str = translated.to_string_lossy();
                path_match::relative_to(&original_dir, &translated_str).ok_or_else(|| {
                    ResolveError::NotFound {
                        path: path.to_owned(),
                    }
                })
            },
            _ => Err(ResolveError::NotFound {
                path: path.to_owned(),
            }),
        }
    }

    /// Search the importer's generated native files for an import matching
    /// the unresolved path.
    fn try_reverse_lookup_locked(
        &self,
        tables: &PathTables,
        path: &str,
        whence: &dyn ImportContext,
    ) -> Result<String, ResolveError> {
        if !self.driver.has_module() {
            return Err(ResolveError::NoModule);
        }
        let importer = whence.file_descriptor();
        let uri = tables.file_uris_by_path.get(&importer.name).ok_or_else(|| ResolveError::NotFound {
            path: importer.name.clone(),
        })?;

        let generated = self.driver.find_generated_files(uri, importer.options.as_ref(), "")?;
        if generated.is_empty() {
            return Err(ResolveError::NotFound {
                path: importer.name.clone(),
            });
        }

        resolve_path_to_generated_import(&generated, path).ok_or_else(|| ResolveError::NotFound {
            path: path.to_owned(),
        })
    }
}

/// Match an unresolved import against the imports of generated native
/// files, returning the proto path that produced the best match.
fn resolve_path_to_generated_import(
    generated: &[GeneratedFile],
    path: &str,
) -> Option<String> {
    for file in generated {
        for import in &file.imports {
            if import.proto_path == path {
                return Some(import.proto_path.clone());
            }
            if import.proto_path.ends_with(&format!("/{path}")) {
                return Some(import.proto_path.clone());
            }
            if path_match::base(&import.proto_path) == path_match::base(path)
                && import.native_path.ends_with(path_match::parent(path))
            {
                return Some(import.proto_path.clone());
            }
        }
    }
    None
}

/// Virtual document URI: `proto://<canonicalPath>#<workspaceName>`.
fn synthetic_uri(
    path: &str,
    workspace: &str,
) -> Result<Url, ResolveError> {
    Url::parse(&format!("proto://{path}#{workspace}")).map_err(|_| ResolveError::NotFound {
        path: path.to_owned(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}
