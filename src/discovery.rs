//! Project discovery and batch instrumentation.
//!
//! Recursively scans a project for instrumentable sources and runs the JSX
//! instrumentation across them in parallel. Per-file failures are logged and
//! skipped; a batch never fails as a whole, and it never writes user
//! sources — outputs stay in memory.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cache::InstrumentationCache;
use crate::instrument::{instrument_source, InstrumentOptions};

const INSTRUMENTABLE_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

/// Recursively find all instrumentable source files under a directory,
/// skipping `node_modules` and dot-directories.
pub fn find_instrumentable_files(base_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(base_dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() || entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            name != "node_modules" && !name.starts_with('.')
        });

    for entry in walker.flatten() {
        let path = entry.path();
        if path.is_file() {
            if let Some(extension) = path.extension().and_then(|extension| extension.to_str()) {
                if INSTRUMENTABLE_EXTENSIONS.contains(&extension) {
                    files.push(path.to_path_buf());
                }
            }
        }
    }

    files
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentedFile {
    pub path: String,
    /// Opening tags that received provenance attributes in this file.
    pub element_count: usize,
}

/// Instrument every eligible file under `root`, in parallel. Files without
/// JSX and files that fail to read or parse are skipped.
pub fn instrument_project(
    root: &Path,
    options: &InstrumentOptions,
    cache: Option<&InstrumentationCache>,
) -> Vec<InstrumentedFile> {
    let root_str = root.to_string_lossy().into_owned();
    let files = find_instrumentable_files(root);

    files
        .par_iter()
        .filter_map(|path| {
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(error) => {
                    eprintln!("[EditorNative] Failed to read {:?}: {}", path, error);
                    return None;
                }
            };

            let path_str = path.to_string_lossy().into_owned();

            let output = match cache.and_then(|cache| cache.get(&path_str, &source)) {
                Some(cached) => cached,
                None => {
                    let output = instrument_source(&source, &path_str, &root_str, options)?;
                    if let Some(cache) = cache {
                        cache.set(&path_str, &source, &output);
                    }
                    output
                }
            };

            Some(InstrumentedFile {
                path: path_str,
                element_count: output.element_count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, relative: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(&dir, "src/App.tsx", "export const App = () => <div>hi</div>;\n");
        write(&dir, "src/util.ts", "export const answer = 42;\n");
        write(&dir, "src/theme.css", "body {}\n");
        write(
            &dir,
            "node_modules/lib/index.jsx",
            "export const x = <span />;\n",
        );
        write(&dir, ".next/gen.tsx", "export const g = <div />;\n");
        dir
    }

    #[test]
    fn test_find_skips_node_modules_and_dot_dirs() {
        let dir = project();
        let mut names: Vec<String> = find_instrumentable_files(dir.path())
            .iter()
            .map(|path| {
                path.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        names.sort();
        assert_eq!(names, vec!["src/App.tsx", "src/util.ts"]);
    }

    #[test]
    fn test_instrument_project_reports_only_instrumented_files() {
        let dir = project();
        let summaries = instrument_project(dir.path(), &InstrumentOptions::default(), None);
        // util.ts has no JSX and produces no summary entry.
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].path.ends_with("App.tsx"));
        assert_eq!(summaries[0].element_count, 1);
    }

    #[test]
    fn test_instrument_project_uses_cache() {
        let dir = project();
        let cache_dir = TempDir::new().unwrap();
        let cache = InstrumentationCache::new(cache_dir.path().join("cache"));

        let first = instrument_project(dir.path(), &InstrumentOptions::default(), Some(&cache));
        assert_eq!(first.len(), 1);

        // A second pass is served from the cache and reports the same shape.
        let second = instrument_project(dir.path(), &InstrumentOptions::default(), Some(&cache));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].element_count, first[0].element_count);
    }
}
