//=========================================================================
// Asset Sources
//=========================================================================
//
// Read-only access to the packaged asset bundle.
//
// Bundle semantics: listing a directory returns its child names, listing
// a leaf file (or a missing path) returns an empty list. The deployer
// relies on this to tell directories from files without a separate query.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use log::warn;

//=== AssetSource =========================================================

/// Read-only asset bundle addressed by `/`-separated relative paths.
pub trait AssetSource {
    /// Lists the children of `path` (empty for leaves and missing paths).
    fn list(&self, path: &str) -> io::Result<Vec<String>>;

    /// Opens a leaf asset as a byte stream.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>>;
}

impl<A: AssetSource + ?Sized> AssetSource for Box<A> {
    fn list(&self, path: &str) -> io::Result<Vec<String>> {
        (**self).list(path)
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        (**self).open(path)
    }
}

//=== DirAssetSource ======================================================

/// Asset bundle backed by an unpacked directory on disk.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a bundle path, refusing anything that escapes the root.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);

        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("asset path escapes bundle: {path}"),
            ));
        }

        Ok(self.root.join(relative))
    }
}

impl AssetSource for DirAssetSource {
    fn list(&self, path: &str) -> io::Result<Vec<String>> {
        let dir = self.resolve(path)?;

        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(Vec::new()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    warn!(target: "bridge::deploy", "Skipping non UTF-8 asset name {:?}", raw);
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(self.resolve(path)?)?;
        Ok(Box::new(file))
    }
}

//=========================================================================
// Tests
//=========================================================================
