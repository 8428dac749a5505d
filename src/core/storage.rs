//=========================================================================
// Storage Layout
//=========================================================================
//
// Where the engine keeps its writable data.
//
// Layout:
// ```text
//   <prefix>/cache   engine cache
//   <prefix>/files   deployed assets and user files
// ```
//
// The prefix lives on external storage when it is mounted and writable,
// otherwise in the application's private directory.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use percent_encoding::percent_decode_str;

//=== StorageLayout =======================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    prefix: PathBuf,
    external: bool,
}

impl StorageLayout {
    /// Picks the storage prefix for `package`.
    pub fn resolve(external_root: &Path, private_root: &Path, package: &str) -> Self {
        if is_writable_dir(external_root) {
            let prefix = external_root
                .join("external_sd")
                .join("Android")
                .join("data")
                .join(package);
            info!(target: "bridge::deploy", "Using external storage {}", prefix.display());
            return Self { prefix, external: true };
        }

        let prefix = private_root.join(format!("app_{package}"));
        warn!(
            target: "bridge::deploy",
            "External storage unavailable, using private storage {}",
            prefix.display()
        );
        Self { prefix, external: false }
    }

    /// Uses `prefix` as is.
    pub fn at(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            external: false,
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn is_external(&self) -> bool {
        self.external
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.prefix.join("cache")
    }

    pub fn files_dir(&self) -> PathBuf {
        self.prefix.join("files")
    }

    /// Creates the cache and files directories.
    pub fn create_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(self.cache_dir())?;
        fs::create_dir_all(self.files_dir())
    }
}

fn is_writable_dir(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false)
}

//=== Launch URIs =========================================================

/// Filesystem path carried by a launch or picker URI.
///
/// `file:///sdcard/a%20b.png` gives `/sdcard/a b.png`; a string without a
/// scheme is taken as a path already. No URI gives an empty string.
pub fn uri_path(uri: Option<&str>) -> String {
    let Some(uri) = uri else {
        return String::new();
    };

    let rest = match uri.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => match rest.find('/') {
            Some(slash) => &rest[slash..],
            None => "",
        },
        _ => match uri.split_once(':') {
            Some((scheme, rest)) if is_scheme(scheme) && scheme.len() > 1 => rest,
            _ => uri,
        },
    };

    let path = rest.split(['?', '#']).next().unwrap_or_default();
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

//=========================================================================
// Tests
//=========================================================================
