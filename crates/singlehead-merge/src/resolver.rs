//! Source File Resolver
//!
//! Maps include references to header and implementation files under the
//! source root.

use std::path::PathBuf;
use tracing::debug;

/// Resolves include references relative to the source root
#[derive(Debug, Clone)]
pub struct SourceResolver {
    /// Directory the umbrella file lives in
    root: PathBuf,
    header_extension: String,
    implementation_extension: String,
}

impl SourceResolver {
    /// Create a new resolver
    pub fn new(
        root: impl Into<PathBuf>,
        header_extension: impl Into<String>,
        implementation_extension: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            header_extension: header_extension.into(),
            implementation_extension: implementation_extension.into(),
        }
    }

    /// Path of a file named in the umbrella
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Implementation filename for a header (`PlayMaths.h` -> `PlayMaths.cpp`).
    ///
    /// Returns `None` when the name does not carry the header extension.
    pub fn implementation_name(&self, header: &str) -> Option<String> {
        let stem = header.strip_suffix(self.header_extension.as_str())?;
        if stem.is_empty() {
            return None;
        }
        Some(format!("{}{}", stem, self.implementation_extension))
    }

    /// Implementation file for a header, if one exists on disk
    pub fn find_implementation(&self, header: &str) -> Option<(String, PathBuf)> {
        let name = self.implementation_name(header)?;
        let path = self.resolve(&name);
        if path.is_file() {
            debug!("Resolved implementation {} for {}", name, header);
            Some((name, path))
        } else {
            debug!("No implementation for {}", header);
            None
        }
    }
}
