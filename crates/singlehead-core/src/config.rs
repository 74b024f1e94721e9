//! Configuration types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the config file picked up from the source root
pub const DEFAULT_CONFIG_FILE: &str = "singlehead.yaml";

/// Singlehead configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the umbrella file, headers and sources
    pub source_root: PathBuf,

    /// Umbrella include file, relative to `source_root`
    pub umbrella: PathBuf,

    /// Merged output file, relative to `source_root`
    pub output: PathBuf,

    /// Recognized textual markers
    pub markers: Markers,

    /// Version macro rewriting
    pub version: VersionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            umbrella: PathBuf::from("PlayBufferPCH.h"),
            output: PathBuf::from("Play.h"),
            markers: Markers::default(),
            version: VersionConfig::default(),
        }
    }
}

/// Textual markers the amalgamator recognizes.
///
/// Every marker is matched as a substring of the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Filename prefix identifying project-local headers (`#include "Play...`)
    pub include_prefix: String,

    /// Any include directive; stripped from implementation files
    pub include_directive: String,

    /// Compile-once pragma
    pub build_guard: String,

    /// Doxygen group annotation
    pub doc_group: String,

    /// Doxygen snippet annotation
    pub doc_snippet: String,

    /// Paired sentinel toggling an excluded region
    pub exclude_sentinel: String,

    /// Macro guarding the implementation block
    pub feature_macro: String,

    /// Header file extension, including the dot
    pub header_extension: String,

    /// Implementation file extension, including the dot
    pub implementation_extension: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            include_prefix: "Play".into(),
            include_directive: "#include".into(),
            build_guard: "#pragma once".into(),
            doc_group: "@ingroup".into(),
            doc_snippet: "@snippet".into(),
            exclude_sentinel: "[DOXYGEN_EXCLUDE]".into(),
            feature_macro: "PLAY_IMPLEMENTATION".into(),
            header_extension: ".h".into(),
            implementation_extension: ".cpp".into(),
        }
    }
}

/// Version macro configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// Macro whose definition line is rewritten
    pub macro_name: String,

    /// Fixed leading components; the date is appended as `YY.MM.DD`
    pub prefix: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            macro_name: "PLAY_VERSION".into(),
            prefix: "2.0".into(),
        }
    }
}

impl VersionConfig {
    /// The `#define NAME` marker identifying the version line
    pub fn define_marker(&self) -> String {
        format!("#define {}", self.macro_name)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load_yaml(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| Error::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| Error::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "json" => Self::load_json(path),
            "yaml" | "yml" => Self::load_yaml(path),
            _ => Err(Error::Config(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Load `singlehead.yaml` from `root` if present, defaults otherwise
    pub fn discover(root: &Path) -> Result<Self> {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        let mut config = if candidate.is_file() {
            Self::load_yaml(&candidate)?
        } else {
            Self::default()
        };
        if config.source_root.is_relative() {
            config.source_root = root.join(&config.source_root);
        }
        Ok(config)
    }

    /// Reject marker sets the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let m = &self.markers;
        let required = [
            ("include_prefix", &m.include_prefix),
            ("include_directive", &m.include_directive),
            ("build_guard", &m.build_guard),
            ("doc_group", &m.doc_group),
            ("doc_snippet", &m.doc_snippet),
            ("exclude_sentinel", &m.exclude_sentinel),
            ("feature_macro", &m.feature_macro),
            ("version.macro_name", &self.version.macro_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("marker '{}' must not be empty", name)));
            }
        }

        for (name, ext) in [
            ("header_extension", &m.header_extension),
            ("implementation_extension", &m.implementation_extension),
        ] {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(Error::Config(format!(
                    "{} must start with '.' (got '{}')",
                    name, ext
                )));
            }
        }
        if m.header_extension == m.implementation_extension {
            return Err(Error::Config(
                "header and implementation extensions must differ".into(),
            ));
        }

        if normalized(&self.umbrella) == normalized(&self.output) {
            return Err(Error::Config(
                "umbrella and output must be different files".into(),
            ));
        }

        Ok(())
    }

    /// Absolute-or-root-relative path of the umbrella file
    pub fn umbrella_path(&self) -> PathBuf {
        self.source_root.join(&self.umbrella)
    }

    /// Absolute-or-root-relative path of the merged output
    pub fn output_path(&self) -> PathBuf {
        self.source_root.join(&self.output)
    }
}

/// Drop `.` components so `./Play.h` and `Play.h` compare equal
fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.umbrella, PathBuf::from("PlayBufferPCH.h"));
        assert_eq!(config.output, PathBuf::from("Play.h"));
        assert_eq!(config.version.define_marker(), "#define PLAY_VERSION");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_yaml_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("singlehead.yaml");
        fs::write(
            &path,
            "output: Engine.h\nmarkers:\n  include_prefix: Engine\n  feature_macro: ENGINE_IMPLEMENTATION\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.output, PathBuf::from("Engine.h"));
        assert_eq!(config.markers.include_prefix, "Engine");
        assert_eq!(config.markers.feature_macro, "ENGINE_IMPLEMENTATION");
        assert_eq!(config.markers.build_guard, "#pragma once");
        assert_eq!(config.umbrella, PathBuf::from("PlayBufferPCH.h"));
    }

    #[test]
    fn test_load_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"version": {"prefix": "3.1"}}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.version.prefix, "3.1");
        assert_eq!(config.version.macro_name, "PLAY_VERSION");
    }

    #[test]
    fn test_json_and_yaml_parse_errors() {
        let temp = TempDir::new().unwrap();
        let json = temp.path().join("bad.json");
        fs::write(&json, "{ not json").unwrap();
        assert!(matches!(Config::load(&json).unwrap_err(), Error::Json(_)));

        let yaml = temp.path().join("bad.yaml");
        fs::write(&yaml, "markers: [unclosed").unwrap();
        assert!(matches!(Config::load(&yaml).unwrap_err(), Error::Yaml(_)));
    }

    #[test]
    fn test_validate_rejects_output_equal_to_umbrella() {
        let config = Config {
            umbrella: PathBuf::from("Play.h"),
            output: PathBuf::from("./Play.h"),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            umbrella: PathBuf::from("./inc/./All.h"),
            output: PathBuf::from("inc/All.h"),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = Config::load(Path::new("config.ini")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_extensions() {
        let mut config = Config::default();
        config.markers.implementation_extension = ".h".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.markers.header_extension = "h".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_marker() {
        let mut config = Config::default();
        config.markers.exclude_sentinel = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exclude_sentinel"));
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.umbrella_path(), temp.path().join("./PlayBufferPCH.h"));
    }

    #[test]
    fn test_discover_reads_yaml_in_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "umbrella: All.h\n").unwrap();
        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.umbrella, PathBuf::from("All.h"));
        assert!(config.source_root.starts_with(temp.path()));
    }
}
