//! Umbrella directive recognition

use regex::Regex;
use singlehead_core::{Config, Error, Result};

/// Recognizes the umbrella lines that get special treatment
#[derive(Debug, Clone)]
pub struct Directives {
    project_include: Regex,
    build_guard: String,
    version_define: String,
}

impl Directives {
    pub fn new(config: &Config) -> Result<Self> {
        let pattern = format!(
            r#"{}\s*"({}[^"\r\n]*)""#,
            regex::escape(&config.markers.include_directive),
            regex::escape(&config.markers.include_prefix),
        );
        let project_include =
            Regex::new(&pattern).map_err(|e| Error::Config(format!("include pattern: {}", e)))?;

        Ok(Self {
            project_include,
            build_guard: config.markers.build_guard.clone(),
            version_define: config.version.define_marker(),
        })
    }

    /// Filename of a project-local include, if `line` is one.
    ///
    /// A line with an unterminated quote does not match.
    pub fn project_include<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.project_include
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn is_build_guard(&self, line: &str) -> bool {
        line.contains(self.build_guard.as_str())
    }

    pub fn is_version_define(&self, line: &str) -> bool {
        line.contains(self.version_define.as_str())
    }
}
