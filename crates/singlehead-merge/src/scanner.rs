//! Umbrella scanner
//!
//! Walks the umbrella file top to bottom, inlining every project-local header
//! in place and copying everything else through (minus the compile-once
//! pragma, with the version macro restamped).

use crate::directive::Directives;
use crate::filter::ContentFilter;
use crate::lines;
use crate::progress::{Progress, ProgressPhase};
use crate::resolver::SourceResolver;
use crate::version;
use serde::Serialize;
use singlehead_core::{Config, Error, Result};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// One project-local include found in the umbrella file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeReference {
    /// Quoted filename as written in the umbrella
    pub name: String,
    /// 1-based umbrella line
    pub umbrella_line: usize,
}

/// Include references in umbrella order, duplicates kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IncludeRegistry {
    entries: Vec<IncludeReference>,
}

impl IncludeRegistry {
    pub fn push(&mut self, reference: IncludeReference) {
        self.entries.push(reference);
    }

    pub fn iter(&self) -> impl Iterator<Item = &IncludeReference> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Produces the declaration region of the output
pub struct UmbrellaScanner<'a> {
    config: &'a Config,
    directives: &'a Directives,
    resolver: &'a SourceResolver,
}

impl<'a> UmbrellaScanner<'a> {
    pub fn new(config: &'a Config, directives: &'a Directives, resolver: &'a SourceResolver) -> Self {
        Self {
            config,
            directives,
            resolver,
        }
    }

    /// Write the declaration region to `out`, returning the include registry
    pub fn scan<W: Write + ?Sized>(
        &self,
        umbrella: &Path,
        version: &str,
        out: &mut W,
        progress: &Progress,
    ) -> Result<IncludeRegistry> {
        let reader = open_umbrella(umbrella)?;
        let version_line = version::version_define(&self.config.version.macro_name, version);
        let mut registry = IncludeRegistry::default();

        lines::for_each_line(reader, |number, line| {
            if let Some(header) = self.directives.project_include(line) {
                info!("Including {}", header);
                progress.emit(ProgressPhase::Header, header);
                self.inline_header(header, number, line, out)?;
                out.write_all(b"\n")?;
                registry.push(IncludeReference {
                    name: header.to_string(),
                    umbrella_line: number,
                });
            } else if self.directives.is_version_define(line) {
                debug!("Restamping version on umbrella line {}", number);
                out.write_all(version_line.as_bytes())?;
            } else if !self.directives.is_build_guard(line) {
                out.write_all(line.as_bytes())?;
            }
            Ok(())
        })?;

        Ok(registry)
    }

    /// Collect the include registry without reading any header
    pub fn collect(&self, umbrella: &Path) -> Result<IncludeRegistry> {
        let reader = open_umbrella(umbrella)?;
        let mut registry = IncludeRegistry::default();
        lines::for_each_line(reader, |number, line| {
            if let Some(header) = self.directives.project_include(line) {
                registry.push(IncludeReference {
                    name: header.to_string(),
                    umbrella_line: number,
                });
            }
            Ok(())
        })?;
        Ok(registry)
    }

    fn inline_header<W: Write + ?Sized>(
        &self,
        header: &str,
        umbrella_line: usize,
        line: &str,
        out: &mut W,
    ) -> Result<()> {
        let path = self.resolver.resolve(header);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::HeaderNotFound {
                header: header.to_string(),
                umbrella_line,
                line: line.to_string(),
            },
            _ => Error::HeaderUnreadable {
                header: header.to_string(),
                umbrella_line,
                source: e,
            },
        })?;

        let mut filter = ContentFilter::new(&self.config.markers);
        lines::copy_filtered(content.as_bytes(), out, |l| filter.apply(l))?;
        if filter.is_excluding() {
            warn!(
                "{} ends inside an excluded region (unpaired {})",
                header, self.config.markers.exclude_sentinel
            );
        }
        Ok(())
    }
}

fn open_umbrella(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::UmbrellaNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}
