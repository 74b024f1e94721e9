//! Amalgamation driver
//!
//! Runs the umbrella scanner, then the implementation emitter over the
//! registry it produced, and finalizes the output file only on success.

use crate::directive::Directives;
use crate::emitter::ImplementationEmitter;
use crate::progress::{Progress, ProgressEvent, ProgressPhase};
use crate::resolver::SourceResolver;
use crate::scanner::UmbrellaScanner;
use crate::version::{self, Clock, SystemClock};
use serde::Serialize;
use singlehead_core::{Config, Error, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Outcome of one amalgamation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmalgamationReport {
    pub output: PathBuf,
    pub version: String,
    /// Inlined headers, in umbrella order
    pub headers: Vec<String>,
    /// Implementation files placed in the guarded block
    pub implementations: Vec<String>,
    /// Implementation files looked for and not found
    pub missing_implementations: Vec<String>,
}

/// A header listed by the umbrella, with its implementation if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderListing {
    pub header: String,
    pub umbrella_line: usize,
    pub implementation: Option<String>,
}

/// Merges an umbrella header and its sources into one file
pub struct Amalgamator {
    config: Config,
    directives: Directives,
    resolver: SourceResolver,
    clock: Box<dyn Clock>,
    progress: Progress,
}

impl Amalgamator {
    /// Create an amalgamator stamping versions with the system date
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let directives = Directives::new(&config)?;
        let resolver = SourceResolver::new(
            config.source_root.clone(),
            config.markers.header_extension.clone(),
            config.markers.implementation_extension.clone(),
        );
        Ok(Self {
            config,
            directives,
            resolver,
            clock: Box::new(SystemClock),
            progress: Progress::default(),
        })
    }

    /// Use a different date source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Set progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressEvent) + Send + Sync + 'static,
    {
        self.progress = Progress::new(callback);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Version string this run stamps into the output
    pub fn version(&self) -> String {
        version::version_string(&self.config.version.prefix, self.clock.today())
    }

    /// Write the complete amalgamated document to `out`
    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> Result<AmalgamationReport> {
        let version = self.version();
        let umbrella = self.config.umbrella_path();
        info!("Amalgamating {} as {}", umbrella.display(), version);

        let scanner = UmbrellaScanner::new(&self.config, &self.directives, &self.resolver);
        let registry = scanner.scan(&umbrella, &version, out, &self.progress)?;

        let emitter = ImplementationEmitter::new(&self.config.markers, &self.resolver);
        let summary = emitter.emit(&registry, out, &self.progress)?;
        out.flush()?;

        Ok(AmalgamationReport {
            output: self.config.output_path(),
            version,
            headers: registry.names().into_iter().map(String::from).collect(),
            implementations: summary.emitted,
            missing_implementations: summary.absent,
        })
    }

    /// Render into a temporary file next to the output, then move it into place
    pub fn run(&self) -> Result<AmalgamationReport> {
        let umbrella = self.config.umbrella_path();
        if !umbrella.is_file() {
            return Err(Error::UmbrellaNotFound { path: umbrella });
        }

        let output = self.config.output_path();
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&dir)?;
        let report = {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.render(&mut writer)?
        };
        set_output_permissions(temp.as_file(), &output)?;
        temp.persist(&output)
            .map_err(|e| Error::Persist(format!("{}: {}", output.display(), e)))?;

        info!(
            "Wrote {} ({} headers, {} implementations)",
            output.display(),
            report.headers.len(),
            report.implementations.len()
        );
        self.progress.emit(ProgressPhase::Complete, display_name(&output));
        Ok(report)
    }

    /// Headers the umbrella lists, without reading or writing anything else
    pub fn list(&self) -> Result<Vec<HeaderListing>> {
        let scanner = UmbrellaScanner::new(&self.config, &self.directives, &self.resolver);
        let registry = scanner.collect(&self.config.umbrella_path())?;

        Ok(registry
            .iter()
            .map(|reference| HeaderListing {
                header: reference.name.clone(),
                umbrella_line: reference.umbrella_line,
                implementation: self
                    .resolver
                    .find_implementation(&reference.name)
                    .map(|(name, _)| name),
            })
            .collect())
    }
}

/// Keep an existing output's mode; give a fresh one the usual 0644 rather
/// than the owner-only mode temp files are created with.
fn set_output_permissions(file: &File, output: &Path) -> Result<()> {
    let permissions = match fs::metadata(output) {
        Ok(metadata) => metadata.permissions(),
        Err(_) => default_permissions(file)?,
    };
    file.set_permissions(permissions)?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions(_file: &File) -> Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(file: &File) -> Result<fs::Permissions> {
    Ok(file.metadata()?.permissions())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
