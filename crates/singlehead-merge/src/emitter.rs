//! Implementation emitter
//!
//! Appends every header's implementation file inside a feature-macro
//! conditional, so exactly one translation unit can opt into compiling it.

use crate::lines;
use crate::progress::{Progress, ProgressPhase};
use crate::resolver::SourceResolver;
use crate::scanner::IncludeRegistry;
use singlehead_core::{Error, Markers, Result};
use std::fs;
use std::io::Write;
use tracing::info;

const RULE: &str = "//*******************************************************************\n";

/// Implementation files that were and were not found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub emitted: Vec<String>,
    pub absent: Vec<String>,
}

/// Produces the implementation region of the output
pub struct ImplementationEmitter<'a> {
    markers: &'a Markers,
    resolver: &'a SourceResolver,
}

impl<'a> ImplementationEmitter<'a> {
    pub fn new(markers: &'a Markers, resolver: &'a SourceResolver) -> Self {
        Self { markers, resolver }
    }

    pub fn emit<W: Write + ?Sized>(
        &self,
        registry: &IncludeRegistry,
        out: &mut W,
        progress: &Progress,
    ) -> Result<EmitSummary> {
        let feature = &self.markers.feature_macro;
        let include = self.markers.include_directive.as_str();
        let mut summary = EmitSummary::default();

        write!(out, "\n{RULE}{RULE}#ifdef {feature}\n{RULE}{RULE}")?;

        for reference in registry.iter() {
            let Some((name, path)) = self.resolver.find_implementation(&reference.name) else {
                if let Some(name) = self.resolver.implementation_name(&reference.name) {
                    summary.absent.push(name);
                }
                continue;
            };

            info!("Including {}", name);
            progress.emit(ProgressPhase::Implementation, name.as_str());
            let content = fs::read_to_string(&path).map_err(|e| Error::ImplementationUnreadable {
                file: name.clone(),
                source: e,
            })?;
            lines::copy_filtered(content.as_bytes(), out, |line| {
                (!line.contains(include)).then_some(line)
            })?;
            out.write_all(b"\n")?;
            summary.emitted.push(name);
        }

        writeln!(out, "#endif // {feature}")?;
        writeln!(out)?;
        writeln!(out, "#ifdef {feature}")?;
        writeln!(out, "#undef {feature} // try to prevent multiple implementations")?;
        writeln!(out, "#endif")?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::IncludeReference;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn registry(names: &[&str]) -> IncludeRegistry {
        let mut registry = IncludeRegistry::default();
        for (i, name) in names.iter().enumerate() {
            registry.push(IncludeReference {
                name: name.to_string(),
                umbrella_line: i + 1,
            });
        }
        registry
    }

    fn emit(root: &std::path::Path, names: &[&str]) -> (String, EmitSummary) {
        let markers = Markers::default();
        let resolver = SourceResolver::new(root, ".h", ".cpp");
        let mut out = Vec::new();
        let summary = ImplementationEmitter::new(&markers, &resolver)
            .emit(&registry(names), &mut out, &Progress::default())
            .unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_empty_registry_still_frames() {
        let temp = TempDir::new().unwrap();
        let (text, summary) = emit(temp.path(), &[]);
        assert_eq!(
            text,
            format!(
                "\n{RULE}{RULE}#ifdef PLAY_IMPLEMENTATION\n{RULE}{RULE}\
                 #endif // PLAY_IMPLEMENTATION\n\n\
                 #ifdef PLAY_IMPLEMENTATION\n\
                 #undef PLAY_IMPLEMENTATION // try to prevent multiple implementations\n\
                 #endif\n"
            )
        );
        assert_eq!(summary, EmitSummary::default());
    }

    #[test]
    fn test_only_existing_implementations_are_inlined() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("A.cpp"),
            "#include \"A.h\"\n#include <vector>\nint A() { return 1; }\n",
        )
        .unwrap();

        let (text, summary) = emit(temp.path(), &["A.h", "B.h"]);
        assert!(text.contains("int A() { return 1; }\n\n#endif // PLAY_IMPLEMENTATION\n"));
        assert!(!text.contains("#include"));
        assert!(!text.contains("B.cpp"));
        assert_eq!(summary.emitted, vec!["A.cpp"]);
        assert_eq!(summary.absent, vec!["B.cpp"]);
    }

    #[test]
    fn test_implementations_follow_registry_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("First.cpp"), "void first();\n").unwrap();
        fs::write(temp.path().join("Second.cpp"), "void second();\n").unwrap();

        let (text, summary) = emit(temp.path(), &["Second.h", "First.h"]);
        let second = text.find("void second();").unwrap();
        let first = text.find("void first();").unwrap();
        assert!(second < first);
        assert_eq!(summary.emitted, vec!["Second.cpp", "First.cpp"]);
    }

    #[test]
    fn test_duplicate_header_emits_implementation_twice() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Dup.cpp"), "int dup;\n").unwrap();

        let (text, _) = emit(temp.path(), &["Dup.h", "Dup.h"]);
        assert_eq!(text.matches("int dup;").count(), 2);
    }

    #[test]
    fn test_unreadable_implementation_is_named() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("PlayBad.cpp"), [0x69u8, 0x6e, 0x74, 0xff, 0xfe, 0x0a]).unwrap();

        let markers = Markers::default();
        let resolver = SourceResolver::new(temp.path(), ".h", ".cpp");
        let mut out = Vec::new();
        let err = ImplementationEmitter::new(&markers, &resolver)
            .emit(&registry(&["PlayBad.h"]), &mut out, &Progress::default())
            .unwrap_err();

        match err {
            Error::ImplementationUnreadable { file, .. } => assert_eq!(file, "PlayBad.cpp"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
