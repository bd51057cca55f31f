//! Homebrew formula generation.
//!
//! Renders a [`ReleaseManifest`] as a Ruby formula with the same dispatch
//! the published tap uses: one universal macOS archive, and Linux archives
//! selected by CPU family and 64-bit checks.

use std::fmt::Write as _;

use crate::artifact::{ReleaseArtifact, Target};
use crate::manifest::ReleaseManifest;

/// Homebrew formula generator.
pub struct FormulaGenerator;

impl FormulaGenerator {
    /// Formula class name for a package name (e.g., "oshiv" -> "Oshiv",
    /// "my-tool" -> "MyTool").
    #[must_use]
    pub fn class_name(name: &str) -> String {
        name.split(['-', '_'])
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect::<String>()
                })
            })
            .collect()
    }

    /// Generates a Ruby formula from the manifest.
    #[must_use]
    pub fn generate(manifest: &ReleaseManifest) -> String {
        let mut formula = format!(
            r#"# typed: false
# frozen_string_literal: true

class {} < Formula
  desc "{}"
  homepage "{}"
  version "{}"
  license "{}"
"#,
            Self::class_name(&manifest.name),
            escape_ruby(&manifest.description),
            escape_ruby(&manifest.homepage),
            escape_ruby(&manifest.version),
            escape_ruby(&manifest.license)
        );

        if let Some(artifact) = manifest.artifact(Target::DarwinAll) {
            formula.push_str("\n  on_macos do\n");
            push_artifact(&mut formula, artifact, 4);
            formula.push_str("  end\n");
        }

        formula.push_str("\n  on_linux do\n");
        for (target, cpu_check) in [
            (Target::LinuxAmd64, "Hardware::CPU.intel?"),
            (Target::LinuxArm64, "Hardware::CPU.arm?"),
        ] {
            if let Some(artifact) = manifest.artifact(target) {
                let _ = writeln!(formula, "    if {cpu_check}");
                formula.push_str("      if Hardware::CPU.is_64_bit?\n");
                push_artifact(&mut formula, artifact, 8);
                formula.push_str("      end\n");
                formula.push_str("    end\n");
            }
        }
        formula.push_str("  end\nend\n");

        formula
    }
}

fn push_artifact(formula: &mut String, artifact: &ReleaseArtifact, indent: usize) {
    let pad = " ".repeat(indent);
    let url = escape_ruby(&artifact.url);
    let binary = escape_ruby(&artifact.binary_name);
    let _ = writeln!(formula, "{pad}url \"{url}\"");
    let _ = writeln!(formula, "{pad}sha256 \"{}\"", artifact.sha256);
    formula.push('\n');
    let _ = writeln!(formula, "{pad}def install");
    let _ = writeln!(formula, "{pad}  bin.install \"{binary}\"");
    let _ = writeln!(formula, "{pad}end");
}

/// Escapes a value for a double-quoted Ruby string literal.
fn escape_ruby(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
