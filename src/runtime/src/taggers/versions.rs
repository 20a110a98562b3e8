//! Version parsers.
//!
//! Pure functions from captured command output to a version string. Each
//! fails with `ParseError` when its marker is missing; an unexpected format
//! means an incompatible upstream tool and must stop the build.

use stacks_tag_core::error::{Result, TagError};

/// Line prefix of the `spark-submit --version` banner that carries the version.
pub const SPARK_VERSION_LINE_PREFIX: &str = r"   /___/ .__/\_,_/_/ /_/\_\   version";

const PIP_VERSION_PREFIX: &str = "Version: ";

/// Whitespace-separated field `index` of the first output line.
pub fn nth_field(tagger: &str, output: &str, index: usize) -> Result<String> {
    output
        .lines()
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .nth(index)
        .map(str::to_string)
        .ok_or_else(|| {
            TagError::parse(
                tagger,
                format!("expected at least {} fields in {:?}", index + 1, output),
            )
        })
}

/// Version printed by `jupyter-lab --version` and friends.
///
/// Accepts a bare `4.0.2` or a line ending in `version 4.0.2`.
pub fn bare_version(tagger: &str, output: &str) -> Result<String> {
    let fields: Vec<&str> = output.lines().next().unwrap_or_default().split_whitespace().collect();
    match fields.as_slice() {
        [version] => Ok(version.to_string()),
        [.., marker, version] if *marker == "version" => Ok(version.to_string()),
        _ => Err(TagError::parse(
            tagger,
            format!("expected a version, got {:?}", output),
        )),
    }
}

/// `Python 3.11.4` → `3.11.4`
pub fn python_version(output: &str) -> Result<String> {
    nth_field("PythonVersionTagger", output, 1)
}

/// `3.11.4` → `3.11`
pub fn major_minor(version: &str) -> Result<String> {
    match version.rfind('.') {
        Some(pos) if pos > 0 => Ok(version[..pos].to_string()),
        _ => Err(TagError::parse(
            "PythonMajorMinorVersionTagger",
            format!("version {:?} has no minor component", version),
        )),
    }
}

/// `R version 4.3.1 (2023-06-16) -- "Beagle Scouts"` → `4.3.1`
pub fn r_version(output: &str) -> Result<String> {
    nth_field("RVersionTagger", output, 2)
}

/// `julia version 1.9.3` → `1.9.3`
pub fn julia_version(output: &str) -> Result<String> {
    nth_field("JuliaVersionTagger", output, 2)
}

/// `Hadoop 3.3.6` → `3.3.6`
pub fn hadoop_version(output: &str) -> Result<String> {
    nth_field("HadoopVersionTagger", output, 1)
}

/// `openjdk 17.0.8 2023-07-18` → `17.0.8`
pub fn java_version(output: &str) -> Result<String> {
    nth_field("JavaVersionTagger", output, 1)
}

/// Last token of the `version` line in the Spark banner.
pub fn spark_version(output: &str) -> Result<String> {
    let line = output
        .lines()
        .find(|line| line.starts_with(SPARK_VERSION_LINE_PREFIX))
        .ok_or_else(|| {
            TagError::parse("SparkVersionTagger", "version line not found in spark-submit banner")
        })?;
    line.split(' ')
        .last()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TagError::parse("SparkVersionTagger", format!("empty version in {:?}", line)))
}

/// `Version:` field of `pip show <package>` output.
///
/// The field must be the second line, right after `Name:`.
pub fn pip_show_version(package: &str, output: &str) -> Result<String> {
    if output.trim().is_empty() {
        return Err(TagError::PackageNotFound(package.to_string()));
    }
    let line = output.lines().nth(1).unwrap_or_default();
    line.strip_prefix(PIP_VERSION_PREFIX)
        .map(|v| v.trim().to_string())
        .ok_or_else(|| {
            TagError::parse(
                format!("pip show {}", package),
                format!("expected {:?} on the second line, got {:?}", PIP_VERSION_PREFIX, line),
            )
        })
}

/// `2.1.0+cu121` → `2.1.0`
pub fn strip_local_version(version: &str) -> String {
    version.split('+').next().unwrap_or(version).to_string()
}
