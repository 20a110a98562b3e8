//! Conda/mamba output parsing and version ordering.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use stacks_tag_core::error::{Result, TagError};

/// Package name → versions.
pub type PackageVersions = BTreeMap<String, BTreeSet<String>>;

/// A package with a newer version available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatablePackage {
    pub package: String,
    pub current: String,
    pub newest: String,
}

/// Parse `mamba env export --no-build --json [--from-history]`.
///
/// Pip-installed packages (the `{"pip": [...]}` entry) are skipped.
pub fn parse_env_export(json: &str) -> Result<PackageVersions> {
    let export: serde_json::Value = serde_json::from_str(json)?;
    let dependencies = export
        .get("dependencies")
        .and_then(|d| d.as_array())
        .ok_or_else(|| TagError::parse("mamba env export", "no `dependencies` list in output"))?;

    let mut packages = PackageVersions::new();
    for spec in dependencies.iter().filter_map(|d| d.as_str()) {
        let (package, versions) = parse_spec(spec);
        packages.insert(package, versions);
    }
    Ok(packages)
}

/// Split `name=version`, `name==version` or `name=version=build` specs.
///
/// When the right-hand side does not start with a digit the `=` belongs to
/// the name (`conda-forge::blas=*`).
fn parse_spec(spec: &str) -> (String, BTreeSet<String>) {
    let normalized = spec.replace("==", "=");
    let parts: Vec<&str> = normalized.split('=').collect();
    match parts.as_slice() {
        [name] => (name.to_string(), BTreeSet::new()),
        [name, rest @ ..] => {
            if rest[0].starts_with(|c: char| c.is_ascii_digit()) {
                (name.to_string(), rest.iter().map(|v| v.to_string()).collect())
            } else {
                (format!("{}={}", name, rest[0]), BTreeSet::new())
            }
        }
        [] => (String::new(), BTreeSet::new()),
    }
}

/// Parse `mamba search --outdated --quiet`; the first two lines are headers.
pub fn parse_available(output: &str) -> Result<PackageVersions> {
    let mut packages = PackageVersions::new();
    for line in output.lines().skip(2) {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(package), Some(version)) => {
                packages
                    .entry(package.to_string())
                    .or_default()
                    .insert(version.to_string());
            }
            _ => {
                return Err(TagError::parse(
                    "mamba search",
                    format!("expected `<package> <version>`, got {:?}", line),
                ))
            }
        }
    }
    Ok(packages)
}

/// Ordering key for conda version strings.
///
/// Each `.`-separated piece is split into runs of letters or digits; digit
/// runs compare numerically and letter runs by a base-255 ordinal.
pub fn version_key(version: &str) -> Vec<u128> {
    let mut key = Vec::new();
    for piece in version.split('.') {
        let mut run = String::new();
        let mut run_is_digit = false;
        for c in piece.chars() {
            let is_digit = c.is_ascii_digit();
            if !(is_digit || c.is_ascii_alphabetic()) {
                flush_run(&mut run, run_is_digit, &mut key);
                continue;
            }
            if !run.is_empty() && is_digit != run_is_digit {
                flush_run(&mut run, run_is_digit, &mut key);
            }
            run_is_digit = is_digit;
            run.push(c);
        }
        flush_run(&mut run, run_is_digit, &mut key);
    }
    key
}

fn flush_run(run: &mut String, is_digit: bool, key: &mut Vec<u128>) {
    if run.is_empty() {
        return;
    }
    let value = if is_digit {
        run.parse().unwrap_or(u128::MAX)
    } else {
        run.bytes()
            .fold(0u128, |acc, b| acc.saturating_mul(255).saturating_add(u128::from(b)))
    };
    key.push(value);
    run.clear();
}

/// Compare installed against available versions.
///
/// With `requested_only`, only packages present in `requested` are considered.
pub fn updatable_packages(
    requested: &PackageVersions,
    installed: &PackageVersions,
    available: &PackageVersions,
    requested_only: bool,
) -> Vec<UpdatablePackage> {
    let mut updatable = Vec::new();
    for (package, installed_versions) in installed {
        if requested_only && !requested.contains_key(package) {
            continue;
        }
        let Some(newest) = available
            .get(package)
            .and_then(|versions| versions.iter().max_by_key(|v| version_key(v)))
        else {
            continue;
        };
        let Some(current) = installed_versions.iter().min_by_key(|v| version_key(v)) else {
            continue;
        };
        if current != newest && version_key(current) < version_key(newest) {
            updatable.push(UpdatablePackage {
                package: package.clone(),
                current: current.clone(),
                newest: newest.clone(),
            });
        }
    }
    updatable
}

/// `"<n>/<m> (<p>%) packages could be updated"`
pub fn outdated_summary(updatable: usize, total: usize) -> String {
    let ratio = if total == 0 {
        0.0
    } else {
        updatable as f64 / total as f64
    };
    format!(
        "{}/{} ({:.0}%) packages could be updated",
        updatable,
        total,
        ratio * 100.0
    )
}
