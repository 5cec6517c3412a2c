//! `key = value` rendering, in the spirit of a `paths` diagnostic dump.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use linkstage_core::{BuildConfiguration, PlatformTarget, ResolvedChain, StagingReport};
use serde::Serialize;

fn list<I, T>(out: &mut String, key: &str, items: I)
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let items: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if items.is_empty() {
        let _ = writeln!(out, "{key} = []");
        return;
    }
    let _ = writeln!(out, "{key} =");
    for item in items {
        let _ = writeln!(out, "  {item}");
    }
}

fn paths<'a>(items: impl IntoIterator<Item = &'a Path>) -> Vec<String> {
    items.into_iter().map(|p| p.display().to_string()).collect()
}

/// Render a resolved chain for humans.
pub fn format_chain(chain: &ResolvedChain) -> String {
    let native = &chain.native;
    let module = &chain.module;
    let mut out = String::new();

    let _ = writeln!(out, "package = {}", native.package);
    let _ = writeln!(out, "platform = {}", native.platform);
    let _ = writeln!(out, "configuration = {}", native.configuration);
    list(&mut out, "include_paths", paths(native.include_paths.iter().map(PathBuf::as_path)));
    list(
        &mut out,
        "system_include_paths",
        paths(native.system_include_paths.iter().map(PathBuf::as_path)),
    );
    list(&mut out, "definitions", native.definitions.rendered());
    list(&mut out, "static_link", paths(native.static_link_artifacts()));
    list(&mut out, "delay_load", paths(native.delay_load_artifacts()));
    list(
        &mut out,
        "staging",
        native.staging.actions().iter().map(|a| {
            format!("{} -> {}", a.source.display(), a.destination.display())
        }),
    );
    list(
        &mut out,
        "stale_removals",
        paths(native.staging.removals().iter().map(|r| r.destination.as_path())),
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "module = {}", module.name);
    let _ = writeln!(out, "pch_usage = {}", module.pch_usage);
    list(&mut out, "module.include_paths", paths(module.include_paths.iter().map(PathBuf::as_path)));
    list(
        &mut out,
        "module.private_include_paths",
        paths(module.private_include_paths.iter().map(PathBuf::as_path)),
    );
    list(&mut out, "module.public_dependencies", module.dependencies.public());
    list(&mut out, "module.private_dependencies", module.dependencies.private());
    list(
        &mut out,
        "module.dynamically_loaded",
        module.dependencies.dynamically_loaded(),
    );
    list(&mut out, "module.definitions", module.definitions.rendered());
    out
}

/// Render a staging report for humans.
pub fn format_staging(report: &StagingReport) -> String {
    let mut out = String::new();
    if report.staged.is_empty() && report.removed.is_empty() {
        out.push_str("Nothing to stage.\n");
        return out;
    }
    for file in &report.staged {
        let marker = if file.replaced_existing { "replaced" } else { "copied" };
        let _ = writeln!(out, "  {marker:<8} {}", file.destination.display());
    }
    for path in &report.removed {
        let _ = writeln!(out, "  {:<8} {}", "removed", path.display());
    }
    let _ = writeln!(
        out,
        "Staged {} file(s), {} replaced, {} removed",
        report.staged.len(),
        report.replaced_count(),
        report.removed.len()
    );
    out
}

/// Table of platforms and staged configurations.
pub fn format_platforms() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<10} {:<10} {:<6} {:<6}",
        "PLATFORM", "SUPPORTED", "DIR", "LINK", "LOAD"
    );
    let _ = writeln!(out, "{}", "-".repeat(48));
    for platform in PlatformTarget::ALL {
        match platform.artifact_layout() {
            Some(layout) => {
                let _ = writeln!(
                    out,
                    "{:<12} {:<10} {:<10} {:<6} {:<6}",
                    platform.name(),
                    "yes",
                    layout.binary_dir,
                    layout.static_extension,
                    layout.dynamic_extension
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "{:<12} {:<10} {:<10} {:<6} {:<6}",
                    platform.name(),
                    "no",
                    "-",
                    "-",
                    "-"
                );
            }
        }
    }

    let staged: Vec<_> = BuildConfiguration::ALL
        .into_iter()
        .filter(|c| c.stages_runtime_binaries())
        .map(BuildConfiguration::name)
        .collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "Delay-load binaries are staged in: {}", staged.join(", "));
    let _ = writeln!(out, "Settings files are staged in every configuration.");
    out
}

/// Write `value` as pretty JSON followed by a newline.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), crate::CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
