// src/cli/handlers.rs
use crate::config::Config;
use crate::exit::ArchGaugeExit;
use crate::graph::detect_cycles;
use crate::reporting;
use crate::translate;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open(root: &Path) -> Result<Workspace> {
    Workspace::open(root).with_context(|| format!("failed to analyze {}", root.display()))
}

/// Handles the scan command.
///
/// # Errors
/// Returns error if the root cannot be analyzed.
pub fn handle_scan(root: &Path, json: bool, decay: Option<f64>) -> Result<ArchGaugeExit> {
    let mut config = Config::load(root)?;
    if let Some(k) = decay {
        config = config.with_decay(k);
    }
    let workspace = Workspace::open_with(root, &config)
        .with_context(|| format!("failed to analyze {}", root.display()))?;
    let report = workspace.snapshot().project_report();

    if json {
        print_json(&report)?;
    } else {
        reporting::print_scan(&report);
    }
    Ok(ArchGaugeExit::Success)
}

/// Handles the cohesion command.
///
/// # Errors
/// Returns error if the root cannot be analyzed.
pub fn handle_cohesion(module: &str, root: &Path, json: bool) -> Result<ArchGaugeExit> {
    let snapshot = open(root)?.snapshot();
    if snapshot.module_graph(module).is_none() {
        eprintln!(
            "{} module '{module}' was not analyzed; reporting defaults",
            "warning:".yellow().bold()
        );
    }
    let classes = snapshot.cohesion(module);

    if json {
        print_json(&classes)?;
    } else {
        reporting::print_cohesion(module, &classes);
    }
    Ok(ArchGaugeExit::Success)
}

/// Handles the deps command.
///
/// # Errors
/// Returns error if the root cannot be analyzed.
pub fn handle_deps(root: &Path, json: bool) -> Result<ArchGaugeExit> {
    let graph = open(root)?.snapshot().dependency_graph();
    if json {
        print_json(&graph)?;
    } else {
        reporting::print_deps(&graph);
    }
    Ok(ArchGaugeExit::Success)
}

/// Handles the cycles command. Exits with `CheckFailed` when a cycle exists
/// and with `InvalidInput` when the map file is not a dependency map.
///
/// # Errors
/// Returns error if the root cannot be analyzed or the map file cannot be read.
pub fn handle_cycles(root: &Path, map: Option<&Path>, json: bool) -> Result<ArchGaugeExit> {
    let cycles = match map {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let virtual_map: BTreeMap<String, Vec<String>> = match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(e) => {
                    eprintln!(
                        "{} {} is not a {{module: [imports]}} map: {e}",
                        "error:".red().bold(),
                        path.display()
                    );
                    return Ok(ArchGaugeExit::InvalidInput);
                }
            };
            detect_cycles(&virtual_map)
        }
        None => open(root)?.snapshot().project_cycles(),
    };

    if json {
        print_json(&cycles)?;
    } else {
        reporting::print_cycles(&cycles);
    }

    if cycles.is_empty() {
        Ok(ArchGaugeExit::Success)
    } else {
        Ok(ArchGaugeExit::CheckFailed)
    }
}

/// Handles the audit command. Exits with `CheckFailed` when the audit fails.
///
/// # Errors
/// Returns error if the root cannot be analyzed.
pub fn handle_audit(file: &Path, root: &Path, allow: &[String], json: bool) -> Result<ArchGaugeExit> {
    let report = open(root)?.snapshot().audit_file(file, allow);

    if json {
        print_json(&report)?;
    } else {
        reporting::print_audit(&report);
    }

    if report.passed() {
        Ok(ArchGaugeExit::Success)
    } else {
        Ok(ArchGaugeExit::CheckFailed)
    }
}

/// Handles the graph command.
///
/// # Errors
/// Returns error if the file cannot be read or the config is malformed.
pub fn handle_graph(file: &Path) -> Result<ArchGaugeExit> {
    let dir = file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let config = Config::load(dir)?;

    match translate::translate_file(file, &config.markers) {
        Ok(graph) => {
            print_json(&graph)?;
            Ok(ArchGaugeExit::Success)
        }
        Err(e) if e.is_parse() => {
            eprintln!("{} {e}", "error:".red().bold());
            Ok(ArchGaugeExit::InvalidInput)
        }
        Err(e) => Err(e.into()),
    }
}
