// src/reporting.rs
//! Console output formatting for analysis results.

use colored::Colorize;
use std::collections::BTreeMap;

use crate::metrics::{AuditReport, ClassCohesion, DependencyGraph, Health, ModuleReport, ProjectReport};

fn paint_health(text: &str, health: Health) -> String {
    match health {
        Health::Green => text.green().to_string(),
        Health::Yellow => text.yellow().to_string(),
        Health::Red => text.red().to_string(),
    }
}

fn format_count(n: usize) -> String {
    if n == 0 {
        n.to_string().green().to_string()
    } else {
        n.to_string().red().to_string()
    }
}

fn paint_lcom(lcom4: usize) -> String {
    if lcom4 > 1 {
        lcom4.to_string().red().to_string()
    } else {
        lcom4.to_string().green().to_string()
    }
}

/// Prints the per-module metrics table, cycles and skipped files.
pub fn print_scan(report: &ProjectReport) {
    println!(
        "\n{} {} modules | {} green | {} yellow | {} red | {} skipped",
        "ARCHITECTURE SCAN".cyan().bold(),
        report.modules.len(),
        report.count(Health::Green).to_string().green(),
        report.count(Health::Yellow).to_string().yellow(),
        report.count(Health::Red).to_string().red(),
        format_count(report.failures.len()),
    );

    if report.modules.is_empty() {
        println!("  {}", "No Python modules found.".dimmed());
    } else {
        print_module_table(&report.modules);
    }

    if !report.cycles.is_empty() {
        println!();
        print_cycles(&report.cycles);
    }

    if !report.failures.is_empty() {
        println!("\n{}", "SKIPPED (syntax errors)".yellow().bold());
        for failure in &report.failures {
            let line = failure.line.map(|l| format!(":{l}")).unwrap_or_default();
            println!("  {}{}", failure.path.display().to_string().yellow(), line);
        }
    }
}

fn print_module_table(modules: &[ModuleReport]) {
    let width = modules.iter().map(|m| m.module.len()).max().unwrap_or(6).max(6);
    println!(
        "\n  {:<width$}  {:>8}  {:>5}  {:>5}  {:>5}  {:>5}  {:>5}  {:>5}  {}",
        "MODULE".bold(),
        "COUPLING",
        "I",
        "A",
        "D",
        "LCOM4",
        "SLOC",
        "MI",
        "HEALTH",
    );

    for m in modules {
        println!(
            "  {:<width$}  {:>8.2}  {:>5.2}  {:>5.2}  {:>5.2}  {:>5}  {:>5}  {:>5.1}  {}",
            m.module,
            m.coupling,
            m.instability,
            m.abstractness,
            m.distance,
            paint_lcom(m.worst_lcom4),
            m.code.raw.sloc,
            m.code.maintainability,
            paint_health(m.health.label(), m.health),
        );
    }
}

pub fn print_cohesion(module: &str, classes: &BTreeMap<String, ClassCohesion>) {
    println!("\n{} {}", "COHESION".cyan().bold(), module.bold());
    if classes.is_empty() {
        println!("  {}", "No classes.".dimmed());
        return;
    }
    for (name, c) in classes {
        println!(
            "  {:<24} LCOM4 {}  density {:.2}",
            name,
            paint_lcom(c.lcom4),
            c.density
        );
        if c.lcom4 > 1 {
            println!(
                "      {}",
                format!("{} disjoint method groups; consider splitting", c.lcom4).dimmed()
            );
        }
    }
}

pub fn print_deps(graph: &DependencyGraph) {
    println!(
        "\n{} {} modules | {} edges",
        "DEPENDENCIES".cyan().bold(),
        graph.nodes.len(),
        graph.edges.len()
    );
    for (from, to) in &graph.edges {
        println!("  {from} → {to}");
    }
}

pub fn print_cycles(cycles: &[Vec<String>]) {
    if cycles.is_empty() {
        println!("{}", "  ✓ No dependency cycles.".green());
        return;
    }
    println!("{} {}", "CYCLES".red().bold(), format_count(cycles.len()));
    for cycle in cycles {
        let mut path = cycle.clone();
        if let Some(first) = cycle.first() {
            path.push(first.clone());
        }
        println!("  {}", path.join(" → ").red());
    }
}

pub fn print_audit(report: &AuditReport) {
    let title = report.module.as_deref().unwrap_or("<outside root>");
    println!(
        "\n{} {} ({})",
        "AUDIT".cyan().bold(),
        report.file.display(),
        title.dimmed()
    );

    if let Some(error) = &report.error {
        println!("  {} {error}", "✗".red());
        return;
    }
    if report.violations.is_empty() {
        println!("  {}", "✓ All in-project imports are allowed.".green());
        return;
    }
    for violation in &report.violations {
        println!("  {} imports {}", "✗".red(), violation.red().bold());
    }
}
