// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use colored::*;
use std::time::Duration;

use super::scene::{CheckReport, EvalReport};
use crate::bottess::{RegionStatus, SplitStats};

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a solidity check
    pub fn report_check(report: &CheckReport, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Mesh:".bold(), report.file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        if report.solid {
            println!("{} {}", "✅".green(), "Closed, consistently oriented solid".green().bold());
        } else {
            println!("{} {}", "❌".red(), "Not a solid".red().bold());
        }

        println!("\n{}", "Topology:".bold());
        Self::print_count("Vertices", report.vertices, false);
        Self::print_count("Faces", report.faces, false);

        println!("  {} {}", "Closed fan:".bright_black(), Self::yes_no(report.closed_fan));
        println!("  {} {}", "Orientable:".bright_black(), Self::yes_no(report.orientable));

        if !report.solid {
            println!("  {} {:?}", "Defects:".bright_black(), report.flags);
        }

        if let Some(errors) = &report.errors {
            Self::print_count("Degenerate faces", errors.degenerate.count(), true);
            Self::print_count("Unmatched edges", errors.unmatched.count(), true);
            Self::print_count("Misoriented edges", errors.misoriented.count(), true);
            Self::print_count("Excess edges", errors.excess.count(), true);

            for (a, b) in errors.bad_edges().iter().take(20) {
                println!("    {} {} -> {}", "edge".bright_black(), a, b);
            }
        }

        println!(
            "\n  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report a region walk
    pub fn report_walk(report: &EvalReport, duration: Duration) {
        let summary = &report.summary;

        println!("\n{}", "═".repeat(80).bright_black());
        println!("{} {}", "Scene:".bold(), report.file.cyan());
        println!("{}", "═".repeat(80).bright_black());

        for region in &summary.regions {
            match &region.status {
                RegionStatus::Written { faces } => println!(
                    "  {} {} {}",
                    "✅".green(),
                    region.path.cyan(),
                    format!("({} faces)", faces).bright_black()
                ),
                RegionStatus::Skipped => {
                    println!("  {} {} {}", "·".bright_black(), region.path, "(empty)".bright_black())
                }
                RegionStatus::Failed { error } => {
                    println!("  {} {}", "❌".red(), region.path.red());
                    println!("       {}", error.bright_black());
                }
            }
        }

        println!("\n{}", "Regions:".bold());
        Self::print_count("Written", summary.written(), false);
        Self::print_count("Skipped", summary.skipped(), false);
        Self::print_count("Failed", summary.failed(), true);

        println!("\n{}", "Splitting:".bold());
        Self::print_stats(&summary.stats);

        println!(
            "\n  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "═".repeat(80).bright_black());
    }

    fn print_stats(stats: &SplitStats) {
        Self::print_count("Pair tests", stats.pair_tests as usize, false);
        Self::print_count("Intersecting", stats.intersecting as usize, false);
        Self::print_count("Coplanar", stats.coplanar as usize, false);
        Self::print_count("Faces split", stats.faces_split as usize, false);
        Self::print_count("Unsupported", stats.unsupported.total() as usize, true);
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print a count, red when it is a nonzero problem count
    fn print_count(name: &str, value: usize, problem: bool) {
        let formatted = if problem && value > 0 {
            value.to_string().red()
        } else if problem {
            value.to_string().green()
        } else {
            value.to_string().cyan()
        };
        println!("  {} {}", format!("{}:", name).bright_black(), formatted);
    }

    fn yes_no(value: bool) -> ColoredString {
        if value {
            "yes".green()
        } else {
            "no".red()
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}
