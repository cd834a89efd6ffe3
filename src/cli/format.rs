//! Output formatting for CLI display.

use std::fmt::Write;

use crate::model::{Recipe, Step};
use crate::storage::RecipeEntry;
use crate::table::format_duration;

/// Format one step as a table line: temperature, fan speed, duration.
pub(super) fn format_step(step: &Step) -> String {
    let temp = match step.target_temp() {
        Some(t) => format!("{t}°"),
        None => "Cooling".to_string(),
    };
    format!(
        "{temp:<8} fan {}  {}",
        step.fan_speed(),
        format_duration(u64::from(step.section_time()))
    )
}

/// Format a recipe for human-readable display. Rows are numbered from 1.
pub(super) fn format_recipe(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", display_name(&recipe.roast_name));
    let _ = writeln!(out, "  Created by:  {}", recipe.creator);
    let _ = writeln!(out, "  Roast type:  {}", recipe.roast_description.roast_type);
    let _ = writeln!(
        out,
        "  Bean:        {}",
        join_nonempty(&[recipe.bean.region.as_str(), recipe.bean.country.as_str()])
    );
    let _ = writeln!(
        out,
        "  Source:      {}",
        join_nonempty(&[
            recipe.bean.source.reseller.as_str(),
            recipe.bean.source.link.as_str(),
        ])
    );
    let _ = writeln!(
        out,
        "  Total time:  {}",
        format_duration(recipe.computed_total_time())
    );

    if !recipe.roast_description.description.is_empty() {
        out.push('\n');
        for line in recipe.roast_description.description.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    out.push('\n');
    for (i, step) in recipe.steps.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {}", i + 1, format_step(step));
    }
    out
}

/// Format a directory listing entry on one line.
pub(super) fn format_entry(entry: &RecipeEntry) -> String {
    format!(
        "{}  [{}]  {} step(s), {}  {}",
        display_name(&entry.roast_name),
        entry.creator,
        entry.steps,
        format_duration(entry.total_time),
        entry.path.display()
    )
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "(unnamed)" } else { name }
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}
