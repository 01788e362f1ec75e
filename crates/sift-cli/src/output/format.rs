use serde::Serialize;
use sift_core::model::{AnalysisBead, BeadDependency, ClusterResult, Signal};

use super::OutputFormat;

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_default();
    out.push('\n');
    out
}

pub fn format_cluster_result(result: &ClusterResult, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => to_json(result),
        OutputFormat::Text => format_cluster_result_text(result),
    }
}

fn format_cluster_result_text(result: &ClusterResult) -> String {
    if result.is_empty() {
        return "No signals to cluster.\n".to_string();
    }

    let mut out = String::new();
    for c in &result.clusters {
        out.push_str(&format!(
            "\u{25c6} {} {} ({} signals, confidence {:.2})\n",
            c.id,
            c.name,
            c.signal_ids.len(),
            c.confidence
        ));
        if !c.description.is_empty() {
            out.push_str(&format!("  {}\n", c.description));
        }
        out.push_str(&format!("  Signals: {}\n", c.signal_ids.join(", ")));
        if !c.tags.is_empty() {
            out.push_str(&format!("  Tags: {}\n", c.tags.join(", ")));
        }
    }
    if !result.unclustered.is_empty() {
        out.push_str(&format!("Unclustered: {}\n", result.unclustered.join(", ")));
    }
    out
}

pub fn format_beads(beads: &[AnalysisBead], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => to_json(beads),
        OutputFormat::Text => format_beads_text(beads),
    }
}

fn format_beads_text(beads: &[AnalysisBead]) -> String {
    if beads.is_empty() {
        return "No beads produced.\n".to_string();
    }

    let mut out = String::new();
    for b in beads {
        let indent = if b.parent_id.is_empty() { "" } else { "  " };
        out.push_str(&format!(
            "{indent}\u{25c6} {} [{}] {} ({:.2})\n",
            b.id, b.bead_type, b.title, b.confidence
        ));
        if !b.tags.is_empty() {
            out.push_str(&format!("{indent}  Tags: {}\n", b.tags.join(", ")));
        }
    }
    out
}

pub fn format_signals(signals: &[Signal], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => to_json(signals),
        OutputFormat::Text => format_signals_text(signals),
    }
}

fn format_signals_text(signals: &[Signal]) -> String {
    if signals.is_empty() {
        return "No signals.\n".to_string();
    }

    let mut out = String::new();
    for s in signals {
        let priority = s
            .priority
            .map(|p| format!("P{p}"))
            .unwrap_or_else(|| "--".to_string());
        let location = s.location();
        if location.is_empty() {
            out.push_str(&format!("{priority} {} [{}]\n", s.title, s.kind));
        } else {
            out.push_str(&format!("{priority} {} [{}] {location}\n", s.title, s.kind));
        }
        if !s.depends_on.is_empty() {
            out.push_str(&format!("   depends on: {}\n", s.depends_on.join(", ")));
        }
        if !s.blocks.is_empty() {
            out.push_str(&format!("   blocks: {}\n", s.blocks.join(", ")));
        }
    }
    out
}

pub fn format_dependencies(deps: &[BeadDependency], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => to_json(deps),
        OutputFormat::Text => format_dependencies_text(deps),
    }
}

fn format_dependencies_text(deps: &[BeadDependency]) -> String {
    if deps.is_empty() {
        return "No dependencies found.\n".to_string();
    }

    deps.iter()
        .map(|d| {
            format!(
                "{} -[{}]-> {} ({:.2})\n",
                d.from_id, d.dep_type, d.to_id, d.confidence
            )
        })
        .collect()
}
