use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

use crate::detect::DriftPoint;
use crate::identity::OperatorIdentity;
use crate::pipeline::{Breakdown, ChatAnalysis, Shortlist};

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Left-align to a display width; `{:<n}` counts chars, not columns.
fn pad(s: &str, width: usize) -> String {
    let s = truncate(s, width);
    let fill = width.saturating_sub(UnicodeWidthStr::width(s.as_str()));
    format!("{s}{}", " ".repeat(fill))
}

fn format_created(created: Option<&DateTime<Utc>>) -> String {
    created
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Counts come from the breakdown; `entries` may have been cut by `--limit`.
fn shortlist_header(shortlist: &Shortlist) -> String {
    let flagged = shortlist.breakdown.flagged;
    let total = shortlist.breakdown.total;
    let shown = shortlist.entries.len();
    if shown < flagged {
        format!(
            "{flagged} flagged chat{} out of {total}, showing the top {shown}:",
            plural(flagged)
        )
    } else {
        format!("{flagged} flagged chat{} out of {total}:", plural(flagged))
    }
}

/// Stage one listing for `chatrisk flag`.
pub fn print_shortlist(shortlist: &Shortlist) {
    let entries = &shortlist.entries;
    if shortlist.breakdown.flagged == 0 {
        println!(
            "No potentially abusive chats among {} transcript{}.",
            shortlist.breakdown.total,
            plural(shortlist.breakdown.total)
        );
        return;
    }

    println!("{}\n", shortlist_header(shortlist));
    println!(
        "  {:<10} {:>6} {} {} {} {}",
        "CHAT",
        "HITS",
        pad("CREATED", 16),
        pad("ANTENNA", 20),
        pad("LOCATION", 12),
        "OPERATOR"
    );
    println!("  {}", "-".repeat(86));

    for e in entries {
        println!(
            "  {:<10} {:>6} {} {} {} {}",
            e.candidate.id,
            e.candidate.preliminary_score,
            pad(&format_created(e.created_at.as_ref()), 16),
            pad(&e.antenna, 20),
            pad(&e.volunteer_location, 12),
            truncate(&e.operator_name, 24),
        );
    }
    println!();
    print_breakdown(&shortlist.breakdown);
}

pub fn print_breakdown(breakdown: &Breakdown) {
    println!("Flagged by antenna:");
    for (antenna, count) in &breakdown.by_antenna {
        println!("    {} {count}", pad(antenna, 24));
    }
    println!("\nFlagged by volunteer location:");
    for (location, count) in &breakdown.by_location {
        println!("    {} {count}", pad(location, 24));
    }
}

/// Summary table for `chatrisk analyze`, followed by per-chat details.
pub fn print_analyses(analyses: &[ChatAnalysis]) {
    if analyses.is_empty() {
        println!("No chats analyzed.");
        return;
    }

    println!("{} chat{} analyzed:\n", analyses.len(), plural(analyses.len()));
    println!(
        "  {:<10} {:>5} {} {} {}",
        "CHAT",
        "SCORE",
        pad("SEVERITY", 12),
        pad("ANTENNA", 20),
        "FACTORS"
    );
    println!("  {}", "-".repeat(86));
    for a in analyses {
        println!(
            "  {:<10} {:>5} {} {} {}",
            a.id,
            a.result.score,
            pad(a.result.severity.label(), 12),
            pad(&a.antenna, 20),
            truncate(&a.result.risk_factors.join("; "), 40),
        );
    }

    for a in analyses {
        println!();
        print_analysis_detail(a);
    }
}

pub fn print_analysis_detail(a: &ChatAnalysis) {
    let r = &a.result;
    println!("Chat {}: {} ({}/100)", a.id, r.severity.label(), r.score);
    println!("  Created:   {}", format_created(a.created_at.as_ref()));
    println!("  Operator:  {} ({})", a.operator_name, a.volunteer_location);
    println!("  Antenna:   {}", a.antenna);
    if r.harassment_detected {
        println!("  Harassment directed at the operator");
    }

    if !r.risk_factors.is_empty() {
        println!("\n  Risk factors:");
        for factor in &r.risk_factors {
            println!("    - {factor}");
        }
    }

    let phrases = r.flagged_phrases();
    if !phrases.is_empty() {
        println!("\n  Evidence:");
        for (label, evidence) in phrases {
            println!("    {label}:");
            for line in evidence {
                println!("      \"{}\"", truncate(&line.replace('\n', " "), 72));
            }
        }
    }

    if !r.topic_drift_points.is_empty() {
        println!("\n  Topic changes ({}):", r.topic_drift_points.len());
        for point in &r.topic_drift_points {
            print_drift_point(point);
        }
    }
}

fn print_drift_point(point: &DriftPoint) {
    println!("    #{} similarity {:.2}", point.index, point.similarity);
    println!("      before: {}", truncate(&point.previous_turn, 68));
    println!("      after:  {}", truncate(&point.current_turn, 68));
}

pub fn print_operator(id: i64, identity: &OperatorIdentity) {
    println!("Operator {id}");
    println!("  Name:     {}", identity.canonical_name);
    println!("  Location: {}", identity.branch_label);
}
