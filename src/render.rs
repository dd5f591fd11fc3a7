use std::fmt::Write;

use habita_plan::{AssignmentSet, FairnessSummary, Notice, NoticeLevel};
use habita_shared::plan::Assignment;

const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const BAR_COLUMNS: usize = 20;

/// `1` is Monday. Day-less assignments fall under "Any day".
pub fn day_label(day_of_week: Option<u8>) -> &'static str {
    match day_of_week {
        Some(day @ 1..=7) => DAYS[usize::from(day - 1)],
        Some(_) => "Unknown day",
        None => "Any day",
    }
}

pub fn notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };

    format!("[{tag}] {}", notice.message)
}

fn assignment_line(set: &AssignmentSet, assignment: &Assignment) -> String {
    let marker = if set.plan().is_pending() {
        if set.is_selected(&assignment.key()) {
            "[x] "
        } else {
            "[ ] "
        }
    } else {
        ""
    };

    let mut line = format!(
        "  {marker}{} -> {} ({})",
        assignment.task_name, assignment.member_name, assignment.member_type
    );

    match (&assignment.start_time, &assignment.end_time) {
        (Some(start), Some(end)) => {
            let _ = write!(line, " {start}-{end}");
        }
        (Some(start), None) => {
            let _ = write!(line, " {start}");
        }
        _ => {}
    }

    let _ = write!(line, "  {}", assignment.reason);

    line
}

/// Plan grouped by day, with selection markers while the plan is pending.
pub fn plan(set: &AssignmentSet) -> String {
    let plan = set.plan();
    let mut out = String::new();

    let _ = writeln!(out, "Plan {} ({}, {} days)", plan.id, plan.status, plan.duration_days);
    if let Some(start_date) = &plan.start_date {
        let _ = writeln!(out, "Starts {start_date}");
    }
    if plan.is_pending() {
        let _ = writeln!(
            out,
            "{} of {} assignments selected",
            set.selected_count(),
            set.unique_assignments().len()
        );
    }

    let groups = set.grouped_by_day();
    if groups.is_empty() {
        let _ = writeln!(out, "\nNo assignments.");
    }

    for (day, assignments) in groups {
        let _ = writeln!(out, "\n{}", day_label(day));
        for assignment in assignments {
            let _ = writeln!(out, "{}", assignment_line(set, assignment));
        }
    }

    if !plan.excluded_tasks.is_empty() {
        let _ = writeln!(out, "\nNot in this plan:");
        for task in &plan.excluded_tasks {
            let _ = writeln!(out, "  {} ({})", task.task_name, task.frequency);
        }
    }

    if !plan.notes.is_empty() {
        let _ = writeln!(out, "\nNotes:");
        for note in &plan.notes {
            let _ = writeln!(out, "  - {note}");
        }
    }

    out
}

pub fn fairness(summary: &FairnessSummary) -> String {
    let filled = usize::from(summary.bar_width) * BAR_COLUMNS / 100;
    let mut out = format!(
        "Balance {:>3}/100 [{}{}] {}",
        summary.balance_score,
        "#".repeat(filled),
        "-".repeat(BAR_COLUMNS - filled),
        summary.tier
    );

    if !summary.from_server {
        out.push_str(" (recounted locally)");
    }

    for (name, count) in &summary.details.adult_distribution {
        let _ = write!(out, "\n  {name}: {count}");
    }

    if !summary.details.adult_distribution.is_empty() {
        let balance = if summary.details.is_symmetric {
            "even".to_owned()
        } else {
            format!("off by {}", summary.details.max_difference)
        };
        let _ = write!(out, "\n  adults {balance}");
    }

    out
}
