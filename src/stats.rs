use crate::models::{CategoryCount, TaskStatRow, TaskStats};
use std::collections::BTreeMap;

/// Summarizes one user's tasks in a single pass.
///
/// A category's name and color come from the first row that references it.
/// Rows whose category did not resolve still count toward that category id,
/// with empty display fields.
pub fn build_stats(rows: &[TaskStatRow]) -> TaskStats {
    let mut total_tasks = 0u64;
    let mut completed_tasks = 0u64;
    let mut category_counts: BTreeMap<_, CategoryCount> = BTreeMap::new();

    for row in rows {
        total_tasks += 1;
        if row.is_complete {
            completed_tasks += 1;
        }

        let Some(category_id) = row.category_id else {
            continue;
        };
        let entry = category_counts.entry(category_id).or_insert_with(|| {
            let (name, color) = match &row.category {
                Some(label) => (label.name.clone(), label.color.clone()),
                None => (String::new(), String::new()),
            };
            CategoryCount {
                total: 0,
                completed: 0,
                name,
                color,
            }
        });
        entry.total += 1;
        if row.is_complete {
            entry.completed += 1;
        }
    }

    let completion_rate = if total_tasks > 0 {
        completed_tasks as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };

    TaskStats {
        total_tasks,
        completed_tasks,
        incomplete_tasks: total_tasks - completed_tasks,
        completion_rate,
        category_counts,
    }
}

/// Whole-number percentage for display; 0 when `whole` is 0.
pub fn rounded_percentage(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u64
}
