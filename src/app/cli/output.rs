use serde_json::Value;

use crate::app::api::{QueryRows, RefinementOutcome, RefinementStatus};

/// Print a refinement outcome: the query on stdout, status details on stderr.
pub(super) fn print_outcome(outcome: &RefinementOutcome) {
    match &outcome.status {
        RefinementStatus::Succeeded => {
            println!("{}", outcome.final_query);
            if let Some(rows) = &outcome.rows {
                println!();
                print_rows(rows);
            }
            eprintln!("✅ Query confirmed after {} round(s)", outcome.iterations);
        }
        RefinementStatus::Exhausted => {
            println!("{}", outcome.final_query);
            eprintln!(
                "⚠️  Query not confirmed after {} round(s); treat it with caution",
                outcome.iterations
            );
            print_errors(outcome);
        }
        RefinementStatus::NeedsClarification { question } => {
            eprintln!("🤔 The model needs more details: {}", question);
        }
        RefinementStatus::Aborted { reason } => {
            if !outcome.final_query.is_empty() {
                println!("{}", outcome.final_query);
            }
            eprintln!("❌ Refinement stopped after {} round(s): {}", outcome.iterations, reason);
            print_errors(outcome);
        }
    }
}

fn print_errors(outcome: &RefinementOutcome) {
    for (idx, error) in outcome.error_history.iter().enumerate() {
        eprintln!("  {}. {}", idx + 1, error);
    }
}

/// Print rows as a tab-separated table with a header line.
pub(super) fn print_rows(rows: &QueryRows) {
    println!("{}", rows.columns.join("\t"));
    for row in &rows.rows {
        let cells: Vec<String> = row.iter().map(format_cell).collect();
        println!("{}", cells.join("\t"));
    }
    eprintln!("({} row(s))", rows.len());
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cells_render_without_json_quoting() {
        assert_eq!(format_cell(&json!("India")), "India");
        assert_eq!(format_cell(&json!(42)), "42");
        assert_eq!(format_cell(&json!(1.5)), "1.5");
        assert_eq!(format_cell(&Value::Null), "NULL");
    }
}
