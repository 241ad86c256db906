//! PDF report generation.
//!
//! A pure function from the task list to a paginated PDF: the document
//! title, a summary line, then an "Incomplete Tasks" and a "Completed
//! Tasks" table (each only when non-empty). Layout decisions live in
//! [`layout`]; [`pdf`] encodes them. Tasks are assumed to satisfy store
//! invariants; no validation happens here.

pub mod layout;
mod pdf;

use crate::task::Task;

/// Fixed attachment filename for the downloaded report.
pub const REPORT_FILENAME: &str = "my-todo-list.pdf";

/// Render the report for `tasks` (newest-first, as the store lists them).
/// Identical input produces identical layout decisions and bytes.
pub fn generate(tasks: &[Task]) -> Vec<u8> {
    pdf::render(&layout::lay_out(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_still_a_pdf() {
        let bytes = generate(&[]);
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn identical_input_gives_identical_bytes() {
        use crate::task::{Priority, Task};
        use chrono::{TimeZone, Utc};
        use uuid::Uuid;

        let tasks = vec![Task {
            id: Uuid::nil(),
            title: "stable".to_string(),
            description: Some("same every time".to_string()),
            priority: Priority::High,
            completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }];

        assert_eq!(generate(&tasks), generate(&tasks));
    }
}
