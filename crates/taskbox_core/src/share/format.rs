//! Shareable text for a task.

use crate::model::task::Task;

/// Formats `task` as `Task <title>`, adding `\nDescription <description>`
/// when the description has visible text.
pub fn format_task_text(task: &Task) -> String {
    let mut text = format!("Task {}", task.title);
    if task.has_description() {
        text.push_str("\nDescription ");
        text.push_str(&task.description);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::format_task_text;
    use crate::model::task::{Task, TaskId};

    fn task(title: &str, description: &str) -> Task {
        Task {
            id: TaskId::from("1"),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn omits_description_line_when_empty() {
        assert_eq!(format_task_text(&task("Buy milk", "")), "Task Buy milk");
    }

    #[test]
    fn omits_description_line_when_whitespace_only() {
        assert_eq!(format_task_text(&task("Buy milk", "  \n")), "Task Buy milk");
    }

    #[test]
    fn appends_description_line() {
        assert_eq!(
            format_task_text(&task("Write report", "Q3 summary")),
            "Task Write report\nDescription Q3 summary"
        );
    }
}
