//! Task list projection.
//!
//! # Responsibility
//! - Turn the live task collection into display rows.
//! - Keep task text inert: rows carry it as [`PlainText`], never as markup.
//!
//! # Invariants
//! - Every render rebuilds all rows; nothing is diffed or reused.
//! - Row order equals collection order.
//! - The empty-state placeholder is visible iff there are no rows.

use crate::model::task::{Task, TaskId};
use std::fmt::{Display, Formatter, Write};

/// User-authored text that must be shown literally.
///
/// `Display` escapes control characters (other than newline and tab) so task
/// content cannot inject terminal control sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainText(String);

impl PlainText {
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// The verbatim text.
    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for PlainText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for ch in self.0.chars() {
            if ch.is_control() && ch != '\n' && ch != '\t' {
                for escaped in ch.escape_unicode() {
                    f.write_char(escaped)?;
                }
            } else {
                f.write_char(ch)?;
            }
        }
        Ok(())
    }
}

/// One display element per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub task_id: TaskId,
    pub title: PlainText,
    pub description: PlainText,
    /// Whether the tools row (edit/delete/share) is revealed.
    pub tools_visible: bool,
}

/// Per-row interactions wired by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Whole-row click; reveals or hides the tools row.
    ToggleTools,
    Delete,
    Edit,
    Share,
}

/// Rendered task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    pub placeholder_visible: bool,
    pub rows: Vec<TaskRow>,
}

impl ListView {
    /// Flips the tools row of `task_id`. Purely visual.
    pub fn toggle_tools(&mut self, task_id: &TaskId) -> bool {
        match self.rows.iter_mut().find(|row| &row.task_id == task_id) {
            Some(row) => {
                row.tools_visible = !row.tools_visible;
                true
            }
            None => false,
        }
    }

    /// Row at 1-based `position`, as numbered by text frontends.
    pub fn row_at(&self, position: usize) -> Option<&TaskRow> {
        position
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
    }
}

/// Builds a fresh view of `tasks`.
pub fn render(tasks: &[Task]) -> ListView {
    if tasks.is_empty() {
        return ListView {
            placeholder_visible: true,
            rows: Vec::new(),
        };
    }

    ListView {
        placeholder_visible: false,
        rows: tasks.iter().map(task_row).collect(),
    }
}

fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        task_id: task.id.clone(),
        title: PlainText::new(&task.title),
        description: PlainText::new(&task.description),
        tools_visible: false,
    }
}

#[cfg(test)]
mod tests {
    use super::{render, PlainText};
    use crate::model::task::{Task, TaskId};

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: TaskId::from(id),
            title: title.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn empty_collection_shows_placeholder() {
        let view = render(&[]);
        assert!(view.placeholder_visible);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn rows_follow_collection_order() {
        let view = render(&[task("1", "A"), task("2", "B")]);
        assert!(!view.placeholder_visible);
        let titles: Vec<&str> = view.rows.iter().map(|row| row.title.raw()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert!(view.rows.iter().all(|row| !row.tools_visible));
    }

    #[test]
    fn toggle_flips_only_target_row() {
        let mut view = render(&[task("1", "A"), task("2", "B")]);
        assert!(view.toggle_tools(&TaskId::from("2")));
        assert!(!view.rows[0].tools_visible);
        assert!(view.rows[1].tools_visible);
        assert!(!view.toggle_tools(&TaskId::from("9")));
    }

    #[test]
    fn plain_text_escapes_terminal_sequences() {
        let text = PlainText::new("<b>hi</b>\u{1b}[31m");
        let shown = text.to_string();
        assert!(shown.starts_with("<b>hi</b>"));
        assert!(!shown.contains('\u{1b}'));
        assert_eq!(text.raw(), "<b>hi</b>\u{1b}[31m");
    }

    #[test]
    fn row_at_is_one_based() {
        let view = render(&[task("1", "A")]);
        assert_eq!(view.row_at(1).map(|row| row.title.raw()), Some("A"));
        assert!(view.row_at(0).is_none());
        assert!(view.row_at(2).is_none());
    }
}
