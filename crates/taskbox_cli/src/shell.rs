//! Line-oriented frontend over a [`TaskApp`] session.
//!
//! Each input line becomes at most one [`UiEvent`]. Rows are addressed by
//! their 1-based position in the last painted list.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::time::Instant;
use taskbox_core::{
    DialogAction, DialogContext, Handled, HandlerScope, ListView, ModalKind, PlainText,
    PointerTarget, RowAction, ShareTarget, TaskApp, TaskRepository, UiEvent,
};

const HELP: &str = "\
commands:
  add <title> [| <description>]   create a task; write \\| for a literal |
  toggle <n>                      show or hide the tools of task n
  edit <n> | delete <n> | share <n>
  title <text> | desc <text>      change the edit dialog fields
  save | confirm | cancel         act on the top dialog
  copy | vk | telegram | whatsapp | facebook
  backdrop                        click outside the top dialog
  list | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add { title: String, description: String },
    Row { position: usize, action: RowAction },
    Confirm,
    Cancel,
    Title(String),
    Description(String),
    Share(ShareTarget),
    Backdrop,
    List,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "add" => {
            let (title, description) = split_add_fields(rest);
            ShellCommand::Add { title, description }
        }
        "toggle" => row_command(rest, RowAction::ToggleTools)?,
        "edit" => row_command(rest, RowAction::Edit)?,
        "delete" => row_command(rest, RowAction::Delete)?,
        "share" => row_command(rest, RowAction::Share)?,
        "confirm" | "save" => ShellCommand::Confirm,
        "cancel" => ShellCommand::Cancel,
        "title" => ShellCommand::Title(rest.to_string()),
        "desc" => ShellCommand::Description(rest.to_string()),
        "backdrop" => ShellCommand::Backdrop,
        "list" => ShellCommand::List,
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => match ShareTarget::parse(other) {
            Some(target) => ShellCommand::Share(target),
            None => return Err(format!("unknown command `{other}`; type `help`")),
        },
    };
    Ok(Some(command))
}

/// Splits `add` input on the first unescaped `|`, unescaping `\|`.
fn split_add_fields(rest: &str) -> (String, String) {
    let mut title = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                title.push('|');
                chars.next();
            }
            '|' => return (title, chars.collect::<String>().replace("\\|", "|")),
            _ => title.push(ch),
        }
    }
    (title, String::new())
}

fn row_command(rest: &str, action: RowAction) -> Result<ShellCommand, String> {
    let position = rest
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("expected a task number, got `{}`", rest.trim()))?;
    Ok(ShellCommand::Row { position, action })
}

/// Runs the read-eval-paint loop until `quit` or end of input.
pub fn run<R, I, O>(app: &mut TaskApp<R>, input: I, out: &mut O) -> Result<()>
where
    R: TaskRepository,
    I: BufRead,
    O: Write,
{
    paint(app, out)?;
    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(ShellCommand::Help)) => writeln!(out, "{HELP}")?,
            Ok(Some(command)) => execute(app, command, out)?,
            Err(message) => writeln!(out, "{message}")?,
        }
        settle(app);
        paint(app, out)?;
    }
    Ok(())
}

fn execute<R, O>(app: &mut TaskApp<R>, command: ShellCommand, out: &mut O) -> Result<()>
where
    R: TaskRepository,
    O: Write,
{
    let needs_dialog = matches!(
        command,
        ShellCommand::Confirm
            | ShellCommand::Cancel
            | ShellCommand::Title(_)
            | ShellCommand::Description(_)
            | ShellCommand::Share(_)
            | ShellCommand::Backdrop
    );
    let event = match command {
        ShellCommand::Add { title, description } => {
            Some(UiEvent::SubmitNewTask { title, description })
        }
        ShellCommand::Row { position, action } => match app.view().row_at(position) {
            Some(row) => Some(UiEvent::Row {
                task_id: row.task_id.clone(),
                action,
            }),
            None => {
                writeln!(out, "no task at position {position}")?;
                None
            }
        },
        ShellCommand::Confirm => dialog_event(top_dialog(app), DialogAction::Confirm),
        ShellCommand::Cancel => dialog_event(top_dialog(app), DialogAction::Cancel),
        ShellCommand::Title(title) => dialog_event(
            app.modals().scope(ModalKind::EditTask),
            DialogAction::SetTitle(title),
        ),
        ShellCommand::Description(description) => dialog_event(
            app.modals().scope(ModalKind::EditTask),
            DialogAction::SetDescription(description),
        ),
        ShellCommand::Share(target) => dialog_event(
            app.modals().scope(ModalKind::Share),
            DialogAction::Share(target),
        ),
        ShellCommand::Backdrop => top_dialog(app).map(|scope| UiEvent::Pointer {
            modal: scope.kind(),
            target: PointerTarget::Backdrop,
        }),
        ShellCommand::List | ShellCommand::Help | ShellCommand::Quit => None,
    };

    let Some(event) = event else {
        if needs_dialog {
            writeln!(out, "no matching dialog is open")?;
        }
        return Ok(());
    };

    match app.handle(event) {
        Ok(Handled::Ignored) => writeln!(out, "nothing to do")?,
        Ok(Handled::CopyPending(_)) => writeln!(out, "copying...")?,
        Ok(_) => {}
        // The change is on screen but not on disk; the session keeps going.
        Err(err) => writeln!(out, "warning: {err}")?,
    }
    Ok(())
}

fn dialog_event(scope: Option<HandlerScope>, action: DialogAction) -> Option<UiEvent> {
    scope.map(|scope| UiEvent::Dialog { scope, action })
}

/// Most recently opened dialog.
fn top_dialog<R: TaskRepository>(app: &TaskApp<R>) -> Option<HandlerScope> {
    app.modals()
        .open_kinds()
        .into_iter()
        .filter_map(|kind| app.modals().scope(kind))
        .max_by_key(|scope| scope.generation())
}

fn settle<R: TaskRepository>(app: &mut TaskApp<R>) {
    let now = Instant::now();
    app.drain_clipboard(now);
    app.prune_notifications(now);
}

fn paint<R, O>(app: &TaskApp<R>, out: &mut O) -> Result<()>
where
    R: TaskRepository,
    O: Write,
{
    for notification in app.notifications(Instant::now()) {
        writeln!(out, "* {}", notification.message)?;
    }
    paint_list(app.view(), out)?;
    for kind in app.modals().open_kinds() {
        if let Some((_, context)) = app.dialog(kind) {
            paint_dialog(app, context, out)?;
        }
    }
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn paint_list<O: Write>(view: &ListView, out: &mut O) -> Result<()> {
    if view.placeholder_visible {
        writeln!(out, "  no tasks yet")?;
        return Ok(());
    }
    for (index, row) in view.rows.iter().enumerate() {
        let position = index + 1;
        writeln!(out, "{position:>3}. {}", row.title)?;
        if !row.description.is_empty() {
            writeln!(out, "     {}", row.description)?;
        }
        if row.tools_visible {
            writeln!(
                out,
                "     [edit {position}] [delete {position}] [share {position}]"
            )?;
        }
    }
    Ok(())
}

fn paint_dialog<R, O>(app: &TaskApp<R>, context: &DialogContext, out: &mut O) -> Result<()>
where
    R: TaskRepository,
    O: Write,
{
    match context {
        DialogContext::ConfirmDelete { task_id } => {
            let title = app
                .store()
                .get(task_id)
                .map(|task| PlainText::new(&task.title))
                .unwrap_or_else(|| PlainText::new(""));
            writeln!(out, "[delete] remove \"{title}\"? confirm | cancel")?;
        }
        DialogContext::EditTask { draft, .. } => {
            writeln!(
                out,
                "[edit] title: \"{}\" description: \"{}\"  title <text> | desc <text> | save | cancel",
                PlainText::new(&draft.title),
                PlainText::new(&draft.description)
            )?;
        }
        DialogContext::Share => {
            let title = app
                .share_target()
                .map(|task| PlainText::new(&task.title))
                .unwrap_or_else(|| PlainText::new(""));
            let targets: Vec<&str> = ShareTarget::ALL.iter().map(|target| target.as_str()).collect();
            writeln!(
                out,
                "[share] \"{title}\" via {} | cancel",
                targets.join(" | ")
            )?;
        }
    }
    Ok(())
}
