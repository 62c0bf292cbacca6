//! Task session controller.
//!
//! # Responsibility
//! - Own every piece of mutable session state: the task store, dialog
//!   bindings, the current share target, notifications and the rendered view.
//! - Translate frontend events into store mutations and dialog transitions.
//!
//! # Invariants
//! - The view is rebuilt after every store mutation, including failed writes.
//! - Dialog button events only act through a live [`HandlerScope`].
//! - The share target slot is overwritten by each share action and never
//!   cleared by dispatch.
//! - Clipboard results are applied only when drained on this context.

use crate::model::task::{Task, TaskDraft, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::service::task_service::{Mutation, TaskService, TaskServiceResult};
use crate::settings::SessionSettings;
use crate::share::dispatch::{Browser, Clipboard, ClipboardOutcome, ClipboardReply};
use crate::share::format::format_task_text;
use crate::share::targets::{share_link, ShareTarget};
use crate::ui::modal::{HandlerScope, ModalController, ModalKind, PointerTarget};
use crate::ui::notify::{Notification, Notifier};
use crate::ui::render::{render, ListView, RowAction};
use log::{error, info, warn};
use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

/// Message shown after a successful clipboard copy.
pub const COPY_NOTIFICATION: &str = "The task was copied";

/// Context bound to one opening of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogContext {
    ConfirmDelete { task_id: TaskId },
    EditTask { task_id: TaskId, draft: TaskDraft },
    Share,
}

/// Buttons and inputs inside a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    /// Confirm on the delete dialog, save on the edit dialog.
    Confirm,
    Cancel,
    /// Edit dialog title input changed (untrimmed).
    SetTitle(String),
    /// Edit dialog description input changed (untrimmed).
    SetDescription(String),
    /// One of the share dialog's target buttons.
    Share(ShareTarget),
}

/// Discrete user interactions delivered by a frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// New-task form submission with raw field values.
    SubmitNewTask { title: String, description: String },
    /// Interaction on one rendered row.
    Row { task_id: TaskId, action: RowAction },
    /// Interaction inside a dialog, tagged with the scope it was bound to.
    Dialog {
        scope: HandlerScope,
        action: DialogAction,
    },
    /// Pointer interaction on an open dialog's overlay.
    Pointer {
        modal: ModalKind,
        target: PointerTarget,
    },
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// A task was created; the frontend should clear its form.
    Created(TaskId),
    /// The store changed and the view was rebuilt.
    Rerendered,
    /// Only view or dialog state changed.
    ViewChanged,
    /// A clipboard copy is in flight.
    CopyPending(u64),
    /// Nothing happened (invalid input, stale scope, unknown id).
    Ignored,
}

/// One interactive task list session.
pub struct TaskApp<R: TaskRepository> {
    tasks: TaskService<R>,
    modals: ModalController<DialogContext>,
    view: ListView,
    notifier: Notifier,
    share_target: Option<Task>,
    page_url: String,
    clipboard: Box<dyn Clipboard>,
    browser: Box<dyn Browser>,
    clipboard_tx: Sender<ClipboardOutcome>,
    clipboard_rx: Receiver<ClipboardOutcome>,
    pending_copies: HashSet<u64>,
    next_copy_id: u64,
}

impl<R: TaskRepository> TaskApp<R> {
    /// Loads the collection from `repo` and renders the initial view.
    pub fn open(
        repo: R,
        settings: SessionSettings,
        clipboard: Box<dyn Clipboard>,
        browser: Box<dyn Browser>,
    ) -> TaskServiceResult<Self> {
        let tasks = TaskService::open(repo, settings.storage_policy)?
            .with_edit_title_policy(settings.edit_title_policy);
        let view = render(tasks.list());
        let (clipboard_tx, clipboard_rx) = channel();

        Ok(Self {
            tasks,
            modals: ModalController::new(),
            view,
            notifier: Notifier::default(),
            share_target: None,
            page_url: settings.page_url,
            clipboard,
            browser,
            clipboard_tx,
            clipboard_rx,
            pending_copies: HashSet::new(),
            next_copy_id: 1,
        })
    }

    /// Dispatches one frontend event.
    ///
    /// A returned error means a mutation was applied and rendered but could
    /// not be written to durable storage.
    pub fn handle(&mut self, event: UiEvent) -> TaskServiceResult<Handled> {
        match event {
            UiEvent::SubmitNewTask { title, description } => {
                self.submit_new_task(&title, &description)
            }
            UiEvent::Row { task_id, action } => Ok(self.row_action(&task_id, action)),
            UiEvent::Dialog { scope, action } => self.dialog_action(scope, action),
            UiEvent::Pointer { modal, target } => {
                if self.modals.pointer(modal, target) {
                    Ok(Handled::ViewChanged)
                } else {
                    Ok(Handled::Ignored)
                }
            }
        }
    }

    /// Applies clipboard results that arrived since the last call.
    ///
    /// Returns how many outcomes were applied.
    pub fn drain_clipboard(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.clipboard_rx.try_recv() {
            if !self.pending_copies.remove(&outcome.request_id) {
                warn!(
                    "event=share_copy module=app status=ignored reason=unknown_request request_id={}",
                    outcome.request_id
                );
                continue;
            }
            applied += 1;
            match outcome.result {
                Ok(()) => {
                    info!(
                        "event=share_copy module=app status=ok request_id={}",
                        outcome.request_id
                    );
                    self.notifier.show(COPY_NOTIFICATION, now);
                    self.modals.close(ModalKind::Share);
                }
                Err(err) => {
                    error!(
                        "event=share_copy module=app status=error request_id={} error={}",
                        outcome.request_id, err
                    );
                }
            }
        }
        applied
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.list()
    }

    pub fn store(&self) -> &TaskService<R> {
        &self.tasks
    }

    pub fn modals(&self) -> &ModalController<DialogContext> {
        &self.modals
    }

    /// Scope and context of an open dialog, for painting.
    pub fn dialog(&self, kind: ModalKind) -> Option<(HandlerScope, &DialogContext)> {
        let scope = self.modals.scope(kind)?;
        self.modals.resolve(scope).map(|context| (scope, context))
    }

    pub fn share_target(&self) -> Option<&Task> {
        self.share_target.as_ref()
    }

    pub fn pending_copies(&self) -> usize {
        self.pending_copies.len()
    }

    pub fn notifications(&self, now: Instant) -> Vec<&Notification> {
        self.notifier.visible(now).collect()
    }

    pub fn prune_notifications(&mut self, now: Instant) -> usize {
        self.notifier.prune(now)
    }

    fn submit_new_task(&mut self, title: &str, description: &str) -> TaskServiceResult<Handled> {
        let created = self.tasks.create(title, description);
        self.rerender();
        Ok(match created? {
            Some(id) => Handled::Created(id),
            None => Handled::Ignored,
        })
    }

    fn row_action(&mut self, task_id: &TaskId, action: RowAction) -> Handled {
        let Some(task) = self.tasks.get(task_id).cloned() else {
            return Handled::Ignored;
        };

        match action {
            RowAction::ToggleTools => {
                if !self.view.toggle_tools(task_id) {
                    return Handled::Ignored;
                }
            }
            RowAction::Delete => {
                self.modals.open(
                    ModalKind::ConfirmDelete,
                    DialogContext::ConfirmDelete { task_id: task.id },
                );
            }
            RowAction::Edit => {
                let draft = TaskDraft {
                    title: task.title.clone(),
                    description: task.description.clone(),
                };
                self.modals.open(
                    ModalKind::EditTask,
                    DialogContext::EditTask {
                        task_id: task.id,
                        draft,
                    },
                );
            }
            RowAction::Share => {
                self.share_target = Some(task);
                self.modals.open(ModalKind::Share, DialogContext::Share);
            }
        }
        Handled::ViewChanged
    }

    fn dialog_action(
        &mut self,
        scope: HandlerScope,
        action: DialogAction,
    ) -> TaskServiceResult<Handled> {
        let Some(context) = self.modals.resolve_mut(scope) else {
            info!(
                "event=dialog_action module=app status=ignored reason=stale_scope modal={} scope={}",
                scope.kind(),
                scope.generation()
            );
            return Ok(Handled::Ignored);
        };

        match action {
            DialogAction::Cancel => {
                self.modals.close(scope.kind());
                Ok(Handled::ViewChanged)
            }
            DialogAction::SetTitle(title) => Ok(match context {
                DialogContext::EditTask { draft, .. } => {
                    draft.title = title;
                    Handled::ViewChanged
                }
                _ => Handled::Ignored,
            }),
            DialogAction::SetDescription(description) => Ok(match context {
                DialogContext::EditTask { draft, .. } => {
                    draft.description = description;
                    Handled::ViewChanged
                }
                _ => Handled::Ignored,
            }),
            DialogAction::Confirm => match context.clone() {
                DialogContext::ConfirmDelete { task_id } => {
                    let removed = self.tasks.remove(&task_id);
                    self.rerender();
                    self.modals.close(ModalKind::ConfirmDelete);
                    removed.map(confirmed)
                }
                DialogContext::EditTask { task_id, draft } => {
                    let draft = TaskDraft::new(&draft.title, &draft.description);
                    let updated = self
                        .tasks
                        .update(&task_id, &draft.title, &draft.description);
                    self.rerender();
                    self.modals.close(ModalKind::EditTask);
                    updated.map(confirmed)
                }
                DialogContext::Share => Ok(Handled::Ignored),
            },
            DialogAction::Share(target) => match context {
                DialogContext::Share => Ok(self.dispatch_share(target)),
                _ => Ok(Handled::Ignored),
            },
        }
    }

    fn dispatch_share(&mut self, target: ShareTarget) -> Handled {
        let Some(task) = self.share_target.as_ref() else {
            return Handled::Ignored;
        };

        if target == ShareTarget::Clipboard {
            let request_id = self.next_copy_id;
            self.next_copy_id += 1;
            self.pending_copies.insert(request_id);
            let reply = ClipboardReply::new(request_id, self.clipboard_tx.clone());
            info!(
                "event=share_copy module=app status=start request_id={request_id} task_id={}",
                task.id
            );
            self.clipboard.write_text(format_task_text(task), reply);
            return Handled::CopyPending(request_id);
        }

        let opened = share_link(target, task, &self.page_url).and_then(|link| match link {
            Some(link) => self.browser.open_link(&link),
            None => Ok(()),
        });
        match opened {
            Ok(()) => info!(
                "event=share_link module=app status=ok target={target} task_id={}",
                task.id
            ),
            Err(err) => error!(
                "event=share_link module=app status=error target={target} task_id={} error={}",
                task.id, err
            ),
        }
        self.modals.close(ModalKind::Share);
        Handled::ViewChanged
    }

    fn rerender(&mut self) {
        self.view = render(self.tasks.list());
    }
}

/// A confirmed dialog whose task vanished meanwhile reports a no-op.
fn confirmed(mutation: Mutation) -> Handled {
    match mutation {
        Mutation::Applied => Handled::Rerendered,
        Mutation::Ignored => Handled::Ignored,
    }
}
