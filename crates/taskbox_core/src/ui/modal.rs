//! Modal dialog controller.
//!
//! # Responsibility
//! - Track the open/closed state of each named dialog.
//! - Own the handler scope bound by the most recent `open` of each dialog.
//! - Dismiss a dialog when its backdrop (not its content) is clicked.
//!
//! # Invariants
//! - Each dialog has at most one live [`HandlerScope`] at a time.
//! - Opening a dialog revokes the scope of its previous opening.
//! - Closing a dialog revokes its scope; a revoked scope never resolves again.
//! - Dialogs do not stack: opening one never changes another's state.

use log::debug;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Named dialogs hosted by the task view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    ConfirmDelete,
    EditTask,
    Share,
}

impl ModalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfirmDelete => "confirm_delete",
            Self::EditTask => "edit_task",
            Self::Share => "share",
        }
    }
}

impl Display for ModalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
}

/// Where a pointer interaction landed on an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The overlay itself, outside the dialog body.
    Backdrop,
    /// Anything inside the dialog body.
    Content,
}

/// Identity of the handler set bound by one `open` call.
///
/// Frontends attach the scope to every event raised from the dialog's
/// buttons; events whose scope has been revoked are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerScope {
    kind: ModalKind,
    generation: u64,
}

impl HandlerScope {
    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct Binding<C> {
    scope: HandlerScope,
    context: C,
}

/// Open/close state machine for all named dialogs.
///
/// `C` is the per-opening context the handlers act on (for example the task
/// id a confirmation dialog would delete).
pub struct ModalController<C> {
    bindings: HashMap<ModalKind, Binding<C>>,
    next_generation: u64,
}

impl<C> Default for ModalController<C> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
            next_generation: 1,
        }
    }
}

impl<C> ModalController<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `kind` with a fresh handler scope bound to `context`.
    ///
    /// Any scope from an earlier opening of the same dialog is revoked first,
    /// whether or not the dialog was closed in between.
    pub fn open(&mut self, kind: ModalKind, context: C) -> HandlerScope {
        let scope = HandlerScope {
            kind,
            generation: self.next_generation,
        };
        self.next_generation += 1;

        if let Some(previous) = self.bindings.insert(kind, Binding { scope, context }) {
            debug!(
                "event=modal_rebind module=ui status=ok modal={kind} revoked={} active={}",
                previous.scope.generation, scope.generation
            );
        }
        debug!(
            "event=modal_open module=ui status=ok modal={kind} scope={}",
            scope.generation
        );
        scope
    }

    /// Closes `kind` and revokes its handler scope. Closing a closed dialog is a no-op.
    pub fn close(&mut self, kind: ModalKind) -> Option<C> {
        let binding = self.bindings.remove(&kind)?;
        debug!(
            "event=modal_close module=ui status=ok modal={kind} scope={}",
            binding.scope.generation
        );
        Some(binding.context)
    }

    /// Handles a pointer interaction on dialog `kind`.
    ///
    /// Returns `true` when the interaction dismissed the dialog.
    pub fn pointer(&mut self, kind: ModalKind, target: PointerTarget) -> bool {
        match target {
            PointerTarget::Backdrop => self.close(kind).is_some(),
            PointerTarget::Content => false,
        }
    }

    pub fn state(&self, kind: ModalKind) -> ModalState {
        if self.bindings.contains_key(&kind) {
            ModalState::Open
        } else {
            ModalState::Closed
        }
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.state(kind) == ModalState::Open
    }

    /// Live scope of `kind`, if open.
    pub fn scope(&self, kind: ModalKind) -> Option<HandlerScope> {
        self.bindings.get(&kind).map(|binding| binding.scope)
    }

    /// Context bound to `scope`, or `None` when the scope was revoked.
    pub fn resolve(&self, scope: HandlerScope) -> Option<&C> {
        self.bindings
            .get(&scope.kind)
            .filter(|binding| binding.scope == scope)
            .map(|binding| &binding.context)
    }

    pub fn resolve_mut(&mut self, scope: HandlerScope) -> Option<&mut C> {
        self.bindings
            .get_mut(&scope.kind)
            .filter(|binding| binding.scope == scope)
            .map(|binding| &mut binding.context)
    }

    /// Dialogs currently open, in a stable order.
    pub fn open_kinds(&self) -> Vec<ModalKind> {
        [ModalKind::ConfirmDelete, ModalKind::EditTask, ModalKind::Share]
            .into_iter()
            .filter(|kind| self.bindings.contains_key(kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ModalController, ModalKind, ModalState, PointerTarget};

    #[test]
    fn open_then_close_round_trips_state() {
        let mut modals = ModalController::new();
        assert_eq!(modals.state(ModalKind::Share), ModalState::Closed);

        modals.open(ModalKind::Share, ());
        assert_eq!(modals.state(ModalKind::Share), ModalState::Open);

        modals.close(ModalKind::Share);
        assert_eq!(modals.state(ModalKind::Share), ModalState::Closed);
    }

    #[test]
    fn reopening_revokes_previous_scope() {
        let mut modals = ModalController::new();
        let first = modals.open(ModalKind::ConfirmDelete, "a");
        let second = modals.open(ModalKind::ConfirmDelete, "b");

        assert_ne!(first, second);
        assert_eq!(modals.resolve(first), None);
        assert_eq!(modals.resolve(second), Some(&"b"));
    }

    #[test]
    fn content_click_keeps_dialog_open() {
        let mut modals = ModalController::new();
        modals.open(ModalKind::EditTask, ());

        assert!(!modals.pointer(ModalKind::EditTask, PointerTarget::Content));
        assert!(modals.is_open(ModalKind::EditTask));
        assert!(modals.pointer(ModalKind::EditTask, PointerTarget::Backdrop));
        assert!(!modals.is_open(ModalKind::EditTask));
    }

    #[test]
    fn closing_closed_dialog_is_noop() {
        let mut modals: ModalController<()> = ModalController::new();
        assert!(modals.close(ModalKind::Share).is_none());
        assert!(!modals.pointer(ModalKind::Share, PointerTarget::Backdrop));
    }
}
