//! Query console controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page wires DOM events to the handlers here. The controller owns the
//! identifier gate, the HTTP seam and the diagnostic popup, and pushes every
//! visible change through [`ConsoleView`], so the whole flow runs in native
//! tests against an in-memory store, a scripted API and a recording view.
//!
//! SUBMISSION
//! ==========
//! `Idle -> Submitting -> Idle`. Entering `Submitting` disables the submit
//! control before the first await; a [`SubmitGuard`] restores the control and
//! the phase on every exit path.

use std::cell::{Cell, RefCell};

use crate::net::api::{ApiError, ConsoleApi};
use crate::net::types::AskRequest;
use crate::state::diagnostic::DiagnosticModal;
use crate::state::identity::{IdentityError, IdentityGate, parse_user_id};
use crate::util::labels::{
    IDENTIFIER_NOT_SET, INVALID_IDENTIFIER, SET_IDENTIFIER_FIRST, SUBMIT_NEEDS_ID, SUBMIT_READY, SUBMITTING,
    identifier_saved,
};
use crate::util::response_html::{LOADING_HTML, render_error, render_response};
use crate::util::storage::KeyValueStore;


/// Everything the controller can change on screen.
pub trait ConsoleView {
    /// Update the displayed identifier and the hidden form value together.
    fn set_identifier(&self, label: &str, hidden_value: &str);
    fn set_submit(&self, enabled: bool, label: &str);
    fn submit_label(&self) -> String;
    /// Show the identifier modal with its input set to `prefill`.
    fn open_gate(&self, prefill: &str);
    fn close_gate(&self);
    /// Blocking notice (an alert in the browser).
    fn notify(&self, message: &str);
    /// Transient success banner.
    fn flash(&self, message: &str);
    fn set_question(&self, question: &str);
    fn set_result(&self, html: &str, visible: bool);
    fn render_diagnostic(&self, modal: &DiagnosticModal);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
}

/// How a submit attempt ended.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// No saved identifier; the gate was reopened and nothing was sent.
    NeedsIdentifier,
    /// The saved identifier is not an integer; nothing was sent.
    InvalidIdentifier,
    /// A request is already in flight.
    Busy,
    Rendered,
    Failed(ApiError),
}

/// Restores the submit control and phase when the submission ends.
struct SubmitGuard<'a, V: ConsoleView> {
    view: &'a V,
    phase: &'a Cell<SubmissionPhase>,
    label: String,
}

impl<V: ConsoleView> Drop for SubmitGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_submit(true, &self.label);
        self.phase.set(SubmissionPhase::Idle);
    }
}

pub struct Console<S, A, V> {
    gate: IdentityGate<S>,
    api: A,
    view: V,
    phase: Cell<SubmissionPhase>,
    diagnostic: RefCell<DiagnosticModal>,
}

impl<S: KeyValueStore, A: ConsoleApi, V: ConsoleView> Console<S, A, V> {
    pub fn new(store: S, api: A, view: V) -> Self {
        Self {
            gate: IdentityGate::new(store),
            api,
            view,
            phase: Cell::new(SubmissionPhase::Idle),
            diagnostic: RefCell::new(DiagnosticModal::default()),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase.get()
    }

    /// Sync the identifier label, submit control and gate with storage.
    /// Safe to call any number of times.
    pub fn refresh_ui(&self) {
        if let Some(id) = self.gate.get_saved() {
            self.view.set_identifier(&id, &id);
            self.view.set_submit(true, SUBMIT_READY);
            self.view.close_gate();
        } else {
            self.view.set_identifier(IDENTIFIER_NOT_SET, "");
            self.view.set_submit(false, SUBMIT_NEEDS_ID);
            self.view.open_gate("");
        }
    }

    /// Save the gate input. Blank input is reported and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the [`IdentityError`] that was shown to the user.
    pub fn on_save_identifier(&self, raw: &str) -> Result<String, IdentityError> {
        match self.gate.set_saved(raw) {
            Ok(id) => {
                log::info!("user id saved: {id}");
                self.refresh_ui();
                self.view.flash(&identifier_saved(&id));
                Ok(id)
            }
            Err(e) => {
                self.view.notify(&e.to_string());
                Err(e)
            }
        }
    }

    pub fn on_change_identifier(&self) {
        self.view.open_gate(&self.gate.get_saved().unwrap_or_default());
    }

    pub fn on_example(&self, query: &str) {
        self.view.set_question(query);
    }

    pub async fn on_submit(&self, question: &str) -> SubmitOutcome {
        if self.phase.get() == SubmissionPhase::Submitting {
            return SubmitOutcome::Busy;
        }
        let Some(saved) = self.gate.get_saved() else {
            self.view.notify(SET_IDENTIFIER_FIRST);
            self.view.open_gate("");
            return SubmitOutcome::NeedsIdentifier;
        };
        let Some(user_id) = parse_user_id(&saved) else {
            self.view.notify(INVALID_IDENTIFIER);
            self.view.open_gate(&saved);
            return SubmitOutcome::InvalidIdentifier;
        };

        let _guard = SubmitGuard { view: &self.view, phase: &self.phase, label: self.view.submit_label() };
        self.phase.set(SubmissionPhase::Submitting);
        self.view.set_submit(false, SUBMITTING);
        self.view.set_result(LOADING_HTML, false);

        match self.api.ask(&AskRequest::new(question, user_id)).await {
            Ok(resp) => {
                self.view.set_result(&render_response(&resp), true);
                SubmitOutcome::Rendered
            }
            Err(e) => {
                log::warn!("ask failed: {e}");
                self.view.set_result(&render_error(&e.to_string()), true);
                SubmitOutcome::Failed(e)
            }
        }
    }

    pub async fn on_diagnostic_click(&self) {
        let report = self.api.health().await;
        let mut modal = self.diagnostic.borrow_mut();
        modal.present(&report);
        self.view.render_diagnostic(&modal);
    }

    pub fn on_diagnostic_dismiss(&self) {
        let mut modal = self.diagnostic.borrow_mut();
        modal.dismiss();
        self.view.render_diagnostic(&modal);
    }
}
