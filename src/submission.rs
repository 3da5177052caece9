//! The submission workflow: normalization, validation and persistence
//! of a single entry, as an explicit state machine.
//!
//! ```text
//! Editing --begin_submit--> Validating --check--> Submitting --persist--> Submitted
//!    ^                          |                     |                      |
//!    +------ field errors ------+                     |                      |
//!    +------ save failed (values kept) ---------------+                      |
//!    +------ add_another (values cleared) -----------------------------------+
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;

use log::{debug, error, o, Logger};

use crate::entry::{EntryId, Field, NewEntry, SubmissionForm};
use crate::environment::SharedStore;
use crate::errors::WorkflowError;
use crate::normalization::normalize_form;
use crate::validation::{validate, FieldErrors};

/// Shown when the store refuses a submission. Not tied to any field.
pub const SAVE_FAILED: &str = "We couldn't save that. Please try again.";

/// Where a finished submission points the user to see the directory.
pub const LISTING_PATH: &str = "/shops";

/// Names the states without their data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Validating,
    Submitting,
    Submitted,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Editing => "editing",
            Phase::Validating => "validating",
            Phase::Submitting => "submitting",
            Phase::Submitted => "submitted",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a submission attempt stands. Each state carries only the data
/// that is meaningful in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    /// The user is filling in the form. `errors` and `banner` describe
    /// the previous attempt, if there was one.
    Editing {
        form: SubmissionForm,
        errors: FieldErrors,
        banner: Option<&'static str>,
    },

    /// Checking the normalized candidate. `form` holds the values as
    /// entered, so they can be handed back untouched.
    Validating {
        form: SubmissionForm,
        candidate: SubmissionForm,
    },

    /// Waiting for the store to accept `entry`.
    Submitting { form: SubmissionForm, entry: NewEntry },

    /// The store accepted the entry and assigned it `id`. The form is
    /// empty again.
    Submitted { id: EntryId },
}

impl SubmissionState {
    pub fn phase(&self) -> Phase {
        match self {
            SubmissionState::Editing { .. } => Phase::Editing,
            SubmissionState::Validating { .. } => Phase::Validating,
            SubmissionState::Submitting { .. } => Phase::Submitting,
            SubmissionState::Submitted { .. } => Phase::Submitted,
        }
    }

    fn editing(form: SubmissionForm) -> Self {
        SubmissionState::Editing {
            form,
            errors: FieldErrors::default(),
            banner: None,
        }
    }
}

impl Default for SubmissionState {
    fn default() -> Self {
        SubmissionState::editing(SubmissionForm::default())
    }
}

/// Drives one form through its submission attempts against an injected
/// store.
pub struct SubmissionWorkflow {
    store: SharedStore,
    collection: String,
    logger: Arc<Logger>,
    state: SubmissionState,
}

impl SubmissionWorkflow {
    pub fn new(store: SharedStore, collection: impl Into<String>, logger: Arc<Logger>) -> Self {
        SubmissionWorkflow::with_form(store, collection, logger, SubmissionForm::default())
    }

    /// Starts in `Editing` with the given values already entered.
    pub fn with_form(
        store: SharedStore,
        collection: impl Into<String>,
        logger: Arc<Logger>,
        form: SubmissionForm,
    ) -> Self {
        let collection = collection.into();
        let logger = Arc::new(logger.new(o!("collection" => collection.clone())));

        SubmissionWorkflow {
            store,
            collection,
            logger,
            state: SubmissionState::editing(form),
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Whether a submit action would be accepted right now.
    pub fn can_submit(&self) -> bool {
        self.phase() == Phase::Editing
    }

    /// The values currently in the form, if the form is showing.
    pub fn form(&self) -> Option<&SubmissionForm> {
        match &self.state {
            SubmissionState::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn submitted_id(&self) -> Option<EntryId> {
        match self.state {
            SubmissionState::Submitted { id } => Some(id),
            _ => None,
        }
    }

    /// Changes one field. Nothing is validated until the next submit.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) -> Result<(), WorkflowError> {
        match &mut self.state {
            SubmissionState::Editing { form, .. } => {
                form.set(field, value);
                Ok(())
            }
            _ => Err(WorkflowError::NotEditing),
        }
    }

    /// `Editing` → `Validating`, normalizing the website and Instagram
    /// handle into the candidate.
    pub fn begin_submit(&mut self) -> Result<(), WorkflowError> {
        match self.take_state() {
            SubmissionState::Editing { form, .. } => {
                let candidate = normalize_form(form.clone());
                self.transition(SubmissionState::Validating { form, candidate });
                Ok(())
            }
            other => {
                let phase = other.phase();
                self.state = other;

                if phase == Phase::Submitting {
                    Err(WorkflowError::SubmissionInFlight)
                } else {
                    Err(unexpected("submit", phase))
                }
            }
        }
    }

    /// `Validating` → `Submitting` if the candidate is acceptable,
    /// otherwise back to `Editing` with the field errors and the values
    /// as entered.
    pub fn check(&mut self) -> Result<(), WorkflowError> {
        match self.take_state() {
            SubmissionState::Validating { form, candidate } => {
                let errors = validate(&candidate);

                let next = if errors.is_empty() {
                    SubmissionState::Submitting {
                        form,
                        entry: NewEntry::from_form(candidate),
                    }
                } else {
                    debug!(self.logger, "Submission rejected"; "fields" => ?errors.fields().collect::<Vec<_>>());

                    SubmissionState::Editing {
                        form,
                        errors,
                        banner: None,
                    }
                };

                self.transition(next);
                Ok(())
            }
            other => {
                let phase = other.phase();
                self.state = other;
                Err(unexpected("validate", phase))
            }
        }
    }

    /// `Submitting` → `Submitted` once the store accepts the entry, or
    /// back to `Editing` with the values kept if it does not. The state
    /// stays `Submitting` until the store answers.
    pub async fn persist(&mut self) -> Result<(), WorkflowError> {
        let entry = match &self.state {
            SubmissionState::Submitting { entry, .. } => entry.clone(),
            other => return Err(unexpected("persist", other.phase())),
        };

        debug!(self.logger, "Saving entry...");
        let result = self.store.insert(&self.collection, entry).await;

        let form = match self.take_state() {
            SubmissionState::Submitting { form, .. } => form,
            other => {
                // only reachable if the state changed while awaiting,
                // which `&mut self` rules out
                let phase = other.phase();
                self.state = other;
                return Err(unexpected("finish persisting", phase));
            }
        };

        match result {
            Ok(id) => {
                debug!(self.logger, "Saved entry"; "id" => %id);
                self.transition(SubmissionState::Submitted { id });
            }
            Err(e) => {
                error!(self.logger, "Failed to save entry"; "error" => ?e, "message" => %e);
                self.transition(SubmissionState::Editing {
                    form,
                    errors: FieldErrors::default(),
                    banner: Some(SAVE_FAILED),
                });
            }
        }

        Ok(())
    }

    /// Runs a whole submit action and returns where it ended up:
    /// `Editing` (field errors or a save failure) or `Submitted`.
    pub async fn submit(&mut self) -> Result<Phase, WorkflowError> {
        self.begin_submit()?;
        self.check()?;

        if self.phase() == Phase::Submitting {
            self.persist().await?;
        }

        Ok(self.phase())
    }

    /// `Submitted` → `Editing` with an empty form.
    pub fn add_another(&mut self) -> Result<(), WorkflowError> {
        match self.phase() {
            Phase::Submitted => {
                self.transition(SubmissionState::default());
                Ok(())
            }
            phase => Err(unexpected("add another", phase)),
        }
    }

    fn take_state(&mut self) -> SubmissionState {
        mem::take(&mut self.state)
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!(self.logger, "Submission transition"; "to" => %next.phase());
        self.state = next;
    }
}

fn unexpected(action: &'static str, phase: Phase) -> WorkflowError {
    WorkflowError::UnexpectedPhase {
        action,
        phase: phase.name(),
    }
}
