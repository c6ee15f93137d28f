use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::documents::{AttachError, DocumentSlot, FileRef, UploadedFiles};
use super::domain::{ApplicationDraft, FieldName, StepDescriptor, StepKey, STEPS};
use super::review::ReviewSummary;
use super::submission::Notification;
use super::validation::{self, StepValidation, ValidationState};

/// Where the user currently is in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// Filling in a form step during the first pass.
    Editing(StepKey),
    /// Read-only review of every section before submission.
    Reviewing,
    /// Revisiting a form step chosen from the review screen.
    EditingFromReview(StepKey),
}

impl Default for WizardPhase {
    fn default() -> Self {
        WizardPhase::Editing(StepKey::Personal)
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced(StepKey),
    EnteredReview,
    Retreated(StepKey),
    AtFirstStep,
    ReadyToSubmit,
    ReturnedToReview(StepKey),
    Blocked {
        step: StepKey,
        errors: BTreeMap<FieldName, &'static str>,
    },
}

impl StepOutcome {
    /// Blocking message the front end shows for this outcome, if any.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            StepOutcome::ReturnedToReview(step) => {
                Some(Notification::SectionSavedLocally { step: *step })
            }
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("sections can only be edited once the review screen has been reached")]
    ReviewNotReached,
    #[error("{0} is not an editable section")]
    NotEditable(StepKey),
    #[error("not editing a section from the review screen")]
    NotEditingFromReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Active,
    Completed,
    Pending,
}

/// Progress-bar entry for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub step: StepDescriptor,
    pub status: StepStatus,
}

/// Form state store and step navigator for a single loan application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanApplicationWizard {
    draft: ApplicationDraft,
    uploads: UploadedFiles,
    validation: ValidationState,
    phase: WizardPhase,
    completed: BTreeSet<StepKey>,
}

impl LoanApplicationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh wizard pre-filled with previously captured data.
    pub fn with_data(draft: ApplicationDraft, uploads: UploadedFiles) -> Self {
        Self {
            draft,
            uploads,
            ..Self::default()
        }
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn uploads(&self) -> &UploadedFiles {
        &self.uploads
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn current_step(&self) -> StepKey {
        match self.phase {
            WizardPhase::Editing(step) | WizardPhase::EditingFromReview(step) => step,
            WizardPhase::Reviewing => StepKey::Review,
        }
    }

    pub fn show_review(&self) -> bool {
        self.phase == WizardPhase::Reviewing
    }

    pub fn editing_section(&self) -> Option<StepKey> {
        match self.phase {
            WizardPhase::EditingFromReview(step) => Some(step),
            _ => None,
        }
    }

    pub fn completed_steps(&self) -> &BTreeSet<StepKey> {
        &self.completed
    }

    pub fn is_completed(&self, step: StepKey) -> bool {
        self.completed.contains(&step)
    }

    pub fn all_sections_completed(&self) -> bool {
        StepKey::FORM_STEPS
            .iter()
            .all(|step| self.completed.contains(step))
    }

    /// Stores an input change, re-validating immediately when the field was already touched.
    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) {
        self.draft.set(field, value);
        if self.validation.is_touched(field) {
            let error = validation::validate_field(field, self.draft.value(field));
            self.validation.record(field, error);
        }
    }

    /// Marks the field as interacted with and validates its current value.
    pub fn blur(&mut self, field: FieldName) {
        self.validation.touch(field);
        let error = validation::validate_field(field, self.draft.value(field));
        self.validation.record(field, error);
    }

    pub fn attach_documents(
        &mut self,
        slot: DocumentSlot,
        files: Vec<FileRef>,
    ) -> Result<(), AttachError> {
        self.uploads.attach(slot, files)
    }

    pub fn clear_documents(&mut self, slot: DocumentSlot) {
        self.uploads.clear(slot);
    }

    /// Validates a step and merges its findings into the shared error map.
    pub fn validate_step(&mut self, step: StepKey) -> bool {
        self.check_step(step).is_valid()
    }

    fn check_step(&mut self, step: StepKey) -> StepValidation {
        let outcome = validation::validate_step(step, &self.draft);
        self.validation.merge(&outcome);
        outcome
    }

    fn block(&mut self, outcome: StepValidation) -> StepOutcome {
        self.validation.touch_all(outcome.step.touched_fields());
        StepOutcome::Blocked {
            step: outcome.step,
            errors: outcome.errors,
        }
    }

    pub fn next_step(&mut self) -> StepOutcome {
        let step = match self.phase {
            WizardPhase::Reviewing => return StepOutcome::ReadyToSubmit,
            WizardPhase::Editing(step) | WizardPhase::EditingFromReview(step) => step,
        };

        let outcome = self.check_step(step);
        if !outcome.is_valid() {
            return self.block(outcome);
        }

        self.completed.insert(step);
        match step.next() {
            Some(StepKey::Review) | None => {
                self.phase = WizardPhase::Reviewing;
                StepOutcome::EnteredReview
            }
            Some(next) => {
                self.phase = WizardPhase::Editing(next);
                StepOutcome::Advanced(next)
            }
        }
    }

    pub fn prev_step(&mut self) -> StepOutcome {
        let target = match self.phase {
            WizardPhase::Reviewing => Some(StepKey::References),
            WizardPhase::Editing(step) | WizardPhase::EditingFromReview(step) => step.previous(),
        };

        match target {
            Some(step) => {
                self.phase = WizardPhase::Editing(step);
                StepOutcome::Retreated(step)
            }
            None => StepOutcome::AtFirstStep,
        }
    }

    /// Jumps from the review screen to a form step for editing.
    pub fn edit_section(&mut self, step: StepKey) -> Result<(), NavigationError> {
        if !step.is_form_step() {
            return Err(NavigationError::NotEditable(step));
        }
        match self.phase {
            WizardPhase::Reviewing | WizardPhase::EditingFromReview(_) => {
                self.phase = WizardPhase::EditingFromReview(step);
                Ok(())
            }
            WizardPhase::Editing(_) => Err(NavigationError::ReviewNotReached),
        }
    }

    /// Validates the section being edited and, when it passes, goes back to review.
    pub fn return_to_review(&mut self) -> Result<StepOutcome, NavigationError> {
        let WizardPhase::EditingFromReview(step) = self.phase else {
            return Err(NavigationError::NotEditingFromReview);
        };

        let outcome = self.check_step(step);
        if !outcome.is_valid() {
            return Ok(self.block(outcome));
        }

        self.completed.insert(step);
        self.phase = WizardPhase::Reviewing;
        Ok(StepOutcome::ReturnedToReview(step))
    }

    /// Re-validates every form step in order. On the first failure the wizard moves to that
    /// step with its fields touched, and the step is returned.
    pub(crate) fn first_invalid_step(&mut self) -> Option<StepKey> {
        for step in StepKey::FORM_STEPS {
            let outcome = self.check_step(step);
            if !outcome.is_valid() {
                self.validation.touch_all(step.touched_fields());
                self.phase = WizardPhase::Editing(step);
                return Some(step);
            }
        }
        None
    }

    pub fn progress(&self) -> Vec<StepProgress> {
        let current = self.current_step();
        STEPS
            .iter()
            .map(|descriptor| {
                let status = if descriptor.key == current {
                    StepStatus::Active
                } else if self.completed.contains(&descriptor.key) {
                    StepStatus::Completed
                } else {
                    StepStatus::Pending
                };
                StepProgress {
                    step: *descriptor,
                    status,
                }
            })
            .collect()
    }

    pub fn review(&self) -> ReviewSummary {
        ReviewSummary::from_parts(&self.draft, &self.uploads)
    }

    /// Returns every piece of state to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
