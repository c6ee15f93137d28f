//! Multi-step loan application wizard: form state, validation, navigation, review and
//! sequential submission to the application API.

pub mod client;
pub mod documents;
pub mod domain;
pub mod payload;
pub mod review;
pub mod submission;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use client::{ApiError, ApplicationApi, HttpApplicationApi};
pub use documents::{AttachError, DocumentSlot, FileRef, UploadedFiles};
pub use domain::{ApplicationDraft, ApplicationId, FieldName, StepDescriptor, StepKey, STEPS};
pub use payload::{Section, SectionPayload};
pub use review::{ReviewEntry, ReviewSection, ReviewSummary};
pub use submission::{
    Notification, Notifier, SectionOutcome, SubmissionError, SubmissionReceipt,
    SubmissionSequencer,
};
pub use validation::{validate_field, validate_step, StepValidation, ValidationState};
pub use wizard::{
    LoanApplicationWizard, NavigationError, StepOutcome, StepProgress, StepStatus, WizardPhase,
};
