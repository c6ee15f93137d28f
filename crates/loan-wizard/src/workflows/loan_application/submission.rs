use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::client::{ApiError, ApplicationApi};
use super::domain::{ApplicationId, StepKey};
use super::payload::{Section, SectionPayload};
use super::wizard::LoanApplicationWizard;

const NO_EXISTING_LOAN_DATA: &str = "No existing loan data";

/// Blocking messages surfaced to the applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    IncompleteApplication { step: StepKey },
    SectionSavedLocally { step: StepKey },
    SubmissionFailed,
    Submitted { application_id: ApplicationId },
}

impl Notification {
    pub fn message(&self) -> &'static str {
        match self {
            Notification::IncompleteApplication { .. } => {
                "Please complete all required fields before submitting."
            }
            Notification::SectionSavedLocally { .. } => {
                "Section saved locally. Return to review and submit when ready."
            }
            Notification::SubmissionFailed => {
                "There was an error submitting your application. Please try again."
            }
            Notification::Submitted { .. } => "Application submitted successfully!",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outbound hook for user-facing notifications (dialogs, console output, test recorders).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// How a single section was handled during submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SectionOutcome {
    Saved { section: Section, response: Value },
    Skipped { section: Section, reason: &'static str },
}

impl SectionOutcome {
    pub fn section(&self) -> Section {
        match self {
            SectionOutcome::Saved { section, .. } | SectionOutcome::Skipped { section, .. } => {
                *section
            }
        }
    }
}

/// Record of a fully persisted application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub application_id: ApplicationId,
    pub sections: Vec<SectionOutcome>,
    pub submitted_at: DateTime<Utc>,
}

/// Error raised by the submission sequencer.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{step} has missing or invalid fields")]
    Incomplete { step: StepKey },
    #[error("failed to create application: {0}")]
    Create(#[source] ApiError),
    #[error("failed to save {section} for application {application_id}: {source}")]
    Section {
        application_id: ApplicationId,
        section: Section,
        saved: Vec<Section>,
        #[source]
        source: ApiError,
    },
}

/// Drives final submission: re-validation, creation, then one save per section in order.
pub struct SubmissionSequencer<A, N> {
    api: Arc<A>,
    notifier: Arc<N>,
}

impl<A, N> SubmissionSequencer<A, N>
where
    A: ApplicationApi + 'static,
    N: Notifier + 'static,
{
    pub fn new(api: Arc<A>, notifier: Arc<N>) -> Self {
        Self { api, notifier }
    }

    /// Submits the wizard's data. Sections are saved strictly one after another; the first
    /// failure stops the sequence without retrying or undoing earlier saves. On success the
    /// wizard is reset.
    pub async fn submit(
        &self,
        wizard: &mut LoanApplicationWizard,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if let Some(step) = wizard.first_invalid_step() {
            warn!(%step, "submission blocked by incomplete step");
            self.notifier
                .notify(Notification::IncompleteApplication { step });
            return Err(SubmissionError::Incomplete { step });
        }

        match self.persist(wizard).await {
            Ok(receipt) => {
                info!(
                    application_id = %receipt.application_id,
                    sections = receipt.sections.len(),
                    "application submitted"
                );
                wizard.reset();
                self.notifier.notify(Notification::Submitted {
                    application_id: receipt.application_id.clone(),
                });
                Ok(receipt)
            }
            Err(err) => {
                error!(error = %err, "error during final submit");
                self.notifier.notify(Notification::SubmissionFailed);
                Err(err)
            }
        }
    }

    async fn persist(
        &self,
        wizard: &LoanApplicationWizard,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let application_id = self
            .api
            .create_application()
            .await
            .map_err(SubmissionError::Create)?;
        info!(%application_id, "application created");

        let mut sections = Vec::with_capacity(Section::ORDER.len());
        for section in Section::ORDER {
            let Some(payload) = SectionPayload::build(section, wizard.draft(), wizard.uploads())
            else {
                info!(%application_id, %section, "no data, section skipped");
                sections.push(SectionOutcome::Skipped {
                    section,
                    reason: NO_EXISTING_LOAN_DATA,
                });
                continue;
            };

            match self.api.save_section(&application_id, &payload).await {
                Ok(response) => {
                    info!(%application_id, %section, "section saved");
                    sections.push(SectionOutcome::Saved { section, response });
                }
                Err(source) => {
                    return Err(SubmissionError::Section {
                        application_id,
                        section,
                        saved: sections
                            .iter()
                            .filter(|outcome| matches!(outcome, SectionOutcome::Saved { .. }))
                            .map(SectionOutcome::section)
                            .collect(),
                        source,
                    });
                }
            }
        }

        Ok(SubmissionReceipt {
            application_id,
            sections,
            submitted_at: Utc::now(),
        })
    }
}
