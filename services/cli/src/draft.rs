use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use loan_wizard::error::AppError;
use loan_wizard::workflows::loan_application::{
    ApplicationDraft, LoanApplicationWizard, StepOutcome, UploadedFiles,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application data saved as JSON: form fields under `application`, file references
/// under `documents`. Missing keys load as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DraftFile {
    pub(crate) application: ApplicationDraft,
    pub(crate) documents: UploadedFiles,
}

impl DraftFile {
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)?;
        let draft: DraftFile = serde_json::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), "draft loaded");
        Ok(draft)
    }

    pub(crate) fn into_wizard(self) -> LoanApplicationWizard {
        LoanApplicationWizard::with_data(self.application, self.documents)
    }
}

/// Walks every form step through the navigator until the review screen is reached.
pub(crate) fn advance_to_review(wizard: &mut LoanApplicationWizard) -> Result<(), AppError> {
    while !wizard.show_review() {
        if let StepOutcome::Blocked { step, errors } = wizard.next_step() {
            crate::console::print_blocked(step, &errors);
            return Err(AppError::Blocked(step));
        }
    }
    Ok(())
}
