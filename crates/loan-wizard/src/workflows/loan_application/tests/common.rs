use std::sync::Mutex;

use serde_json::{json, Value};

use crate::workflows::loan_application::client::{ApiError, ApplicationApi};
use crate::workflows::loan_application::documents::{DocumentSlot, FileRef, UploadedFiles};
use crate::workflows::loan_application::domain::{ApplicationDraft, ApplicationId, FieldName};
use crate::workflows::loan_application::payload::{Section, SectionPayload};
use crate::workflows::loan_application::submission::{Notification, Notifier};
use crate::workflows::loan_application::wizard::{LoanApplicationWizard, StepOutcome, WizardPhase};

pub(super) const APPLICATION_ID: &str = "app-42";

pub(super) fn valid_draft() -> ApplicationDraft {
    let mut draft = ApplicationDraft::default();
    for (field, value) in [
        (FieldName::FullName, "Asha Verma"),
        (FieldName::PhoneNumber, "9876543210"),
        (FieldName::MaritalStatus, "single"),
        (FieldName::PanNumber, "ABCDE1234F"),
        (FieldName::Gender, "female"),
        (FieldName::CurrentAddress, "12 MG Road, Bengaluru"),
        (FieldName::PermanentAddress, "45 Lake View, Pune"),
        (FieldName::DateOfBirth, "1990-04-12"),
        (FieldName::OccupationType, "salaried"),
        (FieldName::TotalWorkExperience, "6"),
        (FieldName::MonthlyCompanyIncome, "85000"),
        (FieldName::CompanyName, "Acme Analytics"),
        (FieldName::OfficeAddress, "Tech Park, Whitefield"),
        (FieldName::LoanType, "home"),
        (FieldName::LoanAmount, "2500000"),
        (FieldName::LoanDuration, "15"),
        (FieldName::LoanPurpose, "Buying a flat"),
        (FieldName::ReferenceFullName, "Ravi Kumar"),
        (FieldName::ReferenceRelationship, "Colleague"),
        (FieldName::ReferenceContactNumber, "9123456780"),
        (FieldName::ReferenceAddress, "8 Park Street, Kolkata"),
    ] {
        draft.set(field, value);
    }
    draft
}

pub(super) fn with_existing_loan(mut draft: ApplicationDraft) -> ApplicationDraft {
    for (field, value) in [
        (FieldName::ExistingLoanFullName, "Asha Verma"),
        (FieldName::ExistingLoanType, "car"),
        (FieldName::ExistingLoanContactNumber, "9000000001"),
        (FieldName::ExistingLoanLender, "City Bank"),
        (FieldName::ExistingLoanEmail, "loans@citybank.example"),
        (FieldName::ExistingLoanOutstandingAmount, "120000"),
        (FieldName::ExistingLoanAddress, "1 Bank Lane, Mumbai"),
        (FieldName::ExistingLoanEmiTenure, "24"),
    ] {
        draft.set(field, value);
    }
    draft
}

pub(super) fn valid_uploads() -> UploadedFiles {
    let mut uploads = UploadedFiles::default();
    uploads
        .attach(DocumentSlot::PanCard, vec![FileRef::new("pan.pdf")])
        .expect("pdf accepted");
    uploads
        .attach(
            DocumentSlot::SalarySlips,
            vec![FileRef::new("slip-jan.pdf"), FileRef::new("slip-feb.pdf")],
        )
        .expect("pdf accepted");
    uploads
}

/// Wizard holding valid data, sitting on the review screen.
pub(super) fn reviewing_wizard(draft: ApplicationDraft) -> LoanApplicationWizard {
    let mut wizard = LoanApplicationWizard::with_data(draft, valid_uploads());
    while wizard.phase() != WizardPhase::Reviewing {
        let outcome = wizard.next_step();
        assert!(
            !matches!(outcome, StepOutcome::Blocked { .. }),
            "fixture data should pass every step, got {outcome:?}"
        );
    }
    wizard
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum ApiCall {
    Create,
    Save {
        application_id: ApplicationId,
        section: Section,
        body: Value,
    },
}

#[derive(Default)]
pub(super) struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    fail_create: bool,
    fail_section: Option<Section>,
}

impl RecordingApi {
    pub(super) fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub(super) fn failing_at(section: Section) -> Self {
        Self {
            fail_section: Some(section),
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("api mutex poisoned").clone()
    }

    pub(super) fn saved_sections(&self) -> Vec<Section> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Save { section, .. } => Some(section),
                ApiCall::Create => None,
            })
            .collect()
    }
}

impl ApplicationApi for RecordingApi {
    async fn create_application(&self) -> Result<ApplicationId, ApiError> {
        self.calls
            .lock()
            .expect("api mutex poisoned")
            .push(ApiCall::Create);
        if self.fail_create {
            return Err(ApiError::MissingApplicationId);
        }
        Ok(ApplicationId(APPLICATION_ID.to_string()))
    }

    async fn save_section(
        &self,
        application_id: &ApplicationId,
        payload: &SectionPayload,
    ) -> Result<Value, ApiError> {
        let section = payload.section();
        self.calls
            .lock()
            .expect("api mutex poisoned")
            .push(ApiCall::Save {
                application_id: application_id.clone(),
                section,
                body: serde_json::to_value(payload).expect("payload serializes"),
            });
        if self.fail_section == Some(section) {
            return Err(ApiError::Status {
                endpoint: section.path().to_string(),
                status: 500,
            });
        }
        Ok(json!({ "status": "saved" }))
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
    }
}
