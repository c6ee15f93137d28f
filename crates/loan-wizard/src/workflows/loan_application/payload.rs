//! Section-specific request bodies built from the draft at submission time.

use std::fmt;

use serde::Serialize;

use super::documents::{DocumentSlot, UploadedFiles};
use super::domain::{ApplicationDraft, FieldName};
use super::validation::{parse_leading_number, parse_number};

const UNSPECIFIED_JOB_TITLE: &str = "Not specified";

/// Server-side persistence units, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    PersonalDetails,
    EmploymentDetails,
    LoanDetails,
    DocumentDetails,
    ExistingLoanDetails,
    ReferenceDetails,
}

impl Section {
    pub const ORDER: [Section; 6] = [
        Section::PersonalDetails,
        Section::EmploymentDetails,
        Section::LoanDetails,
        Section::DocumentDetails,
        Section::ExistingLoanDetails,
        Section::ReferenceDetails,
    ];

    /// Path segment appended to `/applications/{id}/`.
    pub const fn path(self) -> &'static str {
        match self {
            Section::PersonalDetails => "personal-details",
            Section::EmploymentDetails => "employment-details",
            Section::LoanDetails => "loan-details",
            Section::DocumentDetails => "document-details",
            Section::ExistingLoanDetails => "existing-loan-details",
            Section::ReferenceDetails => "reference-details",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub full_name: String,
    pub phone_number: String,
    pub marital_status: String,
    pub pan_number: String,
    pub passport_number: String,
    pub gender: String,
    pub current_address: String,
    pub permanent_address: String,
    pub date_of_birth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentDetails {
    pub employment_type: String,
    pub employer_name: String,
    pub job_title: String,
    pub monthly_income: f64,
    pub unemployment_income: f64,
    pub years_of_experience: f64,
    pub office_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    pub loan_type: String,
    pub loan_amount: f64,
    pub loan_tenure: i64,
    pub loan_purpose: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetails {
    pub pan_card_path: Option<String>,
    pub aadhaar_card_path: Option<String>,
    pub salary_slip_paths: Vec<String>,
    pub bank_statement_paths: Vec<String>,
    pub photo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingLoanDetails {
    pub full_name: String,
    pub loan_type: String,
    pub contact_number: String,
    pub lender: String,
    pub email: String,
    pub outstanding_amount: Option<f64>,
    pub address: String,
    pub emi_tenure: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDetails {
    pub full_name: String,
    pub relationship_with_applicant: String,
    pub contact_number: String,
    pub address: String,
}

/// Body sent to one section endpoint. Serializes as the inner payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionPayload {
    Personal(PersonalDetails),
    Employment(EmploymentDetails),
    Loan(LoanDetails),
    Documents(DocumentDetails),
    ExistingLoan(ExistingLoanDetails),
    References(ReferenceDetails),
}

impl SectionPayload {
    pub fn section(&self) -> Section {
        match self {
            SectionPayload::Personal(_) => Section::PersonalDetails,
            SectionPayload::Employment(_) => Section::EmploymentDetails,
            SectionPayload::Loan(_) => Section::LoanDetails,
            SectionPayload::Documents(_) => Section::DocumentDetails,
            SectionPayload::ExistingLoan(_) => Section::ExistingLoanDetails,
            SectionPayload::References(_) => Section::ReferenceDetails,
        }
    }

    /// Builds the payload for `section`. Returns `None` for the existing-loan section when
    /// name, type and lender are all empty; that section is then not sent.
    pub fn build(
        section: Section,
        draft: &ApplicationDraft,
        uploads: &UploadedFiles,
    ) -> Option<Self> {
        let payload = match section {
            Section::PersonalDetails => SectionPayload::Personal(PersonalDetails::from(draft)),
            Section::EmploymentDetails => {
                SectionPayload::Employment(EmploymentDetails::from(draft))
            }
            Section::LoanDetails => SectionPayload::Loan(LoanDetails::from(draft)),
            Section::DocumentDetails => SectionPayload::Documents(DocumentDetails::from(uploads)),
            Section::ExistingLoanDetails => {
                SectionPayload::ExistingLoan(ExistingLoanDetails::from_draft(draft)?)
            }
            Section::ReferenceDetails => SectionPayload::References(ReferenceDetails::from(draft)),
        };
        Some(payload)
    }
}

fn text(draft: &ApplicationDraft, field: FieldName) -> String {
    draft.value(field).to_string()
}

fn float_or_zero(draft: &ApplicationDraft, field: FieldName) -> f64 {
    parse_number(draft.value(field)).unwrap_or(0.0)
}

fn integer(draft: &ApplicationDraft, field: FieldName) -> Option<i64> {
    parse_number(draft.value(field)).map(|number| number.trunc() as i64)
}

impl From<&ApplicationDraft> for PersonalDetails {
    fn from(draft: &ApplicationDraft) -> Self {
        Self {
            full_name: text(draft, FieldName::FullName),
            phone_number: text(draft, FieldName::PhoneNumber),
            marital_status: text(draft, FieldName::MaritalStatus),
            pan_number: text(draft, FieldName::PanNumber),
            passport_number: text(draft, FieldName::PassportNumber),
            gender: text(draft, FieldName::Gender),
            current_address: text(draft, FieldName::CurrentAddress),
            permanent_address: text(draft, FieldName::PermanentAddress),
            date_of_birth: text(draft, FieldName::DateOfBirth),
        }
    }
}

impl From<&ApplicationDraft> for EmploymentDetails {
    fn from(draft: &ApplicationDraft) -> Self {
        Self {
            employment_type: text(draft, FieldName::OccupationType),
            employer_name: text(draft, FieldName::CompanyName),
            job_title: UNSPECIFIED_JOB_TITLE.to_string(),
            monthly_income: float_or_zero(draft, FieldName::MonthlyCompanyIncome),
            unemployment_income: float_or_zero(draft, FieldName::UnemploymentIncome),
            years_of_experience: parse_leading_number(draft.value(FieldName::TotalWorkExperience))
                .unwrap_or(0.0),
            office_address: text(draft, FieldName::OfficeAddress),
        }
    }
}

impl From<&ApplicationDraft> for LoanDetails {
    fn from(draft: &ApplicationDraft) -> Self {
        Self {
            loan_type: text(draft, FieldName::LoanType),
            loan_amount: float_or_zero(draft, FieldName::LoanAmount),
            loan_tenure: integer(draft, FieldName::LoanDuration).unwrap_or(0),
            loan_purpose: text(draft, FieldName::LoanPurpose),
        }
    }
}

impl From<&UploadedFiles> for DocumentDetails {
    fn from(uploads: &UploadedFiles) -> Self {
        let single = |slot| uploads.names(slot).into_iter().next();
        Self {
            pan_card_path: single(DocumentSlot::PanCard),
            aadhaar_card_path: single(DocumentSlot::AadhaarCard),
            salary_slip_paths: uploads.names(DocumentSlot::SalarySlips),
            bank_statement_paths: uploads.names(DocumentSlot::BankStatements),
            photo_path: single(DocumentSlot::Photo),
        }
    }
}

impl ExistingLoanDetails {
    pub fn from_draft(draft: &ApplicationDraft) -> Option<Self> {
        if !draft.has_existing_loan() {
            return None;
        }

        Some(Self {
            full_name: text(draft, FieldName::ExistingLoanFullName),
            loan_type: text(draft, FieldName::ExistingLoanType),
            contact_number: text(draft, FieldName::ExistingLoanContactNumber),
            lender: text(draft, FieldName::ExistingLoanLender),
            email: text(draft, FieldName::ExistingLoanEmail),
            outstanding_amount: parse_number(draft.value(FieldName::ExistingLoanOutstandingAmount)),
            address: text(draft, FieldName::ExistingLoanAddress),
            emi_tenure: integer(draft, FieldName::ExistingLoanEmiTenure),
        })
    }
}

impl From<&ApplicationDraft> for ReferenceDetails {
    fn from(draft: &ApplicationDraft) -> Self {
        Self {
            full_name: text(draft, FieldName::ReferenceFullName),
            relationship_with_applicant: text(draft, FieldName::ReferenceRelationship),
            contact_number: text(draft, FieldName::ReferenceContactNumber),
            address: text(draft, FieldName::ReferenceAddress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::loan_application::documents::FileRef;
    use serde_json::json;

    #[test]
    fn employment_numbers_default_to_zero_and_job_title_is_fixed() {
        let mut draft = ApplicationDraft::default();
        draft.set(FieldName::OccupationType, "salaried");
        draft.set(FieldName::CompanyName, "Acme Steel");
        draft.set(FieldName::MonthlyCompanyIncome, " 85000.50 ");
        draft.set(FieldName::TotalWorkExperience, "six");

        let body = serde_json::to_value(SectionPayload::Employment(EmploymentDetails::from(
            &draft,
        )))
        .expect("serializes");

        assert_eq!(
            body,
            json!({
                "employmentType": "salaried",
                "employerName": "Acme Steel",
                "jobTitle": "Not specified",
                "monthlyIncome": 85000.5,
                "unemploymentIncome": 0.0,
                "yearsOfExperience": 0.0,
                "officeAddress": "",
            })
        );
    }

    #[test]
    fn years_of_experience_takes_the_leading_number() {
        let mut draft = ApplicationDraft::default();
        draft.set(FieldName::TotalWorkExperience, "5 years");
        assert_eq!(EmploymentDetails::from(&draft).years_of_experience, 5.0);

        draft.set(FieldName::TotalWorkExperience, "3.5");
        assert_eq!(EmploymentDetails::from(&draft).years_of_experience, 3.5);

        draft.set(FieldName::MonthlyCompanyIncome, "50000 per month");
        assert_eq!(EmploymentDetails::from(&draft).monthly_income, 0.0);
    }

    #[test]
    fn whitespace_in_an_identifying_field_still_sends_the_existing_loan() {
        let mut draft = ApplicationDraft::default();
        draft.set(FieldName::ExistingLoanFullName, "  ");
        assert!(ExistingLoanDetails::from_draft(&draft).is_some());
    }

    #[test]
    fn loan_tenure_is_integer_years() {
        let mut draft = ApplicationDraft::default();
        draft.set(FieldName::LoanAmount, "250000");
        draft.set(FieldName::LoanDuration, "15");

        let loan = LoanDetails::from(&draft);
        assert_eq!(loan.loan_amount, 250000.0);
        assert_eq!(loan.loan_tenure, 15);
    }

    #[test]
    fn existing_loan_is_skipped_without_identifying_fields() {
        let mut draft = ApplicationDraft::default();
        draft.set(FieldName::ExistingLoanEmail, "lender@bank.example");
        assert!(SectionPayload::build(
            Section::ExistingLoanDetails,
            &draft,
            &UploadedFiles::default()
        )
        .is_none());

        draft.set(FieldName::ExistingLoanLender, "State Bank");
        let details = ExistingLoanDetails::from_draft(&draft).expect("lender present");
        assert_eq!(details.outstanding_amount, None);
        assert_eq!(details.emi_tenure, None);
        assert_eq!(details.email, "lender@bank.example");
    }

    #[test]
    fn document_paths_use_file_names_or_null() {
        let mut uploads = UploadedFiles::default();
        uploads
            .attach(DocumentSlot::PanCard, vec![FileRef::new("pan.pdf")])
            .expect("attach");
        uploads
            .attach(
                DocumentSlot::BankStatements,
                vec![FileRef::new("apr.pdf"), FileRef::new("may.pdf")],
            )
            .expect("attach");

        let body = serde_json::to_value(DocumentDetails::from(&uploads)).expect("serializes");
        assert_eq!(
            body,
            json!({
                "panCardPath": "pan.pdf",
                "aadhaarCardPath": null,
                "salarySlipPaths": [],
                "bankStatementPaths": ["apr.pdf", "may.pdf"],
                "photoPath": null,
            })
        );
    }
}
