use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the API when an application is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! draft_fields {
    ($($variant:ident => $field:ident, $key:literal, $label:literal;)*) => {
        /// Every named input of the application form.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum FieldName {
            $($variant,)*
        }

        impl FieldName {
            pub const ALL: &'static [FieldName] = &[$(FieldName::$variant,)*];

            /// camelCase key used by drafts on disk and by the form inputs.
            pub const fn key(self) -> &'static str {
                match self {
                    $(FieldName::$variant => $key,)*
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(FieldName::$variant => $label,)*
                }
            }
        }

        /// Transient applicant data collected across the form steps. Every field starts empty.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct ApplicationDraft {
            $(
                #[serde(rename = $key)]
                pub $field: String,
            )*
        }

        impl ApplicationDraft {
            pub fn value(&self, field: FieldName) -> &str {
                match field {
                    $(FieldName::$variant => &self.$field,)*
                }
            }

            fn value_mut(&mut self, field: FieldName) -> &mut String {
                match field {
                    $(FieldName::$variant => &mut self.$field,)*
                }
            }
        }
    };
}

draft_fields! {
    FullName => full_name, "fullName", "Full Name";
    PhoneNumber => phone_number, "phoneNumber", "Phone Number";
    MaritalStatus => marital_status, "maritalStatus", "Marital Status";
    PanNumber => pan_number, "panNumber", "PAN Number";
    PassportNumber => passport_number, "passportNumber", "Passport Number";
    Gender => gender, "gender", "Gender";
    CurrentAddress => current_address, "currentAddress", "Current Address";
    PermanentAddress => permanent_address, "permanentAddress", "Permanent Address";
    DateOfBirth => date_of_birth, "dateOfBirth", "Date of Birth";

    OccupationType => occupation_type, "occupationType", "Occupation Type";
    TotalWorkExperience => total_work_experience, "totalWorkExperience", "Total Work Experience";
    MonthlyCompanyIncome => monthly_company_income, "monthlyCompanyIncome", "Monthly Income";
    UnemploymentIncome => unemployment_income, "unemploymentIncome", "Unemployment Income";
    CompanyName => company_name, "companyName", "Company Name";
    OfficeAddress => office_address, "officeAddress", "Office Address";

    LoanType => loan_type, "loanType", "Loan Type";
    LoanAmount => loan_amount, "loanAmount", "Loan Amount";
    LoanDuration => loan_duration, "loanDuration", "Loan Duration";
    LoanPurpose => loan_purpose, "loanPurpose", "Loan Purpose";

    ExistingLoanFullName => existing_loan_full_name, "existingLoanFullName", "Full Name";
    ExistingLoanType => existing_loan_type, "existingLoanType", "Loan Type";
    ExistingLoanContactNumber => existing_loan_contact_number, "existingLoanContactNumber", "Contact Number";
    ExistingLoanLender => existing_loan_lender, "existingLoanLender", "Lender";
    ExistingLoanEmail => existing_loan_email, "existingLoanEmail", "Email";
    ExistingLoanOutstandingAmount => existing_loan_outstanding_amount, "existingLoanOutstandingAmount", "Outstanding Amount";
    ExistingLoanAddress => existing_loan_address, "existingLoanAddress", "Address";
    ExistingLoanEmiTenure => existing_loan_emi_tenure, "existingLoanEMITenure", "EMI Tenure";

    ReferenceFullName => reference_full_name, "referenceFullName", "Full Name";
    ReferenceRelationship => reference_relationship, "referenceRelationship", "Relationship";
    ReferenceContactNumber => reference_contact_number, "referenceContactNumber", "Contact Number";
    ReferenceAddress => reference_address, "referenceAddress", "Address";
}

impl FieldName {
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }

    /// Fixed option list for select-style inputs as `(value, label)` pairs.
    pub fn choices(self) -> Option<&'static [(&'static str, &'static str)]> {
        const LOAN_TYPES: &[(&str, &str)] = &[
            ("personal", "Personal Loan"),
            ("home", "Home Loan"),
            ("car", "Car Loan"),
            ("business", "Business Loan"),
            ("education", "Education Loan"),
        ];

        match self {
            FieldName::MaritalStatus => Some(&[
                ("single", "Single"),
                ("married", "Married"),
                ("divorced", "Divorced"),
                ("widowed", "Widowed"),
            ]),
            FieldName::Gender => Some(&[("male", "Male"), ("female", "Female"), ("other", "Other")]),
            FieldName::OccupationType => Some(&[
                ("salaried", "Salaried"),
                ("self-employed", "Self Employed"),
                ("business", "Business Owner"),
                ("freelancer", "Freelancer"),
            ]),
            FieldName::LoanType | FieldName::ExistingLoanType => Some(LOAN_TYPES),
            FieldName::LoanDuration => Some(&[
                ("1", "1 Year"),
                ("2", "2 Years"),
                ("3", "3 Years"),
                ("5", "5 Years"),
                ("10", "10 Years"),
                ("15", "15 Years"),
                ("20", "20 Years"),
            ]),
            _ => None,
        }
    }

    /// Long-form inputs rendered as text areas.
    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            FieldName::CurrentAddress
                | FieldName::PermanentAddress
                | FieldName::OfficeAddress
                | FieldName::ExistingLoanAddress
                | FieldName::ReferenceAddress
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl ApplicationDraft {
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    pub fn is_blank(&self, field: FieldName) -> bool {
        self.value(field).trim().is_empty()
    }

    /// True when any identifying existing-loan field holds text. Whitespace counts as text.
    pub fn has_existing_loan(&self) -> bool {
        [
            FieldName::ExistingLoanFullName,
            FieldName::ExistingLoanType,
            FieldName::ExistingLoanLender,
        ]
        .iter()
        .any(|field| !self.value(*field).is_empty())
    }
}

/// The seven wizard steps in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKey {
    Personal,
    Employment,
    Loan,
    Documents,
    Existing,
    References,
    Review,
}

/// Static description of a wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub ordinal: u8,
    pub title: &'static str,
    pub key: StepKey,
}

pub const STEPS: [StepDescriptor; 7] = [
    StepDescriptor {
        ordinal: 1,
        title: "Personal Details",
        key: StepKey::Personal,
    },
    StepDescriptor {
        ordinal: 2,
        title: "Employment Details",
        key: StepKey::Employment,
    },
    StepDescriptor {
        ordinal: 3,
        title: "Loan Details",
        key: StepKey::Loan,
    },
    StepDescriptor {
        ordinal: 4,
        title: "Document Upload",
        key: StepKey::Documents,
    },
    StepDescriptor {
        ordinal: 5,
        title: "Existing Loans",
        key: StepKey::Existing,
    },
    StepDescriptor {
        ordinal: 6,
        title: "References",
        key: StepKey::References,
    },
    StepDescriptor {
        ordinal: 7,
        title: "Review Application",
        key: StepKey::Review,
    },
];

impl StepKey {
    /// Steps holding form data, i.e. everything before review.
    pub const FORM_STEPS: [StepKey; 6] = [
        StepKey::Personal,
        StepKey::Employment,
        StepKey::Loan,
        StepKey::Documents,
        StepKey::Existing,
        StepKey::References,
    ];

    pub const fn descriptor(self) -> StepDescriptor {
        STEPS[self as usize]
    }

    pub const fn ordinal(self) -> u8 {
        self.descriptor().ordinal
    }

    pub const fn title(self) -> &'static str {
        self.descriptor().title
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        STEPS
            .iter()
            .find(|step| step.ordinal == ordinal)
            .map(|step| step.key)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
    }

    pub const fn is_form_step(self) -> bool {
        !matches!(self, StepKey::Review)
    }

    /// Fields that must pass validation before the step is considered complete.
    pub const fn required_fields(self) -> &'static [FieldName] {
        match self {
            StepKey::Personal => &[
                FieldName::FullName,
                FieldName::PhoneNumber,
                FieldName::PanNumber,
                FieldName::CurrentAddress,
                FieldName::PermanentAddress,
                FieldName::DateOfBirth,
                FieldName::MaritalStatus,
                FieldName::Gender,
            ],
            StepKey::Employment => &[
                FieldName::OccupationType,
                FieldName::CompanyName,
                FieldName::TotalWorkExperience,
                FieldName::MonthlyCompanyIncome,
                FieldName::OfficeAddress,
            ],
            StepKey::Loan => &[
                FieldName::LoanType,
                FieldName::LoanAmount,
                FieldName::LoanDuration,
                FieldName::LoanPurpose,
            ],
            StepKey::References => &[
                FieldName::ReferenceFullName,
                FieldName::ReferenceContactNumber,
                FieldName::ReferenceRelationship,
                FieldName::ReferenceAddress,
            ],
            StepKey::Documents | StepKey::Existing | StepKey::Review => &[],
        }
    }

    /// Fields marked touched when the step fails validation.
    pub const fn touched_fields(self) -> &'static [FieldName] {
        match self {
            StepKey::Existing => &[
                FieldName::ExistingLoanFullName,
                FieldName::ExistingLoanType,
                FieldName::ExistingLoanContactNumber,
                FieldName::ExistingLoanLender,
                FieldName::ExistingLoanEmail,
                FieldName::ExistingLoanOutstandingAmount,
                FieldName::ExistingLoanAddress,
                FieldName::ExistingLoanEmiTenure,
            ],
            other => other.required_fields(),
        }
    }

    /// Every input shown on the step, in display order.
    pub const fn input_fields(self) -> &'static [FieldName] {
        match self {
            StepKey::Personal => &[
                FieldName::FullName,
                FieldName::PhoneNumber,
                FieldName::MaritalStatus,
                FieldName::PanNumber,
                FieldName::PassportNumber,
                FieldName::Gender,
                FieldName::CurrentAddress,
                FieldName::PermanentAddress,
                FieldName::DateOfBirth,
            ],
            StepKey::Employment => &[
                FieldName::OccupationType,
                FieldName::TotalWorkExperience,
                FieldName::MonthlyCompanyIncome,
                FieldName::UnemploymentIncome,
                FieldName::CompanyName,
                FieldName::OfficeAddress,
            ],
            StepKey::Loan => &[
                FieldName::LoanType,
                FieldName::LoanAmount,
                FieldName::LoanDuration,
                FieldName::LoanPurpose,
            ],
            StepKey::Existing => StepKey::Existing.touched_fields(),
            StepKey::References => &[
                FieldName::ReferenceFullName,
                FieldName::ReferenceRelationship,
                FieldName::ReferenceContactNumber,
                FieldName::ReferenceAddress,
            ],
            StepKey::Documents | StepKey::Review => &[],
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.ordinal(), self.title())
    }
}
