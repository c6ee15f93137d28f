use std::sync::OnceLock;

use regex::Regex;

use super::super::domain::FieldName;

/// Format check applied once a field holds a non-blank value.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Check {
    MinChars { min: usize, message: &'static str },
    TenDigitPhone,
    PanFormat,
    NonNegative(&'static str),
    /// Reads only the leading number, so "5 years" passes as 5.
    LeadingNonNegative(&'static str),
    Positive(&'static str),
    PositiveInteger(&'static str),
    Email,
}

/// Declarative rule for a single field. `required` carries the message shown for blank input;
/// optional fields leave it unset and accept blanks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldRule {
    pub field: FieldName,
    pub required: Option<&'static str>,
    pub check: Option<Check>,
}

const fn required(field: FieldName, message: &'static str) -> FieldRule {
    FieldRule {
        field,
        required: Some(message),
        check: None,
    }
}

const fn required_with(field: FieldName, message: &'static str, check: Check) -> FieldRule {
    FieldRule {
        field,
        required: Some(message),
        check: Some(check),
    }
}

const fn optional_with(field: FieldName, check: Check) -> FieldRule {
    FieldRule {
        field,
        required: None,
        check: Some(check),
    }
}

const PHONE_MESSAGE: &str = "Please enter a valid 10-digit phone number";
const ADDRESS_MESSAGE: &str = "Please enter a complete address";

pub(crate) static RULES: &[FieldRule] = &[
    required_with(
        FieldName::FullName,
        "Full name is required",
        Check::MinChars {
            min: 2,
            message: "Name must be at least 2 characters",
        },
    ),
    required_with(
        FieldName::PhoneNumber,
        "Phone number is required",
        Check::TenDigitPhone,
    ),
    required_with(
        FieldName::PanNumber,
        "PAN number is required",
        Check::PanFormat,
    ),
    required_with(
        FieldName::CurrentAddress,
        "Current address is required",
        Check::MinChars {
            min: 10,
            message: ADDRESS_MESSAGE,
        },
    ),
    required_with(
        FieldName::PermanentAddress,
        "Permanent address is required",
        Check::MinChars {
            min: 10,
            message: ADDRESS_MESSAGE,
        },
    ),
    required(FieldName::DateOfBirth, "Date of birth is required"),
    required(FieldName::MaritalStatus, "Marital status is required"),
    required(FieldName::Gender, "Gender is required"),
    required(FieldName::OccupationType, "Occupation type is required"),
    required(FieldName::CompanyName, "Company name is required"),
    required_with(
        FieldName::TotalWorkExperience,
        "Work experience is required",
        Check::LeadingNonNegative("Total work experience should be a valid number"),
    ),
    required_with(
        FieldName::MonthlyCompanyIncome,
        "Monthly income is required",
        Check::NonNegative("Please enter a valid income amount"),
    ),
    optional_with(
        FieldName::UnemploymentIncome,
        Check::NonNegative("Please enter a valid positive amount"),
    ),
    required(FieldName::OfficeAddress, "Office address is required"),
    required(FieldName::LoanType, "Loan type is required"),
    required_with(
        FieldName::LoanAmount,
        "Loan amount is required",
        Check::Positive("Please enter a valid amount"),
    ),
    required(FieldName::LoanDuration, "Loan duration is required"),
    required(FieldName::LoanPurpose, "Loan purpose is required"),
    optional_with(FieldName::ExistingLoanEmail, Check::Email),
    optional_with(
        FieldName::ExistingLoanOutstandingAmount,
        Check::Positive("Please enter a valid amount"),
    ),
    optional_with(
        FieldName::ExistingLoanEmiTenure,
        Check::PositiveInteger("Please enter a valid positive integer"),
    ),
    required(FieldName::ReferenceFullName, "Reference name is required"),
    required_with(
        FieldName::ReferenceContactNumber,
        "Reference contact is required",
        Check::TenDigitPhone,
    ),
    required(FieldName::ReferenceRelationship, "Relationship is required"),
    required(FieldName::ReferenceAddress, "Reference address is required"),
];

pub(crate) fn rule_for(field: FieldName) -> Option<&'static FieldRule> {
    RULES.iter().find(|rule| rule.field == field)
}

impl FieldRule {
    pub(crate) fn evaluate(&self, value: &str) -> Option<&'static str> {
        if value.trim().is_empty() {
            return self.required;
        }
        self.check.and_then(|check| check.apply(value))
    }
}

impl Check {
    fn apply(self, value: &str) -> Option<&'static str> {
        let passes = match self {
            Check::MinChars { min, .. } => value.trim().chars().count() >= min,
            Check::TenDigitPhone => value.chars().filter(char::is_ascii_digit).count() == 10,
            Check::PanFormat => pan_pattern().is_match(&value.to_uppercase()),
            Check::NonNegative(_) => parse_number(value).is_some_and(|number| number >= 0.0),
            Check::LeadingNonNegative(_) => {
                parse_leading_number(value).is_some_and(|number| number >= 0.0)
            }
            Check::Positive(_) => parse_number(value).is_some_and(|number| number > 0.0),
            Check::PositiveInteger(_) => {
                parse_number(value).is_some_and(|number| number > 0.0 && number.fract() == 0.0)
            }
            Check::Email => email_pattern().is_match(value.trim()),
        };

        if passes {
            None
        } else {
            Some(self.message())
        }
    }

    fn message(self) -> &'static str {
        match self {
            Check::MinChars { message, .. }
            | Check::NonNegative(message)
            | Check::LeadingNonNegative(message)
            | Check::Positive(message)
            | Check::PositiveInteger(message) => message,
            Check::TenDigitPhone => PHONE_MESSAGE,
            Check::PanFormat => "Please enter a valid PAN number",
            Check::Email => "Please enter a valid email address",
        }
    }
}

/// Parses a whole trimmed value as a finite decimal.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Parses the decimal at the start of the value and ignores whatever follows it.
pub(crate) fn parse_leading_number(value: &str) -> Option<f64> {
    leading_number_pattern()
        .find(value.trim_start())
        .and_then(|found| found.as_str().parse::<f64>().ok())
        .filter(|number| number.is_finite())
}

fn leading_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("leading number pattern compiles")
    })
}

fn pan_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN pattern compiles"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
    })
}
