//! Field and step validation backed by a declarative rule table.

mod rules;

use std::collections::{BTreeMap, BTreeSet};

use super::domain::{ApplicationDraft, FieldName, StepKey};

pub(crate) use rules::{parse_leading_number, parse_number};

/// Returns the error message for `value`, or `None` when it is acceptable.
pub fn validate_field(field: FieldName, value: &str) -> Option<&'static str> {
    rules::rule_for(field).and_then(|rule| rule.evaluate(value))
}

/// Result of checking every rule that gates a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepValidation {
    pub step: StepKey,
    pub checked: Vec<FieldName>,
    pub errors: BTreeMap<FieldName, &'static str>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks the fields that gate `step`. The document and review steps always pass; the
/// existing-loan step only rejects a malformed e-mail.
pub fn validate_step(step: StepKey, draft: &ApplicationDraft) -> StepValidation {
    let checked: Vec<FieldName> = match step {
        StepKey::Existing if !draft.is_blank(FieldName::ExistingLoanEmail) => {
            vec![FieldName::ExistingLoanEmail]
        }
        other => other.required_fields().to_vec(),
    };

    let errors = checked
        .iter()
        .filter_map(|field| validate_field(*field, draft.value(*field)).map(|err| (*field, err)))
        .collect();

    StepValidation {
        step,
        checked,
        errors,
    }
}

/// Shared error map plus the set of fields the user has interacted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationState {
    errors: BTreeMap<FieldName, &'static str>,
    touched: BTreeSet<FieldName>,
}

impl ValidationState {
    pub fn error(&self, field: FieldName) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_touched(&self, field: FieldName) -> bool {
        self.touched.contains(&field)
    }

    /// Error to display: only touched fields surface their message.
    pub fn visible_error(&self, field: FieldName) -> Option<&'static str> {
        if self.is_touched(field) {
            self.error(field)
        } else {
            None
        }
    }

    pub fn errors(&self) -> &BTreeMap<FieldName, &'static str> {
        &self.errors
    }

    pub fn touched(&self) -> &BTreeSet<FieldName> {
        &self.touched
    }

    pub(crate) fn record(&mut self, field: FieldName, error: Option<&'static str>) {
        match error {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// Merges a step outcome: failing fields gain their message, checked fields that passed
    /// drop any stale one.
    pub(crate) fn merge(&mut self, outcome: &StepValidation) {
        for field in &outcome.checked {
            self.record(*field, outcome.errors.get(field).copied());
        }
    }

    pub(crate) fn touch(&mut self, field: FieldName) {
        self.touched.insert(field);
    }

    pub(crate) fn touch_all(&mut self, fields: &[FieldName]) {
        self.touched.extend(fields.iter().copied());
    }
}
