use std::fmt;
use std::io;

use serde::Serialize;

use super::documents::{DocumentSlot, UploadedFiles};
use super::domain::{ApplicationDraft, FieldName, StepKey};

const NOT_PROVIDED: &str = "Not provided";
const NOT_UPLOADED: &str = "Not uploaded";
const NO_EXISTING_LOANS: &str = "No existing loans provided";

/// Fields whose empty value renders as "Not provided" instead of an empty string.
const OPTIONAL_DISPLAY: [FieldName; 2] = [FieldName::PassportNumber, FieldName::UnemploymentIncome];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSection {
    pub step: StepKey,
    pub title: &'static str,
    pub entries: Vec<ReviewEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// Read-only projection of the draft and uploads shown before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub sections: Vec<ReviewSection>,
}

#[derive(Serialize)]
struct ReviewRow<'a> {
    section: &'a str,
    field: &'a str,
    value: &'a str,
}

impl ReviewSummary {
    pub(crate) fn from_parts(draft: &ApplicationDraft, uploads: &UploadedFiles) -> Self {
        let sections = StepKey::FORM_STEPS
            .iter()
            .map(|step| match step {
                StepKey::Documents => documents_section(uploads),
                StepKey::Existing if !draft.has_existing_loan() => {
                    ReviewSection {
                        step: *step,
                        title: step.title(),
                        entries: Vec::new(),
                        note: Some(NO_EXISTING_LOANS),
                    }
                }
                other => field_section(*other, draft),
            })
            .collect();

        Self { sections }
    }

    pub fn section(&self, step: StepKey) -> Option<&ReviewSection> {
        self.sections.iter().find(|section| section.step == step)
    }

    /// Writes one `section,field,value` row per entry, preceded by a header.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for section in &self.sections {
            if let Some(note) = section.note {
                csv_writer.serialize(ReviewRow {
                    section: section.title,
                    field: "",
                    value: note,
                })?;
            }
            for entry in &section.entries {
                csv_writer.serialize(ReviewRow {
                    section: section.title,
                    field: entry.label,
                    value: &entry.value,
                })?;
            }
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn field_section(step: StepKey, draft: &ApplicationDraft) -> ReviewSection {
    let entries = step
        .input_fields()
        .iter()
        .map(|field| {
            let value = draft.value(*field);
            let value = if value.is_empty() && OPTIONAL_DISPLAY.contains(field) {
                NOT_PROVIDED.to_string()
            } else {
                value.to_string()
            };
            ReviewEntry {
                label: field.label(),
                value,
            }
        })
        .collect();

    ReviewSection {
        step,
        title: step.title(),
        entries,
        note: None,
    }
}

fn documents_section(uploads: &UploadedFiles) -> ReviewSection {
    let entries = DocumentSlot::ALL
        .iter()
        .map(|slot| {
            let names = uploads.names(*slot);
            ReviewEntry {
                label: slot.label(),
                value: if names.is_empty() {
                    NOT_UPLOADED.to_string()
                } else {
                    names.join(", ")
                },
            }
        })
        .collect();

    ReviewSection {
        step: StepKey::Documents,
        title: StepKey::Documents.title(),
        entries,
        note: None,
    }
}

impl fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}] {}", section.step.ordinal(), section.title)?;
            if let Some(note) = section.note {
                writeln!(f, "  {note}")?;
            }
            for entry in &section.entries {
                writeln!(f, "  {}: {}", entry.label, entry.value)?;
            }
        }
        Ok(())
    }
}
