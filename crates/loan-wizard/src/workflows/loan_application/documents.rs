use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

/// Client-local reference to a chosen file. Only the name ever leaves the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
}

impl FileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Builds a reference from the final path component.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(Self::new)
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Upload slots offered by the document step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSlot {
    PanCard,
    AadhaarCard,
    SalarySlips,
    BankStatements,
    Photo,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 5] = [
        DocumentSlot::PanCard,
        DocumentSlot::AadhaarCard,
        DocumentSlot::SalarySlips,
        DocumentSlot::BankStatements,
        DocumentSlot::Photo,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DocumentSlot::PanCard => "PAN Card",
            DocumentSlot::AadhaarCard => "Aadhaar Card",
            DocumentSlot::SalarySlips => "Salary Slips",
            DocumentSlot::BankStatements => "Bank Statements",
            DocumentSlot::Photo => "Photo",
        }
    }

    pub const fn accepts_multiple(self) -> bool {
        matches!(self, DocumentSlot::SalarySlips | DocumentSlot::BankStatements)
    }
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejection raised when a chosen file cannot be attached.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttachError {
    #[error("{name} is not an accepted document type (pdf, jpg, jpeg, png)")]
    UnsupportedType { slot: DocumentSlot, name: String },
}

/// Files referenced by the document step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadedFiles {
    pub pan_card: Option<FileRef>,
    #[serde(rename = "aadharCard")]
    pub aadhaar_card: Option<FileRef>,
    pub salary_slips: Vec<FileRef>,
    pub bank_statements: Vec<FileRef>,
    pub photo: Option<FileRef>,
}

impl UploadedFiles {
    /// Replaces the slot contents. Single-file slots keep the first reference; an empty
    /// selection leaves the slot untouched.
    pub fn attach(&mut self, slot: DocumentSlot, files: Vec<FileRef>) -> Result<(), AttachError> {
        if let Some(rejected) = files.iter().find(|file| {
            file.extension()
                .map_or(true, |ext| !ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        }) {
            return Err(AttachError::UnsupportedType {
                slot,
                name: rejected.name.clone(),
            });
        }

        let Some(first) = files.first().cloned() else {
            return Ok(());
        };

        match slot {
            DocumentSlot::PanCard => self.pan_card = Some(first),
            DocumentSlot::AadhaarCard => self.aadhaar_card = Some(first),
            DocumentSlot::Photo => self.photo = Some(first),
            DocumentSlot::SalarySlips => self.salary_slips = files,
            DocumentSlot::BankStatements => self.bank_statements = files,
        }
        Ok(())
    }

    pub fn clear(&mut self, slot: DocumentSlot) {
        match slot {
            DocumentSlot::PanCard => self.pan_card = None,
            DocumentSlot::AadhaarCard => self.aadhaar_card = None,
            DocumentSlot::Photo => self.photo = None,
            DocumentSlot::SalarySlips => self.salary_slips.clear(),
            DocumentSlot::BankStatements => self.bank_statements.clear(),
        }
    }

    pub fn files(&self, slot: DocumentSlot) -> Vec<&FileRef> {
        match slot {
            DocumentSlot::PanCard => self.pan_card.iter().collect(),
            DocumentSlot::AadhaarCard => self.aadhaar_card.iter().collect(),
            DocumentSlot::Photo => self.photo.iter().collect(),
            DocumentSlot::SalarySlips => self.salary_slips.iter().collect(),
            DocumentSlot::BankStatements => self.bank_statements.iter().collect(),
        }
    }

    /// File names in the slot, in attachment order.
    pub fn names(&self, slot: DocumentSlot) -> Vec<String> {
        self.files(slot)
            .into_iter()
            .map(|file| file.name.clone())
            .collect()
    }
}
