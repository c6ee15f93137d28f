use std::collections::BTreeMap;

use loan_wizard::workflows::loan_application::{
    FieldName, LoanApplicationWizard, Notification, Notifier, SectionOutcome, StepKey,
    StepStatus, SubmissionReceipt,
};

/// Prints user-facing notifications on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match &notification {
            Notification::Submitted { application_id } => {
                println!("\n*** {notification} (application {application_id})");
            }
            _ => println!("\n*** {notification}"),
        }
    }
}

pub(crate) fn print_progress(wizard: &LoanApplicationWizard) {
    let line: Vec<String> = wizard
        .progress()
        .iter()
        .map(|entry| {
            let marker = match entry.status {
                StepStatus::Active => ">",
                StepStatus::Completed => "x",
                StepStatus::Pending => " ",
            };
            format!("[{marker}] {}", entry.step.ordinal)
        })
        .collect();
    println!("\n{}", line.join("  "));
    let step = wizard.current_step();
    println!("Step {} of 7: {}", step.ordinal(), step.title());
}

pub(crate) fn print_blocked(step: StepKey, errors: &BTreeMap<FieldName, &'static str>) {
    println!("{step} needs attention:");
    for (field, message) in errors {
        println!("  - {}: {message}", field.label());
    }
}

pub(crate) fn print_receipt(receipt: &SubmissionReceipt) {
    let submitted_at = receipt.submitted_at.with_timezone(&chrono::Local);
    println!(
        "Application {} submitted at {}",
        receipt.application_id,
        submitted_at.format("%Y-%m-%d %H:%M:%S")
    );
    for outcome in &receipt.sections {
        match outcome {
            SectionOutcome::Saved { section, .. } => println!("  saved    {section}"),
            SectionOutcome::Skipped { section, reason } => {
                println!("  skipped  {section} ({reason})")
            }
        }
    }
}
