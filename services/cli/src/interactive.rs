//! Terminal rendition of the wizard built on dialoguer prompts.

use std::path::Path;

use dialoguer::{Confirm, Input, Select};
use loan_wizard::error::AppError;
use loan_wizard::workflows::loan_application::{
    DocumentSlot, FieldName, FileRef, LoanApplicationWizard, Notifier, StepKey, StepOutcome,
    SubmissionError, WizardPhase,
};
use tracing::{debug, warn};

use crate::cli::{ApplyArgs, ConsoleSequencer};
use crate::console::{self, ConsoleNotifier};
use crate::draft::DraftFile;

const BLANK_CHOICE: &str = "(leave blank)";
const CLEAR_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Back,
    ReturnToReview,
    Submit,
    EditSection,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Next => "Next",
            Action::Back => "Back",
            Action::ReturnToReview => "Return to review",
            Action::Submit => "Submit application",
            Action::EditSection => "Edit a section",
            Action::Quit => "Quit",
        }
    }
}

fn prompt_error(err: dialoguer::Error) -> AppError {
    let dialoguer::Error::IO(err) = err;
    AppError::Io(err)
}

pub(crate) async fn run(args: ApplyArgs, sequencer: ConsoleSequencer) -> Result<(), AppError> {
    let mut wizard = match args.draft {
        Some(path) => DraftFile::load(&path)?.into_wizard(),
        None => LoanApplicationWizard::new(),
    };

    loop {
        console::print_progress(&wizard);
        match wizard.phase() {
            WizardPhase::Editing(step) | WizardPhase::EditingFromReview(step) => {
                fill_step(&mut wizard, step)?;
                let mut actions = vec![Action::Next, Action::Back];
                if wizard.editing_section().is_some() {
                    actions.push(Action::ReturnToReview);
                }
                actions.push(Action::Quit);

                match choose(&actions)? {
                    Action::Next => report(wizard.next_step()),
                    Action::Back => report(wizard.prev_step()),
                    Action::ReturnToReview => report(wizard.return_to_review()?),
                    _ => return Ok(()),
                }
            }
            WizardPhase::Reviewing => {
                print!("\n{}", wizard.review());
                let actions = [
                    Action::Submit,
                    Action::EditSection,
                    Action::Back,
                    Action::Quit,
                ];

                match choose(&actions)? {
                    Action::Submit => {
                        if submit(&mut wizard, &sequencer).await? && !start_another()? {
                            return Ok(());
                        }
                    }
                    Action::EditSection => {
                        let step = choose_section()?;
                        wizard.edit_section(step)?;
                    }
                    Action::Back => report(wizard.prev_step()),
                    _ => return Ok(()),
                }
            }
        }
    }
}

/// Returns `true` once the application has been accepted.
async fn submit(
    wizard: &mut LoanApplicationWizard,
    sequencer: &ConsoleSequencer,
) -> Result<bool, AppError> {
    match sequencer.submit(wizard).await {
        Ok(receipt) => {
            console::print_receipt(&receipt);
            Ok(true)
        }
        Err(SubmissionError::Incomplete { step }) => {
            debug!(%step, "returning to incomplete step");
            Ok(false)
        }
        Err(SubmissionError::Section { section, saved, .. }) => {
            warn!(%section, saved = saved.len(), "submission stopped part way");
            Ok(false)
        }
        Err(err) => {
            warn!(error = %err, "submission failed");
            Ok(false)
        }
    }
}

fn start_another() -> Result<bool, AppError> {
    Confirm::new()
        .with_prompt("Start another application?")
        .default(false)
        .interact()
        .map_err(prompt_error)
}

fn report(outcome: StepOutcome) {
    if let Some(notification) = outcome.notification() {
        ConsoleNotifier.notify(notification);
    }
    match outcome {
        StepOutcome::Blocked { step, errors } => console::print_blocked(step, &errors),
        StepOutcome::AtFirstStep => println!("Already at the first step."),
        _ => {}
    }
}

fn choose(actions: &[Action]) -> Result<Action, AppError> {
    let labels: Vec<&str> = actions.iter().map(|action| action.label()).collect();
    let index = Select::new()
        .with_prompt("What next")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_error)?;
    Ok(actions[index])
}

fn choose_section() -> Result<StepKey, AppError> {
    let labels: Vec<String> = StepKey::FORM_STEPS
        .iter()
        .map(|step| format!("{}. {}", step.ordinal(), step.title()))
        .collect();
    let index = Select::new()
        .with_prompt("Section to edit")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_error)?;
    Ok(StepKey::FORM_STEPS[index])
}

fn fill_step(wizard: &mut LoanApplicationWizard, step: StepKey) -> Result<(), AppError> {
    if step == StepKey::Documents {
        return fill_documents(wizard);
    }

    for field in step.input_fields() {
        let value = prompt_field(wizard, *field)?;
        wizard.set_field(*field, value);
        wizard.blur(*field);
        if let Some(message) = wizard.validation().visible_error(*field) {
            println!("  ! {message}");
        }
    }
    Ok(())
}

fn prompt_field(wizard: &LoanApplicationWizard, field: FieldName) -> Result<String, AppError> {
    let current = wizard.draft().value(field);

    let Some(choices) = field.choices() else {
        let prompt = if field.is_multiline() {
            format!("{} (one line)", field.label())
        } else {
            field.label().to_string()
        };
        return Input::<String>::new()
            .with_prompt(prompt)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error);
    };

    let mut labels = vec![BLANK_CHOICE];
    labels.extend(choices.iter().map(|(_, label)| *label));
    let default = choices
        .iter()
        .position(|(value, _)| *value == current)
        .map_or(0, |index| index + 1);

    let index = Select::new()
        .with_prompt(field.label())
        .items(&labels)
        .default(default)
        .interact()
        .map_err(prompt_error)?;

    Ok(match index {
        0 => String::new(),
        selected => choices[selected - 1].0.to_string(),
    })
}

fn fill_documents(wizard: &mut LoanApplicationWizard) -> Result<(), AppError> {
    println!("Accepted formats: pdf, jpg, jpeg, png. Enter '{CLEAR_MARKER}' to clear a slot.");
    for slot in DocumentSlot::ALL {
        let current = wizard.uploads().names(slot).join(", ");
        let hint = if slot.accepts_multiple() {
            "paths, comma separated"
        } else {
            "path"
        };
        let answer = Input::<String>::new()
            .with_prompt(format!("{} ({hint}) [{current}]", slot.label()))
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;

        let answer = answer.trim();
        if answer.is_empty() {
            continue;
        }
        if answer == CLEAR_MARKER {
            wizard.clear_documents(slot);
            continue;
        }

        let files: Vec<FileRef> = answer
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .filter_map(|path| FileRef::from_path(Path::new(path)))
            .collect();
        if let Err(err) = wizard.attach_documents(slot, files) {
            println!("  ! {err}");
        }
    }
    Ok(())
}
