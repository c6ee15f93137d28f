mod cli;
mod console;
mod draft;
mod interactive;

use loan_wizard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
