//! Command-line front end for the job application tracker.

mod cli;
mod commands;
mod infra;
mod render;

use job_tracker::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
