//! Inquire prompts for the reporting period when it is not configured.

use crate::domain::DomainError;
use crate::domain::time_window::parse_date;
use chrono::NaiveDate;
use inquire::Text;
use inquire::validator::Validation;

/// Ask for a `YYYY-MM-DD` date until a valid one is entered.
pub fn prompt_date(message: &str) -> Result<NaiveDate, DomainError> {
    let answer = Text::new(message)
        .with_placeholder("YYYY-MM-DD")
        .with_validator(|input: &str| {
            Ok(match parse_date(input.trim()) {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()
        .map_err(|e| DomainError::Config(format!("date prompt: {}", e)))?;
    parse_date(answer.trim())
}

/// Fill in whichever end of the period is missing.
pub fn prompt_missing_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), DomainError> {
    let start = match start {
        Some(d) => d,
        None => prompt_date("Period start:")?,
    };
    let end = match end {
        Some(d) => d,
        None => prompt_date("Period end:")?,
    };
    Ok((start, end))
}
