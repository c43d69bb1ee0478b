//! Terminal UI: colors, spinner, and how backing out of a prompt is handled.

use anyhow::{Context, Result};
use inquire::InquireError;

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Escape and Ctrl+C both count as backing out.
const fn is_cancellation(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Turns a prompt result into `Some(answer)`, or `None` if the user backed out.
pub fn answered<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_cancellation(&e) => {
            tracing::debug!("prompt cancelled");
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to read input"),
    }
}

/// Runs a multi-prompt flow. Backing out of any prompt ends the flow
/// without an error and without saving anything.
pub fn run_interactive<F>(flow: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match flow() {
        Err(e) if e.downcast_ref::<InquireError>().is_some_and(is_cancellation) => {
            println!();
            tracing::debug!("interactive flow cancelled");
            Ok(())
        }
        other => other,
    }
}
