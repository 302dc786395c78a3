//! Verdict adapters
//!
//! Some hosting frameworks expect a `(rejected, reason)` pair instead of
//! a `Result`. These helpers convert between the two shapes.

use super::PolicyResult;

/// Convert a policy outcome to `(rejected, reason)`
pub fn verdict(result: PolicyResult) -> (bool, String) {
    match result {
        Ok(()) => (false, String::new()),
        Err(rejection) => (true, rejection.to_string()),
    }
}
