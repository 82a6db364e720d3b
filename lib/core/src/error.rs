//! Shared `Result` alias over rootcause reports.
//!
//! Domain errors live next to the code that raises them; fallible
//! infrastructure lifts them into a `Report` with `?`.

use rootcause::Report;

/// `Result` whose error is a `Report` carrying context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
