//! Devfeat Validate - checks a feature directory before it is packaged.
//!
//! Validation never fails: every problem becomes a [`Finding`] in the
//! returned [`ValidationReport`]. Errors mark the feature invalid, warnings
//! are advisory. Whether packaging proceeds after errors is the caller's call.
//!
//! Script checks are pluggable:
//! - [`ScriptLint`] predicates run over install script text. They are
//!   pattern heuristics and can be wrong in both directions.
//! - A [`SyntaxChecker`] decides whether a script parses.
//!
//! # Example
//!
//! ```rust,no_run
//! use devfeat_validate::{Validator, ValidationSummary};
//!
//! let validator = Validator::new();
//! let report = validator.validate("src/hello".as_ref(), "hello");
//! for finding in &report.errors {
//!     eprintln!("error: {finding}");
//! }
//! let summary = ValidationSummary::fold([&report]);
//! assert_eq!(summary.features, 1);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod lint;
mod report;
mod syntax;
mod validator;

pub use lint::{RegexLint, ScriptLint, default_install_lints};
pub use report::{Finding, FindingKind, ValidationReport, ValidationSummary};
pub use syntax::{ShellSyntaxChecker, SyntaxChecker, SyntaxVerdict};
pub use validator::{ValidateOptions, Validator};
