//! Violation aggregation.
//!
//! An [`Aggregator`] collects violations for one validation call. In
//! collect mode it keeps every violation; in fail-fast mode it stops after
//! the first one. Assert mode is fail-fast aggregation turned into a
//! [`BusinessError`].

use constraints_core::{BusinessError, ValidationReport, Violation};

/// How many violations one call records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Record every violation
    #[default]
    Collect,

    /// Stop at the first violation
    FailFast,
}

/// Accumulates the violations of one validation call.
#[derive(Debug, Default)]
pub struct Aggregator {
    mode: Mode,
    report: ValidationReport,
}

impl Aggregator {
    /// Creates an empty aggregator.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            report: ValidationReport::new(),
        }
    }

    /// Records a violation.
    pub fn record(&mut self, violation: Violation) {
        if !self.is_done() {
            self.report.push(violation);
        }
    }

    /// Returns true once no further violation will be recorded.
    pub fn is_done(&self) -> bool {
        self.mode == Mode::FailFast && self.report.has_errors
    }

    /// Returns the collected report.
    pub fn into_report(self) -> ValidationReport {
        self.report
    }

    /// Converts the first violation, if any, into a business error.
    pub fn into_assert(self, prefix: &str) -> Result<(), BusinessError> {
        match self.report.violations.into_iter().next() {
            Some(v) => Err(BusinessError::new(error_code(prefix, &v.field_path), v.message)),
            None => Ok(()),
        }
    }
}

/// Derives the error code of a violating field path.
///
/// Every ASCII uppercase letter becomes its lowercase form, preceded by `_`
/// unless it starts the path or a segment of it. The prefix is prepended.
/// Dots in nested paths are kept.
///
/// # Example
///
/// ```rust
/// use constraints_validator::error_code;
///
/// assert_eq!(error_code("err_", "userName"), "err_user_name");
/// assert_eq!(error_code("err_", "address.addressInfo"), "err_address.address_info");
/// assert_eq!(error_code("err_", "UserName"), "err_user_name");
/// ```
pub fn error_code(prefix: &str, path: &str) -> String {
    let mut code = String::with_capacity(prefix.len() + path.len() + 4);
    code.push_str(prefix);
    let mut prev = None;
    for ch in path.chars() {
        if ch.is_ascii_uppercase() {
            if prev.is_some_and(|p| p != '.') {
                code.push('_');
            }
            code.push(ch.to_ascii_lowercase());
        } else {
            code.push(ch);
        }
        prev = Some(ch);
    }
    code
}
