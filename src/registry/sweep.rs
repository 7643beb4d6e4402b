//! Startup sweep over every bound options type

use super::OptionsProvider;
use crate::validation::DisplayNamePolicy;
use log::{debug, info, warn};
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// One options type that failed during a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    /// Bare name of the options type
    pub type_name: &'static str,
    /// The failure message as logged
    pub message: String,
}

/// Outcome of [`OptionsProvider::validate_options`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Every type that was materialized, in registration order
    pub checked: Vec<&'static str>,
    /// Types that failed, in the order they were checked
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    /// True when every checked type materialized cleanly
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl OptionsProvider {
    /// Materialize every options type that has a value source and log the
    /// ones that fail.
    ///
    /// All types resolve inside one fresh scope, with member names qualified
    /// by their type (`'DatabaseOptions:Host' must not be empty.`). The
    /// qualified naming applies to this sweep only; later calls to
    /// [`get`](Self::get) use bare member names.
    ///
    /// Failures never propagate: each one is logged as a warning and the
    /// sweep continues with the next type. Panics from user code are caught
    /// and reported the same way.
    pub fn validate_options(&self) -> SweepReport {
        let scope = self.create_scope();
        let mut report = SweepReport::default();

        for (id, registration) in self.registrations.iter() {
            if !registration.has_source() {
                continue;
            }

            let type_name = registration.type_name();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                scope.resolve_with_policy(id, type_name, DisplayNamePolicy::Qualified)
            }));

            let failure = match outcome {
                Ok(Ok(_)) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(payload) => Some(panic_message(&*payload)),
            };

            report.checked.push(type_name);
            match failure {
                Some(message) => {
                    warn!("Failed to validate options for {type_name}: {message}");
                    report.failures.push(SweepFailure { type_name, message });
                }
                None => debug!("Options for {type_name} are valid"),
            }
        }

        info!(
            "Options sweep finished: {} checked, {} failed",
            report.checked.len(),
            report.failures.len()
        );
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
