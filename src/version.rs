//! API version drift detection.
//!
//! The first response of every fetch carries an `apiVersion` string. It is
//! compared component by component against the version the client was built
//! for; the first differing component decides the [`DriftSeverity`].

use tracing::{info, warn};

/// How far an observed API version has moved from the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DriftSeverity {
    /// Versions match.
    Ok,
    /// Only the patch component differs. Informational.
    PatchDrift,
    /// The minor component differs; the schema may have changed.
    MinorDrift,
    /// The major component differs; the schema may have changed.
    MajorDrift,
}

impl DriftSeverity {
    /// Whether this drift should be surfaced to the user as a warning.
    #[must_use]
    pub fn is_warning(self) -> bool {
        matches!(self, Self::MinorDrift | Self::MajorDrift)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::PatchDrift => "patch",
            Self::MinorDrift => "minor",
            Self::MajorDrift => "major",
        }
    }
}

/// Result of inspecting the first response for its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    /// The response reported a version.
    Observed {
        observed: String,
        severity: DriftSeverity,
    },
    /// The response had no usable `apiVersion` field.
    Unavailable,
}

impl VersionOutcome {
    /// Severity when a version was reported.
    #[must_use]
    pub fn severity(&self) -> Option<DriftSeverity> {
        match self {
            Self::Observed { severity, .. } => Some(*severity),
            Self::Unavailable => None,
        }
    }
}

/// Classifies the drift between `observed` and `expected` (`major.minor.patch`).
///
/// Components are compared left to right. Numeric components compare by
/// value, so `"2.00.2"` matches `"2.0.2"`; anything else compares as text.
#[must_use]
pub fn check(observed: &str, expected: &str) -> DriftSeverity {
    let mut observed_parts = observed.trim().split('.');
    let mut expected_parts = expected.trim().split('.');
    for severity in [
        DriftSeverity::MajorDrift,
        DriftSeverity::MinorDrift,
        DriftSeverity::PatchDrift,
    ] {
        if !component_eq(observed_parts.next(), expected_parts.next()) {
            return severity;
        }
    }
    DriftSeverity::Ok
}

fn component_eq(observed: Option<&str>, expected: Option<&str>) -> bool {
    match (observed, expected) {
        (Some(observed), Some(expected)) => {
            match (observed.parse::<u64>(), expected.parse::<u64>()) {
                (Ok(observed), Ok(expected)) => observed == expected,
                _ => observed == expected,
            }
        }
        (None, None) => true,
        _ => false,
    }
}

/// Checks observed versions against a fixed expectation and logs drift.
#[derive(Debug, Clone)]
pub struct VersionGuard {
    expected: String,
}

impl VersionGuard {
    #[must_use]
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Classifies `observed` and emits the matching log event.
    ///
    /// Major and minor drift log at warn, patch drift at info, a match is
    /// silent. A missing version logs a warning and yields
    /// [`VersionOutcome::Unavailable`].
    pub fn inspect(&self, observed: Option<&str>) -> VersionOutcome {
        let Some(observed) = observed else {
            warn!("API has changed: version number no longer accessible");
            return VersionOutcome::Unavailable;
        };

        let severity = check(observed, &self.expected);
        match severity {
            DriftSeverity::MajorDrift | DriftSeverity::MinorDrift => warn!(
                expected = %self.expected,
                observed = %observed,
                drift = severity.as_str(),
                "API version changed; check that this data is still what we want"
            ),
            DriftSeverity::PatchDrift => info!(
                expected = %self.expected,
                observed = %observed,
                "patch level API version change; update the expected version"
            ),
            DriftSeverity::Ok => {}
        }

        VersionOutcome::Observed {
            observed: observed.to_string(),
            severity,
        }
    }
}
