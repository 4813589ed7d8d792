//! Parameter violations and plausibility warnings.

use thiserror::Error;

/// A parameter record that cannot be turned into a charge-density model.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParameterViolation {
    /// At least one pixel is required.
    #[error("pixel count must be at least 1")]
    NoPixels,

    /// A numeric field is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A length that may be zero was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeLength {
        /// Name of the offending field.
        field: &'static str,
        /// The provided value.
        value: f64,
    },

    /// A length that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NonPositiveLength {
        /// Name of the offending field.
        field: &'static str,
        /// The provided value.
        value: f64,
    },

    /// Guard rings are enabled together with a vertical gradient, but no
    /// guard straggle was supplied.
    #[error("vertical gradient with guard rings requires a guard straggle")]
    MissingGuardStraggle,

    /// A diffusion straggle was zero or negative.
    #[error("{field} straggle must be positive, got {value}")]
    NonPositiveStraggle {
        /// Layer the straggle belongs to.
        field: &'static str,
        /// The provided value.
        value: f64,
    },

    /// A radial-gradient width was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveWidth {
        /// Name of the offending field.
        field: &'static str,
        /// The provided value.
        value: f64,
    },
}

/// A physically questionable parameter choice. Generation proceeds.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PlausibilityWarning {
    /// The guard ring is wider than the gap it sits in.
    #[error("guard width {width} exceeds pixel separation {separation}")]
    GuardWiderThanSeparation {
        /// Guard ring width.
        width: f64,
        /// Inter-pixel separation.
        separation: f64,
    },
}
