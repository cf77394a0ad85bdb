//! Error types shared by forward mode, reverse mode and the expression front end.

use thiserror::Error;

/// Failures raised by differentiation operations.
///
/// Every variant is a logic or domain violation reported at the point of the
/// offending operation. Nothing here is transient, so nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdError {
    /// Operand outside the domain of an operator or elementary function.
    #[error("{op} is undefined at {value}: {reason}")]
    Domain {
        /// Name of the failing operation.
        op: &'static str,
        /// Offending operand value.
        value: f64,
        /// Why the value is rejected.
        reason: &'static str,
    },

    /// A value that cannot stand in for the requested real scalar.
    #[error("type error: expected {expected}, found {found}")]
    Type {
        /// What was required.
        expected: String,
        /// What was supplied.
        found: String,
    },

    /// Gradient requested for a node the reverse traversal never reached.
    #[error("no adjoint recorded for node {index}")]
    UnknownNode {
        /// Arena index of the queried node.
        index: usize,
    },

    /// Component index outside a vector-valued function's outputs.
    #[error("component index {index} out of range for {len} outputs")]
    ComponentOutOfRange {
        /// Requested component.
        index: usize,
        /// Number of components.
        len: usize,
    },

    /// Expression references a name that was never declared as a variable.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// Expression text is not well formed.
    #[error("parse error: {message} at position {position}")]
    Parse {
        /// Description of the problem.
        message: String,
        /// Byte offset into the source text.
        position: usize,
    },
}

impl AdError {
    pub(crate) fn domain<F: num_traits::ToPrimitive>(
        op: &'static str,
        value: F,
        reason: &'static str,
    ) -> Self {
        let value = value.to_f64().unwrap_or(f64::NAN);
        tracing::trace!(op, value, reason, "domain error");
        AdError::Domain { op, value, reason }
    }

    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        AdError::Type {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// `true` for [`AdError::Domain`].
    pub fn is_domain_error(&self) -> bool {
        matches!(self, AdError::Domain { .. })
    }

    /// `true` for lookups that found nothing: unreached nodes, out-of-range
    /// components and undeclared variables.
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            AdError::UnknownNode { .. }
                | AdError::ComponentOutOfRange { .. }
                | AdError::UnknownVariable(_)
        )
    }

    /// `true` for [`AdError::Type`].
    pub fn is_type_error(&self) -> bool {
        matches!(self, AdError::Type { .. })
    }

    /// `true` for [`AdError::Parse`].
    pub fn is_parse_error(&self) -> bool {
        matches!(self, AdError::Parse { .. })
    }
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, AdError>;
