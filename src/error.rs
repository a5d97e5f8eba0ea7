//! Error types for the component runtime.
//!
//! Most failure paths in the runtime are configuration errors that degrade
//! to a no-op after a warning (unknown component names, missing required
//! children). This enum exists for the seams where a caller can meaningfully
//! observe the failure instead.

use thiserror::Error;

use crate::types::ElementId;

/// Primary error type for runtime operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No constructor registered under the requested name.
    #[error("unknown component `{name}`")]
    UnknownComponent {
        /// Component name that failed to resolve.
        name: String,
    },
    /// A widget's required child element was not found.
    #[error("{component}: missing required child ({expected})")]
    MissingChild {
        /// Component name reporting the missing child.
        component: &'static str,
        /// Human-readable description of the expected child.
        expected: &'static str,
    },
    /// The element handle does not refer to a live, attached element.
    #[error("element {element:?} is detached or stale")]
    DetachedElement {
        /// Offending handle.
        element: ElementId,
    },
    /// The search collaborator failed to load a document.
    #[error("search document `{doc_ref}` unavailable: {reason}")]
    SearchDocUnavailable {
        /// Document reference that failed to load.
        doc_ref: String,
        /// Machine-readable reason for the failure.
        reason: String,
    },
}

/// Convenience alias for runtime results.
pub type Result<T> = std::result::Result<T, Error>;
