/*!
 * Error types for the glossalign library.
 *
 * Document-level failures abort processing of that one document only; the
 * batch runner records them and moves on. Recoverable conditions (dangling
 * references, missing text, detection failures) are never errors: they are
 * logged where they occur and replaced with safe defaults.
 */

use thiserror::Error;

/// Errors that make a single annotation document unusable
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input is not well-formed XML
    #[error("Malformed XML in {document}: {source}")]
    Xml {
        /// Document identifier
        document: String,
        /// Underlying parser error
        #[source]
        source: roxmltree::Error,
    },

    /// The document could not be read
    #[error("Failed to read {document}: {source}")]
    Io {
        /// Document identifier
        document: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The XML root is not an ELAN annotation document
    #[error("{document} is not an annotation document (root element <{root}>)")]
    NotAnAnnotationDocument {
        document: String,
        root: String,
    },

    /// A required attribute is missing from an element
    #[error("{document}: <{element}> is missing required attribute {attribute}")]
    MissingAttribute {
        document: String,
        element: String,
        attribute: String,
    },

    /// A time slot value is not an integer millisecond offset
    #[error("{document}: time slot {slot} has invalid value '{value}'")]
    InvalidTimeValue {
        document: String,
        slot: String,
        value: String,
    },

    /// A tier references a linguistic type that was never declared
    #[error("{document}: tier '{tier}' references undeclared linguistic type '{linguistic_type}'")]
    UnknownLinguisticType {
        document: String,
        tier: String,
        linguistic_type: String,
    },

    /// Tier parent references loop back on themselves
    #[error("{document}: tier '{tier}' is part of a parent cycle")]
    CyclicTierHierarchy {
        document: String,
        tier: String,
    },

    /// Annotation parent references loop back on themselves
    #[error("{document}: annotation '{annotation}' is part of a reference cycle")]
    CyclicAnnotationGraph {
        document: String,
        annotation: String,
    },
}

impl DocumentError {
    /// Identifier of the document this error belongs to
    pub fn document(&self) -> &str {
        match self {
            Self::Xml { document, .. }
            | Self::Io { document, .. }
            | Self::NotAnAnnotationDocument { document, .. }
            | Self::MissingAttribute { document, .. }
            | Self::InvalidTimeValue { document, .. }
            | Self::UnknownLinguisticType { document, .. }
            | Self::CyclicTierHierarchy { document, .. }
            | Self::CyclicAnnotationGraph { document, .. } => document,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading or analysing a document
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error writing export output
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
