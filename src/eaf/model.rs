/*!
 * Core types of the annotation document model.
 *
 * Tiers carry a constraint kind inherited from their linguistic type, and
 * annotations come in two shapes: alignable ones anchored to two time slots,
 * and reference ones that depend on a parent annotation on another tier.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Stereotype of a linguistic type, which governs how a tier relates to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    SymbolicSubdivision,
    SymbolicAssociation,
    TimeSubdivision,
    IncludedIn,
    /// Top-level type without constraints
    Root,
    Unknown,
}

impl ConstraintKind {
    /// Map the `CONSTRAINTS` attribute of a linguistic type to a kind.
    ///
    /// A type without the attribute is a top-level type. Any value that is not
    /// one of the four ELAN stereotypes, including the empty string, is unknown.
    pub fn from_constraint(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None => Self::Root,
            Some("Symbolic_Subdivision") => Self::SymbolicSubdivision,
            Some("Symbolic_Association") => Self::SymbolicAssociation,
            Some("Time_Subdivision") => Self::TimeSubdivision,
            Some("Included_In") => Self::IncludedIn,
            Some(_) => Self::Unknown,
        }
    }

    /// Single-character fingerprint code.
    ///
    /// In lumped mode the two time-based subdivisions collapse onto the
    /// symbolic subdivision code.
    pub fn code(&self, lumped: bool) -> char {
        match self {
            Self::SymbolicSubdivision => 's',
            Self::SymbolicAssociation => 'a',
            Self::TimeSubdivision if lumped => 's',
            Self::TimeSubdivision => 't',
            Self::IncludedIn if lumped => 's',
            Self::IncludedIn => 'i',
            Self::Root => 'R',
            Self::Unknown => 'x',
        }
    }

    /// Whether annotations on tiers of this kind carry their own time slots
    pub fn is_time_alignable(&self) -> bool {
        matches!(self, Self::Root | Self::TimeSubdivision | Self::IncludedIn)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SymbolicSubdivision => "Symbolic_Subdivision",
            Self::SymbolicAssociation => "Symbolic_Association",
            Self::TimeSubdivision => "Time_Subdivision",
            Self::IncludedIn => "Included_In",
            Self::Root => "Root",
            Self::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Declared linguistic type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinguisticType {
    pub id: String,
    pub constraint: ConstraintKind,
}

/// Tier as declared in the document, before its type is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierDeclaration {
    pub id: String,
    pub linguistic_type_ref: String,
    pub parent_ref: Option<String>,
}

/// Tier with its linguistic type resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub id: String,
    pub linguistic_type: String,
    pub constraint: ConstraintKind,
    /// Logical parent tier; `None` means the tier hangs off the document root
    pub parent: Option<String>,
}

/// Child entry of the tier tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierDescriptor {
    pub id: String,
    pub constraint: ConstraintKind,
    pub linguistic_type: String,
}

impl From<&Tier> for TierDescriptor {
    fn from(tier: &Tier) -> Self {
        Self {
            id: tier.id.clone(),
            constraint: tier.constraint,
            linguistic_type: tier.linguistic_type.clone(),
        }
    }
}

/// Shape-specific payload of an annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationKind {
    /// Directly anchored to a time interval
    Alignable {
        start_slot: String,
        end_slot: String,
    },
    /// Depends on a parent annotation; `previous` marks a continuation
    Reference {
        parent: String,
        previous: Option<String>,
    },
}

/// Single annotation element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub id: String,
    pub tier_id: String,
    pub text: String,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn alignable(id: &str, tier_id: &str, start_slot: &str, end_slot: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            tier_id: tier_id.to_string(),
            text: text.to_string(),
            kind: AnnotationKind::Alignable {
                start_slot: start_slot.to_string(),
                end_slot: end_slot.to_string(),
            },
        }
    }

    pub fn reference(id: &str, tier_id: &str, parent: &str, previous: Option<&str>, text: &str) -> Self {
        Self {
            id: id.to_string(),
            tier_id: tier_id.to_string(),
            text: text.to_string(),
            kind: AnnotationKind::Reference {
                parent: parent.to_string(),
                previous: previous.map(str::to_string),
            },
        }
    }

    pub fn is_alignable(&self) -> bool {
        matches!(self.kind, AnnotationKind::Alignable { .. })
    }

    /// Parent annotation ID for reference annotations
    pub fn parent_id(&self) -> Option<&str> {
        match &self.kind {
            AnnotationKind::Reference { parent, .. } => Some(parent),
            AnnotationKind::Alignable { .. } => None,
        }
    }

    /// Whether this annotation continues the one named by its previous link
    pub fn is_continuation(&self) -> bool {
        matches!(&self.kind, AnnotationKind::Reference { previous: Some(_), .. })
    }
}

/// Where a document came from: the local path and, optionally, the archive URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub path: PathBuf,
    pub url: Option<String>,
}

impl DocumentSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Identifier used for logging and as the key of the synthetic root tier
    pub fn identifier(&self) -> String {
        self.path.display().to_string()
    }

    /// Short name used to build export record IDs
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| self.identifier())
    }
}
