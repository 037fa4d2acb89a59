/*!
 * ELAN annotation document model.
 *
 * - `model`: tiers, constraint kinds and the two annotation shapes
 * - `parser`: XML loading into raw declarations
 * - `hierarchy`: the tier tree
 * - `resolver`: reference chain resolution and durations
 * - `document`: the per-document context tying them together
 */

pub mod model;
pub mod parser;
pub mod hierarchy;
pub mod resolver;
pub mod document;

pub use model::{Annotation, AnnotationKind, ConstraintKind, DocumentSource, Tier, TierDescriptor};
pub use hierarchy::TierHierarchy;
pub use resolver::AnnotationResolver;
pub use document::EafDocument;
