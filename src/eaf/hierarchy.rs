/*!
 * Tier hierarchy construction.
 *
 * Resolves each tier's linguistic type to its constraint kind and arranges
 * the tiers into a parent → children tree under a synthetic root labelled with
 * the document identifier. The root's children are held apart from the tier
 * map, so a tier may share its ID with the document. Children keep
 * declaration order, which the fingerprint relies on.
 */

use std::collections::{HashMap, HashSet};
use log::warn;

use crate::errors::DocumentError;
use super::model::{LinguisticType, Tier, TierDeclaration, TierDescriptor};

/// Parent → children tree of the tiers of one document
#[derive(Debug, Clone)]
pub struct TierHierarchy {
    root_key: String,
    tiers: Vec<Tier>,
    index: HashMap<String, usize>,
    top_level: Vec<TierDescriptor>,
    children: HashMap<String, Vec<TierDescriptor>>,
}

impl TierHierarchy {
    /// Build the hierarchy from raw declarations.
    ///
    /// Fails on a tier whose linguistic type is undeclared and on parent
    /// chains that never reach the root.
    pub fn build(
        document: &str,
        linguistic_types: &[LinguisticType],
        declarations: &[TierDeclaration],
    ) -> Result<Self, DocumentError> {
        let constraints: HashMap<&str, &LinguisticType> = linguistic_types
            .iter()
            .map(|lt| (lt.id.as_str(), lt))
            .collect();

        let declared: HashSet<&str> = declarations.iter().map(|d| d.id.as_str()).collect();

        let mut tiers: Vec<Tier> = Vec::with_capacity(declarations.len());
        let mut index = HashMap::new();

        for declaration in declarations {
            if index.contains_key(&declaration.id) {
                warn!("{}: duplicate tier '{}' ignored", document, declaration.id);
                continue;
            }

            let linguistic_type = constraints
                .get(declaration.linguistic_type_ref.as_str())
                .ok_or_else(|| DocumentError::UnknownLinguisticType {
                    document: document.to_string(),
                    tier: declaration.id.clone(),
                    linguistic_type: declaration.linguistic_type_ref.clone(),
                })?;

            let parent = match &declaration.parent_ref {
                Some(parent) if declared.contains(parent.as_str()) => Some(parent.clone()),
                Some(parent) => {
                    warn!(
                        "{}: tier '{}' names undeclared parent '{}', attaching it to the document root",
                        document, declaration.id, parent
                    );
                    None
                }
                None => None,
            };

            index.insert(declaration.id.clone(), tiers.len());
            tiers.push(Tier {
                id: declaration.id.clone(),
                linguistic_type: linguistic_type.id.clone(),
                constraint: linguistic_type.constraint,
                parent,
            });
        }

        let root_key = document.to_string();
        let mut hierarchy = Self {
            root_key,
            tiers,
            index,
            top_level: Vec::new(),
            children: HashMap::new(),
        };

        hierarchy.check_acyclic(document)?;

        let mut top_level = Vec::new();
        let mut children: HashMap<String, Vec<TierDescriptor>> = HashMap::new();
        for tier in &hierarchy.tiers {
            match &tier.parent {
                Some(parent) => children.entry(parent.clone()).or_default().push(TierDescriptor::from(tier)),
                None => top_level.push(TierDescriptor::from(tier)),
            }
        }
        hierarchy.top_level = top_level;
        hierarchy.children = children;

        Ok(hierarchy)
    }

    // Every chain must reach the root in at most `tiers.len()` hops
    fn check_acyclic(&self, document: &str) -> Result<(), DocumentError> {
        let limit = self.tiers.len();
        for tier in &self.tiers {
            let mut current = tier;
            let mut hops = 0;
            while let Some(parent) = &current.parent {
                hops += 1;
                if hops > limit {
                    return Err(DocumentError::CyclicTierHierarchy {
                        document: document.to_string(),
                        tier: tier.id.clone(),
                    });
                }
                match self.tier(parent) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
        Ok(())
    }

    /// Label of the synthetic root node
    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// All tiers in declaration order
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn tier(&self, id: &str) -> Option<&Tier> {
        self.index.get(id).map(|&i| &self.tiers[i])
    }

    /// Ordered children of a tier
    pub fn children(&self, parent: &str) -> &[TierDescriptor] {
        self.children.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Children of the synthetic root
    pub fn top_level(&self) -> &[TierDescriptor] {
        &self.top_level
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
