/*!
 * Structural fingerprint of a tier tree.
 *
 * Every tier contributes one character for its constraint kind; each child
 * subtree follows its parent's code wrapped in its own brackets. Traversal
 * starts at the synthetic document root, which contributes no code. Tier IDs
 * and names never appear, so documents with the same shape share a
 * fingerprint.
 */

use crate::eaf::hierarchy::TierHierarchy;
use crate::eaf::model::TierDescriptor;

/// Render the fingerprint of a hierarchy.
///
/// In lumped mode time subdivisions and inclusions are rendered as symbolic
/// subdivisions.
pub fn render(hierarchy: &TierHierarchy, lumped: bool) -> String {
    let mut out = String::new();
    render_children(hierarchy, hierarchy.top_level(), lumped, &mut out);
    out
}

fn render_children(hierarchy: &TierHierarchy, children: &[TierDescriptor], lumped: bool, out: &mut String) {
    for child in children {
        out.push('[');
        render_node(hierarchy, child, lumped, out);
        out.push(']');
    }
}

fn render_node(hierarchy: &TierHierarchy, node: &TierDescriptor, lumped: bool, out: &mut String) {
    out.push(node.constraint.code(lumped));
    render_children(hierarchy, hierarchy.children(&node.id), lumped, out);
}
