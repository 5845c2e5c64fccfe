//! Phase identifiers and phase tables.
//!
//! Games organize play into named phases. A phase table may be *flat*
//! (every phase is a leaf) or a *tree* (phases nest inside parent
//! phases). Only leaf phases are ever current; ancestry matters when a
//! move declares it is legal in a parent phase.
//!
//! The engine never interprets phase IDs beyond the table - games assign
//! meaning when they build their `PhaseEnum`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Opaque phase identifier. Games define their own phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseId(pub u32);

impl PhaseId {
    /// Create a new phase ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Phase({})", self.0)
    }
}

/// Named phase table, flat or tree-shaped.
///
/// Built once at game setup with the `add_phase`/`add_subphase`
/// builders. Adding any subphase turns the table into a tree; leaf
/// queries and ancestor chains then drive phase-legality checks.
///
/// ## Example
///
/// ```
/// use rust_tbg::core::{PhaseEnum, PhaseId};
///
/// let main = PhaseId::new(0);
/// let draw = PhaseId::new(1);
/// let discard = PhaseId::new(2);
///
/// let phases = PhaseEnum::new()
///     .add_phase(main, "Main")
///     .add_subphase(draw, "Draw", main)
///     .add_subphase(discard, "Discard", main);
///
/// assert!(phases.is_tree());
/// assert!(phases.is_leaf(draw));
/// assert!(!phases.is_leaf(main));
/// assert_eq!(phases.ancestors(draw), vec![main, draw]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PhaseEnum {
    names: FxHashMap<PhaseId, String>,
    parents: FxHashMap<PhaseId, PhaseId>,
    /// Insertion order, kept for stable iteration in diagnostics.
    order: Vec<PhaseId>,
}

impl PhaseEnum {
    /// Create an empty phase table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level phase.
    ///
    /// Panics if the ID is already present; phase tables are built in
    /// game-setup code where a duplicate is a programming error.
    #[must_use]
    pub fn add_phase(mut self, id: PhaseId, name: impl Into<String>) -> Self {
        let prior = self.names.insert(id, name.into());
        assert!(prior.is_none(), "Duplicate phase id {id}");
        self.order.push(id);
        self
    }

    /// Add a phase nested under `parent`.
    ///
    /// Panics if the ID is already present or the parent is unknown.
    #[must_use]
    pub fn add_subphase(mut self, id: PhaseId, name: impl Into<String>, parent: PhaseId) -> Self {
        assert!(
            self.names.contains_key(&parent),
            "Unknown parent phase {parent}"
        );
        let prior = self.names.insert(id, name.into());
        assert!(prior.is_none(), "Duplicate phase id {id}");
        self.parents.insert(id, parent);
        self.order.push(id);
        self
    }

    /// Whether this table contains the given phase.
    #[must_use]
    pub fn contains(&self, id: PhaseId) -> bool {
        self.names.contains_key(&id)
    }

    /// Whether any phase nests inside another.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Whether the given phase has no children.
    ///
    /// Unknown phases report as leaves; a flat table is all leaves.
    #[must_use]
    pub fn is_leaf(&self, id: PhaseId) -> bool {
        !self.parents.values().any(|&parent| parent == id)
    }

    /// The parent of a phase, if it has one.
    #[must_use]
    pub fn parent(&self, id: PhaseId) -> Option<PhaseId> {
        self.parents.get(&id).copied()
    }

    /// The ancestor chain of a phase, root first and self-inclusive.
    ///
    /// An unknown or top-level phase yields just itself.
    #[must_use]
    pub fn ancestors(&self, id: PhaseId) -> Vec<PhaseId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// The registered name of a phase.
    #[must_use]
    pub fn name(&self, id: PhaseId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// A display name for error messages: the registered name, or the
    /// numeric form for phases outside the table.
    #[must_use]
    pub fn display_name(&self, id: PhaseId) -> String {
        match self.name(id) {
            Some(name) => name.to_string(),
            None => id.to_string(),
        }
    }

    /// Iterate over phases in registration order.
    pub fn phases(&self) -> impl Iterator<Item = PhaseId> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_id() {
        let phase = PhaseId::new(5);
        assert_eq!(phase.raw(), 5);
        assert_eq!(format!("{}", phase), "Phase(5)");

        let default = PhaseId::default();
        assert_eq!(default.0, 0);
    }

    #[test]
    fn test_flat_table() {
        let phases = PhaseEnum::new()
            .add_phase(PhaseId::new(0), "Setup")
            .add_phase(PhaseId::new(1), "Play");

        assert!(!phases.is_tree());
        assert!(phases.is_leaf(PhaseId::new(0)));
        assert!(phases.is_leaf(PhaseId::new(1)));
        assert_eq!(phases.ancestors(PhaseId::new(1)), vec![PhaseId::new(1)]);
        assert_eq!(phases.name(PhaseId::new(0)), Some("Setup"));
    }

    #[test]
    fn test_tree_table() {
        let root = PhaseId::new(0);
        let left = PhaseId::new(1);
        let right = PhaseId::new(2);
        let deep = PhaseId::new(3);

        let phases = PhaseEnum::new()
            .add_phase(root, "Root")
            .add_subphase(left, "Left", root)
            .add_subphase(right, "Right", root)
            .add_subphase(deep, "Deep", right);

        assert!(phases.is_tree());
        assert!(!phases.is_leaf(root));
        assert!(phases.is_leaf(left));
        assert!(!phases.is_leaf(right));
        assert!(phases.is_leaf(deep));

        assert_eq!(phases.parent(deep), Some(right));
        assert_eq!(phases.ancestors(deep), vec![root, right, deep]);
        assert_eq!(phases.ancestors(left), vec![root, left]);
        assert_eq!(phases.ancestors(root), vec![root]);
    }

    #[test]
    fn test_display_name_falls_back_to_numeric() {
        let phases = PhaseEnum::new().add_phase(PhaseId::new(0), "Setup");

        assert_eq!(phases.display_name(PhaseId::new(0)), "Setup");
        assert_eq!(phases.display_name(PhaseId::new(9)), "Phase(9)");
    }

    #[test]
    #[should_panic(expected = "Duplicate phase id")]
    fn test_duplicate_phase_panics() {
        let _ = PhaseEnum::new()
            .add_phase(PhaseId::new(0), "A")
            .add_phase(PhaseId::new(0), "B");
    }

    #[test]
    #[should_panic(expected = "Unknown parent phase")]
    fn test_unknown_parent_panics() {
        let _ = PhaseEnum::new().add_subphase(PhaseId::new(1), "A", PhaseId::new(0));
    }

    #[test]
    fn test_registration_order() {
        let phases = PhaseEnum::new()
            .add_phase(PhaseId::new(3), "C")
            .add_phase(PhaseId::new(1), "A");

        let order: Vec<_> = phases.phases().collect();
        assert_eq!(order, vec![PhaseId::new(3), PhaseId::new(1)]);
    }
}
