//! Component stacks: ordered collections the move templates operate on.
//!
//! Stacks come in two shapes:
//! - **Sized**: a fixed number of slots, each possibly empty. Removing a
//!   component leaves a gap; inserting fills the first free slot.
//! - **Growable**: unbounded, dense. Removing a component compacts the
//!   stack; inserting appends.
//!
//! The component-moving templates only ever touch the *first occupied
//! slot* of a source and the *first free slot* of a destination, so both
//! shapes share one `Stack` type.

use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;

/// Opaque component identifier.
///
/// The engine doesn't interpret components - games assign meaning
/// (card faces, tokens, dice) outside the move core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl ComponentId {
    /// Create a new component ID.
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

/// Errors from stack operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// The source stack had no components to take.
    #[error("stack has no components")]
    Empty,
    /// The destination stack had no free slot.
    #[error("stack has no free slots")]
    Full,
}

/// An ordered collection of components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    slots: Vec<Option<ComponentId>>,
    sized: bool,
}

impl Stack {
    /// Create a growable stack with no components.
    #[must_use]
    pub fn growable() -> Self {
        Self {
            slots: Vec::new(),
            sized: false,
        }
    }

    /// Create a sized stack with `slot_count` empty slots.
    #[must_use]
    pub fn sized(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
            sized: true,
        }
    }

    /// Create a growable stack seeded with the given components.
    #[must_use]
    pub fn with_components(components: impl IntoIterator<Item = ComponentId>) -> Self {
        Self {
            slots: components.into_iter().map(Some).collect(),
            sized: false,
        }
    }

    /// Whether this stack has a fixed slot count.
    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.sized
    }

    /// Number of components currently in the stack.
    #[must_use]
    pub fn num_components(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether the stack holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of slots a new component could occupy.
    ///
    /// Growable stacks report `usize::MAX`.
    #[must_use]
    pub fn slots_remaining(&self) -> usize {
        if self.sized {
            self.slots.iter().filter(|slot| slot.is_none()).count()
        } else {
            usize::MAX
        }
    }

    /// Whether at least one slot is free.
    #[must_use]
    pub fn has_slot(&self) -> bool {
        self.slots_remaining() > 0
    }

    /// The component in the first occupied slot.
    #[must_use]
    pub fn first(&self) -> Option<ComponentId> {
        self.slots.iter().flatten().next().copied()
    }

    /// Index of the first occupied slot.
    #[must_use]
    pub fn first_component_index(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_some)
    }

    /// Index of the first free slot. `None` for a full sized stack;
    /// for growable stacks this is the append position.
    #[must_use]
    pub fn first_slot_index(&self) -> Option<usize> {
        if self.sized {
            self.slots.iter().position(Option::is_none)
        } else {
            Some(self.slots.len())
        }
    }

    /// Insert a component into the first free slot.
    pub fn insert_next_slot(&mut self, component: ComponentId) -> Result<(), StackError> {
        if self.sized {
            let index = self.first_slot_index().ok_or(StackError::Full)?;
            self.slots[index] = Some(component);
        } else {
            self.slots.push(Some(component));
        }
        Ok(())
    }

    /// Remove and return the component in the first occupied slot.
    ///
    /// Sized stacks leave a gap; growable stacks compact.
    pub fn remove_first(&mut self) -> Result<ComponentId, StackError> {
        let index = self.first_component_index().ok_or(StackError::Empty)?;
        let taken = if self.sized {
            self.slots[index].take()
        } else {
            self.slots.remove(index)
        };
        taken.ok_or(StackError::Empty)
    }

    /// Shuffle the slot order in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.slots);
    }

    /// Iterate over the components in slot order.
    pub fn components(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.slots.iter().flatten().copied()
    }
}

/// Move one component from the first occupied slot of `source` to the
/// first free slot of `destination`.
///
/// The destination is checked before the source is disturbed, so a
/// failed move leaves both stacks unchanged.
pub fn move_component(source: &mut Stack, destination: &mut Stack) -> Result<(), StackError> {
    if source.is_empty() {
        return Err(StackError::Empty);
    }
    if !destination.has_slot() {
        return Err(StackError::Full);
    }
    let component = source.remove_first()?;
    destination.insert_next_slot(component)
}
