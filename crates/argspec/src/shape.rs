//! The typed layout of a parse result, derived from a schema.

use std::fmt;

use crate::schema::{OptionSpec, PositionalSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKind {
    /// Arity-0 option: `bool`.
    Flag,
    /// Arity-1 option: one string.
    Single,
    /// Arity-N option: exactly N strings.
    Tuple(usize),
    /// Non-capturing positional: one string.
    Positional,
    /// Capturing positional: an owned, variable-length list of strings.
    Captured,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("bool"),
            Self::Single | Self::Positional => f.write_str("string"),
            Self::Tuple(n) => write!(f, "[string; {n}]"),
            Self::Captured => f.write_str("[string]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub name: String,
    pub kind: SlotKind,
}

/// One slot per option, then one per positional, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shape {
    slots: Vec<Slot>,
}

impl Shape {
    pub(crate) fn of(options: &[OptionSpec], positionals: &[PositionalSpec]) -> Self {
        let options = options.iter().map(|o| Slot {
            name: o.name.clone(),
            kind: match o.arity {
                0 => SlotKind::Flag,
                1 => SlotKind::Single,
                n => SlotKind::Tuple(n),
            },
        });
        let positionals = positionals.iter().map(|p| Slot {
            name: p.name.clone(),
            kind: if p.capture_remaining {
                SlotKind::Captured
            } else {
                SlotKind::Positional
            },
        });
        Self {
            slots: options.chain(positionals).collect(),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether both shapes hold the same slots, ignoring their order.
    pub fn matches_structure(&self, other: &Shape) -> bool {
        let mut a: Vec<&Slot> = self.slots.iter().collect();
        let mut b: Vec<&Slot> = other.slots.iter().collect();
        a.sort();
        b.sort();
        a == b
    }
}
