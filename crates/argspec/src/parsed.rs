//! Parse results: a name-keyed map of typed slot values.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::schema::Schema;

/// The value held by one result slot.
///
/// Strings borrow from the parsed argument vector (or from schema defaults).
/// The `Captured` list is the only owned storage and is released on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    Flag(bool),
    Single(&'a str),
    Tuple(Vec<&'a str>),
    Captured(Vec<&'a str>),
}

impl<'a> Value<'a> {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Self::Single(s) => Some(s),
            _ => None,
        }
    }

    /// All strings held by the slot; a single value is a one-element slice.
    pub fn as_slice(&self) -> &[&'a str] {
        match self {
            Self::Flag(_) => &[],
            Self::Single(s) => std::slice::from_ref(s),
            Self::Tuple(v) | Self::Captured(v) => v.as_slice(),
        }
    }
}

/// Parsed arguments, one entry per schema slot in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs<'a> {
    values: IndexMap<&'a str, Value<'a>>,
    seen: HashSet<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// Every slot at its declared default, or empty when none is declared.
    pub(crate) fn with_defaults(schema: &'a Schema) -> Self {
        let mut values = IndexMap::with_capacity(schema.shape().len());
        for opt in schema.options() {
            let default: Vec<&'a str> = match opt.get_default() {
                Some(d) => d.iter().map(String::as_str).collect(),
                None => vec![""; opt.get_arity()],
            };
            let value = match opt.get_arity() {
                0 => Value::Flag(false),
                1 => Value::Single(default[0]),
                _ => Value::Tuple(default),
            };
            values.insert(opt.name(), value);
        }
        for pos in schema.positionals() {
            let value = if pos.is_capturing() {
                Value::Captured(Vec::new())
            } else {
                Value::Single("")
            };
            values.insert(pos.name(), value);
        }
        Self {
            values,
            seen: HashSet::new(),
        }
    }

    pub(crate) fn set(&mut self, name: &'a str, value: Value<'a>) {
        self.values.insert(name, value);
    }

    pub(crate) fn mark_seen(&mut self, name: &'a str) {
        self.seen.insert(name);
    }

    /// The value of a flag; `false` for unknown names and non-flag slots.
    pub fn flag(&self, name: &str) -> bool {
        self.values
            .get(name)
            .and_then(Value::as_flag)
            .unwrap_or(false)
    }

    /// The value of a single-valued option or a non-capturing positional.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// All values of a slot (tuple options, captures, or a single value).
    pub fn get_all(&self, name: &str) -> Option<&[&'a str]> {
        self.values.get(name).map(Value::as_slice)
    }

    pub fn value(&self, name: &str) -> Option<&Value<'a>> {
        self.values.get(name)
    }

    /// Whether the slot was filled from argv rather than from a default.
    pub fn is_present(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &Value<'a>)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
