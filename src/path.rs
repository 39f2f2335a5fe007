//! Location tracking for values inside nested request structures.
//!
//! This module provides [`Path`] and [`PathComponent`]. A `Path` is a mutable
//! stack that the validation engines push onto while descending into a value
//! and pop from on the way back out, so that every reported error carries the
//! exact location it was found at (e.g. `body.bar[0][1].baz`).

use std::fmt::{self, Display};

/// A single segment of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathComponent {
    /// A property access (e.g. `user`, `email`).
    Property(String),
    /// An array position (e.g. `[0]`, `[42]`).
    Index(usize),
}

impl PathComponent {
    /// Creates a new property component.
    pub fn property(name: impl Into<String>) -> Self {
        PathComponent::Property(name.into())
    }

    /// Creates a new index component.
    pub fn index(idx: usize) -> Self {
        PathComponent::Index(idx)
    }

    /// Returns true if this is an index component.
    pub fn is_index(&self) -> bool {
        matches!(self, PathComponent::Index(_))
    }
}

impl Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Quote names containing a dot so the rendered path stays unambiguous.
            PathComponent::Property(name) if name.contains('.') => write!(f, ".\"{}\"", name),
            PathComponent::Property(name) => write!(f, ".{}", name),
            PathComponent::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// Errors raised by invalid path manipulation.
///
/// These indicate a bug in the caller, not bad input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Attempted to pop more components than the path holds.
    #[error("cannot pop {requested} component(s) from a path of length {len}")]
    Empty { requested: usize, len: usize },
}

/// An ordered stack of path components.
///
/// Cloning a `Path` produces an independent snapshot that shares no state with
/// the original, which is how a computation branches without disturbing the
/// caller's in-progress path.
///
/// # Example
///
/// ```rust
/// use reqschema::{Path, PathComponent};
///
/// let mut path = Path::new();
/// path.push(PathComponent::property("foo"));
/// path.push(PathComponent::index(1));
/// path.push(PathComponent::property("bar"));
/// assert_eq!(path.to_string(), "foo[1].bar");
///
/// path.pop().unwrap();
/// assert_eq!(path.to_string(), "foo[1]");
/// assert_eq!(path.current_index_suffix().to_string(), "[1]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    components: Vec<PathComponent>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path from a single property component.
    pub fn from_property(name: impl Into<String>) -> Self {
        Self {
            components: vec![PathComponent::Property(name.into())],
        }
    }

    /// Appends a component.
    pub fn push(&mut self, component: PathComponent) {
        self.components.push(component);
    }

    /// Removes and returns the last component.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] if the path has no components.
    pub fn pop(&mut self) -> Result<PathComponent, PathError> {
        self.components.pop().ok_or(PathError::Empty {
            requested: 1,
            len: 0,
        })
    }

    /// Appends several components, preserving their order.
    pub fn push_many<I>(&mut self, components: I)
    where
        I: IntoIterator<Item = PathComponent>,
    {
        self.components.extend(components);
    }

    /// Removes the last `n` components and returns them in pop order
    /// (last component first).
    ///
    /// The path is left untouched when it holds fewer than `n` components.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] if fewer than `n` components exist.
    pub fn pop_many(&mut self, n: usize) -> Result<Vec<PathComponent>, PathError> {
        let len = self.components.len();
        if n > len {
            return Err(PathError::Empty { requested: n, len });
        }
        let mut popped = self.components.split_off(len - n);
        popped.reverse();
        Ok(popped)
    }

    /// Runs `f` with a property component pushed, popping it afterwards.
    pub fn with_property<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(PathComponent::property(name), f)
    }

    /// Runs `f` with an index component pushed, popping it afterwards.
    pub fn with_index<R>(&mut self, idx: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(PathComponent::Index(idx), f)
    }

    fn scoped<R>(&mut self, component: PathComponent, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.components.len();
        self.components.push(component);
        let result = f(self);
        self.truncate(depth);
        result
    }

    /// Drops every component past `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.components.truncate(len);
    }

    /// Returns the maximal run of index components at the end of the path.
    ///
    /// For `body.bar[0][1]` this is `[0][1]`; for `body.bar` it is empty.
    pub fn current_index_suffix(&self) -> Path {
        let start = self
            .components
            .iter()
            .rposition(|c| !c.is_index())
            .map_or(0, |pos| pos + 1);
        Self {
            components: self.components[start..].to_vec(),
        }
    }

    /// Returns the number of components in this path.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if this path has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns an iterator over the components.
    pub fn components(&self) -> impl Iterator<Item = &PathComponent> {
        self.components.iter()
    }

    /// Returns the last component, or None if the path is empty.
    pub fn last(&self) -> Option<&PathComponent> {
        self.components.last()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: String = self.components.iter().map(|c| c.to_string()).collect();
        f.write_str(rendered.strip_prefix('.').unwrap_or(&rendered))
    }
}

impl FromIterator<PathComponent> for Path {
    fn from_iter<I: IntoIterator<Item = PathComponent>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}
