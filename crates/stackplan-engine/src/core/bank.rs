use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Deduplicating factory for value-identical boards and pieces.
///
/// Interning hands back the first instance seen for a value, so equal boards share one
/// allocation and one set of lazily computed column heights. It never changes results:
/// every consumer compares by value.
///
/// # Example
///
/// ```
/// use stackplan_engine::{Board, Dimensions, Interner};
///
/// let dims = Dimensions::new(10, 20).unwrap();
/// let mut bank = Interner::default();
/// let first = bank.intern(Board::from_ascii("#.......", dims));
/// let second = bank.intern(Board::from_ascii("#.......", dims));
/// assert_eq!(first, second);
/// assert_eq!(bank.len(), 1);
/// assert_eq!(bank.hits(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Interner<T> {
    values: FxHashSet<T>,
    hits: usize,
}

impl<T> Default for Interner<T> {
    fn default() -> Self {
        Self {
            values: FxHashSet::default(),
            hits: 0,
        }
    }
}

impl<T> Interner<T>
where
    T: Eq + Hash + Clone,
{
    /// Returns the shared instance equal to `value`, registering `value` if it is new.
    pub fn intern(&mut self, value: T) -> T {
        if let Some(existing) = self.values.get(&value) {
            self.hits += 1;
            return existing.clone();
        }
        self.values.insert(value.clone());
        value
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits
    }
}
