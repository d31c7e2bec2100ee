use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Owner of the working array for a run.
///
/// The store has no business logic: it hands out values, applies writes and
/// swaps, and reports its size. It is shared between the engine (which
/// replaces the contents between runs) and the active runner (which mutates
/// it in place) through an `Arc<ArrayStore>`. No lock guard ever escapes a
/// method, which keeps runner futures `Send`.
///
/// Out-of-range access is a programming error in the runner and panics.
#[derive(Debug, Default)]
pub struct ArrayStore {
    values: RwLock<Vec<i64>>,
}

impl ArrayStore {
    /// Create a store holding `values`
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    // A failed bounds assertion poisons the lock; the contents are still
    // consistent because the assertion fires before any write.
    fn read(&self) -> RwLockReadGuard<'_, Vec<i64>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<i64>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole contents.
    ///
    /// Callers must make sure no runner is active; the engine enforces this
    /// through the run state before calling.
    pub fn replace(&self, values: Vec<i64>) {
        *self.write() = values;
    }

    /// Value at index `i`
    pub fn get(&self, i: usize) -> i64 {
        let values = self.read();
        assert!(
            i < values.len(),
            "array index {} out of bounds (size {})",
            i,
            values.len()
        );
        values[i]
    }

    /// Overwrite index `i`
    pub fn set(&self, i: usize, value: i64) {
        let mut values = self.write();
        assert!(
            i < values.len(),
            "array index {} out of bounds (size {})",
            i,
            values.len()
        );
        values[i] = value;
    }

    /// Exchange the values at `i` and `j`
    pub fn swap(&self, i: usize, j: usize) {
        let mut values = self.write();
        let len = values.len();
        assert!(
            i < len && j < len,
            "swap ({}, {}) out of bounds (size {})",
            i,
            j,
            len
        );
        values.swap(i, j);
    }

    pub fn size(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Copy of `[left, right]` (inclusive)
    pub fn range(&self, left: usize, right: usize) -> Vec<i64> {
        self.read()[left..=right].to_vec()
    }

    /// Copy of the whole array
    pub fn snapshot(&self) -> Vec<i64> {
        self.read().clone()
    }

    /// True when the contents are non-decreasing
    pub fn is_sorted(&self) -> bool {
        is_sorted(&self.read())
    }

    /// Sort the contents ascending in one step
    pub fn sort_ascending(&self) {
        self.write().sort_unstable();
    }
}

/// True when `values` is non-decreasing
pub fn is_sorted(values: &[i64]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}
