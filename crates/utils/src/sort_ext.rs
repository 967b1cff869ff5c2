use std::collections::{BTreeSet, HashSet};

/// Extension trait for pulling ordered id lists out of set types
pub trait SortExt<T> {
    /// Collect the contents into an ascending vector
    ///
    /// ```rust
    /// # use fetools_utils::SortExt;
    /// # use std::collections::HashSet;
    /// let ids: HashSet<u32> = [30, 10, 20].into_iter().collect();
    /// assert_eq!(ids.ascending(), vec![10, 20, 30]);
    /// ```
    fn ascending(&self) -> Vec<T>;
}

impl<T: Ord + Copy> SortExt<T> for HashSet<T> {
    fn ascending(&self) -> Vec<T> {
        let mut values: Vec<T> = self.iter().copied().collect();
        values.sort_unstable();
        values
    }
}

impl<T: Ord + Copy> SortExt<T> for BTreeSet<T> {
    fn ascending(&self) -> Vec<T> {
        self.iter().copied().collect()
    }
}
