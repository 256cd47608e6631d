//! Fixed-capacity list of the largest keys seen so far.

/// Keeps at most `capacity` items, sorted descending by key
///
/// Ties keep insertion order: an item that arrives later with the same key
/// ranks after the earlier one and is rejected outright once the list is
/// full and the key equals the admission threshold.
#[derive(Debug, Clone)]
pub struct BoundedTopK<T> {
    capacity: usize,
    entries: Vec<(f64, T)>,
}

impl<T> BoundedTopK<T> {
    /// Create an empty container
    ///
    /// `capacity` must be at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Smallest key a candidate must strictly exceed once full
    ///
    /// 0 while under capacity.
    pub fn threshold(&self) -> f64 {
        if self.is_full() {
            self.entries.last().map(|(key, _)| *key).unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Offer a candidate; returns whether it was admitted
    pub fn offer(&mut self, key: f64, item: T) -> bool {
        if self.is_full() && key <= self.threshold() {
            return false;
        }

        let position = self.entries.partition_point(|(existing, _)| *existing >= key);
        self.entries.insert(position, (key, item));

        if self.entries.len() > self.capacity {
            self.entries.pop();
        }
        true
    }

    /// Iterate (key, item) pairs in rank order
    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> {
        self.entries.iter().map(|(key, item)| (*key, item))
    }

    /// Consume into (key, item) pairs in rank order
    pub fn into_sorted_vec(self) -> Vec<(f64, T)> {
        self.entries
    }
}
