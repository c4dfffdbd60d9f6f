use std::collections::VecDeque;

/// Fixed-capacity FIFO window.
///
/// `push` is O(1): once the window is full the oldest element is evicted
/// before the new one is appended, so `len() <= capacity()` always holds.
#[derive(Clone, Debug)]
pub struct RollingWindow<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `value`, returning the evicted element if the window was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.values.len() >= self.capacity {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<T: Clone> RollingWindow<T> {
    /// Oldest-to-newest copy of the window contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.values.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_below_capacity() {
        let mut w = RollingWindow::new(3);
        w.push(1);
        w.push(2);

        assert_eq!(w.to_vec(), vec![1, 2]);
        assert!(!w.is_full());
        assert_eq!(w.latest(), Some(&2));
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut w = RollingWindow::new(3);
        assert_eq!(w.push(1), None);
        assert_eq!(w.push(2), None);
        assert_eq!(w.push(3), None);
        assert_eq!(w.push(4), Some(1));

        assert_eq!(w.to_vec(), vec![2, 3, 4]);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn clear_empties_window() {
        let mut w = RollingWindow::new(2);
        w.push("a");
        w.clear();

        assert!(w.is_empty());
        assert_eq!(w.latest(), None);
        assert_eq!(w.capacity(), 2);
    }

    #[test]
    fn zero_capacity_holds_one() {
        let mut w = RollingWindow::new(0);
        w.push(1);
        w.push(2);
        assert_eq!(w.to_vec(), vec![2]);
    }
}
