//! Fixed capacity history ring buffer

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A ring buffer holding the `capacity` most recently pushed items.
///
/// Storage is allocated once at construction. Pushing onto a full buffer
/// overwrites the oldest item in place, so both insertion and eviction are
/// O(1). Iteration is always oldest to newest.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    /// Item storage, never longer than `capacity`.
    items: Vec<T>,

    /// Index of the oldest item once the buffer is full, zero before then.
    head: usize,

    capacity: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("A history buffer must be able to hold at least one item")]
    ZeroCapacity,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> HistoryBuffer<T> {
    /// Create a new empty buffer which can hold `capacity` items.
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }

        Ok(Self {
            items: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        })
    }

    /// Push a new item, returning the evicted oldest item if the buffer was
    /// already full.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.items.len() < self.capacity {
            self.items.push(item);
            None
        }
        else {
            let evicted = std::mem::replace(&mut self.items[self.head], item);
            self.head = (self.head + 1) % self.capacity;
            Some(evicted)
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently pushed item.
    pub fn latest(&self) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }

        // The newest item sits just behind the head
        let idx = (self.head + self.items.len() - 1) % self.items.len();
        self.items.get(idx)
    }

    /// The oldest item still held.
    pub fn oldest(&self) -> Option<&T> {
        self.items.get(self.head)
    }

    /// Iterate over all items, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        let (newer, older) = self.items.split_at(self.head);
        ChainExact {
            inner: older.iter().chain(newer.iter()),
            remaining: self.items.len(),
        }
    }

    /// Iterate over the `n` most recent items, oldest first.
    ///
    /// If fewer than `n` items are held, all of them are returned.
    pub fn recent(&self, n: usize) -> impl DoubleEndedIterator<Item = &T> {
        let skip = self.items.len().saturating_sub(n);
        self.iter().skip(skip)
    }

    /// Remove all items, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
        self.head = 0;
    }
}

/// A chain of slice iterators with a known length.
struct ChainExact<I> {
    inner: I,
    remaining: usize,
}

impl<I: Iterator> Iterator for ChainExact<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.remaining -= 1;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I: DoubleEndedIterator> DoubleEndedIterator for ChainExact<I> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.inner.next_back();
        if item.is_some() {
            self.remaining -= 1;
        }
        item
    }
}

impl<I: Iterator> ExactSizeIterator for ChainExact<I> {}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn contents(buf: &HistoryBuffer<u32>) -> Vec<u32> {
        buf.iter().copied().collect()
    }

    #[test]
    fn test_zero_capacity() {
        assert!(matches!(
            HistoryBuffer::<u32>::new(0),
            Err(HistoryError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_eviction() {
        const K: usize = 4;
        let mut buf = HistoryBuffer::new(K).unwrap();

        for i in 0..K as u32 {
            assert_eq!(buf.push(i), None);
            assert!(buf.len() <= K);
        }
        assert!(buf.is_full());
        assert_eq!(contents(&buf), vec![0, 1, 2, 3]);

        // K + 1 insertions leave exactly the K most recent, in order
        assert_eq!(buf.push(4), Some(0));
        assert_eq!(buf.len(), K);
        assert_eq!(contents(&buf), vec![1, 2, 3, 4]);
        assert_eq!(buf.oldest(), Some(&1));
        assert_eq!(buf.latest(), Some(&4));

        // Keep going well past a full wrap
        for i in 5..23 {
            buf.push(i);
            assert_eq!(buf.len(), K);
        }
        assert_eq!(contents(&buf), vec![19, 20, 21, 22]);
        assert_eq!(buf.iter().len(), K);
        assert_eq!(buf.iter().rev().copied().collect::<Vec<_>>(), vec![22, 21, 20, 19]);
    }

    #[test]
    fn test_recent() {
        let mut buf = HistoryBuffer::new(5).unwrap();
        assert_eq!(buf.latest(), None);
        assert_eq!(buf.recent(3).count(), 0);

        for i in 0..7u32 {
            buf.push(i);
        }

        assert_eq!(buf.recent(3).copied().collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(buf.recent(10).copied().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);

        buf.clear();
        assert!(buf.is_empty());
        buf.push(9);
        assert_eq!(contents(&buf), vec![9]);
    }
}
