//! FIFO queue and LIFO stack over [`RingBuffer`].

use crate::{buffer::RingBuffer, options::GrowthPolicy};

/// First-in first-out queue; used for pending tokens and warnings.
#[derive(Debug)]
pub(crate) struct Queue<T> {
    ring: RingBuffer<Option<T>>,
}

impl<T> Queue<T> {
    pub(crate) fn new(growth: GrowthPolicy) -> Self {
        Self {
            ring: RingBuffer::new(growth),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ring.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub(crate) fn push(&mut self, value: T) {
        self.ring.push(Some(value));
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.ring.is_empty() {
            None
        } else {
            self.ring.pop()
        }
    }

    /// Inserts `value` at position `index` counted from the front.
    pub(crate) fn insert(&mut self, index: usize, value: T) {
        self.ring.insert(index, Some(value));
    }
}

/// Last-in first-out stack; used for flow levels, block indentation and
/// implicit key candidates.
#[derive(Debug)]
pub(crate) struct Stack<T> {
    ring: RingBuffer<Option<T>>,
}

impl<T> Stack<T> {
    pub(crate) fn new(growth: GrowthPolicy) -> Self {
        Self {
            ring: RingBuffer::new(growth),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ring.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub(crate) fn push(&mut self, value: T) {
        self.ring.push(Some(value));
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.ring.is_empty() {
            None
        } else {
            self.ring.pop_back()
        }
    }

    pub(crate) fn top(&self) -> Option<&T> {
        if self.ring.is_empty() {
            None
        } else {
            self.ring.peek_back().as_ref()
        }
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut T> {
        let last = self.ring.len().checked_sub(1)?;
        self.ring.get_mut(last)?.as_mut()
    }

    /// Element `index` counted from the bottom.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.ring.get_mut(index)?.as_mut()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.ring.iter().filter_map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use super::*;

    #[test]
    fn queue_is_fifo_with_positional_insert() {
        let mut queue = Queue::new(GrowthPolicy::default());
        queue.push(String::from("b"));
        queue.push(String::from("d"));
        queue.insert(0, String::from("a"));
        queue.insert(2, String::from("c"));
        assert_eq!(queue.len(), 4);
        let drained: Vec<_> = core::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(drained, ["a", "b", "c", "d"]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn stack_is_lifo() {
        let mut stack = Stack::new(GrowthPolicy {
            initial_capacity: 1,
            ..Default::default()
        });
        for value in 0..5 {
            stack.push(value);
        }
        assert_eq!(stack.top(), Some(&4));
        if let Some(top) = stack.top_mut() {
            *top = 40;
        }
        if let Some(bottom) = stack.get_mut(0) {
            *bottom = 10;
        }
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), [10, 1, 2, 3, 40]);
        assert_eq!(stack.pop(), Some(40));
        assert_eq!(stack.len(), 4);
        while stack.pop().is_some() {}
        assert!(stack.is_empty());
        assert!(stack.top_mut().is_none());
    }
}
