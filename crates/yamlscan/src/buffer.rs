//! Growable ring buffer shared by every queue, stack and byte buffer in the
//! scanner.
//!
//! Storage is a boxed slice addressed through a head index and a length;
//! logical offset `i` lives at physical slot `(head + i) % capacity`. Growth
//! reallocates and copies the live elements to the front of the new storage.
//!
//! Invariants:
//! - `len <= storage.len()` and `head < storage.len()`.
//! - Slots outside the live range hold `T::default()`.
//!
//! `pop`/`peek` on an empty buffer and out-of-range offsets are programming
//! faults and panic.

use alloc::{boxed::Box, vec::Vec};
use core::mem;

use tracing::debug;

use crate::{options::GrowthPolicy, source::ByteSource};

#[derive(Debug)]
pub(crate) struct RingBuffer<T> {
    storage: Box<[T]>,
    head: usize,
    len: usize,
    growth: GrowthPolicy,
}

impl<T: Default> RingBuffer<T> {
    pub(crate) fn new(growth: GrowthPolicy) -> Self {
        Self::with_capacity(growth.initial_capacity, growth)
    }

    pub(crate) fn with_capacity(capacity: usize, growth: GrowthPolicy) -> Self {
        Self {
            storage: allocate(capacity.max(1)),
            head: 0,
            len: 0,
            growth,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.storage.len()
    }

    fn free(&self) -> usize {
        self.capacity() - self.len
    }

    #[inline]
    fn physical(&self, offset: usize) -> usize {
        let slot = self.head + offset;
        if slot >= self.capacity() {
            slot - self.capacity()
        } else {
            slot
        }
    }

    pub(crate) fn push(&mut self, value: T) {
        self.reserve(1);
        let slot = self.physical(self.len);
        self.storage[slot] = value;
        self.len += 1;
    }

    pub(crate) fn pop(&mut self) -> T {
        assert!(!self.is_empty(), "pop on an empty ring buffer");
        let value = mem::take(&mut self.storage[self.head]);
        self.head = self.physical(1);
        self.len -= 1;
        value
    }

    pub(crate) fn pop_back(&mut self) -> T {
        assert!(!self.is_empty(), "pop_back on an empty ring buffer");
        self.len -= 1;
        let slot = self.physical(self.len);
        mem::take(&mut self.storage[slot])
    }

    pub(crate) fn peek(&self) -> &T {
        self.peek_at(0)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &T {
        assert!(
            offset < self.len,
            "offset {offset} out of range for ring buffer of length {}",
            self.len
        );
        &self.storage[self.physical(offset)]
    }

    pub(crate) fn peek_back(&self) -> &T {
        assert!(!self.is_empty(), "peek_back on an empty ring buffer");
        self.peek_at(self.len - 1)
    }

    pub(crate) fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        if offset < self.len {
            let slot = self.physical(offset);
            Some(&mut self.storage[slot])
        } else {
            None
        }
    }

    /// Drops the first `n` elements.
    pub(crate) fn skip(&mut self, n: usize) {
        assert!(
            n <= self.len,
            "cannot skip {n} elements of a ring buffer of length {}",
            self.len
        );
        for offset in 0..n {
            let slot = self.physical(offset);
            self.storage[slot] = T::default();
        }
        self.head = self.physical(n);
        self.len -= n;
    }

    pub(crate) fn clear(&mut self) {
        self.skip(self.len);
        self.head = 0;
    }

    /// Inserts `value` so that it ends up at logical `offset`.
    pub(crate) fn insert(&mut self, offset: usize, value: T) {
        assert!(
            offset <= self.len,
            "insert offset {offset} out of range for ring buffer of length {}",
            self.len
        );
        self.push(value);
        let mut index = self.len - 1;
        while index > offset {
            let (a, b) = (self.physical(index), self.physical(index - 1));
            self.storage.swap(a, b);
            index -= 1;
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).map(move |offset| &self.storage[self.physical(offset)])
    }

    /// Makes room for `additional` more elements.
    pub(crate) fn reserve(&mut self, additional: usize) {
        let required = self.len + additional;
        if required <= self.capacity() {
            return;
        }
        let scaled = self
            .capacity()
            .saturating_mul(self.growth.scale_factor.max(1));
        let target = required.max(scaled).min(self.growth.max_capacity);
        assert!(
            target >= required,
            "ring buffer cannot grow past its maximum capacity of {} elements",
            self.growth.max_capacity
        );
        debug!(from = self.capacity(), to = target, "growing ring buffer");

        let mut storage = allocate(target);
        for (offset, slot) in storage.iter_mut().take(self.len).enumerate() {
            let old = self.physical(offset);
            *slot = mem::take(&mut self.storage[old]);
        }
        self.storage = storage;
        self.head = 0;
    }
}

impl RingBuffer<u8> {
    /// Reads from `source` into the free space, tail region first and then
    /// the wrapped region in front of the head.
    ///
    /// Returns the number of bytes read, or `None` when the very first read
    /// reports end of input.
    pub(crate) fn fill<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Option<usize> {
        let mut total = 0;
        while self.free() > 0 {
            let tail = self.physical(self.len);
            let end = if tail < self.head {
                self.head
            } else {
                self.capacity()
            };
            let wanted = end - tail;
            match source.fill(&mut self.storage[..], tail, wanted) {
                None if total == 0 => return None,
                None | Some(0) => break,
                Some(read) => {
                    debug_assert!(read <= wanted, "byte source overran its window");
                    let read = read.min(wanted);
                    self.len += read;
                    total += read;
                    if read < wanted {
                        break;
                    }
                }
            }
        }
        Some(total)
    }
}

fn allocate<T: Default>(capacity: usize) -> Box<[T]> {
    let mut storage = Vec::with_capacity(capacity);
    storage.resize_with(capacity, T::default);
    storage.into_boxed_slice()
}
