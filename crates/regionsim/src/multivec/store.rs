//! Packed multi-sequence storage.
//!
//! One `Vec<T>` holds every sequence back to back, ordered by `SeqId`. Each live
//! sequence owns the half-open range `[begin, begin + len)`. Structural edits on
//! sequence `k` splice the backing vector and shift the `begin` of every
//! sequence with a larger id by the element-count delta.
//!
//! Policy
//! - Unknown ids and out-of-range positions are silent no-ops. Mutators return
//!   `bool` ("applied"), readers return `Option`.
//! - Absolute offsets are not stable across mutations of other sequences;
//!   always resolve through the id.

use std::ops::Range;

/// Identifier of one logical sequence. Monotonic and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeqId(pub u64);

#[derive(Clone, Copy, Debug)]
struct Span {
    id: SeqId,
    begin: usize,
    len: usize,
}

impl Span {
    #[inline]
    fn end(&self) -> usize {
        self.begin + self.len
    }
}

/// Many independently growable sequences sharing one contiguous buffer.
#[derive(Clone, Debug)]
pub struct MultiVecStore<T> {
    data: Vec<T>,
    spans: Vec<Span>, // sorted by id, hence by begin
    next_id: u64,
}

impl<T> Default for MultiVecStore<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> MultiVecStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Append a zero-length sequence at the end of the buffer.
    pub fn acquire(&mut self) -> SeqId {
        let id = SeqId(self.next_id);
        self.next_id += 1;
        self.spans.push(Span {
            id,
            begin: self.data.len(),
            len: 0,
        });
        tracing::debug!(seq = id.0, live = self.spans.len(), "acquire sequence");
        id
    }

    /// Clear the sequence and drop its record. Returns false for unknown ids.
    pub fn release(&mut self, id: SeqId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        self.clear(id);
        self.spans.remove(slot);
        tracing::debug!(seq = id.0, live = self.spans.len(), "release sequence");
        true
    }

    #[inline]
    fn slot(&self, id: SeqId) -> Option<usize> {
        self.spans.binary_search_by_key(&id, |s| s.id).ok()
    }

    /// Shift every span after `slot` by `delta` elements.
    fn shift_after(&mut self, slot: usize, delta: isize) {
        for s in &mut self.spans[slot + 1..] {
            s.begin = s.begin.wrapping_add_signed(delta);
        }
    }

    pub fn contains(&self, id: SeqId) -> bool {
        self.slot(id).is_some()
    }

    pub fn len(&self, id: SeqId) -> Option<usize> {
        self.slot(id).map(|k| self.spans[k].len)
    }

    pub fn is_empty(&self, id: SeqId) -> Option<bool> {
        self.len(id).map(|n| n == 0)
    }

    /// Current absolute range of the sequence inside the flat buffer.
    pub fn span(&self, id: SeqId) -> Option<Range<usize>> {
        self.slot(id).map(|k| self.spans[k].begin..self.spans[k].end())
    }

    /// Number of live sequences.
    pub fn sequence_count(&self) -> usize {
        self.spans.len()
    }

    /// Live sequence ids in buffer order.
    pub fn ids(&self) -> impl Iterator<Item = SeqId> + '_ {
        self.spans.iter().map(|s| s.id)
    }

    /// Total number of stored elements across all sequences.
    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    /// The whole backing buffer, e.g. for a single bulk upload.
    pub fn as_flat_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_slice(&self, id: SeqId) -> Option<&[T]> {
        let k = self.slot(id)?;
        let s = self.spans[k];
        Some(&self.data[s.begin..s.end()])
    }

    pub fn as_mut_slice(&mut self, id: SeqId) -> Option<&mut [T]> {
        let k = self.slot(id)?;
        let s = self.spans[k];
        Some(&mut self.data[s.begin..s.end()])
    }

    pub fn get(&self, id: SeqId, idx: usize) -> Option<&T> {
        self.as_slice(id)?.get(idx)
    }

    pub fn get_mut(&mut self, id: SeqId, idx: usize) -> Option<&mut T> {
        self.as_mut_slice(id)?.get_mut(idx)
    }

    /// Overwrite element `idx`. No-op when out of range.
    pub fn set(&mut self, id: SeqId, idx: usize, value: T) -> bool {
        match self.get_mut(id, idx) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Insert before position `pos` (`pos == len` appends).
    pub fn insert(&mut self, id: SeqId, pos: usize, value: T) -> bool {
        let Some(k) = self.slot(id) else {
            return false;
        };
        let s = self.spans[k];
        if pos > s.len {
            return false;
        }
        self.data.insert(s.begin + pos, value);
        self.spans[k].len += 1;
        self.shift_after(k, 1);
        true
    }

    /// Insert the values (in order) before position `pos`.
    pub fn insert_slice(&mut self, id: SeqId, pos: usize, values: &[T]) -> bool
    where
        T: Clone,
    {
        let Some(k) = self.slot(id) else {
            return false;
        };
        let s = self.spans[k];
        if pos > s.len {
            return false;
        }
        if values.is_empty() {
            return true;
        }
        let at = s.begin + pos;
        self.data.splice(at..at, values.iter().cloned());
        self.spans[k].len += values.len();
        self.shift_after(k, values.len() as isize);
        true
    }

    pub fn push(&mut self, id: SeqId, value: T) -> bool {
        match self.len(id) {
            Some(n) => self.insert(id, n, value),
            None => false,
        }
    }

    pub fn extend_from_slice(&mut self, id: SeqId, values: &[T]) -> bool
    where
        T: Clone,
    {
        match self.len(id) {
            Some(n) => self.insert_slice(id, n, values),
            None => false,
        }
    }

    pub fn pop(&mut self, id: SeqId) -> Option<T> {
        let k = self.slot(id)?;
        let s = self.spans[k];
        if s.len == 0 {
            return None;
        }
        let v = self.data.remove(s.end() - 1);
        self.spans[k].len -= 1;
        self.shift_after(k, -1);
        Some(v)
    }

    /// Remove the element at `pos`.
    pub fn erase(&mut self, id: SeqId, pos: usize) -> bool {
        self.erase_range(id, pos, 1)
    }

    /// Remove `count` elements starting at `pos`. The whole range must fit.
    pub fn erase_range(&mut self, id: SeqId, pos: usize, count: usize) -> bool {
        let Some(k) = self.slot(id) else {
            return false;
        };
        let s = self.spans[k];
        match pos.checked_add(count) {
            Some(stop) if stop <= s.len => {}
            _ => return false,
        }
        if count == 0 {
            return true;
        }
        let at = s.begin + pos;
        self.data.drain(at..at + count);
        self.spans[k].len -= count;
        self.shift_after(k, -(count as isize));
        true
    }

    pub fn clear(&mut self, id: SeqId) -> bool {
        match self.len(id) {
            Some(n) => self.erase_range(id, 0, n),
            None => false,
        }
    }
}
