// This file is part of Quill.

// Quill is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Quill is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use thiserror::Error;

use crate::{iter::BufferIter, utf8};

/// Granularity of backing storage sizes. Construction rounds capacity up to a multiple of this.
pub const CAPACITY_TIER: usize = 4096;

/// Errors reported by [GapBuffer] operations.
///
/// A failed operation leaves the buffer unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GapError {
    /// An insert was larger than the remaining gap. The buffer does not grow implicitly; a
    /// rejected insert leaves the document length untouched.
    #[error("insert of {requested} bytes exceeds remaining gap of {available} bytes")]
    InsufficientCapacity {
        /// Bytes the operation needed.
        requested: usize,
        /// Bytes the gap had available.
        available: usize,
    },
    /// A slice was requested with `begin > end` or `end` past the logical length.
    #[error("range {begin}..{end} is invalid for content of length {len}")]
    InvalidRange {
        /// Requested range start.
        begin: usize,
        /// Requested range end, exclusive.
        end: usize,
        /// Logical length of the buffer at the time of the request.
        len: usize,
    },
}

/// Which side of the cursor a rune deletion consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Delete runes before the cursor, as backspace does.
    Backward,
    /// Delete runes after the cursor, as the delete key does.
    Forward,
}

/// A flat byte buffer holding UTF-8 document content around a movable gap.
///
/// The storage is one owned allocation of `capacity` bytes. Bytes in
/// `[gap_index, gap_index + gap_size)` are the gap: logically empty, never observable through
/// [slice](GapBuffer::slice) or iteration. Everything else is document content, addressed by
/// *logical* position, the offset into the document as if the gap did not exist.
///
/// # Examples
/// ```
/// use quill_gap::{Direction, GapBuffer};
///
/// let mut buffer = GapBuffer::new("notes.txt", b"hello world");
///
/// buffer.insert(b", brave", 5).unwrap();
/// assert_eq!(buffer.slice(0, buffer.len()).unwrap(), b"hello, brave world");
///
/// buffer.delete(6, buffer.len(), Direction::Backward);
/// assert_eq!(buffer.slice(0, buffer.len()).unwrap(), b"hello, brave");
/// ```
///
/// # Cursor
///
/// The gap's leading edge doubles as the edit cursor: an insert lands at the gap's start and the
/// gap shrinks from the front. Editing at the cursor costs only the copied content; editing
/// elsewhere first relocates the gap with [move_gap_to](GapBuffer::move_gap_to), which costs a
/// byte shift proportional to the distance moved. Cheap for local typing, expensive for a jump
/// to the far end of a large document. That asymmetry is the gap buffer trade-off, not a defect.
///
/// # Rune safety
///
/// Rune-driven operations keep `gap_index` on a Unicode scalar boundary, so a multi-byte scalar
/// is never split across the gap. Callers of [insert](GapBuffer::insert) and
/// [move_gap_to](GapBuffer::move_gap_to) are expected to pass scalar-boundary positions of valid
/// UTF-8 content; debug builds assert it.
pub struct GapBuffer {
    name: String,
    bytes: Box<[u8]>,
    gap_index: usize,
    gap_size: usize,
}

impl GapBuffer {
    /// Creates a buffer holding `content`, with storage sized to roughly twice the content
    /// length rounded up to a [CAPACITY_TIER] multiple.
    ///
    /// The content is placed at the tail of the storage with the gap at the front, so the
    /// cursor starts at logical position 0.
    ///
    /// ### Examples
    /// ```
    /// use quill_gap::{GapBuffer, CAPACITY_TIER};
    ///
    /// let buffer = GapBuffer::new("scratch", b"abc");
    ///
    /// assert_eq!(buffer.len(), 3);
    /// assert_eq!(buffer.capacity(), CAPACITY_TIER);
    /// assert_eq!(buffer.gap_index(), 0);
    /// ```
    pub fn new(name: impl Into<String>, content: &[u8]) -> Self {
        let capacity = Self::required_capacity(content.len());
        let mut bytes = vec![0u8; capacity].into_boxed_slice();

        let gap_size = capacity - content.len();
        bytes[gap_size..].copy_from_slice(content);

        Self {
            name: name.into(),
            bytes,
            gap_index: 0,
            gap_size,
        }
    }

    /// Returns the storage size a buffer constructed for `content_len` bytes will have:
    /// `max(CAPACITY_TIER, round_up(2 * content_len, CAPACITY_TIER))`.
    pub fn required_capacity(content_len: usize) -> usize {
        content_len
            .saturating_mul(2)
            .next_multiple_of(CAPACITY_TIER)
            .max(CAPACITY_TIER)
    }

    /// Returns the logical document length in bytes: `capacity - gap_size`.
    pub fn len(&self) -> usize {
        self.bytes.len() - self.gap_size
    }

    /// Returns true if the buffer holds no content.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total byte size of the backing storage.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the logical byte offset where the gap begins. This is the edit cursor.
    pub fn gap_index(&self) -> usize {
        self.gap_index
    }

    /// Returns the current gap length in bytes, the headroom available to
    /// [insert](GapBuffer::insert) without relocating storage.
    pub fn gap_size(&self) -> usize {
        self.gap_size
    }

    /// Returns the buffer's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the buffer's display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Logically empties the buffer. The gap grows to span the whole capacity; storage is
    /// retained for reuse.
    ///
    /// ### Examples
    /// ```
    /// use quill_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::new("scratch", b"stale content");
    /// let capacity = buffer.capacity();
    ///
    /// buffer.clear();
    ///
    /// assert_eq!(buffer.len(), 0);
    /// assert_eq!(buffer.capacity(), capacity);
    /// assert_eq!(buffer.gap_size(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.gap_index = 0;
        self.gap_size = self.bytes.len();
    }

    /// Clears the buffer and repopulates it with `content`, the recycling path used when a
    /// released buffer shell is handed out again.
    ///
    /// Fails with [GapError::InsufficientCapacity] if `content` does not fit the existing
    /// storage; the storage never grows.
    pub fn reset(&mut self, content: &[u8]) -> Result<(), GapError> {
        if content.len() > self.bytes.len() {
            return Err(GapError::InsufficientCapacity {
                requested: content.len(),
                available: self.bytes.len(),
            });
        }

        let gap_size = self.bytes.len() - content.len();
        self.bytes[gap_size..].copy_from_slice(content);
        self.gap_index = 0;
        self.gap_size = gap_size;
        Ok(())
    }

    /// Materializes a contiguous copy of the logical range `[begin, end)`.
    ///
    /// A range that straddles the gap is stitched together from the two physical segments
    /// around it.
    ///
    /// ### Examples
    /// ```
    /// use quill_gap::{GapBuffer, GapError};
    ///
    /// let mut buffer = GapBuffer::new("scratch", b"hello world");
    /// buffer.move_gap_to(5);
    ///
    /// assert_eq!(buffer.slice(3, 8).unwrap(), b"lo wo");
    /// assert_eq!(
    ///     buffer.slice(8, 3),
    ///     Err(GapError::InvalidRange { begin: 8, end: 3, len: 11 })
    /// );
    /// ```
    pub fn slice(&self, begin: usize, end: usize) -> Result<Vec<u8>, GapError> {
        if begin > end || end > self.len() {
            return Err(GapError::InvalidRange {
                begin,
                end,
                len: self.len(),
            });
        }

        let mut out = Vec::with_capacity(end - begin);
        if begin == end {
            return Ok(out);
        }

        if end <= self.gap_index || begin >= self.gap_index {
            // Entirely on one side of the gap: a single contiguous physical run.
            let p0 = self.physical(begin);
            out.extend_from_slice(&self.bytes[p0..p0 + (end - begin)]);
        } else {
            let tail_start = self.gap_index + self.gap_size;
            let tail_len = end - self.gap_index;
            out.extend_from_slice(&self.bytes[begin..self.gap_index]);
            out.extend_from_slice(&self.bytes[tail_start..tail_start + tail_len]);
        }

        Ok(out)
    }

    /// Returns a copy of the whole logical content.
    pub fn content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.bytes[..self.gap_index]);
        out.extend_from_slice(&self.bytes[self.gap_index + self.gap_size..]);
        out
    }

    /// Relocates the gap so its leading edge sits at logical position `logical`, shifting the
    /// bytes in between across the gap. Returns the number of bytes shifted, which is zero when
    /// the gap is already there.
    ///
    /// ### Examples
    /// ```
    /// use quill_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::new("scratch", b"hello");
    ///
    /// assert_eq!(buffer.move_gap_to(5), 5);
    /// assert_eq!(buffer.move_gap_to(5), 0);
    /// assert_eq!(buffer.move_gap_to(2), 3);
    /// assert_eq!(buffer.slice(0, 5).unwrap(), b"hello");
    /// ```
    pub fn move_gap_to(&mut self, logical: usize) -> usize {
        debug_assert!(logical <= self.len());
        let logical = logical.min(self.len());

        if logical == self.gap_index {
            return 0;
        }

        let shifted = if logical < self.gap_index {
            // Gap moves left: the bytes between the target and the old gap edge slide right,
            // into the space just past where the gap will now end.
            let count = self.gap_index - logical;
            self.bytes
                .copy_within(logical..self.gap_index, logical + self.gap_size);
            count
        } else {
            // Gap moves right: the bytes just past the old gap slide left into its start.
            let count = logical - self.gap_index;
            let src = self.gap_index + self.gap_size;
            self.bytes.copy_within(src..src + count, self.gap_index);
            count
        };

        self.gap_index = logical;
        shifted
    }

    /// Inserts `content` at logical position `cursor`, relocating the gap there first.
    ///
    /// Fails with [GapError::InsufficientCapacity] when `content` is larger than the remaining
    /// gap; the buffer is left unchanged, gap position included. The buffer never grows in
    /// place, so slices and iterators handed out before a successful insert stay meaningful.
    ///
    /// ### Examples
    /// ```
    /// use quill_gap::{GapBuffer, GapError};
    ///
    /// let mut buffer = GapBuffer::new("scratch", b"hero");
    ///
    /// buffer.insert("é".as_bytes(), 1).unwrap();
    /// assert_eq!(buffer.slice(0, buffer.len()).unwrap(), "héero".as_bytes());
    ///
    /// let available = buffer.gap_size();
    /// let oversized = vec![b'x'; available + 1];
    /// assert_eq!(
    ///     buffer.insert(&oversized, 0),
    ///     Err(GapError::InsufficientCapacity {
    ///         requested: available + 1,
    ///         available,
    ///     })
    /// );
    /// ```
    pub fn insert(&mut self, content: &[u8], cursor: usize) -> Result<(), GapError> {
        debug_assert!(cursor <= self.len());

        if content.len() > self.gap_size {
            return Err(GapError::InsufficientCapacity {
                requested: content.len(),
                available: self.gap_size,
            });
        }

        self.move_gap_to(cursor.min(self.len()));
        self.bytes[self.gap_index..self.gap_index + content.len()].copy_from_slice(content);
        self.gap_index += content.len();
        self.gap_size -= content.len();

        self.debug_assert_gap_boundary();
        Ok(())
    }

    /// Deletes up to `count` runes adjacent to logical position `cursor`, walking scalar
    /// boundaries in `direction`. Returns the number of runes actually removed.
    ///
    /// Deletion is clamped at the buffer's extremities: backward at position 0 and forward at
    /// the end are no-ops returning 0, not errors.
    ///
    /// ### Examples
    /// ```
    /// use quill_gap::{Direction, GapBuffer};
    ///
    /// let mut buffer = GapBuffer::new("scratch", "héllo".as_bytes());
    ///
    /// // Backspacing over the two-byte 'é' removes one rune, two bytes.
    /// assert_eq!(buffer.delete(1, 3, Direction::Backward), 1);
    /// assert_eq!(buffer.slice(0, buffer.len()).unwrap(), b"hllo");
    ///
    /// // Forward delete past the end removes only what exists.
    /// assert_eq!(buffer.delete(10, 2, Direction::Forward), 2);
    /// assert_eq!(buffer.slice(0, buffer.len()).unwrap(), b"hl");
    ///
    /// assert_eq!(buffer.delete(1, 0, Direction::Backward), 0);
    /// ```
    pub fn delete(&mut self, count: usize, cursor: usize, direction: Direction) -> usize {
        debug_assert!(cursor <= self.len());
        let cursor = cursor.min(self.len());

        if count == 0 {
            return 0;
        }

        let removed = match direction {
            Direction::Backward => {
                if cursor == 0 {
                    return 0;
                }
                self.move_gap_to(cursor);

                let mut removed = 0;
                while removed < count && self.gap_index > 0 {
                    // Walk back over continuation bytes to the rune's lead byte, then extend
                    // the gap leftward over the whole encoding.
                    let mut step = 1;
                    while step < self.gap_index
                        && utf8::is_continuation(self.bytes[self.gap_index - step])
                    {
                        step += 1;
                    }

                    self.gap_index -= step;
                    self.gap_size += step;
                    removed += 1;
                }
                removed
            }
            Direction::Forward => {
                if cursor == self.len() {
                    return 0;
                }
                self.move_gap_to(cursor);

                let mut removed = 0;
                while removed < count && self.gap_index < self.len() {
                    let tail_start = self.gap_index + self.gap_size;
                    let step = utf8::lead_len(self.bytes[tail_start])
                        .unwrap_or(1)
                        .min(self.bytes.len() - tail_start);

                    self.gap_size += step;
                    removed += 1;
                }
                removed
            }
        };

        self.debug_assert_gap_boundary();
        removed
    }

    /// Returns a lazy iterator over the logical content, one decoded scalar per step. See
    /// [BufferIter].
    pub fn iter(&self) -> BufferIter<'_> {
        BufferIter::new(self)
    }

    /// Returns an iterator starting at logical byte position `pos` rather than 0, for consumers
    /// that resume a walk partway through the document.
    pub fn iter_from(&self, pos: usize) -> BufferIter<'_> {
        BufferIter::starting_at(self, pos)
    }

    /// Returns the decoded scalars of the logical content.
    ///
    /// ### Examples
    /// ```
    /// use quill_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::new("scratch", "héllo".as_bytes());
    /// buffer.move_gap_to(3);
    ///
    /// let collected: String = buffer.chars().collect();
    /// assert_eq!(collected, "héllo");
    /// ```
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.iter().map(|item| item.scalar)
    }

    /// Translates a logical position to its physical offset in the backing storage.
    pub(crate) fn physical(&self, logical: usize) -> usize {
        debug_assert!(logical <= self.len());
        if logical < self.gap_index {
            logical
        } else {
            logical + self.gap_size
        }
    }

    /// Returns the contiguous physical bytes from `logical` to the end of its physical segment
    /// (the gap edge for pre-gap positions, the storage end otherwise). By the rune-boundary
    /// invariant a scalar never straddles the segment boundary, so decoding within the returned
    /// slice is always sufficient.
    pub(crate) fn segment_at(&self, logical: usize) -> &[u8] {
        let phys = self.physical(logical);
        if phys < self.gap_index {
            &self.bytes[phys..self.gap_index]
        } else {
            &self.bytes[phys..]
        }
    }

    fn debug_assert_gap_boundary(&self) {
        #[cfg(debug_assertions)]
        if self.gap_index < self.len() {
            let next = self.bytes[self.gap_index + self.gap_size];
            debug_assert!(
                !crate::utf8::is_continuation(next),
                "gap edge left inside a multi-byte scalar at logical {}",
                self.gap_index
            );
        }
    }
}

impl std::fmt::Debug for GapBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GapBuffer")
            .field("name", &self.name)
            .field("capacity", &self.bytes.len())
            .field("gap_index", &self.gap_index)
            .field("gap_size", &self.gap_size)
            .finish()
    }
}

impl From<&str> for GapBuffer {
    fn from(value: &str) -> Self {
        Self::new("", value.as_bytes())
    }
}
