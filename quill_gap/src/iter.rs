// This file is part of Quill.

// Quill is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Quill is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use crate::{utf8, GapBuffer};

/// One element of a buffer walk: a decoded scalar and where it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterItem {
    /// Logical byte offset of the scalar's first byte.
    pub pos: usize,
    /// The decoded scalar, or [utf8::REPLACEMENT] where the content fails validation. A failed
    /// position consumes exactly one byte so the walk resynchronizes on the next valid lead.
    pub scalar: char,
    /// True iff this scalar sits exactly at the gap's leading edge, i.e. the edit cursor. Lets
    /// a renderer place the caret without a separate lookup.
    pub on_cursor: bool,
}

/// A lazy, forward-only walk over a [GapBuffer]'s logical content.
///
/// The gap is skipped inside the step itself: positions are logical, and the translation to
/// physical storage never exposes gap bytes. The walk ends when the logical position reaches
/// the buffer's length, so an empty buffer yields nothing.
///
/// The iterator borrows the buffer, so the borrow checker rejects any insert or delete while a
/// walk is outstanding. Restarting after a mutation means calling [GapBuffer::iter] (or
/// [GapBuffer::iter_from]) again.
///
/// # Examples
/// ```
/// use quill_gap::GapBuffer;
///
/// let mut buffer = GapBuffer::new("scratch", "aé".as_bytes());
/// buffer.move_gap_to(1);
///
/// let items: Vec<_> = buffer.iter().collect();
/// assert_eq!(items.len(), 2);
/// assert_eq!((items[0].pos, items[0].scalar, items[0].on_cursor), (0, 'a', false));
/// assert_eq!((items[1].pos, items[1].scalar, items[1].on_cursor), (1, 'é', true));
///
/// assert_eq!(GapBuffer::new("empty", b"").iter().next(), None);
/// ```
pub struct BufferIter<'a> {
    buffer: &'a GapBuffer,
    pos: usize,
}

impl<'a> BufferIter<'a> {
    pub(crate) fn new(buffer: &'a GapBuffer) -> Self {
        Self { buffer, pos: 0 }
    }

    pub(crate) fn starting_at(buffer: &'a GapBuffer, pos: usize) -> Self {
        Self { buffer, pos }
    }
}

impl<'a> Iterator for BufferIter<'a> {
    type Item = IterItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buffer.len() {
            return None;
        }

        let pos = self.pos;
        let segment = self.buffer.segment_at(pos);
        let (scalar, consumed) = match utf8::decode(segment, 0) {
            Ok(decoded) => (decoded.scalar, decoded.consumed),
            Err(_) => (utf8::REPLACEMENT, 1),
        };

        self.pos = pos + consumed;

        Some(IterItem {
            pos,
            scalar,
            on_cursor: pos == self.buffer.gap_index(),
        })
    }
}

impl<'a> IntoIterator for &'a GapBuffer {
    type Item = IterItem;
    type IntoIter = BufferIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
