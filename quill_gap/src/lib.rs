// This file is part of Quill.

// Quill is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Quill is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

//! A UTF-8 aware gap buffer intended for use as the document storage of the Quill text editor.
//!
//! [GapBuffer] holds a document's bytes in one flat allocation with a movable, logically empty
//! region (the gap) sitting at the edit cursor. Inserting and deleting at the cursor only touches
//! the gap's edges, which makes a gap buffer a good fit for the common editing pattern of many
//! small edits at one point interleaved with occasional cursor jumps.
//!
//! Rune-driven operations never leave the gap edge inside a multi-byte scalar, so the logical
//! content on either side of the cursor is always valid to decode. Decoding itself lives in the
//! [utf8] module; [BufferIter] walks the logical content one scalar at a time, skipping the gap
//! transparently.

#![warn(missing_docs)]

pub use gap_buffer::*;
pub use iter::*;

mod gap_buffer;
mod iter;
pub mod utf8;
