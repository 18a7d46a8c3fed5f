// This file is part of Quill.

// Quill is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Quill is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use quill_gap::GapBuffer;
use thiserror::Error;
use tracing::debug;

/// An opaque reference to a buffer slot in a [BufferRegistry].
///
/// The generation counter is bumped the moment a buffer is released, so a handle kept past its
/// buffer's release stops resolving immediately instead of silently aliasing the parked shell
/// or the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    index: usize,
    generation: u32,
}

/// Errors reported by registry lifecycle operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The handle's buffer has been released since the handle was issued, or never existed.
    /// Releasing the same buffer twice lands here.
    #[error("buffer handle refers to a released or unknown slot")]
    StaleHandle,
}

struct Slot {
    generation: u32,
    buffer: GapBuffer,
}

/// The open-document list plus a freelist of recyclable buffer shells.
///
/// Buffers live in a flat slot pool owned by the registry and are addressed by
/// [BufferHandle]s. Releasing a document does not return its storage anywhere; the shell is
/// logically emptied and parked on the freelist, and a later [acquire](BufferRegistry::acquire)
/// whose content fits reuses it instead of allocating. Every slot is referenced by exactly one
/// of the open list and the freelist.
pub struct BufferRegistry {
    slots: Vec<Slot>,
    open: Vec<BufferHandle>,
    free: Vec<usize>,
    allocations: usize,
}

impl BufferRegistry {
    /// Creates a registry with no slots.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            open: Vec::new(),
            free: Vec::new(),
            allocations: 0,
        }
    }

    /// Opens a document holding `content`, reusing a freelist shell when one has the tiered
    /// capacity the content calls for, and allocating a fresh buffer otherwise. The buffer is
    /// appended to the open-document list.
    pub fn acquire(&mut self, name: impl Into<String>, content: &[u8]) -> BufferHandle {
        let required = GapBuffer::required_capacity(content.len());

        if let Some(free_pos) = self
            .free
            .iter()
            .position(|&index| self.slots[index].buffer.capacity() >= required)
        {
            let index = self.free.remove(free_pos);
            let slot = &mut self.slots[index];

            slot.buffer.set_name(name);
            let repopulated = slot.buffer.reset(content);
            debug_assert!(repopulated.is_ok(), "freelist shell capacity was checked");

            let handle = BufferHandle {
                index,
                generation: slot.generation,
            };
            self.open.push(handle);

            debug!(
                index,
                capacity = slot.buffer.capacity(),
                content_len = content.len(),
                "acquire reused a freelist shell"
            );
            return handle;
        }

        let buffer = GapBuffer::new(name, content);
        self.allocations += 1;

        let index = self.slots.len();
        let handle = BufferHandle {
            index,
            generation: 0,
        };
        self.slots.push(Slot {
            generation: 0,
            buffer,
        });
        self.open.push(handle);

        debug!(
            index,
            content_len = content.len(),
            "acquire allocated a new buffer"
        );
        handle
    }

    /// Closes the document behind `handle`: detaches it from the open list, logically empties
    /// its buffer, and parks the shell on the freelist. The slot's generation moves here, so
    /// `handle` and any copy of it stop resolving at once.
    ///
    /// A stale handle is a consistency error reported to the caller, never silently ignored.
    pub fn release(&mut self, handle: BufferHandle) -> Result<(), RegistryError> {
        self.slot(handle).ok_or(RegistryError::StaleHandle)?;

        let open_pos = self
            .open
            .iter()
            .position(|&open| open == handle)
            .ok_or(RegistryError::StaleHandle)?;
        self.open.remove(open_pos);

        let slot = &mut self.slots[handle.index];
        slot.generation = slot.generation.wrapping_add(1);
        slot.buffer.clear();
        self.free.push(handle.index);

        debug!(index = handle.index, "released buffer to freelist");
        Ok(())
    }

    /// Releases every open buffer back to the freelist, the editor session reset. Every
    /// outstanding handle goes stale.
    pub fn clear_all(&mut self) {
        for handle in std::mem::take(&mut self.open) {
            let slot = &mut self.slots[handle.index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.buffer.clear();
            self.free.push(handle.index);
        }
        debug!(freelist = self.free.len(), "cleared all open buffers");
    }

    /// Resolves `handle` to its buffer, or `None` if the handle is stale.
    pub fn get(&self, handle: BufferHandle) -> Option<&GapBuffer> {
        self.slot(handle).map(|slot| &slot.buffer)
    }

    /// Resolves `handle` to its buffer mutably, or `None` if the handle is stale.
    pub fn get_mut(&mut self, handle: BufferHandle) -> Option<&mut GapBuffer> {
        let generation = handle.generation;
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == generation)
            .map(|slot| &mut slot.buffer)
    }

    /// Handles of the open documents, oldest first.
    pub fn open_handles(&self) -> &[BufferHandle] {
        &self.open
    }

    /// Number of currently open documents.
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Total fresh buffer allocations performed so far. Freelist reuse does not count.
    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    fn slot(&self, handle: BufferHandle) -> Option<&Slot> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
    }
}

impl Default for BufferRegistry {
    fn default() -> Self {
        Self::new()
    }
}
