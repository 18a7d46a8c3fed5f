// This file is part of Quill.

// Quill is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Quill is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::path::{Path, PathBuf};

use quill_gap::GapError;
use thiserror::Error;
use tracing::info;

use crate::{
    editor_state::EditorContext,
    file_handle::{FileHandle, FileWrite},
    registry::{BufferHandle, RegistryError},
};

/// Document-level intents. Each translates 1:1 to registry and buffer calls; anything richer
/// (undo grouping, prompts) belongs to the layers above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open an empty buffer under a display name.
    NewBuffer { name: String },
    /// Hydrate a buffer from a file's bytes.
    OpenFile { path: PathBuf },
    /// Persist a buffer's materialized content, to `path` or to the buffer's own name.
    SaveBuffer {
        handle: BufferHandle,
        path: Option<PathBuf>,
    },
    /// Close a buffer, recycling its shell.
    CloseBuffer { handle: BufferHandle },
}

/// What a successfully executed [Command] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Opened(BufferHandle),
    Saved { bytes: usize },
    Closed,
}

/// Failures surfaced by command execution.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Gap(#[from] GapError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("buffer has no path to save to")]
    NoSavePath,
}

/// Runs one command against an editor session.
pub fn execute(ctx: &mut EditorContext, command: Command) -> Result<CommandOutcome, EditorError> {
    match command {
        Command::NewBuffer { name } => {
            let handle = ctx.registry.acquire(name, b"");
            ctx.active = Some(handle);

            info!(?handle, "opened empty buffer");
            Ok(CommandOutcome::Opened(handle))
        }

        Command::OpenFile { path } => {
            let content = FileHandle::open(&path)?.read_bytes()?;
            let name = path.to_string_lossy().into_owned();

            let handle = ctx.registry.acquire(name, &content);
            ctx.active = Some(handle);

            info!(?handle, bytes = content.len(), path = %path.display(), "opened file");
            Ok(CommandOutcome::Opened(handle))
        }

        Command::SaveBuffer { handle, path } => {
            let buffer = ctx.registry.get(handle).ok_or(RegistryError::StaleHandle)?;
            let content = buffer.content();

            let path = match path {
                Some(path) => path,
                None if buffer.name().is_empty() => return Err(EditorError::NoSavePath),
                None => PathBuf::from(buffer.name()),
            };

            FileHandle::create(Path::new(&path))?.write_file(&content)?;

            info!(?handle, bytes = content.len(), path = %path.display(), "saved buffer");
            Ok(CommandOutcome::Saved {
                bytes: content.len(),
            })
        }

        Command::CloseBuffer { handle } => {
            ctx.registry.release(handle)?;
            if ctx.active == Some(handle) {
                ctx.active = ctx.registry.open_handles().last().copied();
            }

            info!(?handle, "closed buffer");
            Ok(CommandOutcome::Closed)
        }
    }
}
