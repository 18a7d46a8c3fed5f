use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::Path,
};

/// Sink for persisting a buffer's materialized content.
///
/// The storage engine only ever hands this a flat byte span; it never sees file handles or
/// paths of its own.
pub trait FileWrite {
    fn write_file(&mut self, buf: &[u8]) -> std::io::Result<()>;
}

/// A file on disk backing a document buffer.
pub struct FileHandle {
    file: File,
    pub path: Box<Path>,
}

impl FileHandle {
    /// Opens an existing file for hydration. A missing file is an error here, never an empty
    /// file created in its place.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;

        Ok(Self {
            file,
            path: Box::from(path),
        })
    }

    /// Opens the file a buffer saves to, creating it when absent.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().write(true).create(true).open(path)?;

        Ok(Self {
            file,
            path: Box::from(path),
        })
    }

    /// Reads the whole file into a byte vector, the span a new buffer is hydrated from.
    pub fn read_bytes(&mut self) -> std::io::Result<Vec<u8>> {
        let mut content = Vec::new();
        self.file.read_to_end(&mut content)?;
        Ok(content)
    }
}

impl FileWrite for FileHandle {
    fn write_file(&mut self, buf: &[u8]) -> std::io::Result<()> {
        // Reopen with truncation so repeated saves replace the content rather than append.
        self.file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;

        self.file.write_all(buf)?;
        self.file.flush()
    }
}
