use std::io;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use hashbrown::HashMap;

pub trait FileSystem: Send + Sync + 'static {
    type Reader: io::Read;
    type Writer: io::Write;

    fn exists(&self, path: &Path) -> bool;
    fn create_dir(&self, path: &Path) -> Result<()>;
    fn get_writer(&self, path: &Path) -> Result<Self::Writer>;
    fn get_reader(&self, path: &Path) -> Result<Self::Reader>;
}

pub struct DefaultFileSystem;

impl FileSystem for DefaultFileSystem {
    type Reader = File;
    type Writer = File;

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .map_err(|e| anyhow::anyhow!("Could not create directory: {}", e))
    }

    fn get_writer(&self, path: &Path) -> Result<Self::Writer> {
        File::create(path).map_err(|e| anyhow::anyhow!("Could not create file: {}", e))
    }

    fn get_reader(&self, path: &Path) -> Result<Self::Reader> {
        File::open(path).map_err(|e| anyhow::anyhow!("Could not open file: {}", e))
    }
}

impl DefaultFileSystem {
    pub fn new() -> Self {
        Self
    }
}

pub struct MemoryFileSystem {
    map: Mutex<HashMap<PathBuf, MemoryFileSystemEntry>>,
    directories: Mutex<Vec<PathBuf>>,
    fail_writes: bool,
}

impl FileSystem for MemoryFileSystem {
    type Reader = MemoryFileSystemEntry;
    type Writer = MemoryFileSystemEntry;

    fn exists(&self, path: &Path) -> bool {
        self.map.lock().unwrap().contains_key(path)
            || self.directories.lock().unwrap().iter().any(|dir| dir == path)
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        self.directories.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn get_writer(&self, path: &Path) -> Result<Self::Writer> {
        if self.fail_writes {
            anyhow::bail!("Could not create file: {:?}", path);
        }

        let mut map = self.map.lock().unwrap();
        let entry = map
            .entry(path.to_path_buf())
            .or_insert_with(MemoryFileSystemEntry::new);

        Ok(entry.clone())
    }

    fn get_reader(&self, path: &Path) -> Result<Self::Reader> {
        self.map
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("File not found: {:?}", path))
    }
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
            directories: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn file_names(&self) -> Vec<PathBuf> {
        self.map.lock().unwrap().keys().cloned().collect()
    }

    pub fn read_all(&self, path: &Path) -> Option<Vec<u8>> {
        self.map
            .lock()
            .unwrap()
            .get(path)
            .map(|entry| entry.data.lock().unwrap().clone())
    }
}

pub struct MemoryFileSystemEntry {
    data: Arc<Mutex<Vec<u8>>>,
    position: usize,
}

impl Clone for MemoryFileSystemEntry {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            position: self.position,
        }
    }
}

impl io::Read for MemoryFileSystemEntry {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.data.lock().unwrap();
        let available = data.len().saturating_sub(self.position);
        let bytes_to_read = available.min(buf.len());

        if bytes_to_read == 0 {
            return Ok(0);
        }

        buf[..bytes_to_read].copy_from_slice(&data[self.position..self.position + bytes_to_read]);
        self.position += bytes_to_read;

        Ok(bytes_to_read)
    }
}

impl io::Write for MemoryFileSystemEntry {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut data = self.data.lock().unwrap();
        data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MemoryFileSystemEntry {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(Vec::new())),
            position: 0,
        }
    }
}
