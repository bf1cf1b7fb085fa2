//! Text storage for generated units, keyed by source type full name.
//!
//! Writes go through a [`TextSink`] that only becomes visible on
//! [`TextSink::commit`]; a sink dropped without committing leaves the
//! previous content in place.

use std::io::{Cursor, Read, Write};

use dashmap::DashMap;

use crate::error::{IfacegenError, IfacegenResult};

/// A pending write.
pub trait TextSink: Write + Send {
    /// Publishes everything written so far under the sink's key.
    fn commit(self: Box<Self>) -> IfacegenResult<()>;
}

/// Where generated text goes and where prior output is read back from.
pub trait TextStore: Send + Sync {
    fn open_for_write(&self, key: &str) -> IfacegenResult<Box<dyn TextSink + '_>>;

    /// `Ok(None)` when nothing has been stored under `key`.
    fn try_open_for_read(&self, key: &str) -> IfacegenResult<Option<Box<dyn Read + '_>>>;
}

/// Writes `text` under `key` and commits.
pub fn write_text(store: &dyn TextStore, key: &str, text: &str) -> IfacegenResult<()> {
    let mut sink = store.open_for_write(key)?;
    sink.write_all(text.as_bytes())
        .map_err(|e| IfacegenError::store(key, e.to_string()))?;
    sink.commit()
}

/// Reads the whole text stored under `key`, if any.
pub fn read_text(store: &dyn TextStore, key: &str) -> IfacegenResult<Option<String>> {
    let Some(mut source) = store.try_open_for_read(key)? else {
        return Ok(None);
    };
    let mut text = String::new();
    source
        .read_to_string(&mut text)
        .map_err(|e| IfacegenError::store(key, e.to_string()))?;
    Ok(Some(text))
}

/// Rejects keys that could escape a store root or are not file-name safe.
pub fn validate_key(key: &str) -> IfacegenResult<()> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', ':', '<', '>', '|', '"', '?', '*'])
        || key.chars().any(char::is_control);
    if bad {
        Err(IfacegenError::invalid_argument(format!(
            "invalid store key: {:?}",
            key
        )))
    } else {
        Ok(())
    }
}

/// In-memory store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryTextStore {
    entries: DashMap<String, String>,
}

impl MemoryTextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    pub fn insert(&self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct MemorySink<'s> {
    store: &'s MemoryTextStore,
    key: String,
    buf: Vec<u8>,
}

impl Write for MemorySink<'_> {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.write(data)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl TextSink for MemorySink<'_> {
    fn commit(self: Box<Self>) -> IfacegenResult<()> {
        let MemorySink { store, key, buf } = *self;
        let text = String::from_utf8(buf).map_err(|e| IfacegenError::store(&key, e.to_string()))?;
        store.entries.insert(key, text);
        Ok(())
    }
}

impl TextStore for MemoryTextStore {
    fn open_for_write(&self, key: &str) -> IfacegenResult<Box<dyn TextSink + '_>> {
        validate_key(key)?;
        Ok(Box::new(MemorySink {
            store: self,
            key: key.to_string(),
            buf: Vec::new(),
        }))
    }

    fn try_open_for_read(&self, key: &str) -> IfacegenResult<Option<Box<dyn Read + '_>>> {
        Ok(self
            .get(key)
            .map(|text| Box::new(Cursor::new(text.into_bytes())) as Box<dyn Read>))
    }
}

#[cfg(feature = "fs-store")]
pub use fs::FsTextStore;

#[cfg(feature = "fs-store")]
mod fs {
    use std::fs::{self, File};
    use std::io::{BufWriter, Read, Write};
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use tracing::debug;

    use super::{validate_key, TextSink, TextStore};
    use crate::error::{IfacegenError, IfacegenResult, IoResultExt};

    /// Extension of generated files.
    pub const EXTENSION: &str = "cs";

    /// One `<key>.cs` file per unit under a root directory.
    #[derive(Debug, Clone)]
    pub struct FsTextStore {
        root: PathBuf,
    }

    impl FsTextStore {
        /// The root directory is created on first write.
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        pub fn path_for(&self, key: &str) -> IfacegenResult<PathBuf> {
            validate_key(key)?;
            Ok(self.root.join(format!("{}.{}", key, EXTENSION)))
        }
    }

    /// Writes to a temp file beside the target, renamed into place on commit.
    struct FsSink {
        writer: Option<BufWriter<File>>,
        temp_path: PathBuf,
        path: PathBuf,
    }

    impl Write for FsSink {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            match self.writer.as_mut() {
                Some(w) => w.write(data),
                None => Err(std::io::Error::other("sink already committed")),
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            match self.writer.as_mut() {
                Some(w) => w.flush(),
                None => Ok(()),
            }
        }
    }

    impl TextSink for FsSink {
        fn commit(mut self: Box<Self>) -> IfacegenResult<()> {
            if let Some(writer) = self.writer.take() {
                let file = writer
                    .into_inner()
                    .map_err(|e| IfacegenError::io(&self.temp_path, e.into_error()))?;
                file.sync_all().with_path(&self.temp_path)?;
            }
            fs::rename(&self.temp_path, &self.path).with_path(&self.path)?;
            debug!(path = %self.path.display(), "committed");
            Ok(())
        }
    }

    impl Drop for FsSink {
        fn drop(&mut self) {
            // No-op after a successful rename.
            let _ = fs::remove_file(&self.temp_path);
        }
    }

    impl TextStore for FsTextStore {
        fn open_for_write(&self, key: &str) -> IfacegenResult<Box<dyn TextSink + '_>> {
            let path = self.path_for(key)?;
            fs::create_dir_all(&self.root).with_path(&self.root)?;

            // PID plus nanosecond timestamp keeps concurrent writers apart.
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos();
            let temp_path = self.root.join(format!(
                "{}.{}.{}.{}.tmp",
                key,
                EXTENSION,
                std::process::id(),
                nanos
            ));
            let file = File::create(&temp_path).with_path(&temp_path)?;
            Ok(Box::new(FsSink {
                writer: Some(BufWriter::new(file)),
                temp_path,
                path,
            }))
        }

        fn try_open_for_read(&self, key: &str) -> IfacegenResult<Option<Box<dyn Read + '_>>> {
            let path = self.path_for(key)?;
            match File::open(&path) {
                Ok(file) => Ok(Some(Box::new(file))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(IfacegenError::io(path, e)),
            }
        }
    }

}
