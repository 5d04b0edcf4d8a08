use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::{BrushError, Result};

/// Local file reader rooted at a directory.
#[derive(Debug)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            root_path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let path = self.root_path.join(uri);
        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(tokio::fs::read(&path).await?)
        }
        #[cfg(target_arch = "wasm32")]
        {
            Err(BrushError::FeatureNotEnabled(format!(
                "file access is unavailable on wasm: {}",
                path.display()
            )))
        }
    }
}

/// HTTP reader (requires the `http` feature).
#[cfg(feature = "http")]
#[derive(Debug)]
pub struct HttpAssetReader {
    root_url: url::Url,
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    pub fn new(url_str: &str) -> Result<Self> {
        let mut root_url = url::Url::parse(url_str)?;
        // Treat the base as a directory so `join` appends instead of replacing.
        if !root_url.path().ends_with('/') {
            let path = format!("{}/", root_url.path());
            root_url.set_path(&path);
        }
        Ok(Self { root_url })
    }

    #[inline]
    pub fn root_url(&self) -> &url::Url {
        &self.root_url
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        let url = self.root_url.join(uri)?;
        let request = ehttp::Request::get(url.as_str());
        let response = ehttp::fetch_async(request)
            .await
            .map_err(BrushError::Http)?;
        if !response.ok {
            return Err(BrushError::HttpStatus {
                status: response.status,
                url: url.to_string(),
            });
        }
        Ok(response.bytes)
    }
}

/// In-memory reader keyed by relative path.
///
/// Counts every read, which makes it useful for asserting fetch behavior as
/// well as for embedding brush resources in a binary.
#[derive(Debug, Default)]
pub struct MemoryAssetReader {
    files: RwLock<FxHashMap<String, Arc<Vec<u8>>>>,
    reads: AtomicUsize,
}

impl MemoryAssetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.write().insert(path.into(), Arc::new(bytes.into()));
    }

    pub fn remove(&self, path: &str) -> bool {
        self.files.write().remove(path).is_some()
    }

    /// Number of reads served or attempted so far.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .read()
            .get(uri)
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| BrushError::AssetNotFound(uri.to_string()))
    }
}

/// Reader variants; an enum instead of a trait object.
#[derive(Debug, Clone)]
pub enum AssetReaderVariant {
    File(Arc<FileAssetReader>),
    #[cfg(feature = "http")]
    Http(Arc<HttpAssetReader>),
    Memory(Arc<MemoryAssetReader>),
}

impl AssetReaderVariant {
    /// Picks a reader from a base path or URL.
    pub fn from_source(source: &str) -> Result<Self> {
        if source.starts_with("http://") || source.starts_with("https://") {
            #[cfg(feature = "http")]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source)?)))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(BrushError::FeatureNotEnabled(
                    "HTTP feature is not enabled. Enable it with `features = [\"http\"]`".into(),
                ))
            }
        } else {
            Ok(Self::File(Arc::new(FileAssetReader::new(source))))
        }
    }

    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        match self {
            Self::File(r) => r.read_bytes(uri).await,
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri).await,
            Self::Memory(r) => r.read_bytes(uri).await,
        }
    }

    /// Reads a UTF-8 text resource such as shader source.
    pub async fn read_text(&self, uri: &str) -> Result<String> {
        let bytes = self.read_bytes(uri).await?;
        String::from_utf8(bytes).map_err(|e| BrushError::Io(format!("{uri} is not UTF-8: {e}")))
    }
}

impl From<Arc<MemoryAssetReader>> for AssetReaderVariant {
    fn from(reader: Arc<MemoryAssetReader>) -> Self {
        Self::Memory(reader)
    }
}
