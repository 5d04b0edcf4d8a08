//! Shader Resource Loader
//!
//! Turns a canonical brush name into a shared [`ResolvedMaterial`]: fetches
//! the vertex and fragment source, decodes every texture the descriptor
//! references and binds the decoded textures to their uniforms.
//!
//! # Caching
//!
//! Each loader instance owns a session cache holding at most one material per
//! canonical name. Concurrent requests for a name that is not cached yet share
//! a single in-flight load:
//!
//! ```text
//! load("Fire") ──┐
//! load("Fire") ──┼──► inflight["Fire"] (Shared future) ──► cache["Fire"]
//! load("Fire") ──┘
//! ```
//!
//! The shared future writes the cache and unregisters itself under the
//! in-flight lock, so a requester either finds the cached material or joins
//! the pending load; it can never start a second one.
//!
//! Failed loads are not cached and can be retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use uuid::Uuid;
use wgpu::TextureFormat;

use crate::assets::io::AssetReaderVariant;
use crate::brushes::catalog::BrushCatalog;
use crate::brushes::descriptor::{BrushDescriptor, UniformValue};
use crate::config::BrushConfig;
use crate::errors::{BrushError, Result};
use crate::resources::material::{MaterialUniform, MaterialValue, ResolvedMaterial};
use crate::resources::texture::Texture;

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<ResolvedMaterial>>>>;

struct PendingLoad {
    id: u64,
    future: SharedLoad,
}

struct LoaderInner {
    catalog: Arc<BrushCatalog>,
    reader: AssetReaderVariant,
    generate_mipmaps: bool,

    cache: RwLock<FxHashMap<String, Arc<ResolvedMaterial>>>,
    inflight: Mutex<FxHashMap<String, PendingLoad>>,
    next_load_id: AtomicU64,
}

/// Session-scoped loader for brush materials. Cheap to clone.
#[derive(Clone)]
pub struct ShaderResourceLoader {
    inner: Arc<LoaderInner>,
}

impl std::fmt::Debug for ShaderResourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderResourceLoader")
            .field("reader", &self.inner.reader)
            .field("cached", &self.cached_len())
            .field("pending", &self.pending_len())
            .finish_non_exhaustive()
    }
}

impl ShaderResourceLoader {
    #[must_use]
    pub fn new(catalog: Arc<BrushCatalog>, reader: impl Into<AssetReaderVariant>) -> Self {
        Self::with_options(catalog, reader.into(), true)
    }

    /// Loader reading from `config.base_path`.
    pub fn from_config(catalog: Arc<BrushCatalog>, config: &BrushConfig) -> Result<Self> {
        let reader = AssetReaderVariant::from_source(&config.base_path)?;
        Ok(Self::with_options(catalog, reader, config.generate_mipmaps))
    }

    fn with_options(
        catalog: Arc<BrushCatalog>,
        reader: AssetReaderVariant,
        generate_mipmaps: bool,
    ) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                catalog,
                reader,
                generate_mipmaps,
                cache: RwLock::new(FxHashMap::default()),
                inflight: Mutex::new(FxHashMap::default()),
                next_load_id: AtomicU64::new(1),
            }),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<BrushCatalog> {
        &self.inner.catalog
    }

    // ========================================================================
    // Cache
    // ========================================================================

    /// Cached material, without starting a load.
    #[must_use]
    pub fn get(&self, canonical_name: &str) -> Option<Arc<ResolvedMaterial>> {
        self.inner.cache.read().get(canonical_name).cloned()
    }

    #[must_use]
    pub fn is_cached(&self, canonical_name: &str) -> bool {
        self.inner.cache.read().contains_key(canonical_name)
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.inner.cache.read().len()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.inflight.lock().len()
    }

    /// Forgets every in-flight load. Cached materials are kept.
    ///
    /// Loads that are still being awaited run to completion for their current
    /// requesters but no longer populate the cache.
    pub fn abort_pending(&self) {
        let dropped = std::mem::take(&mut *self.inner.inflight.lock());
        if !dropped.is_empty() {
            log::debug!("Aborted {} pending brush loads", dropped.len());
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Returns the material for a canonical brush name, loading it if needed.
    pub async fn load(&self, canonical_name: &str) -> Result<Arc<ResolvedMaterial>> {
        if let Some(material) = self.get(canonical_name) {
            log::debug!("Brush material cache hit: {canonical_name}");
            return Ok(material);
        }

        let pending = {
            let mut inflight = self.inner.inflight.lock();

            // A load may have finished between the cache check and the lock.
            if let Some(material) = self.get(canonical_name) {
                return Ok(material);
            }

            if let Some(pending) = inflight.get(canonical_name) {
                log::debug!("Joining pending brush load: {canonical_name}");
                pending.future.clone()
            } else {
                let descriptor = self
                    .inner
                    .catalog
                    .lookup(canonical_name)
                    .cloned()
                    .ok_or_else(|| BrushError::UnknownBrush(canonical_name.to_string()))?;

                log::debug!("Brush material cache miss: {canonical_name}");
                let id = self.inner.next_load_id.fetch_add(1, Ordering::Relaxed);
                let future = Self::spawn_load(self.inner.clone(), descriptor, id);
                inflight.insert(
                    canonical_name.to_string(),
                    PendingLoad {
                        id,
                        future: future.clone(),
                    },
                );
                future
            }
        };

        pending.await
    }

    fn spawn_load(inner: Arc<LoaderInner>, descriptor: BrushDescriptor, id: u64) -> SharedLoad {
        async move {
            let result = build_material(&inner, &descriptor).await.map(Arc::new);

            let mut inflight = inner.inflight.lock();
            let registered = inflight
                .get(&descriptor.canonical_name)
                .is_some_and(|p| p.id == id);
            if registered {
                if let Ok(material) = &result {
                    inner
                        .cache
                        .write()
                        .insert(descriptor.canonical_name.clone(), material.clone());
                }
                inflight.remove(&descriptor.canonical_name);
            }
            result
        }
        .boxed()
        .shared()
    }
}

// ============================================================================
// Material assembly
// ============================================================================

async fn build_material(inner: &LoaderInner, descriptor: &BrushDescriptor) -> Result<ResolvedMaterial> {
    let brush = descriptor.canonical_name.as_str();

    let (vertex, fragment) = futures::future::join(
        fetch_shader(inner, brush, &descriptor.shaders.vertex),
        fetch_shader(inner, brush, &descriptor.shaders.fragment),
    )
    .await;
    let (vertex_shader, fragment_shader) = (vertex?, fragment?);

    let textures = futures::future::join_all(
        descriptor
            .texture_slots()
            .map(|(slot, path)| fetch_texture(inner, brush, slot, path)),
    )
    .await;
    let mut textures: FxHashMap<&str, Option<Arc<Texture>>> = descriptor
        .texture_slots()
        .map(|(slot, _)| slot)
        .zip(textures)
        .collect();

    let uniforms: Vec<MaterialUniform> = descriptor
        .uniforms
        .iter()
        .map(|decl| {
            let value = match &decl.value {
                UniformValue::Texture(_) => {
                    MaterialValue::Texture(textures.remove(decl.name.as_str()).flatten())
                }
                other => MaterialValue::from_declared(other).unwrap_or(MaterialValue::Float(0.0)),
            };
            MaterialUniform {
                name: decl.name.clone(),
                value,
                semantic: decl.semantic,
            }
        })
        .collect();

    log::debug!(
        "Built brush material {} ({} uniforms)",
        descriptor.material_name(),
        uniforms.len()
    );

    Ok(ResolvedMaterial {
        uuid: Uuid::new_v4(),
        name: descriptor.material_name(),
        brush: brush.to_string(),
        vertex_shader,
        fragment_shader,
        uniforms,
        render_state: descriptor.render_state,
    })
}

async fn fetch_shader(inner: &LoaderInner, brush: &str, path: &str) -> Result<String> {
    inner.reader.read_text(path).await.map_err(|e| {
        let err = BrushError::ShaderFetch {
            brush: brush.to_string(),
            path: path.to_string(),
            reason: e.to_string(),
        };
        log::error!("{err}");
        err
    })
}

/// Loads one texture slot; failures leave the slot unbound.
async fn fetch_texture(
    inner: &LoaderInner,
    brush: &str,
    slot: &str,
    path: &str,
) -> Option<Arc<Texture>> {
    let label = format!("{brush}_{}", slot.strip_prefix("u_").unwrap_or(slot));

    let result = match inner.reader.read_bytes(path).await {
        Ok(bytes) => decode_texture_async(bytes, label).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(mut texture) => {
            texture.generate_mipmaps = inner.generate_mipmaps;
            Some(Arc::new(texture))
        }
        Err(e) => {
            let err = BrushError::TextureFetch {
                brush: brush.to_string(),
                slot: slot.to_string(),
                reason: e.to_string(),
            };
            log::warn!("{err}");
            None
        }
    }
}

async fn decode_texture_async(bytes: Vec<u8>, label: String) -> Result<Texture> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        // Native: Offload to blocking thread
        tokio::task::spawn_blocking(move || decode_texture_cpu(&bytes, &label)).await?
    }
    #[cfg(target_arch = "wasm32")]
    {
        decode_texture_cpu(&bytes, &label)
    }
}

fn decode_texture_cpu(bytes: &[u8], label: &str) -> Result<Texture> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| BrushError::ImageDecode(format!("Failed to decode image {label}: {e}")))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Texture::new_2d(
        label,
        width,
        height,
        rgba.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
    ))
}
