//! Brush Resolver
//!
//! The entry point a format loader calls once it has built a scene with
//! placeholder materials. For every mesh it:
//!
//! 1. normalizes the brush identifier to a canonical name,
//! 2. takes the descriptor from the catalog,
//! 3. remaps the mesh geometry to the brush's attribute slots,
//! 4. awaits the shared material from the [`ShaderResourceLoader`],
//! 5. swaps the material in and attaches a
//!    [`MaterialAnimator`](crate::brushes::MaterialAnimator).
//!
//! Resolution is best-effort: an unknown identifier or an unreachable shader
//! only affects its own mesh. Only a malformed document header aborts the
//! whole load.
//!
//! ```rust,ignore
//! let resolver = BrushResolver::from_config(&BrushConfig::default())?;
//! let report = resolver.resolve_document(&mut scene, &document_json).await?;
//! log::info!("{} brushes resolved", report.resolved.len());
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::assets::shader_loader::ShaderResourceLoader;
use crate::brushes::catalog::BrushCatalog;
use crate::brushes::descriptor::BrushDescriptor;
use crate::brushes::normalize::MatchRule;
use crate::brushes::remap::{AttributeRemapper, RemapReport};
use crate::config::BrushConfig;
use crate::errors::{BrushError, Result};
use crate::formats;
use crate::resources::material::ResolvedMaterial;
use crate::resources::mesh::{BrushBinding, Mesh, MeshMaterial};
use crate::scene::{MeshKey, Scene};

/// Result of resolving one mesh.
#[derive(Debug, Clone)]
pub struct ResolvedBrush {
    pub canonical_name: String,
    pub rule: MatchRule,
    pub material: Arc<ResolvedMaterial>,
    pub remap: RemapReport,
}

/// Per-mesh outcome of a batch resolution.
#[derive(Debug, Default)]
pub struct ResolveReport {
    /// Meshes that received a brush material, with the canonical name.
    pub resolved: Vec<(MeshKey, String)>,
    /// Meshes whose identifier matched no brush; they keep their placeholder.
    pub unresolved: Vec<(MeshKey, String)>,
    /// Meshes whose brush failed to load.
    pub failed: Vec<(MeshKey, BrushError)>,
    /// Required attribute slots that had no source, per mesh.
    pub missing_attributes: Vec<(MeshKey, BrushError)>,
    /// Meshes that carry no brush identifier at all.
    pub skipped: usize,
}

impl ResolveReport {
    /// `true` if every mesh with an identifier got its brush.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.failed.is_empty()
    }

    #[must_use]
    pub fn canonical_name_of(&self, key: MeshKey) -> Option<&str> {
        self.resolved
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, name)| name.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct BrushResolver {
    catalog: Arc<BrushCatalog>,
    loader: ShaderResourceLoader,
    remapper: AttributeRemapper,
}

impl BrushResolver {
    #[must_use]
    pub fn new(loader: ShaderResourceLoader) -> Self {
        Self {
            catalog: loader.catalog().clone(),
            loader,
            remapper: AttributeRemapper::new(),
        }
    }

    /// Resolver over the built-in catalog, reading from `config.base_path`.
    pub fn from_config(config: &BrushConfig) -> Result<Self> {
        let loader = ShaderResourceLoader::from_config(BrushCatalog::builtin(), config)?;
        Ok(Self::new(loader)
            .with_remapper(AttributeRemapper::new().with_color_conversion(config.convert_vertex_colors)))
    }

    #[must_use]
    pub fn with_remapper(mut self, remapper: AttributeRemapper) -> Self {
        self.remapper = remapper;
        self
    }

    pub fn loader(&self) -> &ShaderResourceLoader {
        &self.loader
    }

    pub fn catalog(&self) -> &Arc<BrushCatalog> {
        &self.catalog
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    pub fn lookup_canonical_name(&self, identifier: &str) -> Option<&str> {
        self.catalog.canonical_name(identifier)
    }

    #[must_use]
    pub fn lookup_descriptor(&self, canonical_name: &str) -> Option<&BrushDescriptor> {
        self.catalog.lookup(canonical_name)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolves one mesh's brush and installs the material on it.
    ///
    /// On [`BrushError::UnresolvedIdentifier`] the mesh is left untouched. On
    /// a shader failure the geometry is already remapped but the material
    /// stays the placeholder.
    pub async fn resolve_brush_for_mesh(
        &self,
        mesh: &mut Mesh,
        identifier: &str,
    ) -> Result<ResolvedBrush> {
        let (descriptor, rule) = match self.catalog.normalize_with_rule(identifier) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("Mesh {}: {err}; keeping {}", mesh.name, mesh.material.name());
                return Err(err);
            }
        };

        let remap = self.remapper.remap(&mut mesh.geometry, descriptor);

        let material = self.loader.load(&descriptor.canonical_name).await?;

        mesh.material = MeshMaterial::Brush(BrushBinding::new(material.clone()));
        log::debug!(
            "Mesh {}: {identifier:?} -> {} ({rule:?})",
            mesh.name,
            descriptor.canonical_name
        );

        Ok(ResolvedBrush {
            canonical_name: descriptor.canonical_name.clone(),
            rule,
            material,
            remap,
        })
    }

    /// Resolves every mesh in the scene that carries a brush identifier.
    ///
    /// Meshes are resolved concurrently; loads of the same brush coalesce.
    pub async fn resolve_scene(&self, scene: &mut Scene) -> ResolveReport {
        let mut report = ResolveReport::default();

        let tasks: Vec<_> = scene
            .meshes
            .iter_mut()
            .filter_map(|(key, mesh)| {
                let Some(identifier) = mesh.brush.clone() else {
                    report.skipped += 1;
                    return None;
                };
                Some(async move {
                    let result = self.resolve_brush_for_mesh(mesh, &identifier).await;
                    (key, identifier, result)
                })
            })
            .collect();

        for (key, identifier, result) in futures::future::join_all(tasks).await {
            match result {
                Ok(resolved) => {
                    report
                        .missing_attributes
                        .extend(resolved.remap.missing_errors().map(|e| (key, e)));
                    report.resolved.push((key, resolved.canonical_name));
                }
                Err(BrushError::UnresolvedIdentifier(_)) => {
                    report.unresolved.push((key, identifier));
                }
                Err(err) => report.failed.push((key, err)),
            }
        }

        log::info!(
            "Resolved {} brush meshes ({} unresolved, {} failed)",
            report.resolved.len(),
            report.unresolved.len(),
            report.failed.len()
        );
        report
    }

    /// Reads brush identifiers from a scene document, then resolves the scene.
    ///
    /// Meshes without an explicit identifier take the one of their source
    /// material. Fails immediately on an unsupported document header.
    pub async fn resolve_document(&self, scene: &mut Scene, document: &Value) -> Result<ResolveReport> {
        let identifiers = formats::material_identifiers(document)?;

        for mesh in scene.meshes.values_mut() {
            if mesh.brush.is_none()
                && let Some(index) = mesh.source_material
            {
                mesh.brush = identifiers.get(index).cloned().flatten();
            }
        }

        Ok(self.resolve_scene(scene).await)
    }
}
