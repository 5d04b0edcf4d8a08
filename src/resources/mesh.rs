use std::sync::Arc;

use crate::brushes::animator::{FrameContext, MaterialAnimator};
use crate::resources::geometry::Geometry;
use crate::resources::material::{MaterialValue, ResolvedMaterial};

/// A brush material bound to one mesh.
///
/// The material is shared with every other mesh painted with the same brush;
/// the animator holds this mesh's live per-frame values.
#[derive(Debug, Clone)]
pub struct BrushBinding {
    pub material: Arc<ResolvedMaterial>,
    pub animator: MaterialAnimator,
}

impl BrushBinding {
    #[must_use]
    pub fn new(material: Arc<ResolvedMaterial>) -> Self {
        let animator = MaterialAnimator::new(&material);
        Self { material, animator }
    }

    /// Current value of a uniform: the live value if animated, else the
    /// material default.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<MaterialValue> {
        let index = self.material.uniform_index(name)?;
        match self.animator.live_value(index) {
            Some(live) => Some(live.into()),
            None => Some(self.material.uniforms[index].value.clone()),
        }
    }

    #[inline]
    pub fn on_before_render(&mut self, ctx: &FrameContext) {
        self.animator.on_before_render(ctx);
    }
}

#[derive(Debug, Clone)]
pub enum MeshMaterial {
    /// Whatever the format loader assigned before brush resolution.
    Placeholder { name: String },
    Brush(BrushBinding),
}

impl MeshMaterial {
    #[must_use]
    pub fn as_brush(&self) -> Option<&BrushBinding> {
        match self {
            Self::Brush(binding) => Some(binding),
            Self::Placeholder { .. } => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Placeholder { name } => name,
            Self::Brush(binding) => &binding.material.name,
        }
    }
}

impl Default for MeshMaterial {
    fn default() -> Self {
        Self::Placeholder {
            name: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,

    pub geometry: Geometry,
    pub material: MeshMaterial,

    /// Brush identifier recorded by the document, if any.
    pub brush: Option<String>,
    /// Index of the document material this mesh was authored with.
    pub source_material: Option<usize>,

    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            name: "Mesh".to_string(),
            geometry,
            material: MeshMaterial::default(),
            brush: None,
            source_material: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_brush(mut self, identifier: impl Into<String>) -> Self {
        self.brush = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_source_material(mut self, index: usize) -> Self {
        self.source_material = Some(index);
        self
    }

    pub fn brush_binding(&self) -> Option<&BrushBinding> {
        self.material.as_brush()
    }

    pub fn brush_binding_mut(&mut self) -> Option<&mut BrushBinding> {
        match &mut self.material {
            MeshMaterial::Brush(binding) => Some(binding),
            MeshMaterial::Placeholder { .. } => None,
        }
    }
}
