use cubeview_common::{Color, Transform};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned box centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Scale that maps a unit cube onto this box.
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// Blinn-Phong surface description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhongMaterial {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
        }
    }
}

impl PhongMaterial {
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// Geometry plus material, placed by a transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub geometry: BoxGeometry,
    pub material: PhongMaterial,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: BoxGeometry, material: PhongMaterial) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::default(),
        }
    }

    /// Model matrix for a unit cube scaled to the geometry, then placed.
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix() * Mat4::from_scale(self.geometry.size())
    }
}

/// Light shining from `position` towards `target`, parallel rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            position: Vec3::Y,
            target: Vec3::ZERO,
        }
    }

    /// Unit vector pointing from the lit surface towards the light.
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }
}
