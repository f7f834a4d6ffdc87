//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const SKY_BAND: [f32; 4] = [0.06, 0.05, 0.14, 1.0];
    pub const GROUND: [f32; 4] = [0.16, 0.13, 0.2, 1.0];
    pub const GROUND_EDGE: [f32; 4] = [0.35, 0.3, 0.45, 1.0];

    pub const ICE: [f32; 4] = [0.35, 0.75, 1.0, 1.0];
    pub const ICE_DARK: [f32; 4] = [0.15, 0.35, 0.6, 1.0];
    pub const FIRE: [f32; 4] = [1.0, 0.45, 0.15, 1.0];
    pub const FIRE_DARK: [f32; 4] = [0.6, 0.18, 0.05, 1.0];

    pub const HITSTUN_FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const KNOCKED_DOWN: [f32; 4] = [0.3, 0.3, 0.32, 1.0];
    pub const SHIELD: [f32; 4] = [0.5, 0.9, 1.0, 0.35];
    pub const HITBOX: [f32; 4] = [1.0, 0.95, 0.6, 0.9];
    pub const CAST_GLOW: [f32; 4] = [1.0, 1.0, 0.7, 0.4];

    pub const BAR_BACK: [f32; 4] = [0.12, 0.12, 0.15, 1.0];
    pub const HEALTH: [f32; 4] = [0.25, 0.85, 0.35, 1.0];
    pub const HEALTH_LOW: [f32; 4] = [0.95, 0.25, 0.2, 1.0];
    pub const ENERGY: [f32; 4] = [0.3, 0.5, 1.0, 1.0];
    pub const ENERGY_READY: [f32; 4] = [0.55, 0.75, 1.0, 1.0];
    pub const PIP_EMPTY: [f32; 4] = [0.25, 0.25, 0.3, 1.0];
    pub const PIP_WON: [f32; 4] = [1.0, 0.85, 0.2, 1.0];

    pub const TEXT: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
    pub const COMBO: [f32; 4] = [1.0, 0.8, 0.2, 1.0];
    pub const BANNER: [f32; 4] = [0.0, 0.0, 0.0, 0.55];

    pub const SPARK: [f32; 4] = [1.0, 0.95, 0.7, 1.0];
    pub const GUARD: [f32; 4] = [0.6, 0.85, 1.0, 1.0];

    pub const TOUCH_BUTTON: [f32; 4] = [1.0, 1.0, 1.0, 0.18];
    pub const TOUCH_BUTTON_HELD: [f32; 4] = [1.0, 1.0, 1.0, 0.4];

    /// Same color with alpha scaled
    pub fn fade(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
    }
}
