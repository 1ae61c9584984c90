use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Sprite is identified by a texture key, its size in world units and an
/// offset selecting the source frame when the texture is a spritesheet.
/// The animation systems write `tex_key` and `offset`; a renderer reads them.
/// The origin selects the pivot point (in pixels) relative to the texture's
/// top-left used for placement when rendering.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
    pub origin: Vec2,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Sprite {
    /// Sprite with a centred origin and no source offset.
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            offset: Vec2::ZERO,
            origin: Vec2::new(width * 0.5, height * 0.5),
            flip_h: false,
            flip_v: false,
        }
    }
}
