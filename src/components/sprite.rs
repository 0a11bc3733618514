use raylib::prelude::Vector2;

/// A frame of a sprite sheet placed in the world.
///
/// `frame` indexes the sheet left to right, top to bottom, in cells of
/// `frame_width` x `frame_height`. `origin` is the pivot as a fraction of the
/// frame size, so `(0.5, 0.5)` centers the sprite on `position`.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tex_key: String,
    pub frame_width: f32,
    pub frame_height: f32,
    pub position: Vector2,
    pub origin: Vector2,
    pub flip_x: bool,
    pub frame: u32,
    pub visible: bool,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>, frame_width: f32, frame_height: f32, position: Vector2) -> Self {
        Self {
            tex_key: tex_key.into(),
            frame_width,
            frame_height,
            position,
            origin: Vector2 { x: 0.5, y: 0.5 },
            flip_x: false,
            frame: 0,
            visible: true,
        }
    }

    /// Pivot in pixels from the frame's top-left corner.
    pub fn pivot(&self) -> Vector2 {
        Vector2 {
            x: self.origin.x * self.frame_width,
            y: self.origin.y * self.frame_height,
        }
    }

    /// Top-left corner of the current frame on a sheet `columns` cells wide.
    pub fn frame_offset(&self, columns: u32) -> Vector2 {
        let columns = columns.max(1);
        Vector2 {
            x: (self.frame % columns) as f32 * self.frame_width,
            y: (self.frame / columns) as f32 * self.frame_height,
        }
    }
}
