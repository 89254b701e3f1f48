//! World/screen coordinate mapping.
//!
//! The [`Viewport`] owns the visible world-space rectangle and the screen
//! size, and provides the affine transforms every other component relies on.
//! Zoom is derived: `screen_width / world_width`. All pan/zoom requests are
//! clamped into bounds, never rejected with an error.

/// A rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WorldRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Axis-aligned intersection test. Touching edges do not intersect.
    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Normalize so width/height are non-negative, moving the origin as
    /// needed. Used for drag rectangles that may be drawn in any direction.
    pub fn normalized(&self) -> WorldRect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        WorldRect { x, y, width, height }
    }
}

/// Maps between world and screen coordinates.
#[derive(Debug, Clone)]
pub struct Viewport {
    rect: WorldRect,
    screen_width: f32,
    screen_height: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl Viewport {
    /// Create a viewport showing the world at zoom 1, origin at (0, 0).
    pub fn new(screen_width: f32, screen_height: f32, min_zoom: f32, max_zoom: f32) -> Self {
        Self {
            rect: WorldRect::new(0.0, 0.0, screen_width, screen_height),
            screen_width,
            screen_height,
            min_zoom,
            max_zoom,
        }
    }

    /// The visible world-space rectangle.
    pub fn world_rect(&self) -> WorldRect {
        self.rect
    }

    /// Current zoom scale, derived from the world rect width.
    pub fn zoom(&self) -> f32 {
        if self.rect.width > 0.0 {
            self.screen_width / self.rect.width
        } else {
            1.0
        }
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_width, self.screen_height)
    }

    /// Resize the screen, preserving the current zoom and world origin.
    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let zoom = self.zoom();
        self.screen_width = width;
        self.screen_height = height;
        self.rect.width = width / zoom;
        self.rect.height = height / zoom;
    }

    /// Translate the view by a screen-space delta.
    ///
    /// Screen deltas are converted to world deltas via the
    /// `world_width / screen_width` ratio.
    pub fn pan_by(&mut self, dx_screen: f32, dy_screen: f32) {
        let ratio = self.rect.width / self.screen_width;
        self.rect.x += dx_screen * ratio;
        self.rect.y += dy_screen * ratio;
    }

    /// Scale the world rect by `factor` about a fixed world-space pivot.
    ///
    /// `factor > 1` zooms out (more world visible), `factor < 1` zooms in.
    /// The factor is clamped so the derived zoom stays within bounds;
    /// out-of-bounds requests are adjusted, never errors.
    pub fn zoom_at(&mut self, factor: f32, pivot_x: f32, pivot_y: f32) {
        if factor <= 0.0 {
            return;
        }
        // zoom = screen_w / (world_w * factor); solve for the factor that
        // lands exactly on each bound.
        let current = self.zoom();
        let target = current / factor;
        let clamped = target.clamp(self.min_zoom, self.max_zoom);
        let factor = current / clamped;

        self.rect.x = pivot_x - (pivot_x - self.rect.x) * factor;
        self.rect.y = pivot_y - (pivot_y - self.rect.y) * factor;
        self.rect.width *= factor;
        self.rect.height *= factor;
    }

    /// Convert a screen-space point to world space.
    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        (
            self.rect.x + sx * self.rect.width / self.screen_width,
            self.rect.y + sy * self.rect.height / self.screen_height,
        )
    }

    /// Convert a world-space point to screen space.
    pub fn world_to_screen(&self, wx: f32, wy: f32) -> (f32, f32) {
        (
            (wx - self.rect.x) * self.screen_width / self.rect.width,
            (wy - self.rect.y) * self.screen_height / self.rect.height,
        )
    }

    /// Convert a screen-space length to world units.
    pub fn screen_to_world_len(&self, len: f32) -> f32 {
        len * self.rect.width / self.screen_width
    }
}
