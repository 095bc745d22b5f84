// The persistent drawing surface and the per-mode stroke cursors.
// Strokes are built two points at a time: each frame either starts a stroke (remembers the
// point) or joins the remembered point to the new one with a line segment. The raster is the
// only record of a stroke's history; a cursor holds just the last committed point.

use log::trace;

use crate::draw::draw_thick_line;
use crate::gesture::GestureMode;
use crate::types::{FrameBuffer, Point, Segment};

/// Opaque red.
pub const INK: u32 = 0x00FF0000;
/// Erasing paints the canvas background back in.
pub const BACKGROUND: u32 = 0x00000000;
/// Movements of at most this many pixels are treated as jitter.
pub const JITTER_PX: f32 = 2.0;

/// Session-long raster, the same size as the camera frame.
pub struct Canvas {
    surface: FrameBuffer,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self { surface: FrameBuffer::new(width, height) }
    }

    pub fn surface(&self) -> &FrameBuffer {
        &self.surface
    }

    pub fn clear(&mut self) {
        self.surface.fill(BACKGROUND);
    }

    pub fn stroke(&mut self, segment: Segment, color: u32, width: u32) {
        draw_thick_line(&mut self.surface, segment.from, segment.to, width, color);
    }
}

/// Last committed point of one mode's stroke; `None` until the stroke starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    last: Option<Point>,
}

impl Cursor {
    #[cfg(test)]
    pub fn last(&self) -> Option<Point> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Feed the current point. Returns the segment to draw, if any.
    ///
    /// Sub-threshold moves leave the cursor where it is, so slow drift still adds up to a
    /// segment once it clears the threshold.
    pub fn advance(&mut self, p: Point, jitter: f32) -> Option<Segment> {
        match self.last {
            None => {
                self.last = Some(p);
                None
            }
            Some(prev) if prev.distance(p) > jitter => {
                self.last = Some(p);
                Some(Segment { from: prev, to: p })
            }
            Some(_) => None,
        }
    }
}

/// Draw and erase cursors; at most one is live in any frame.
#[derive(Debug, Clone, Default)]
pub struct StrokeAccumulator {
    draw: Cursor,
    erase: Cursor,
}

impl StrokeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn draw_cursor(&self) -> Cursor {
        self.draw
    }

    #[cfg(test)]
    pub fn erase_cursor(&self) -> Cursor {
        self.erase
    }

    pub fn reset(&mut self) {
        self.draw.reset();
        self.erase.reset();
    }

    /// Run one frame. `point` is the active tip for `mode` (ignored when idle).
    pub fn step(
        &mut self,
        canvas: &mut Canvas,
        mode: GestureMode,
        point: Point,
        brush: u32,
    ) -> Option<Segment> {
        let (cursor, color) = match mode {
            GestureMode::Draw => {
                self.erase.reset();
                (&mut self.draw, INK)
            }
            GestureMode::Erase => {
                self.draw.reset();
                (&mut self.erase, BACKGROUND)
            }
            GestureMode::Idle => {
                self.reset();
                return None;
            }
        };

        let segment = cursor.advance(point, JITTER_PX)?;
        trace!("{mode:?} segment {:?} -> {:?} width {brush}", segment.from, segment.to);
        canvas.stroke(segment, color, brush);
        Some(segment)
    }
}
