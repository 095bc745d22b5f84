// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the blended camera + canvas image.
// 2) Stroke primitives: thick round-capped lines, circles, discs.
// 3) The hand skeleton overlay and the cursor ring.
// 4) A tiny 5x7 bitmap font plus a slider bar for the brush-size HUD.

use crate::error::Error;
use crate::hand::{HandObservation, HAND_CONNECTIONS};
use crate::types::{FrameBuffer, Point};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image (live video).
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Q or ESC ends the session.
    pub fn exit_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape) || self.window.is_key_down(Key::Q)
    }

    /// Up/Down (or =/-) move the brush slider by one; held keys repeat.
    pub fn poll_brush(&self, slider: &mut BrushSlider) {
        let up = [Key::Up, Key::Equal, Key::NumPadPlus];
        let down = [Key::Down, Key::Minus, Key::NumPadMinus];
        if up.iter().any(|&k| self.window.is_key_pressed(k, KeyRepeat::Yes)) {
            slider.nudge(1);
        }
        if down.iter().any(|&k| self.window.is_key_pressed(k, KeyRepeat::Yes)) {
            slider.nudge(-1);
        }
    }
}

/// Integer brush-size control in `0..=MAX`.
#[derive(Debug, Clone, Copy)]
pub struct BrushSlider {
    value: u32,
}

impl BrushSlider {
    pub const MAX: u32 = 100;

    pub fn new(initial: u32) -> Self {
        Self { value: initial.min(Self::MAX) }
    }

    pub fn nudge(&mut self, delta: i32) {
        self.value = (self.value as i32 + delta).clamp(0, Self::MAX as i32) as u32;
    }

    /// Raw slider position.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Brush width in pixels; a zero slider still paints 1 px.
    pub fn read(&self) -> u32 {
        self.value.max(1)
    }
}

/* ---------- Software drawing: pixels, lines, circles ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a straight 1-pixel line appears on top of the image.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Clamp an inclusive pixel range to `0..len`; empty when fully outside.
fn clip_range(lo: i32, hi: i32, len: usize) -> (i32, i32) {
    (lo.max(0), hi.min(len as i32 - 1))
}

/// Draw a `width`-pixel line with round caps: every pixel within width/2 of the segment.
/// Visual: consecutive segments join into one smooth brush path.
pub fn draw_thick_line(fb: &mut FrameBuffer, a: Point, b: Point, width: u32, color: u32) {
    if width <= 1 {
        draw_line(fb, a.x, a.y, b.x, b.y, color);
        return;
    }
    let r = width as f32 / 2.0;
    let r2 = r * r;
    let pad = r.ceil() as i32;
    let (x_lo, x_hi) = clip_range(a.x.min(b.x) - pad, a.x.max(b.x) + pad, fb.width);
    let (y_lo, y_hi) = clip_range(a.y.min(b.y) - pad, a.y.max(b.y) + pad, fb.height);

    let dx = (b.x - a.x) as f32;
    let dy = (b.y - a.y) as f32;
    let len2 = dx * dx + dy * dy;

    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let px = (x - a.x) as f32;
            let py = (y - a.y) as f32;
            // Project onto the segment, clamped to its ends (that is what rounds the caps)
            let t = if len2 > 0.0 { ((px * dx + py * dy) / len2).clamp(0.0, 1.0) } else { 0.0 };
            let ex = px - t * dx;
            let ey = py - t * dy;
            if ex * ex + ey * ey <= r2 {
                fb.pixels[y as usize * fb.width + x as usize] = color;
            }
        }
    }
}

/// Filled disc of `radius` pixels.
pub fn draw_disc(fb: &mut FrameBuffer, c: Point, radius: i32, color: u32) {
    draw_ring(fb, c, 0.0, radius as f32, color);
}

/// Circle outline of `radius`, `thickness` pixels wide, centered on the radius.
/// Visual: the cursor ring that shows where (and how wide) the brush lands.
pub fn draw_circle(fb: &mut FrameBuffer, c: Point, radius: u32, thickness: u32, color: u32) {
    let half = thickness as f32 / 2.0;
    let inner = (radius as f32 - half).max(0.0);
    draw_ring(fb, c, inner, radius as f32 + half, color);
}

fn draw_ring(fb: &mut FrameBuffer, c: Point, inner: f32, outer: f32, color: u32) {
    let pad = outer.ceil() as i32;
    let (x_lo, x_hi) = clip_range(c.x - pad, c.x + pad, fb.width);
    let (y_lo, y_hi) = clip_range(c.y - pad, c.y + pad, fb.height);
    let (in2, out2) = (inner * inner, outer * outer);
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dx = (x - c.x) as f32;
            let dy = (y - c.y) as f32;
            let d2 = dx * dx + dy * dy;
            if d2 >= in2 && d2 <= out2 {
                fb.pixels[y as usize * fb.width + x as usize] = color;
            }
        }
    }
}

/// Axis-aligned filled rectangle.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let (x_lo, x_hi) = clip_range(x, x + w - 1, fb.width);
    let (y_lo, y_hi) = clip_range(y, y + h - 1, fb.height);
    for yy in y_lo..=y_hi {
        for xx in x_lo..=x_hi {
            fb.pixels[yy as usize * fb.width + xx as usize] = color;
        }
    }
}

/// Bones as thin lines, joints as small dots.
/// Visual: the tracked hand skeleton sits on top of your real hand.
pub fn draw_hand(fb: &mut FrameBuffer, hand: &HandObservation, bone: u32, joint: u32) {
    let (w, h) = (fb.width, fb.height);
    for &(a, b) in HAND_CONNECTIONS.iter() {
        let pa = hand.pixel(a, w, h);
        let pb = hand.pixel(b, w, h);
        draw_thick_line(fb, pa, pb, 2, bone);
    }
    for i in 0..hand.landmarks.len() {
        draw_disc(fb, hand.pixel(i, w, h), 3, joint);
    }
}

/// Slider bar: outline plus a filled part proportional to `value / max`.
pub fn draw_slider(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, value: u32, max: u32, color: u32) {
    draw_line(fb, x, y, x + w, y, color);
    draw_line(fb, x, y + h, x + w, y + h, color);
    draw_line(fb, x, y, x, y + h, color);
    draw_line(fb, x + w, y, x + w, y + h, color);
    let filled = if max == 0 { 0 } else { (w - 2) * value.min(max) as i32 / max as i32 };
    fill_rect(fb, x + 1, y + 1, filled, h - 1, color);
}

/* ---------- 5x7 bitmap font (the ASCII subset the HUD uses) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters for BRUSH / PX / DRAW / ERASE / IDLE / FPS
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),

        // Punctuation: space, vertical bar, colon, dot
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel a `scale` x `scale` block.
/// Visual: a glyph appears with a black shadow offset by one block for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, scale: i32, color: u32) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (offset, c) in [(scale, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let px = x + rx * scale + offset;
                    let py = y + ry as i32 * scale + offset;
                    fill_rect(fb, px, py, scale, scale, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; returns the x just past the last glyph.
/// Visual: a compact HUD string appears; each glyph is 5x7 with 1-pixel spacing (times scale).
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, scale: i32, color: u32) -> i32 {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, scale, color);
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0x00FF0000;

    #[test]
    fn slider_clamps_and_reads_at_least_one() {
        let mut s = BrushSlider::new(250);
        assert_eq!(s.value(), 100);
        s.nudge(5);
        assert_eq!(s.value(), 100);

        let mut s = BrushSlider::new(1);
        s.nudge(-3);
        assert_eq!(s.value(), 0);
        assert_eq!(s.read(), 1);
        s.nudge(9);
        assert_eq!(s.read(), 9);
    }

    #[test]
    fn thin_line_hits_both_ends() {
        let mut fb = FrameBuffer::new(20, 20);
        draw_line(&mut fb, 2, 3, 15, 11, RED);
        assert_eq!(fb.get(2, 3), Some(RED));
        assert_eq!(fb.get(15, 11), Some(RED));
    }

    #[test]
    fn thick_line_covers_width_and_round_caps() {
        let mut fb = FrameBuffer::new(64, 64);
        draw_thick_line(&mut fb, Point::new(10, 30), Point::new(50, 30), 10, RED);
        // Body: 5 px either side of the axis.
        assert_eq!(fb.get(30, 25), Some(RED));
        assert_eq!(fb.get(30, 35), Some(RED));
        assert_eq!(fb.get(30, 36), Some(0));
        // Round cap past the end point, but not the square corner.
        assert_eq!(fb.get(54, 30), Some(RED));
        assert_eq!(fb.get(55, 35), Some(0));
    }

    #[test]
    fn thick_line_off_screen_is_clipped() {
        let mut fb = FrameBuffer::new(16, 16);
        draw_thick_line(&mut fb, Point::new(-40, -40), Point::new(-20, -30), 6, RED);
        assert!(fb.pixels.iter().all(|&p| p == 0));
        draw_thick_line(&mut fb, Point::new(-5, 8), Point::new(40, 8), 4, RED);
        assert_eq!(fb.get(0, 8), Some(RED));
        assert_eq!(fb.get(15, 8), Some(RED));
    }

    #[test]
    fn circle_is_hollow() {
        let mut fb = FrameBuffer::new(40, 40);
        draw_circle(&mut fb, Point::new(20, 20), 10, 2, RED);
        assert_eq!(fb.get(30, 20), Some(RED));
        assert_eq!(fb.get(20, 10), Some(RED));
        assert_eq!(fb.get(20, 20), Some(0));
    }

    #[test]
    fn text_advances_by_glyph_width() {
        let mut fb = FrameBuffer::new(100, 30);
        let end = draw_text_5x7(&mut fb, 4, 4, "px 10", 2, RED);
        assert_eq!(end, 4 + 5 * 12);
        assert!(fb.pixels.iter().any(|&p| p == RED));
    }
}
