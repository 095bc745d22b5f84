// Per-frame image processing.
// 1) Contrast-limited adaptive histogram equalisation (CLAHE) on luma, so the hand detector
//    still finds hands in dim or uneven light.
// 2) The weighted blend that lays the drawing canvas over the live camera image.
use crate::error::Error;
use crate::types::FrameBuffer;
use image::RgbImage;

/// Default CLAHE clip limit (multiples of the mean bin height).
pub const CLIP_LIMIT: f32 = 2.0;
/// Default tile grid (tiles per axis).
pub const TILE_GRID: usize = 8;

/// Integer BT.601 luma.
#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8) as u8
}

pub struct Clahe {
    clip_limit: f32,
    tiles: usize,
}

impl Clahe {
    pub fn new(clip_limit: f32, tiles: usize) -> Self {
        Self { clip_limit, tiles: tiles.max(1) }
    }

    /// Equalise luma tile by tile and shift all three channels by the luma change.
    /// Visual: shadows open up and flat lighting gains contrast; colours keep their hue.
    pub fn apply(&self, img: &RgbImage) -> RgbImage {
        let (w, h) = (img.width() as usize, img.height() as usize);
        if w == 0 || h == 0 {
            return img.clone();
        }
        let tx = self.tiles.min(w);
        let ty = self.tiles.min(h);

        let lumas: Vec<u8> = img.pixels().map(|p| luma(p[0], p[1], p[2])).collect();

        // Tile edges; the last tile absorbs any remainder.
        let xb: Vec<usize> = (0..=tx).map(|i| i * w / tx).collect();
        let yb: Vec<usize> = (0..=ty).map(|j| j * h / ty).collect();

        let mut luts = vec![[0u8; 256]; tx * ty];
        for j in 0..ty {
            for i in 0..tx {
                let mut hist = [0u32; 256];
                for y in yb[j]..yb[j + 1] {
                    for &v in &lumas[y * w + xb[i]..y * w + xb[i + 1]] {
                        hist[v as usize] += 1;
                    }
                }
                let area = ((xb[i + 1] - xb[i]) * (yb[j + 1] - yb[j])) as u32;
                luts[j * tx + i] = clipped_lut(&mut hist, area, self.clip_limit);
            }
        }

        // Bilinear blend between the four nearest tile centres.
        let tile_w = w as f32 / tx as f32;
        let tile_h = h as f32 / ty as f32;
        let mut out = img.clone();
        for y in 0..h {
            let (y0, y1, wy) = neighbours((y as f32 + 0.5) / tile_h - 0.5, ty);
            for x in 0..w {
                let (x0, x1, wx) = neighbours((x as f32 + 0.5) / tile_w - 0.5, tx);
                let v = lumas[y * w + x] as usize;
                let at = |tj: usize, ti: usize| luts[tj * tx + ti][v] as f32;
                let top = at(y0, x0) * (1.0 - wx) + at(y0, x1) * wx;
                let bottom = at(y1, x0) * (1.0 - wx) + at(y1, x1) * wx;
                let eq = top * (1.0 - wy) + bottom * wy;
                let delta = eq.round() as i32 - v as i32;

                let px = out.get_pixel_mut(x as u32, y as u32);
                for c in px.0.iter_mut() {
                    *c = (*c as i32 + delta).clamp(0, 255) as u8;
                }
            }
        }
        out
    }
}

impl Default for Clahe {
    fn default() -> Self {
        Self::new(CLIP_LIMIT, TILE_GRID)
    }
}

/// Lower tile index, upper tile index, weight of the upper one.
fn neighbours(f: f32, n: usize) -> (usize, usize, f32) {
    if f <= 0.0 {
        return (0, 0, 0.0);
    }
    let i = f.floor() as usize;
    if i >= n - 1 {
        return (n - 1, n - 1, 0.0);
    }
    (i, i + 1, f - i as f32)
}

/// Clip the histogram, spread the excess evenly, and turn the CDF into a lookup table.
fn clipped_lut(hist: &mut [u32; 256], area: u32, clip_limit: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if area == 0 {
        return lut;
    }
    let limit = ((clip_limit * area as f32 / 256.0) as u32).max(1);
    let mut excess = 0u32;
    for b in hist.iter_mut() {
        if *b > limit {
            excess += *b - limit;
            *b = limit;
        }
    }
    let bonus = excess / 256;
    let residual = (excess % 256) as usize;
    for b in hist.iter_mut() {
        *b += bonus;
    }
    if residual > 0 {
        let step = (256 / residual).max(1);
        for i in (0..256).step_by(step).take(residual) {
            hist[i] += 1;
        }
    }

    let scale = 255.0 / area as f32;
    let mut cdf = 0u32;
    for (i, b) in hist.iter().enumerate() {
        cdf += b;
        lut[i] = (cdf as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

/// `frame = frame * frame_weight + overlay * (1 - frame_weight)`, per channel, saturating.
/// Visual: the drawing shows through the live image as a translucent layer.
pub fn blend_weighted(frame: &mut FrameBuffer, overlay: &FrameBuffer, frame_weight: f32) -> Result<(), Error> {
    if frame.width != overlay.width || frame.height != overlay.height {
        return Err(Error::Composite(format!(
            "frame {}x{} vs canvas {}x{}",
            frame.width, frame.height, overlay.width, overlay.height
        )));
    }
    let fw = frame_weight;
    let ow = 1.0 - frame_weight;
    let mix = |a: u32, b: u32| ((a as f32 * fw + b as f32 * ow).round().min(255.0)) as u32;

    for (pf, &po) in frame.pixels.iter_mut().zip(overlay.pixels.iter()) {
        let r = mix((*pf >> 16) & 0xFF, (po >> 16) & 0xFF);
        let g = mix((*pf >> 8) & 0xFF, (po >> 8) & 0xFF);
        let b = mix(*pf & 0xFF, po & 0xFF);
        *pf = (r << 16) | (g << 8) | b;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn luma_range(img: &RgbImage) -> (u8, u8) {
        img.pixels()
            .map(|p| luma(p[0], p[1], p[2]))
            .fold((u8::MAX, u8::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }

    #[test]
    fn clahe_stretches_low_contrast() {
        let img = RgbImage::from_fn(256, 256, |x, y| {
            let v = 100 + ((x + y) % 11) as u8;
            Rgb([v, v, v])
        });
        let (lo, hi) = luma_range(&img);
        let out = Clahe::default().apply(&img);
        let (olo, ohi) = luma_range(&out);
        assert_eq!(out.dimensions(), img.dimensions());
        assert!(ohi - olo > hi - lo, "range {lo}..{hi} became {olo}..{ohi}");
    }

    #[test]
    fn clahe_keeps_gray_gray() {
        let img = RgbImage::from_fn(40, 30, |x, y| {
            let v = (x * 3 + y) as u8;
            Rgb([v, v, v])
        });
        let out = Clahe::default().apply(&img);
        assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    }

    #[test]
    fn clahe_handles_tiny_images() {
        let img = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        assert_eq!(Clahe::default().apply(&img).dimensions(), (3, 2));
        let empty = RgbImage::new(0, 0);
        assert_eq!(Clahe::default().apply(&empty).dimensions(), (0, 0));
    }

    #[test]
    fn blend_mixes_seventy_thirty() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.pixels = vec![0x00C8C8C8, 0x00000000];
        let mut canvas = FrameBuffer::new(2, 1);
        canvas.pixels = vec![0x00000000, 0x00FF0000];
        blend_weighted(&mut frame, &canvas, 0.7).unwrap();
        assert_eq!(frame.pixels[0], 0x008C8C8C); // 200 * 0.7 = 140
        assert_eq!(frame.pixels[1], 0x004D0000); // 255 * 0.3 = 76.5 -> 77
    }

    #[test]
    fn blend_rejects_mismatched_sizes() {
        let mut frame = FrameBuffer::new(2, 2);
        let canvas = FrameBuffer::new(3, 2);
        assert!(matches!(blend_weighted(&mut frame, &canvas, 0.7), Err(Error::Composite(_))));
    }
}
