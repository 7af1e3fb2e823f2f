//! In-memory RGBA framebuffer
//!
//! Software surface for the headless binary and tests. Coverage is sampled at
//! pixel centres, no anti-aliasing. Glyphs become discs in the glyph's tint.

use glam::Vec2;

use super::{Color, Glow, Glyph, Surface};
use crate::error::EngineError;

/// Halo opacity relative to the glow colour
const GLOW_ALPHA: f32 = 0.35;
/// Disc radius relative to the glyph size
const GLYPH_RADIUS: f32 = 0.4;

/// RGBA8 framebuffer, row-major from the top-left
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidSurface { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Write the framebuffer as a PNG file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Source-over blend of one pixel
    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let a = color.a.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let i = self.index(x, y);
        let src = [color.r, color.g, color.b];
        for (c, s) in src.iter().enumerate() {
            let d = f32::from(self.pixels[i + c]);
            self.pixels[i + c] = (f32::from(*s) * a + d * (1.0 - a)).round() as u8;
        }
        let da = f32::from(self.pixels[i + 3]) / 255.0;
        self.pixels[i + 3] = ((a + da * (1.0 - a)) * 255.0).round() as u8;
    }

    /// Pixel range whose centres may fall inside `[min, max]`
    fn span(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let x0 = (min.x - 0.5).ceil().max(0.0);
        let y0 = (min.y - 0.5).ceil().max(0.0);
        let x1 = (max.x - 0.5).floor().min(self.width as f32 - 1.0);
        let y1 = (max.y - 0.5).floor().min(self.height as f32 - 1.0);
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Blend every pixel whose centre satisfies `inside`
    fn fill_where(&mut self, min: Vec2, max: Vec2, color: Color, inside: impl Fn(Vec2) -> bool) {
        let Some((x0, y0, x1, y1)) = self.span(min, max) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if inside(p) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn disc(&mut self, centre: Vec2, radius: f32, color: Color) {
        let r = Vec2::splat(radius);
        self.fill_where(centre - r, centre + r, color, |p| {
            p.distance_squared(centre) <= radius * radius
        });
    }

    fn ring(&mut self, centre: Vec2, radius: f32, width: f32, color: Color) {
        let half = width / 2.0;
        let r = Vec2::splat(radius + half);
        self.fill_where(centre - r, centre + r, color, |p| {
            (p.distance(centre) - radius).abs() <= half
        });
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn clear(&mut self, color: Color) {
        let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, alpha]);
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        let max = origin + size;
        self.fill_where(origin, max, color, |p| {
            p.x >= origin.x && p.x < max.x && p.y >= origin.y && p.y < max.y
        });
    }

    fn dashed_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        dash: [f32; 2],
        dash_offset: f32,
        color: Color,
    ) {
        let length = from.distance(to);
        if length <= 0.0 {
            return;
        }
        let dir = (to - from) / length;
        let half = width / 2.0;
        let period = dash[0] + dash[1];
        let pad = Vec2::splat(half);
        self.fill_where(from.min(to) - pad, from.max(to) + pad, color, |p| {
            let rel = p - from;
            let along = rel.dot(dir);
            if !(0.0..=length).contains(&along) || rel.perp_dot(dir).abs() > half {
                return false;
            }
            period <= 0.0 || (along + dash_offset).rem_euclid(period) < dash[0]
        });
    }

    fn fill_circle(&mut self, centre: Vec2, radius: f32, color: Color) {
        self.disc(centre, radius, color);
    }

    fn stroke_circle(
        &mut self,
        centre: Vec2,
        radius: f32,
        width: f32,
        color: Color,
        glow: Option<Glow>,
    ) {
        if let Some(glow) = glow {
            let halo = glow.color.with_alpha(glow.color.a * GLOW_ALPHA);
            self.ring(centre, radius, width + glow.blur, halo);
        }
        self.ring(centre, radius, width, color);
    }

    fn draw_glyph(&mut self, glyph: Glyph, centre: Vec2, glow: Option<Glow>) {
        let radius = glyph.size() * GLYPH_RADIUS;
        if let Some(glow) = glow {
            let halo = glow.color.with_alpha(glow.color.a * GLOW_ALPHA);
            self.disc(centre, radius + glow.blur / 2.0, halo);
        }
        self.disc(centre, radius, glyph.tint());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Renderer, palette};
    use crate::sim::{Entity, EntityKind, HazardVariant, RewardVariant, Simulation};
    use crate::tuning::Tuning;

    const ROAD: [u8; 4] = [0x33, 0x41, 0x55, 0xff];
    const DASH: [u8; 4] = [0x94, 0xa3, 0xb8, 0xff];

    fn rgba(c: Color) -> [u8; 4] {
        [c.r, c.g, c.b, 255]
    }

    #[test]
    fn test_zero_sized_surface_is_rejected() {
        assert!(matches!(
            RasterSurface::new(0, 10),
            Err(EngineError::InvalidSurface { width: 0, height: 10 })
        ));
        assert!(RasterSurface::new(10, 0).is_err());
    }

    #[test]
    fn test_clear_and_bounds() {
        let mut s = RasterSurface::new(4, 3).unwrap();
        s.clear(palette::ROAD);
        assert_eq!(s.pixel(0, 0), Some(ROAD));
        assert_eq!(s.pixel(3, 2), Some(ROAD));
        assert_eq!(s.pixel(4, 0), None);
        assert_eq!(s.as_bytes().len(), 4 * 3 * 4);
    }

    #[test]
    fn test_alpha_blending() {
        let mut s = RasterSurface::new(2, 2).unwrap();
        s.clear(Color::rgb(0, 0, 0));
        s.fill_rect(Vec2::ZERO, Vec2::new(1.0, 1.0), Color::rgba(255, 255, 255, 0.2));
        assert_eq!(s.pixel(0, 0), Some([51, 51, 51, 255]));
        assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_dash_pattern_scrolls() {
        let mut s = RasterSurface::new(10, 200).unwrap();
        s.clear(palette::ROAD);
        s.dashed_line(
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 200.0),
            4.0,
            [40.0, 60.0],
            0.0,
            palette::LANE_DASH,
        );
        assert_eq!(s.pixel(5, 10), Some(DASH));
        assert_eq!(s.pixel(5, 50), Some(ROAD));
        assert_eq!(s.pixel(5, 110), Some(DASH));
        // Outside the stroke width
        assert_eq!(s.pixel(0, 10), Some(ROAD));

        // A negative offset pushes the dashes down the road
        s.clear(palette::ROAD);
        s.dashed_line(
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 200.0),
            4.0,
            [40.0, 60.0],
            -30.0,
            palette::LANE_DASH,
        );
        assert_eq!(s.pixel(5, 10), Some(ROAD));
        assert_eq!(s.pixel(5, 50), Some(DASH));
    }

    #[test]
    fn test_ring_leaves_centre_empty() {
        let mut s = RasterSurface::new(100, 100).unwrap();
        s.clear(Color::rgb(0, 0, 0));
        s.stroke_circle(Vec2::splat(50.0), 45.0, 3.0, palette::SHIELD, None);
        assert_eq!(s.pixel(50, 50), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(94, 50), Some(rgba(palette::SHIELD)));
    }

    #[test]
    fn test_painted_scene() {
        let mut sim = Simulation::seeded(Tuning::default(), Vec2::new(400.0, 300.0), 0.0, 1);
        sim.entities.push(Entity {
            pos: Vec2::new(50.0, 50.0),
            kind: EntityKind::Hazard(HazardVariant::Lollipop),
        });
        sim.entities.push(Entity {
            pos: Vec2::new(350.0, 50.0),
            kind: EntityKind::Reward(RewardVariant::Toothpaste),
        });
        let mut s = RasterSurface::new(400, 300).unwrap();
        Renderer::new().paint(&mut s, &sim);

        assert_eq!(s.pixel(1, 299), Some(ROAD));
        assert_eq!(s.pixel(50, 50), Some(rgba(Glyph::Hazard(HazardVariant::Lollipop).tint())));
        assert_eq!(s.pixel(350, 50), Some(rgba(Glyph::Reward(RewardVariant::Toothpaste).tint())));
        // Player sits in lane 1, 100 above the bottom edge
        assert_eq!(s.pixel(150, 200), Some(rgba(Glyph::Player.tint())));
        // Reward halo tints the road around the glyph; hazards have none
        assert_ne!(s.pixel(350 + 20, 50), Some(ROAD));
        assert_eq!(s.pixel(50 + 20, 50), Some(ROAD));
    }
}
