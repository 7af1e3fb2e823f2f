//! Scene painting
//!
//! The [`Renderer`] reads a [`Simulation`] and issues canvas-style calls on a
//! [`Surface`]. It never mutates game state; the engine emits exhaust after
//! the paint step.

pub mod raster;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use raster::RasterSurface;

use glam::Vec2;

use crate::sim::{EntityKind, HazardVariant, ParticleTint, RewardVariant, Simulation};

/// Straight (non-premultiplied) RGBA colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string for canvas styles
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

/// Scene palette
pub mod palette {
    use super::Color;

    pub const ROAD: Color = Color::rgb(0x33, 0x41, 0x55);
    pub const LANE_DASH: Color = Color::rgb(0x94, 0xa3, 0xb8);
    pub const REWARD_GLOW: Color = Color::rgb(0x00, 0xcc, 0xff);
    pub const SHIELD: Color = Color::rgb(0x00, 0xff, 0xff);
    pub const MOTION_BLUR: Color = Color::rgba(255, 255, 255, 0.2);

    pub const PARTICLE_RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const PARTICLE_WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const PARTICLE_CYAN: Color = Color::rgb(0x00, 0xff, 0xff);
}

impl From<ParticleTint> for Color {
    fn from(tint: ParticleTint) -> Self {
        match tint {
            ParticleTint::Red => palette::PARTICLE_RED,
            ParticleTint::White => palette::PARTICLE_WHITE,
            ParticleTint::Cyan => palette::PARTICLE_CYAN,
        }
    }
}

/// Sprite drawn as an emoji on canvas, a coloured disc on the raster surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Player,
    Hazard(HazardVariant),
    Reward(RewardVariant),
}

impl Glyph {
    pub fn emoji(self) -> &'static str {
        match self {
            Glyph::Player => "\u{1F9B7}",
            Glyph::Hazard(HazardVariant::Burger) => "\u{1F354}",
            Glyph::Hazard(HazardVariant::Lollipop) => "\u{1F36D}",
            Glyph::Hazard(HazardVariant::Soda) => "\u{1F964}",
            Glyph::Hazard(HazardVariant::IceCream) => "\u{1F366}",
            Glyph::Reward(RewardVariant::Toothbrush) => "\u{1FAA5}",
            Glyph::Reward(RewardVariant::Toothpaste) => "\u{1F9F4}",
            Glyph::Reward(RewardVariant::Floss) => "\u{1F9F5}",
            Glyph::Reward(RewardVariant::Mouthwash) => "\u{1F9EA}",
        }
    }

    /// Dominant colour of the emoji, used where text cannot be drawn
    pub fn tint(self) -> Color {
        match self {
            Glyph::Player => Color::rgb(0xf8, 0xfa, 0xfc),
            Glyph::Hazard(HazardVariant::Burger) => Color::rgb(0xb4, 0x6a, 0x2c),
            Glyph::Hazard(HazardVariant::Lollipop) => Color::rgb(0xec, 0x48, 0x99),
            Glyph::Hazard(HazardVariant::Soda) => Color::rgb(0xdc, 0x26, 0x26),
            Glyph::Hazard(HazardVariant::IceCream) => Color::rgb(0xfd, 0xe6, 0x8a),
            Glyph::Reward(RewardVariant::Toothbrush) => Color::rgb(0x38, 0xbd, 0xf8),
            Glyph::Reward(RewardVariant::Toothpaste) => Color::rgb(0x22, 0xc5, 0x5e),
            Glyph::Reward(RewardVariant::Floss) => Color::rgb(0xe5, 0xe7, 0xeb),
            Glyph::Reward(RewardVariant::Mouthwash) => Color::rgb(0xa8, 0x55, 0xf7),
        }
    }

    /// Nominal glyph height (font size on canvas)
    pub fn size(self) -> f32 {
        match self {
            Glyph::Player => 50.0,
            _ => 40.0,
        }
    }
}

impl From<EntityKind> for Glyph {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Hazard(v) => Glyph::Hazard(v),
            EntityKind::Reward(v) => Glyph::Reward(v),
        }
    }
}

/// Soft halo around a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Color,
    pub blur: f32,
}

/// Canvas-like drawing target
pub trait Surface {
    /// Drawable size in pixels
    fn size(&self) -> Vec2;

    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    /// Stroke a line with an on/off dash pattern shifted by `dash_offset`
    fn dashed_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        dash: [f32; 2],
        dash_offset: f32,
        color: Color,
    );

    fn fill_circle(&mut self, centre: Vec2, radius: f32, color: Color);

    fn stroke_circle(
        &mut self,
        centre: Vec2,
        radius: f32,
        width: f32,
        color: Color,
        glow: Option<Glow>,
    );

    /// Draw a glyph centred on `centre`
    fn draw_glyph(&mut self, glyph: Glyph, centre: Vec2, glow: Option<Glow>);
}

/// Lane divider dash pattern (on, off)
pub const LANE_DASH: [f32; 2] = [40.0, 60.0];
const LANE_DASH_WIDTH: f32 = 4.0;
const REWARD_GLOW_BLUR: f32 = 15.0;
const SHIELD_RADIUS: f32 = 45.0;
const SHIELD_WIDTH: f32 = 3.0;
const SHIELD_GLOW_BLUR: f32 = 10.0;
/// Motion blur streak relative to the player anchor
const MOTION_BLUR_OFFSET: Vec2 = Vec2::new(-15.0, 20.0);
const MOTION_BLUR_SIZE: Vec2 = Vec2::new(30.0, 40.0);

/// Stateless scene painter
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Paint one frame
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S, sim: &Simulation) {
        let size = surface.size();
        let state = &sim.state;

        // Road and lane dividers
        surface.clear(palette::ROAD);
        let lane_width = size.x / f32::from(state.lane_count);
        for lane in 1..state.lane_count {
            let x = f32::from(lane) * lane_width;
            surface.dashed_line(
                Vec2::new(x, 0.0),
                Vec2::new(x, size.y),
                LANE_DASH_WIDTH,
                LANE_DASH,
                -sim.road_scroll(),
                palette::LANE_DASH,
            );
        }

        for entity in &sim.entities {
            let glow = (!entity.kind.is_hazard()).then_some(Glow {
                color: palette::REWARD_GLOW,
                blur: REWARD_GLOW_BLUR,
            });
            surface.draw_glyph(entity.kind.into(), entity.pos, glow);
        }

        for particle in &sim.particles {
            let color = Color::from(particle.tint).with_alpha(particle.alpha);
            surface.fill_circle(particle.pos, particle.size, color);
        }

        // Player and its decorations
        let player = sim.player_pos();
        if state.speed > sim.tuning.motion_blur_speed {
            surface.fill_rect(player + MOTION_BLUR_OFFSET, MOTION_BLUR_SIZE, palette::MOTION_BLUR);
        }
        if state.power_ups.shield_active() {
            surface.stroke_circle(
                player,
                SHIELD_RADIUS,
                SHIELD_WIDTH,
                palette::SHIELD,
                Some(Glow {
                    color: palette::SHIELD,
                    blur: SHIELD_GLOW_BLUR,
                }),
            );
        }
        surface.draw_glyph(Glyph::Player, player, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Entity, Particle};
    use crate::tuning::Tuning;

    /// Records draw calls instead of rasterizing
    #[derive(Default)]
    struct CallLog {
        calls: Vec<String>,
    }

    impl Surface for CallLog {
        fn size(&self) -> Vec2 {
            Vec2::new(800.0, 600.0)
        }

        fn clear(&mut self, color: Color) {
            self.calls.push(format!("clear {}", color.to_css()));
        }

        fn fill_rect(&mut self, origin: Vec2, size: Vec2, _color: Color) {
            self.calls.push(format!("rect {} {} {} {}", origin.x, origin.y, size.x, size.y));
        }

        fn dashed_line(
            &mut self,
            from: Vec2,
            _to: Vec2,
            _width: f32,
            _dash: [f32; 2],
            _dash_offset: f32,
            _color: Color,
        ) {
            self.calls.push(format!("dash {}", from.x));
        }

        fn fill_circle(&mut self, _centre: Vec2, _radius: f32, color: Color) {
            self.calls.push(format!("circle {}", color.to_css()));
        }

        fn stroke_circle(
            &mut self,
            _centre: Vec2,
            radius: f32,
            _width: f32,
            _color: Color,
            _glow: Option<Glow>,
        ) {
            self.calls.push(format!("ring {radius}"));
        }

        fn draw_glyph(&mut self, glyph: Glyph, _centre: Vec2, glow: Option<Glow>) {
            self.calls.push(format!("glyph {:?} glow={}", glyph, glow.is_some()));
        }
    }

    fn sim() -> Simulation {
        Simulation::seeded(Tuning::default(), Vec2::new(800.0, 600.0), 0.0, 1)
    }

    #[test]
    fn test_css_colors() {
        assert_eq!(palette::ROAD.to_css(), "#334155");
        assert_eq!(palette::MOTION_BLUR.to_css(), "rgba(255, 255, 255, 0.2)");
        assert_eq!(palette::REWARD_GLOW.to_css(), "#00ccff");
    }

    #[test]
    fn test_paint_order_fresh_run() {
        let mut log = CallLog::default();
        Renderer::new().paint(&mut log, &sim());
        assert_eq!(
            log.calls,
            vec![
                "clear #334155".to_string(),
                "dash 200".to_string(),
                "dash 400".to_string(),
                "dash 600".to_string(),
                "glyph Player glow=false".to_string(),
            ]
        );
    }

    #[test]
    fn test_paint_decorations() {
        let mut sim = sim();
        sim.state.speed = 6.5;
        sim.state.power_ups.shield = 1.0;
        sim.entities.push(Entity {
            pos: Vec2::new(100.0, 50.0),
            kind: EntityKind::Reward(RewardVariant::Floss),
        });
        sim.entities.push(Entity {
            pos: Vec2::new(300.0, 50.0),
            kind: EntityKind::Hazard(HazardVariant::Burger),
        });
        sim.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 3.0,
            tint: ParticleTint::Red,
            alpha: 0.5,
        });

        let mut log = CallLog::default();
        Renderer::new().paint(&mut log, &sim);
        let tail: Vec<&str> = log.calls[4..].iter().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                "glyph Reward(Floss) glow=true",
                "glyph Hazard(Burger) glow=false",
                "circle rgba(255, 0, 0, 0.5)",
                "rect 285 520 30 40",
                "ring 45",
                "glyph Player glow=false",
            ]
        );
    }

    #[test]
    fn test_no_motion_blur_at_threshold() {
        let mut sim = sim();
        sim.state.speed = 6.0;
        let mut log = CallLog::default();
        Renderer::new().paint(&mut log, &sim);
        assert!(!log.calls.iter().any(|c| c.starts_with("rect")));
    }

    #[test]
    fn test_every_variant_has_a_glyph() {
        for v in HazardVariant::ALL {
            assert!(!Glyph::Hazard(v).emoji().is_empty());
        }
        for v in RewardVariant::ALL {
            assert!(!Glyph::Reward(v).emoji().is_empty());
        }
    }
}
