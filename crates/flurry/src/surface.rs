//! Terminal rendering of the snowfall stage.
//!
//! The stage is measured in stage pixels: one terminal cell is 8 pixels wide
//! and 16 tall, so a square sprite of `size` pixels covers `size / 8` columns
//! and `size / 16` rows. Sprites are drawn with upper half blocks, giving two
//! vertical pixels per cell.

use std::collections::{BTreeMap, HashMap};

use flurry_core::{ImageRecord, Pose, SpriteId, StageBounds, VisualSurface};
use image::{DynamicImage, RgbaImage, imageops::FilterType};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Paragraph, Widget, Wrap},
};

/// Stage pixels per terminal column.
pub const CELL_WIDTH: f64 = 8.0;

/// Stage pixels per terminal row.
pub const CELL_HEIGHT: f64 = 16.0;

/// Height of one half block in stage pixels.
const HALF_HEIGHT: f64 = CELL_HEIGHT / 2.0;

/// Pixels below this alpha are treated as transparent.
const ALPHA_CUTOFF: u8 = 128;

/// Glyph used when a sprite has no artwork.
const FALLBACK_GLYPH: &str = "❄";

#[derive(Debug)]
struct Sprite {
    artwork: String,
    pose: Pose,
}

/// [`VisualSurface`] drawing into a ratatui buffer.
#[derive(Debug)]
pub struct TerminalSurface {
    stage: Option<Rect>,
    /// Sprite grid edge in half-block pixels.
    grid: u32,
    artwork: HashMap<String, RgbaImage>,
    sprites: BTreeMap<SpriteId, Sprite>,
    next_id: u64,
    message: Option<String>,
}

impl TerminalSurface {
    /// Create a surface for sprites of `flake_size` stage pixels.
    pub fn new(flake_size: f64) -> Self {
        Self {
            stage: None,
            grid: ((flake_size / CELL_WIDTH).round() as u32).max(1),
            artwork: HashMap::new(),
            sprites: BTreeMap::new(),
            next_id: 0,
            message: None,
        }
    }

    /// Set the terminal region the stage occupies.
    pub fn set_stage(&mut self, stage: Rect) {
        self.stage = (!stage.is_empty()).then_some(stage);
    }

    /// Downscale `image` once and keep it for sprites showing `name`.
    pub fn insert_artwork(&mut self, name: &str, image: &DynamicImage) {
        let pixels = image
            .resize_exact(self.grid, self.grid, FilterType::Triangle)
            .to_rgba8();
        self.artwork.insert(name.to_string(), pixels);
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn render_message(message: &str, area: Rect, buf: &mut Buffer) {
        let lines = message_lines(message, area.width);
        let chunks = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(lines),
            Constraint::Fill(1),
        ])
        .split(area);
        Paragraph::new(message)
            .style(Style::new().fg(Color::Rgb(55, 65, 81)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }

    fn render_sprite(&self, sprite: &Sprite, area: Rect, buf: &mut Buffer) {
        let col0 = (sprite.pose.x / CELL_WIDTH).floor() as i32;
        let half0 = (sprite.pose.y / HALF_HEIGHT).floor() as i32;

        let Some(pixels) = self.artwork.get(&sprite.artwork) else {
            let x = col0 + self.grid as i32 / 2;
            let y = (half0 + self.grid as i32 / 2).div_euclid(2);
            if let Some(cell) = cell_at(buf, area, x, y) {
                cell.set_symbol(FALLBACK_GLYPH).set_fg(Color::Rgb(30, 144, 255));
            }
            return;
        };

        let pixel = |px: i32, py: i32| -> Option<Color> {
            if px < 0 || py < 0 || px >= pixels.width() as i32 || py >= pixels.height() as i32 {
                return None;
            }
            let [r, g, b, a] = pixels.get_pixel(px as u32, py as u32).0;
            (a >= ALPHA_CUTOFF).then_some(Color::Rgb(r, g, b))
        };

        let first_row = half0.div_euclid(2);
        let last_row = (half0 + pixels.height() as i32 - 1).div_euclid(2);
        for row in first_row..=last_row {
            let top_py = row * 2 - half0;
            for px in 0..pixels.width() as i32 {
                let top = pixel(px, top_py);
                let bottom = pixel(px, top_py + 1);
                if top.is_none() && bottom.is_none() {
                    continue;
                }
                let Some(cell) = cell_at(buf, area, col0 + px, row) else {
                    continue;
                };
                match (top, bottom) {
                    (Some(top), Some(bottom)) => {
                        cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                    }
                    (Some(top), None) => {
                        cell.set_symbol("▀").set_fg(top);
                    }
                    (None, Some(bottom)) => {
                        cell.set_symbol("▄").set_fg(bottom);
                    }
                    (None, None) => {}
                }
            }
        }
    }
}

/// Rows a message needs when wrapped to `width` columns.
fn message_lines(message: &str, width: u16) -> u16 {
    let columns = Line::raw(message).width() / usize::from(width.max(1));
    u16::try_from(columns + 1).unwrap_or(u16::MAX)
}

/// Mutable cell at stage coordinates, if it lies inside `area`.
fn cell_at(buf: &mut Buffer, area: Rect, x: i32, y: i32) -> Option<&mut ratatui::buffer::Cell> {
    if x < 0 || y < 0 || x >= area.width as i32 || y >= area.height as i32 {
        return None;
    }
    buf.cell_mut((area.x + x as u16, area.y + y as u16))
}

impl VisualSurface for TerminalSurface {
    fn bounds(&self) -> Option<StageBounds> {
        self.stage.map(|stage| StageBounds {
            width: stage.width as f64 * CELL_WIDTH,
            height: stage.height as f64 * CELL_HEIGHT,
        })
    }

    fn clear(&mut self) {
        self.sprites.clear();
        self.message = None;
    }

    fn create_sprite(&mut self, image: &ImageRecord, _size: f64) -> SpriteId {
        self.next_id += 1;
        let id = SpriteId(self.next_id);
        self.sprites.insert(
            id,
            Sprite {
                artwork: image.name.clone(),
                pose: Pose::default(),
            },
        );
        id
    }

    fn set_pose(&mut self, sprite: SpriteId, pose: Pose) {
        if let Some(sprite) = self.sprites.get_mut(&sprite) {
            sprite.pose = pose;
        }
    }

    fn remove_sprite(&mut self, sprite: SpriteId) {
        self.sprites.remove(&sprite);
    }

    fn show_error(&mut self, message: &str) {
        self.sprites.clear();
        self.message = Some(message.to_string());
    }
}

impl Widget for &TerminalSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(message) = &self.message {
            TerminalSurface::render_message(message, area, buf);
            return;
        }
        for sprite in self.sprites.values() {
            self.render_sprite(sprite, area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn surface_with_art(alpha: u8) -> (TerminalSurface, SpriteId) {
        let mut surface = TerminalSurface::new(16.0);
        surface.set_stage(Rect::new(0, 0, 20, 10));
        let art = RgbaImage::from_pixel(4, 4, Rgba([250, 10, 10, alpha]));
        surface.insert_artwork("red.png", &DynamicImage::ImageRgba8(art));
        let record = ImageRecord::new("red.png", "assets/red.png", 4, 4);
        let id = surface.create_sprite(&record, 16.0);
        (surface, id)
    }

    fn text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_bounds_in_stage_pixels() {
        let mut surface = TerminalSurface::new(64.0);
        assert_eq!(surface.bounds(), None);
        surface.set_stage(Rect::new(0, 0, 80, 24));
        assert_eq!(
            surface.bounds(),
            Some(StageBounds {
                width: 640.0,
                height: 384.0
            })
        );
        surface.set_stage(Rect::new(0, 0, 0, 0));
        assert_eq!(surface.bounds(), None);
    }

    #[test]
    fn test_sprite_drawn_with_half_blocks() {
        let (mut surface, id) = surface_with_art(255);
        surface.set_pose(
            id,
            Pose {
                x: 16.0,
                y: 32.0,
                rotation: 0.0,
            },
        );
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);

        for x in [2u16, 3] {
            let cell = &buf[(x, 2)];
            assert_eq!(cell.symbol(), "▀");
            assert!(matches!(cell.fg, Color::Rgb(r, _, _) if r > 200));
            assert!(matches!(cell.bg, Color::Rgb(r, _, _) if r > 200));
        }
        assert_eq!(buf[(1, 2)].symbol(), " ");
        assert_eq!(buf[(4, 2)].symbol(), " ");
    }

    #[test]
    fn test_odd_offset_uses_lower_half_blocks() {
        let (mut surface, id) = surface_with_art(255);
        surface.set_pose(
            id,
            Pose {
                x: 0.0,
                y: 8.0,
                rotation: 0.0,
            },
        );
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "▄");
        assert_eq!(buf[(0, 1)].symbol(), "▀");
    }

    #[test]
    fn test_transparent_pixels_are_skipped() {
        let (mut surface, id) = surface_with_art(0);
        surface.set_pose(id, Pose::default());
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(text(&buf).chars().all(|c| c == ' '));
    }

    #[test]
    fn test_offscreen_sprite_is_clipped() {
        let (mut surface, id) = surface_with_art(255);
        surface.set_pose(
            id,
            Pose {
                x: -8.0,
                y: -48.0,
                rotation: 0.0,
            },
        );
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(text(&buf).chars().all(|c| c == ' '));
    }

    #[test]
    fn test_error_replaces_sprites() {
        let (mut surface, _) = surface_with_art(255);
        surface.show_error("no icons");
        assert_eq!(surface.sprite_count(), 0);
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(text(&buf).contains("no icons"));
    }

    #[test]
    fn test_message_lines_count_columns() {
        assert_eq!(message_lines("no icons", 20), 1);
        assert_eq!(message_lines(&"é".repeat(19), 20), 1);
        assert_eq!(message_lines(&"é".repeat(25), 20), 2);
        assert_eq!(message_lines(&"x".repeat(200_000), 1), u16::MAX);
        assert_eq!(message_lines("anything", 0), 9);
    }

    #[test]
    fn test_remove_sprite() {
        let (mut surface, id) = surface_with_art(255);
        assert_eq!(surface.sprite_count(), 1);
        surface.remove_sprite(id);
        surface.remove_sprite(id);
        assert_eq!(surface.sprite_count(), 0);
    }
}
