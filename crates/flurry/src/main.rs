mod logging;
mod surface;

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use flurry_assets::{AssetCatalog, AssetLocation, CatalogOptions};
use flurry_config::Config;
use flurry_core::SeededRandom;
use flurry_snow::{Snowfall, SnowfallSettings};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect, Size},
    style::Stylize,
    text::Line,
};
use tracing::{debug, info};

use crate::surface::TerminalSurface;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load()?;
    let log_path = logging::init(&config)?;
    info!(log = ?log_path, "flurry starting");

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

/// Where the app is in its startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Running,
    Failed,
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Is the simulation paused?
    paused: bool,
    phase: Phase,
    config: Config,
    snowfall: Snowfall<TerminalSurface>,
    /// Origin of frame timestamps.
    clock: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let rng = config
            .seed
            .map(SeededRandom::new)
            .unwrap_or_else(SeededRandom::from_clock);
        let snowfall = Snowfall::create(
            TerminalSurface::new(config.flake_size),
            snowfall_settings(&config),
            rng,
        );
        Self {
            running: false,
            paused: false,
            phase: Phase::Loading,
            config,
            snowfall,
            clock: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.set_stage(terminal.size()?);
        terminal.draw(|frame| self.render(frame))?;

        self.start();
        while self.running {
            if !self.paused {
                let now = self.now_ms();
                self.snowfall.frame(now);
            }
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        let _surface = self.snowfall.dispose();
        info!("flurry stopped");
        Ok(())
    }

    /// Discover and preload the icons, then start the snowfall.
    fn start(&mut self) {
        let catalog = AssetCatalog::new(catalog_options(&self.config));
        match catalog.load() {
            Ok(images) => {
                let surface = self.snowfall.surface_mut();
                for image in &images {
                    surface.insert_artwork(&image.record.name, &image.image);
                }
                let records = images.into_iter().map(|image| image.record).collect();
                self.phase = match self.snowfall.start(records) {
                    Ok(()) => Phase::Running,
                    Err(_) => Phase::Failed,
                };
            }
            Err(e) => {
                self.snowfall.report_failure(&e.to_string());
                self.phase = Phase::Failed;
            }
        }
    }

    /// Milliseconds since the app was created.
    fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    /// Give the stage the whole terminal except the help line.
    fn set_stage(&mut self, size: Size) {
        let stage = Rect::new(0, 0, size.width, size.height.saturating_sub(1));
        self.snowfall.surface_mut().set_stage(stage);
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Stage
            Constraint::Length(1), // Help text
        ])
        .split(frame.area());

        frame.render_widget(self.snowfall.surface(), chunks[0]);

        let status = match self.phase {
            Phase::Loading => "gathering icons…".to_string(),
            Phase::Failed => "stopped".to_string(),
            Phase::Running if self.paused => "paused".to_string(),
            Phase::Running => format!("{} flakes", self.snowfall.active_count()),
        };
        let motion = if self.snowfall.reduced_motion() {
            " full motion  "
        } else {
            " reduced motion  "
        };
        let help = Line::from(vec![
            status.cyan(),
            "   ".into(),
            "q".bold().cyan(),
            " quit  ".dark_gray(),
            "r".bold().cyan(),
            motion.dark_gray(),
            "p".bold().cyan(),
            (if self.paused { " resume" } else { " pause" }).dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with the frame interval as timeout so the animation keeps going.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = Duration::from_millis(self.config.frame_interval_ms);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(width, height) => self.on_resize(Size::new(width, height)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('r')) => self.toggle_reduced_motion(),
            (_, KeyCode::Char('p')) => self.toggle_pause(),
            _ => {}
        }
    }

    fn on_resize(&mut self, size: Size) {
        self.set_stage(size);
        self.snowfall.resize();
    }

    fn toggle_reduced_motion(&mut self) {
        let reduced = !self.snowfall.reduced_motion();
        debug!(reduced, "reduced motion toggled");
        self.snowfall.set_reduced_motion(reduced);
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            let now = self.now_ms();
            self.snowfall.resume(now);
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

fn snowfall_settings(config: &Config) -> SnowfallSettings {
    SnowfallSettings {
        flake_size: config.flake_size,
        reduced_motion: config.reduced_motion,
    }
}

fn catalog_options(config: &Config) -> CatalogOptions {
    CatalogOptions {
        location: AssetLocation::parse(&config.assets.location),
        preset: config.assets.preset.clone(),
        sources: config.assets.sources.clone(),
        manifest: config.assets.manifest.clone(),
    }
}

#[cfg(test)]
mod tests {
    use flurry_assets::SourceKind;

    use super::*;

    fn app() -> App {
        App::new(Config {
            seed: Some(7),
            ..Config::default()
        })
    }

    #[test]
    fn test_catalog_options_from_config() {
        let mut config = Config::default();
        config.assets.location = "https://example.com/icons".to_string();
        config.assets.sources = vec![SourceKind::Manifest];
        let options = catalog_options(&config);
        assert_eq!(
            options.location,
            AssetLocation::Remote("https://example.com/icons/".to_string())
        );
        assert_eq!(options.sources, vec![SourceKind::Manifest]);
        assert_eq!(options.manifest, "manifest.json");
    }

    #[test]
    fn test_stage_leaves_room_for_help_line() {
        let mut app = app();
        app.set_stage(Size::new(80, 25));
        let bounds = flurry_core::VisualSurface::bounds(app.snowfall.surface()).unwrap();
        assert_eq!(bounds.width, 640.0);
        assert_eq!(bounds.height, 384.0);
    }

    #[test]
    fn test_key_handling() {
        let mut app = app();
        app.running = true;
        app.on_key_event(KeyEvent::from(KeyCode::Char('r')));
        assert!(app.snowfall.reduced_motion());
        app.on_key_event(KeyEvent::from(KeyCode::Char('p')));
        assert!(app.paused);
        app.on_key_event(KeyEvent::from(KeyCode::Char('p')));
        assert!(!app.paused);
        app.on_key_event(KeyEvent::from(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_missing_assets_fail_startup() {
        let mut app = App::new(Config {
            seed: Some(1),
            assets: flurry_config::AssetSettings {
                location: "/definitely/not/an/asset/dir".to_string(),
                ..Default::default()
            },
            ..Config::default()
        });
        app.set_stage(Size::new(40, 20));
        app.start();
        assert_eq!(app.phase, Phase::Failed);
        assert!(!app.snowfall.is_started());
        assert!(app.snowfall.surface().message().is_some());
    }
}
