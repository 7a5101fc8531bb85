//! PBR painter demo application
//!
//! Drives the painter headlessly: initializes it against a recording backend,
//! walks through every preset, edits the material in manual mode through the
//! property table and logs what each frame did.
//!
//! Usage: `pbr_demo [config.toml|config.ron]`

use pbr_painter::foundation::logging;
use pbr_painter::prelude::*;
use pbr_painter::render::backend::BackendCall;

/// Headless painter session
pub struct DemoApp {
    backend: RecordingBackend,
    painter: PbrPainter,
    selection: ActiveSelection,
    properties: PropertyTable,
    transparency: StochasticTransparencyOptions,
    frames_drawn: usize,
    frames_skipped: usize,
}

impl DemoApp {
    /// Create the painter and initialize it against a recording backend
    pub fn new(config: PainterConfig) -> Result<Self, PainterError> {
        log::info!("Creating PBR demo application...");
        let mut backend = RecordingBackend::new();
        let mut painter = PbrPainter::new(config)?;
        let selection = painter.on_initialize(&mut backend)?;

        Ok(Self {
            backend,
            painter,
            selection,
            properties: PropertyTable::new(),
            transparency: StochasticTransparencyOptions::new(),
            frames_drawn: 0,
            frames_skipped: 0,
        })
    }

    fn paint(&mut self) -> Result<(), PainterError> {
        match self.painter.on_paint(&mut self.backend, &self.selection)? {
            FrameOutcome::Drawn { variant } => {
                self.frames_drawn += 1;
                let uniforms = self
                    .backend
                    .take_calls()
                    .into_iter()
                    .filter(|call| matches!(call, BackendCall::SetUniform { .. }))
                    .count();
                log::info!(
                    "Frame {}: {} drawn with {} ({} uniforms)",
                    self.frames_drawn + self.frames_skipped,
                    self.selection.preset(),
                    variant.name(),
                    uniforms
                );
            }
            FrameOutcome::Skipped { reason } => {
                self.frames_skipped += 1;
                self.backend.take_calls();
                log::warn!("Frame skipped: {}", reason);
            }
        }
        Ok(())
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PainterError> {
        let id = self.properties.find(name)?;
        self.properties
            .set(&mut self.selection, self.painter.catalog()?, id, value)?;
        Ok(())
    }

    /// Walk through the presets, then edit in manual mode
    pub fn run(&mut self) -> Result<(), PainterError> {
        for preset in [Preset::Gold, Preset::Plastic, Preset::Stone, Preset::Tiles] {
            self.selection.set_preset(self.painter.catalog()?, preset)?;
            self.paint()?;
        }

        // Continue editing from the tiles material
        self.set_property("preset", PropertyValue::choice("manual"))?;
        self.set_property("albedo", PropertyValue::choice("color"))?;
        self.set_property("albedoColorR", PropertyValue::Float(0.9))?;
        self.set_property("manualSettings/microsurface", PropertyValue::Float(0.7))?;
        self.set_property("ProgramPreset", PropertyValue::choice("WithoutEnvMap"))?;
        self.painter.set_viewport(0, 0, 1280, 720);
        self.paint()?;

        let visible: Vec<String> = self
            .properties
            .visible(&self.selection)
            .map(|descriptor| {
                let value = self.properties.get(&self.selection, descriptor.id);
                format!("{}={}", descriptor.path(), value)
            })
            .collect();
        log::info!("Manual settings: {}", visible.join(", "));

        self.transparency.set_num_samples(16);
        if self.transparency.take_num_samples_changed() {
            log::info!(
                "Transparency: {} samples, coverage {:.2}, {:?}",
                self.transparency.num_samples(),
                self.transparency.coverage(),
                self.transparency.optimization()
            );
        }

        log::info!(
            "Demo finished: {} frames drawn, {} skipped",
            self.frames_drawn,
            self.frames_skipped
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(log::LevelFilter::Info);
    log::info!("Starting PBR painter demo");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            PainterConfig::load_from_file(&path)?
        }
        None => PainterConfig::headless(),
    };

    let mut app = DemoApp::new(config)?;
    app.run()?;
    Ok(())
}
