use eframe::egui::{self, Color32, Key, Rect, Sense, Slider, TextureHandle, TextureOptions, pos2};

use crate::canvas::CollageCanvas;
use crate::config::CanvasConfig;
use crate::file_handler;
use crate::input::InputHandler;
use crate::raster::Surface;
use crate::scene::{CanvasResolution, Scene};
use crate::tools::{DrawingTools, ToolMode};

/// Demo host for the canvas engine: a toolbar, dropped-file import and the
/// two canvas layers drawn as textures.
///
/// We derive Deserialize/Serialize so tool settings and config survive a
/// restart. The scene and drawing are not persisted.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct CollageApp {
    config: CanvasConfig,
    tools: DrawingTools,
    grid_rows: u32,
    grid_cols: u32,

    #[serde(skip)]
    scene: Scene,
    #[serde(skip)]
    canvas: CollageCanvas,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    background_texture: Option<TextureHandle>,
    #[serde(skip)]
    overlay_texture: Option<TextureHandle>,
}

impl Default for CollageApp {
    fn default() -> Self {
        Self {
            config: CanvasConfig::default(),
            tools: DrawingTools::default(),
            grid_rows: 2,
            grid_cols: 2,
            scene: Scene::default(),
            canvas: CollageCanvas::default(),
            input: InputHandler::new(),
            background_texture: None,
            overlay_texture: None,
        }
    }
}

impl CollageApp {
    /// Called once before the first frame. `config` overrides the stored one.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Option<CanvasConfig>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        if let Some(config) = config {
            app.config = config;
        }

        app.scene = Scene::with_config(&app.config);
        app.canvas = CollageCanvas::new(app.config.clone());

        let ctx = cc.egui_ctx.clone();
        app.canvas.redraw_signal().set_waker(move || ctx.request_repaint());
        app
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for mode in ToolMode::ALL {
                if ui.selectable_label(self.tools.mode == mode, mode.label()).clicked() {
                    log::info!("Tool selected: {:?}", mode);
                    self.tools.mode = mode;
                }
            }

            ui.separator();
            egui::color_picker::color_edit_button_srgba(
                ui,
                &mut self.tools.color,
                egui::color_picker::Alpha::Opaque,
            );
            ui.add(Slider::new(&mut self.tools.size, 1.0..=100.0).text("Size"));

            ui.separator();
            let status = self.canvas.status();
            let mut actions = self.canvas.drawing_actions();
            if ui.add_enabled(status.can_undo, egui::Button::new("Undo")).clicked() {
                actions.undo();
            }
            if ui.add_enabled(status.can_redo, egui::Button::new("Redo")).clicked() {
                actions.redo();
            }
            if ui.button("Clear drawing").clicked() {
                actions.clear();
            }

            ui.separator();
            let has_selection = self.scene.selected().is_some();
            if ui.add_enabled(has_selection, egui::Button::new("⟳ Rotate")).clicked() {
                self.canvas.rotate_selected(&mut self.scene);
            }
            if ui.add_enabled(has_selection, egui::Button::new("🗑 Delete")).clicked() {
                self.canvas.delete_selected(&mut self.scene);
            }

            ui.separator();
            ui.add(egui::DragValue::new(&mut self.grid_rows).range(1..=10).prefix("rows "));
            ui.add(egui::DragValue::new(&mut self.grid_cols).range(1..=10).prefix("cols "));
            if ui.button("Arrange").clicked() {
                self.scene.arrange_as_grid(self.grid_rows, self.grid_cols);
            }

            ui.separator();
            let current = self.scene.resolution();
            let mut chosen = None;
            egui::ComboBox::from_id_salt("resolution")
                .selected_text(current.to_string())
                .show_ui(ui, |ui| {
                    for preset in CanvasResolution::PRESETS {
                        let label = format!("{} ({})", preset.label, preset.resolution);
                        if ui.selectable_label(current == preset.resolution, label).clicked() {
                            chosen = Some(preset.resolution);
                        }
                    }
                });
            if let Some(resolution) = chosen {
                self.canvas.set_resolution(&mut self.scene, resolution);
            }

            if ui.button("Reset").clicked() {
                self.canvas.reset(&mut self.scene);
            }
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo, delete) = ctx.input(|i| {
            let command = i.modifiers.command;
            (
                command && !i.modifiers.shift && i.key_pressed(Key::Z),
                command && i.modifiers.shift && i.key_pressed(Key::Z),
                i.key_pressed(Key::Delete),
            )
        });
        if undo {
            self.canvas.undo();
        }
        if redo {
            self.canvas.redo();
        }
        if delete {
            self.canvas.delete_selected(&mut self.scene);
        }
    }

    fn canvas_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let scale = self.canvas.layout(available, ui.cursor().min, &self.scene);
        let (response, painter) = ui.allocate_painter(self.scene.resolution().size() * scale, Sense::drag());
        let rect = response.rect;
        self.canvas.layout(available, rect.min, &self.scene);

        self.input.set_canvas_rect(rect);
        for event in self.input.process_input(ctx) {
            self.canvas.handle_event(event, &mut self.scene, &self.tools);
        }

        self.canvas.render(&self.scene);
        if self.canvas.take_background_dirty() {
            upload(ctx, &mut self.background_texture, "collage-background", self.canvas.background());
        }
        if self.canvas.take_overlay_dirty() {
            upload(ctx, &mut self.overlay_texture, "collage-overlay", self.canvas.overlay());
        }

        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        for texture in [&self.background_texture, &self.overlay_texture].into_iter().flatten() {
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }

        if response.hovered() || response.dragged() {
            let hover = ctx.input(|i| i.pointer.hover_pos());
            let hint = self.canvas.cursor_hint(hover, &self.scene, &self.tools);
            ctx.set_cursor_icon(hint.cursor_icon());
        }
    }
}

/// Upload a surface to its texture, creating the texture on first use
fn upload(ctx: &egui::Context, slot: &mut Option<TextureHandle>, name: &str, surface: &Surface) {
    if surface.is_empty() {
        return;
    }
    let image = surface.to_color_image();
    match slot {
        Some(texture) => texture.set(image, TextureOptions::LINEAR),
        None => *slot = Some(ctx.load_texture(name, image, TextureOptions::LINEAR)),
    }
}

impl eframe::App for CollageApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for (name, source) in file_handler::dropped_images(ctx) {
            self.scene.add_image(&name, source);
        }
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.scene.images().is_empty() {
                ui.label("Drop images here to start a collage");
            }
            self.canvas_panel(ctx, ui);
        });
    }
}
