// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the measurement session and the fitted map texture. It
//! loads maps on a background thread and routes toolbar and canvas input
//! into the session.

use crate::config::Settings;
use crate::io::clipboard;
use crate::io::media::{self, CropRect, FittedMap, LoadError, MapSource, IMAGE_EXTENSIONS};
use crate::models::session::{InteractionMode, Placement, Session};
use crate::ui::{canvas, properties, toolbar};
use image::RgbaImage;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

type LoadResult = Result<FittedMap, LoadError>;

/// Metadata of the map currently on the display surface.
#[derive(Debug, Clone, PartialEq)]
struct MapInfo {
    name: String,
    source_size: (u32, u32),
    crop: CropRect,
}

/// Bookkeeping for the most recent background map load.
///
/// Starting a load drops the receiver of any load still in flight, so only
/// the most recent request can ever be polled.
#[derive(Default)]
struct MapLoader {
    receiver: Option<Receiver<LoadResult>>,
    message: Option<String>,
}

impl MapLoader {
    /// Supersede any pending load and return the sender for a new one.
    fn begin(&mut self, name: &str) -> Sender<LoadResult> {
        let (sender, receiver) = channel();
        self.receiver = Some(receiver);
        self.message = Some(format!("Loading {}...", name));
        sender
    }

    /// Decode and fit `source` on a background thread.
    fn spawn(&mut self, source: MapSource, ctx: &egui::Context) {
        let sender = self.begin(&source.name());
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = media::load_map(&source);
            if sender.send(result).is_ok() {
                ctx.request_repaint();
            } else {
                log::debug!("Discarded superseded load of {}", source.name());
            }
        });
    }

    /// Status text while a load is pending.
    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Take the result of the current load once it has arrived.
    fn poll(&mut self) -> Option<LoadResult> {
        let received = self.receiver.as_ref()?.try_recv();
        match received {
            Ok(result) => {
                self.receiver = None;
                self.message = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Map loader stopped without a result");
                self.receiver = None;
                self.message = None;
                None
            }
        }
    }
}

/// What the UI still has to do after a load was applied.
#[derive(Debug)]
enum LoadOutcome {
    /// Upload this surface as the new map texture.
    Loaded(RgbaImage),
    /// Tell the user the input was not an image.
    Unsupported,
    Failed,
}

/// Apply a finished load to the session and the current map metadata.
///
/// Failures leave both untouched. A successful load replaces the map and
/// resets the measurement while keeping the calibration.
fn apply_load(session: &mut Session, map: &mut Option<MapInfo>, result: LoadResult) -> LoadOutcome {
    let fitted = match result {
        Ok(fitted) => fitted,
        Err(e) if e.is_unsupported() => {
            log::warn!("{}", e);
            return LoadOutcome::Unsupported;
        }
        Err(e) => {
            log::error!("Failed to load map: {}", e);
            return LoadOutcome::Failed;
        }
    };

    log::info!(
        "Loaded map: {} ({}x{}, crop {}x{} at ({}, {}))",
        fitted.name,
        fitted.source_width,
        fitted.source_height,
        fitted.crop.side,
        fitted.crop.side,
        fitted.crop.x,
        fitted.crop.y,
    );

    *map = Some(MapInfo {
        name: fitted.name,
        source_size: (fitted.source_width, fitted.source_height),
        crop: fitted.crop,
    });
    session.map_loaded();
    LoadOutcome::Loaded(fitted.surface)
}

/// Whether this frame's input asks to paste a map.
///
/// egui-winit turns Ctrl/Cmd+V into a `Paste` event when the clipboard also
/// holds text; other backends report the raw key.
fn paste_requested(events: &[egui::Event]) -> bool {
    events.iter().any(|event| match event {
        egui::Event::Paste(_) => true,
        egui::Event::Key {
            key: egui::Key::V,
            pressed: true,
            modifiers,
            ..
        } => modifiers.command,
        _ => false,
    })
}

/// Main application state.
pub struct RangefinderApp {
    settings: Settings,

    /// Calibration points, measurement points and the active placement mode
    session: Session,

    /// Map on the display surface, if any
    map: Option<MapInfo>,

    /// Texture of the fitted map surface
    texture: Option<egui::TextureHandle>,

    /// Raw contents of the reference length field
    reference_input: String,

    /// Most recent background map load
    loader: MapLoader,
}

impl RangefinderApp {
    /// Create a new application instance.
    pub fn new(settings: Settings) -> Self {
        let reference_input = settings.initial_reference_length.clone();
        let mut session = Session::new();
        session.set_reference_length_text(&reference_input);

        Self {
            settings,
            session,
            map: None,
            texture: None,
            reference_input,
            loader: MapLoader::default(),
        }
    }

    /// Decode and fit a map image on a background thread.
    pub fn load_map(&mut self, source: MapSource, ctx: &egui::Context) {
        self.loader.spawn(source, ctx);
    }

    /// Apply a finished background load.
    fn finish_load(&mut self, result: LoadResult, ctx: &egui::Context) {
        match apply_load(&mut self.session, &mut self.map, result) {
            LoadOutcome::Loaded(surface) => {
                let size = [surface.width() as usize, surface.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, surface.as_raw());
                self.texture =
                    Some(ctx.load_texture("map_surface", color_image, egui::TextureOptions::LINEAR));
            }
            LoadOutcome::Unsupported => notify("Please select a valid image file."),
            LoadOutcome::Failed => {}
        }
    }

    /// Open the native file picker and load the chosen map.
    fn open_map_dialog(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.load_map(MapSource::Path(path), ctx);
        }
    }

    /// Load an image from the system clipboard.
    fn paste_map(&mut self, ctx: &egui::Context) {
        match clipboard::read_image() {
            Ok(Some(source)) => self.load_map(source, ctx),
            Ok(None) => log::warn!("Pasted data was not a supported image file format"),
            Err(e) => log::error!("Failed to read the clipboard: {}", e),
        }
    }

    /// Load the first dropped file that looks like an image.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let source = dropped.into_iter().find_map(|file| {
            // Native drops carry no MIME type; decoding decides for those.
            if !file.mime.is_empty() && !file.mime.starts_with("image/") {
                return None;
            }
            match (file.path, file.bytes) {
                (Some(path), _) => Some(MapSource::Path(path)),
                (None, Some(bytes)) => Some(MapSource::Bytes {
                    name: if file.name.is_empty() {
                        "dropped image".to_string()
                    } else {
                        file.name
                    },
                    bytes,
                }),
                (None, None) => None,
            }
        });

        match source {
            Some(source) => self.load_map(source, ctx),
            None => log::warn!("Dropped data was not a supported image file format"),
        }
    }
}

/// Blocking user notification.
fn notify(message: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Rangefinder")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

impl eframe::App for RangefinderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for a completed map load
        if let Some(result) = self.loader.poll() {
            self.finish_load(result, ctx);
        }

        // Request repaint if still loading (to update spinner)
        if self.loader.message().is_some() {
            ctx.request_repaint();
        }

        self.handle_dropped_files(ctx);

        // Ctrl/Cmd+V outside the text field pastes a map
        if !ctx.wants_keyboard_input() && ctx.input(|i| paste_requested(&i.events)) {
            self.paste_map(ctx);
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Map...").clicked() {
                        self.open_map_dialog(ctx);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui.button("Paste Map").clicked() {
                        self.paste_map(ctx);
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    self.session.mode(),
                    &mut self.reference_input,
                    &self.session.calibration().distance_text(),
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::Arm(mode) => self.session.arm(mode),
            toolbar::ToolbarAction::ReferenceLengthChanged => {
                self.session.set_reference_length_text(&self.reference_input);
            }
            toolbar::ToolbarAction::None => {}
        }

        // Calibration panel (right side)
        egui::SidePanel::right("calibration")
            .default_width(250.0)
            .show(ctx, |ui| {
                let summary = self.map.as_ref().map(|map| properties::MapSummary {
                    name: &map.name,
                    source_size: map.source_size,
                    crop: map.crop,
                });
                properties::show(ui, &self.session, summary);
            });

        // Escape disarms the active placement mode
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.arm(InteractionMode::None);
        }

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(message) = self.loader.message() {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    canvas::CanvasAction::None
                } else {
                    canvas::show(
                        ui,
                        &self.session,
                        &self.settings,
                        self.texture.as_ref(),
                        self.map.as_ref().map(|m| m.name.as_str()),
                    )
                }
            })
            .inner;

        if let canvas::CanvasAction::Click(point) = canvas_action {
            if self.session.click(point) == Placement::NoMap {
                notify("Please load a map image first.");
            }
        }
    }
}
