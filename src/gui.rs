use crate::statics;
use crate::{ConfigData, ExpandDirection, RamData, SaveManager, TextureCatalog};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::{
    cell::RefCell,
    collections::BTreeSet,
    path::Path,
    rc::Rc,
};

pub fn run_gui(config: ConfigData) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 760.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(MapperApp::new(config)))),
    )
}

#[derive(Clone, Copy, Debug)]
enum TileAction {
    Toggle(usize),
    PaintTags(usize),
    PaintTexture(usize),
}

/// The editor window. Owns the session's [`RamData`] and the text buffers
/// that back the symbol legend.
struct MapperApp {
    config: ConfigData,
    ram: RamData,
    // Live legend text; each buffer is also bound as the entry's value source.
    symbol_fields: Vec<(char, Rc<RefCell<String>>)>,
    status: String,
    last_error: Option<String>,
    theme_dark: bool,
}

impl MapperApp {
    fn new(config: ConfigData) -> Self {
        let mut ram = RamData::new();
        match TextureCatalog::bootstrap(&config.textures_dir) {
            Ok(catalog) => ram.set_textures(catalog),
            Err(e) => {
                tracing::warn!(dir = ?config.textures_dir, error = %e, "could not read textures");
                ram.set_textures(TextureCatalog::default());
            }
        }
        ram.reset_layout(&config);

        let mut app = Self {
            config,
            ram,
            symbol_fields: Vec::new(),
            status: String::new(),
            last_error: None,
            theme_dark: true,
        };
        app.bind_symbols();
        app
    }

    /// Rebuilds the 26 legend fields from the current entries and binds each
    /// entry to its field.
    fn bind_symbols(&mut self) {
        self.ram.initialize_symbols();
        self.symbol_fields = self
            .ram
            .symbols
            .values_mut()
            .map(|symbol| {
                let field = Rc::new(RefCell::new(symbol.default_value.clone()));
                symbol.bind_retrieval(field.clone());
                (symbol.letter, field)
            })
            .collect();
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg =
            rfd::FileDialog::new().add_filter(statics::EN_FILTER_MAP, &["json", "json5", "gz"]);
        if let Some(dir) = self.ram.save_folder.clone() {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    fn new_map(&mut self) {
        self.ram.reset_layout(&self.config);
        self.status = format!(
            "New map {}x{}",
            self.ram.bounds.width(),
            self.ram.bounds.height()
        );
        self.last_error = None;
    }

    fn open_file(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };

        match SaveManager::import(&mut self.ram, &path) {
            Ok(()) => {
                self.bind_symbols();
                self.status = format!("Loaded {}", path.display());
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to load: {e}"));
            }
        }
    }

    fn save_file(&mut self) {
        match self.ram.save_path() {
            Some(path) => self.write_map(&path),
            None => self.save_file_as(),
        }
    }

    fn save_file_as(&mut self) {
        let name = self
            .ram
            .save_file_name
            .clone()
            .unwrap_or_else(|| statics::EN_DEFAULT_FILE_NAME.to_string());
        let Some(path) = self.file_dialog().set_file_name(name).save_file() else {
            return;
        };
        self.write_map(&path);
    }

    fn write_map(&mut self, path: &Path) {
        match SaveManager::export(&mut self.ram, path) {
            Ok(payload) => {
                self.status = format!(
                    "Saved {} tiles and {} symbols to {}",
                    payload.tiles.len(),
                    payload.symbols.len(),
                    path.display()
                );
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to save: {e}"));
            }
        }
    }

    fn track_held_letters(&mut self, ctx: &egui::Context) {
        // Typing into a legend field must not paint tags.
        let down: BTreeSet<char> = if ctx.wants_keyboard_input() {
            BTreeSet::new()
        } else {
            ctx.input(|i| i.keys_down.iter().filter_map(|k| key_letter(*k)).collect())
        };

        let released: Vec<char> = self
            .ram
            .held_letters
            .difference(&down)
            .copied()
            .collect();
        for letter in released {
            self.ram.release_letter(letter);
        }
        for letter in down {
            self.ram.hold_letter(letter);
        }
    }

    fn apply_tile_action(&mut self, action: TileAction) {
        match action {
            TileAction::Toggle(idx) => self.ram.toggle_tile(idx),
            TileAction::PaintTags(idx) => self.ram.paint_tags(idx),
            TileAction::PaintTexture(idx) => self.ram.paint_texture(idx),
        }
    }

    fn textures_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(statics::EN_HEADING_TEXTURES);
        ui.separator();

        let names = self.ram.textures.sorted_names();
        egui::ScrollArea::vertical()
            .id_salt("textures_scroll")
            .max_height(ui.available_height() * 0.7)
            .show(ui, |ui| {
                for name in names {
                    let selected = self.ram.selected_texture == name;
                    if ui.selectable_label(selected, name.as_str()).clicked() {
                        self.ram.selected_texture = name;
                    }
                }
            });

        ui.separator();
        ui.heading(statics::EN_HEADING_HELD);
        if self.ram.held_letters.is_empty() {
            ui.label(statics::EN_HELD_NONE);
        } else {
            let held: String = self.ram.held_letters.iter().collect();
            ui.monospace(held);
        }
    }

    fn symbols_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(statics::EN_HEADING_SYMBOLS);
        ui.separator();

        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(50.0).resizable(false))
            .column(Column::remainder().resizable(true))
            .header(row_h, |mut header| {
                header.col(|ui| {
                    ui.strong(statics::EN_COL_LETTER);
                });
                header.col(|ui| {
                    ui.strong(statics::EN_COL_MEANING);
                });
            })
            .body(|mut body| {
                for (letter, field) in &self.symbol_fields {
                    body.row(row_h, |mut row| {
                        row.col(|ui| {
                            ui.monospace(letter.to_string());
                        });
                        row.col(|ui| {
                            let mut text = field.borrow_mut();
                            ui.add(
                                egui::TextEdit::singleline(&mut *text)
                                    .hint_text(statics::EN_HINT_MEANING)
                                    .desired_width(ui.available_width()),
                            );
                        });
                    });
                }
            });
    }

    fn map_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let expand = [
                (statics::EN_BTN_EXPAND_TOP, ExpandDirection::Top),
                (statics::EN_BTN_EXPAND_BOTTOM, ExpandDirection::Bottom),
                (statics::EN_BTN_EXPAND_LEFT, ExpandDirection::Left),
                (statics::EN_BTN_EXPAND_RIGHT, ExpandDirection::Right),
            ];
            for (label, direction) in expand {
                if ui.button(label).clicked() {
                    self.ram.expand(direction);
                }
            }
            ui.separator();
            ui.label(statics::EN_HELP_TILES);
        });
        ui.separator();

        let size = self.config.tile_size as f32;
        let bounds = self.ram.bounds;
        let painting_tags = !self.ram.held_letters.is_empty();
        let mut action = None;

        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("tile_grid")
                    .spacing([2.0, 2.0])
                    .show(ui, |ui| {
                        for y in bounds.y_start..=bounds.y_end {
                            for x in bounds.x_start..=bounds.x_end {
                                let idx = self.ram.tile_index_or_insert(x, y);
                                let tile = &self.ram.tiles[idx];

                                let mut button =
                                    egui::Button::new(tile.label()).selected(tile.enabled);
                                if tile.enabled && tile.has_texture() {
                                    button = button.fill(texture_tint(&tile.texture));
                                }
                                let mut resp = ui.add_sized([size, size], button);
                                if let Some(texture) = self.ram.textures.get(&tile.texture)
                                    && !texture.is_none()
                                {
                                    resp = resp.on_hover_text(format!(
                                        "{} ({})",
                                        texture.name,
                                        texture.path.display()
                                    ));
                                } else if tile.has_texture() {
                                    resp = resp.on_hover_text(tile.texture.as_str());
                                }

                                if resp.clicked() {
                                    action = Some(if painting_tags {
                                        TileAction::PaintTags(idx)
                                    } else {
                                        TileAction::Toggle(idx)
                                    });
                                } else if resp.secondary_clicked() {
                                    action = Some(TileAction::PaintTexture(idx));
                                }
                            }
                            ui.end_row();
                        }
                    });
            });

        if let Some(action) = action {
            self.apply_tile_action(action);
        }
    }
}

/// Single uppercase letter for a letter key.
fn key_letter(key: egui::Key) -> Option<char> {
    let mut chars = key.name().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(c),
        _ => None,
    }
}

/// Stable muted color per texture name, used until images are rendered.
fn texture_tint(name: &str) -> egui::Color32 {
    let hash = name
        .bytes()
        .fold(0x811C_9DC5_u32, |h, b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193));
    let [r, g, b, _] = hash.to_le_bytes();
    egui::Color32::from_rgb(64 + r / 2, 64 + g / 2, 64 + b / 2)
}

impl eframe::App for MapperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.track_held_letters(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_NEW).clicked() {
                    self.new_map();
                }
                if ui.button(statics::EN_BTN_OPEN).clicked() {
                    self.open_file();
                }
                if ui.button(statics::EN_BTN_SAVE).clicked() {
                    self.save_file();
                }
                if ui.button(statics::EN_BTN_SAVE_AS).clicked() {
                    self.save_file_as();
                }
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, err);
                }
            });
        });

        egui::SidePanel::left("textures_panel")
            .resizable(true)
            .default_width(180.0)
            .show(ctx, |ui| self.textures_panel(ui));

        egui::SidePanel::right("symbols_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.symbols_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.map_panel(ui));
    }
}
