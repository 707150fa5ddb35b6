use clap::Parser;
use eframe::egui;
use humansize::{format_size, BINARY};
use std::time::Instant;

use diskmap::aggregate::PathAggregator;
use diskmap::commands;
use diskmap::interact::{Intent, InteractionController, MenuAction};
use diskmap::scanner::{self, ScanHandle};
use diskmap::throttle::ThrottleScheduler;
use diskmap::tree::WeightTree;
use diskmap::treemap::{LayoutRect, TreemapLayout};
use diskmap::wire::ScanEvent;

#[derive(Parser)]
#[command(version, about = "Disk usage treemap")]
struct Cli {
    /// Directory to offer for the first scan (defaults to the home directory)
    path: Option<String>,

    /// Live aggregation depth while a scan is running
    #[arg(long, default_value_t = diskmap::aggregate::DEFAULT_MAX_DEPTH)]
    depth: usize,
}

fn main() -> Result<(), eframe::Error> {
    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Diskmap - Disk Usage Treemap"),
        ..Default::default()
    };

    eframe::run_native(
        "Diskmap",
        options,
        Box::new(move |cc| {
            configure_custom_style(&cc.egui_ctx);
            Box::new(DiskmapApp::new(cli))
        }),
    )
}

fn configure_custom_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = egui::Color32::from_rgba_unmultiplied(30, 41, 59, 240);
    visuals.window_fill = egui::Color32::from_rgba_unmultiplied(30, 41, 59, 230);
    visuals.window_stroke = egui::Stroke::new(
        1.0,
        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 26),
    );
    visuals.window_rounding = egui::Rounding::same(12.0);
    visuals.widgets.noninteractive.rounding = egui::Rounding::same(8.0);
    visuals.widgets.inactive.rounding = egui::Rounding::same(8.0);
    visuals.widgets.hovered.rounding = egui::Rounding::same(8.0);
    visuals.widgets.active.rounding = egui::Rounding::same(8.0);
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(12.0, 8.0);
    style.spacing.button_padding = egui::vec2(16.0, 8.0);

    ctx.set_style(style);
}

#[derive(PartialEq)]
enum Phase {
    Idle,
    Scanning,
    Ready,
    Failed(String),
}

struct DiskmapApp {
    scan_path: String,
    phase: Phase,
    scan: Option<ScanHandle>,

    aggregator: PathAggregator,
    scheduler: ThrottleScheduler,
    /// Measured tree; replaces the live one as snapshots arrive.
    authoritative: Option<WeightTree>,

    engine: TreemapLayout,
    rects: Vec<LayoutRect>,
    layout_size: (f32, f32),

    controller: InteractionController,
    view_root: Option<String>,
    navigation_stack: Vec<String>,

    status: String,
}

impl DiskmapApp {
    fn new(cli: Cli) -> Self {
        let scan_path = cli
            .path
            .or_else(|| commands::home_directory().ok())
            .unwrap_or_else(|| ".".to_string());

        Self {
            scan_path,
            phase: Phase::Idle,
            scan: None,
            aggregator: PathAggregator::with_depth(cli.depth),
            scheduler: ThrottleScheduler::new(),
            authoritative: None,
            engine: TreemapLayout::default(),
            rects: Vec::new(),
            layout_size: (0.0, 0.0),
            controller: InteractionController::new(),
            view_root: None,
            navigation_stack: Vec::new(),
            status: String::from("Pick a path and press Scan"),
        }
    }

    /// Stop the old session and start scanning the current path. Scheduler,
    /// subscription and tree are all replaced in this one step, so no
    /// straggler event can touch the new session.
    fn start_scan(&mut self) {
        if let Some(old) = self.scan.take() {
            old.cancel();
        }
        self.scheduler.stop();
        self.scheduler = ThrottleScheduler::new();
        self.aggregator.reset();
        self.authoritative = None;
        self.rects.clear();
        self.controller = InteractionController::new();
        self.view_root = None;
        self.navigation_stack.clear();

        self.phase = Phase::Scanning;
        self.status = format!("Scanning {} ...", self.scan_path);
        self.scan = Some(scanner::start_scan(self.scan_path.clone()));
    }

    fn cancel_scan(&mut self) {
        if let Some(scan) = self.scan.take() {
            scan.cancel();
        }
        self.scheduler.stop();
        self.phase = Phase::Idle;
        self.rects.clear();
        self.status = String::from("Scan cancelled");
    }

    fn poll_scan_events(&mut self) {
        let Some(scan) = &self.scan else { return };
        let now = Instant::now();
        let mut done = false;
        let mut failed: Option<String> = None;

        while let Some(event) = scan.try_next() {
            match event {
                ScanEvent::Progress(progress) => {
                    self.aggregator
                        .ingest(&progress.current_path, progress.items_processed);
                    self.scheduler.on_event(now);
                }
                ScanEvent::Intermediate(node) => {
                    self.authoritative = Some(WeightTree::from_wire(&node));
                    self.scheduler.mark_dirty();
                }
                ScanEvent::Completed(node) => {
                    let tree = WeightTree::from_wire(&node);
                    self.status = format!(
                        "Scan complete: {} ({} items seen)",
                        format_size(node.size, BINARY),
                        self.aggregator.items_processed(),
                    );
                    self.authoritative = Some(tree);
                    self.scheduler.mark_dirty();
                    done = true;
                }
                ScanEvent::Failed(message) => {
                    failed = Some(message);
                    break;
                }
            }
        }

        if let Some(message) = failed {
            // No partial treemap survives a failure.
            self.scan = None;
            self.scheduler.stop();
            self.rects.clear();
            self.phase = Phase::Failed(message);
        } else if done {
            self.scan = None;
            self.phase = Phase::Ready;
        }
    }

    fn display_tree(&self) -> &WeightTree {
        self.authoritative
            .as_ref()
            .unwrap_or_else(|| self.aggregator.tree())
    }

    fn resolve_view_root(&self) -> indextree::NodeId {
        let tree = self.display_tree();
        if let Some(path) = &self.view_root {
            if let Some(id) = tree.lookup(path) {
                return id;
            }
        }
        tree.root()
    }

    fn run_layout_pass(&mut self, width: f32, height: f32) {
        // The drill-down target may not exist in a freshly swapped tree.
        if let Some(path) = self.view_root.clone() {
            if !self.display_tree().contains(&path) {
                self.view_root = None;
                self.navigation_stack.clear();
            }
        }
        let root = self.resolve_view_root();
        self.rects = self.engine.layout(self.display_tree(), root, width, height);
        self.layout_size = (width, height);

        let tree = self
            .authoritative
            .as_ref()
            .unwrap_or_else(|| self.aggregator.tree());
        self.controller.sync_tree(tree);
    }

    fn navigate_to(&mut self, path: String) {
        if !self.display_tree().contains(&path) {
            return;
        }
        let current = self
            .view_root
            .clone()
            .unwrap_or_else(|| self.display_tree().root_path().to_string());
        self.navigation_stack.push(current);
        self.view_root = Some(path);
        self.controller.on_navigate();
        self.scheduler.mark_dirty();
    }

    fn navigate_back(&mut self) {
        if let Some(previous) = self.navigation_stack.pop() {
            self.view_root = if previous == self.display_tree().root_path() {
                None
            } else {
                Some(previous)
            };
            self.controller.on_navigate();
            self.scheduler.mark_dirty();
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Navigate(path) => self.navigate_to(path),
            Intent::Reveal(path) => {
                if let Err(err) = commands::reveal_in_file_browser(&path) {
                    self.status = format!("Reveal failed: {err}");
                }
            }
            Intent::Trash(path) => match commands::move_to_trash(&path) {
                Ok(()) => self.status = format!("Moved to trash: {path}"),
                Err(err) => self.status = format!("Trash failed: {err}"),
            },
        }
    }

    /// Deepest rectangle under the pointer wins, matching paint order.
    fn hit_test(&self, x: f32, y: f32) -> Option<&LayoutRect> {
        self.rects
            .iter()
            .filter(|r| r.contains(x, y))
            .max_by_key(|r| r.depth)
    }

    /// Temperature palette: cool blues for small shares, coral for large.
    fn temperature_color(share: f32, is_hovered: bool) -> egui::Color32 {
        let (r, g, b) = if share < 0.15 {
            let t = share / 0.15;
            (59.0 + 80.0 * t, 130.0 + 35.0 * t, 246.0)
        } else if share < 0.4 {
            (139.0, 92.0, 246.0)
        } else if share < 0.7 {
            let t = (share - 0.4) / 0.3;
            (245.0 + 6.0 * t, 158.0 + 33.0 * t, 11.0 + 25.0 * t)
        } else {
            let t = (share - 0.7) / 0.3;
            (239.0 + 9.0 * t, 68.0 + 45.0 * t, 68.0 + 45.0 * t)
        };

        let (r, g, b) = if is_hovered {
            ((r * 1.15).min(255.0), (g * 1.15).min(255.0), (b * 1.15).min(255.0))
        } else {
            (r, g, b)
        };

        egui::Color32::from_rgb(r as u8, g as u8, b as u8)
    }

    fn draw_background(&self, painter: &egui::Painter, rect: egui::Rect) {
        let depth = self.navigation_stack.len() as f32;
        let depth_factor = (depth * 0.1).min(0.3);

        let top_color = egui::Color32::from_rgb(
            (30.0 - depth_factor * 10.0) as u8,
            (41.0 + depth_factor * 35.0) as u8,
            (59.0 + depth_factor * 59.0) as u8,
        );
        let bottom_color = egui::Color32::from_rgb(
            (15.0 - depth_factor * 5.0) as u8,
            (118.0 - depth_factor * 20.0) as u8,
            (110.0 + depth_factor * 8.0) as u8,
        );

        let mut mesh = egui::Mesh::default();
        mesh.vertices.push(egui::epaint::Vertex {
            pos: rect.left_top(),
            uv: egui::pos2(0.0, 0.0),
            color: top_color,
        });
        mesh.vertices.push(egui::epaint::Vertex {
            pos: rect.right_top(),
            uv: egui::pos2(1.0, 0.0),
            color: top_color,
        });
        mesh.vertices.push(egui::epaint::Vertex {
            pos: rect.right_bottom(),
            uv: egui::pos2(1.0, 1.0),
            color: bottom_color,
        });
        mesh.vertices.push(egui::epaint::Vertex {
            pos: rect.left_bottom(),
            uv: egui::pos2(0.0, 1.0),
            color: bottom_color,
        });
        mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
        painter.add(egui::Shape::Mesh(mesh));
    }

    fn draw_treemap(&mut self, ui: &mut egui::Ui, area: egui::Rect) {
        let painter = ui.painter_at(area);
        self.draw_background(&painter, area);

        let is_authoritative = self.authoritative.is_some();
        let total_weight: f64 = self.rects.iter().filter(|r| r.depth == 1).map(|r| r.weight).sum();
        let selected = self.controller.selected_path().map(str::to_string);

        let response = ui.interact(area, ui.id().with("treemap"), egui::Sense::click());
        let pointer = response.hover_pos();
        let local = pointer.map(|p| (p.x - area.min.x, p.y - area.min.y));
        let hovered_path = local
            .and_then(|(x, y)| self.hit_test(x, y))
            .map(|r| r.path.clone());

        for rect in &self.rects {
            let egui_rect = egui::Rect::from_min_max(
                egui::pos2(area.min.x + rect.x0, area.min.y + rect.y0),
                egui::pos2(area.min.x + rect.x1, area.min.y + rect.y1),
            );
            if egui_rect.width() < 1.0 || egui_rect.height() < 1.0 {
                continue;
            }

            let is_hovered = hovered_path.as_deref() == Some(rect.path.as_str());
            let is_selected = selected.as_deref() == Some(rect.path.as_str());
            let share = if total_weight > 0.0 {
                (rect.weight / total_weight) as f32
            } else {
                0.0
            };

            let color = Self::temperature_color(share, is_hovered);
            let corner = (egui_rect.width().min(egui_rect.height()) * 0.08).min(8.0);
            painter.rect(egui_rect, corner, color, egui::Stroke::NONE);

            let stroke = if is_selected {
                egui::Stroke::new(2.0, egui::Color32::from_rgb(246, 211, 101))
            } else {
                egui::Stroke::new(
                    1.0,
                    egui::Color32::from_rgba_unmultiplied(255, 255, 255, 30),
                )
            };
            painter.rect_stroke(egui_rect, corner, stroke);

            self.draw_label(&painter, rect, egui_rect, is_authoritative);
        }

        if is_hovered_directory(&self.rects, hovered_path.as_deref()) {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        // Pointer interactions run against the already-painted pass.
        let mut intent = None;
        if response.double_clicked() {
            let hit = local.and_then(|(x, y)| self.hit_test(x, y)).cloned();
            intent = self.controller.on_double_click(hit.as_ref());
        } else if response.clicked() {
            let hit = local.and_then(|(x, y)| self.hit_test(x, y)).cloned();
            self.controller.on_primary_click(hit.as_ref());
        }
        if response.secondary_clicked() {
            match local.and_then(|(x, y)| self.hit_test(x, y)).cloned() {
                Some(hit) => {
                    if let Some((x, y)) = local {
                        self.controller.set_viewport(area.width(), area.height());
                        self.controller.on_secondary_click(&hit, x, y);
                    }
                }
                None => self.controller.on_escape(),
            }
        }
        if let Some(intent) = intent {
            self.apply_intent(intent);
        }

        self.draw_context_menu(ui, area);
    }

    fn draw_label(
        &self,
        painter: &egui::Painter,
        rect: &LayoutRect,
        egui_rect: egui::Rect,
        is_authoritative: bool,
    ) {
        // Subdivided parents only get their header band; leaves get a
        // centered label when there is room for one.
        if rect.subdivided {
            if egui_rect.width() > 60.0 {
                painter.text(
                    egui::pos2(egui_rect.min.x + 6.0, egui_rect.min.y + 2.0),
                    egui::Align2::LEFT_TOP,
                    &rect.name,
                    egui::FontId::proportional(11.0),
                    egui::Color32::WHITE,
                );
            }
            return;
        }

        let area_px = egui_rect.width() * egui_rect.height();
        if area_px < 2500.0 {
            return;
        }

        let (name_size, sub_size) = if area_px > 10_000.0 { (14.0, 11.0) } else { (12.0, 10.0) };
        let icon = if rect.is_dir { "📁" } else { "📄" };

        painter.text(
            egui::pos2(egui_rect.center().x, egui_rect.center().y - 8.0),
            egui::Align2::CENTER_CENTER,
            format!("{} {}", icon, rect.name),
            egui::FontId::proportional(name_size),
            egui::Color32::WHITE,
        );

        if is_authoritative {
            painter.text(
                egui::pos2(egui_rect.center().x, egui_rect.center().y + 8.0),
                egui::Align2::CENTER_CENTER,
                format_size(rect.weight as u64, BINARY),
                egui::FontId::proportional(sub_size),
                egui::Color32::from_rgba_unmultiplied(255, 255, 255, 153),
            );
        }
    }

    fn draw_context_menu(&mut self, ui: &mut egui::Ui, area: egui::Rect) {
        let Some(menu) = self.controller.context_menu().cloned() else {
            return;
        };

        let pos = egui::pos2(area.min.x + menu.anchor_x, area.min.y + menu.anchor_y);
        let mut action: Option<MenuAction> = None;

        egui::Area::new(egui::Id::new("context-menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(pos)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(160.0);
                    ui.label(egui::RichText::new(&menu.target_path).small().weak());
                    ui.separator();
                    if ui.button("Reveal in file browser").clicked() {
                        action = Some(MenuAction::Reveal);
                    }
                    if ui.button("Move to trash").clicked() {
                        action = Some(MenuAction::Trash);
                    }
                });
            });

        if let Some(action) = action {
            if let Some(intent) = self.controller.on_menu_action(action) {
                self.apply_intent(intent);
            }
        }
    }

    fn draw_error_panel(&mut self, ui: &mut egui::Ui, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading("Scan failed");
            ui.label(message);
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                ui.add_space(ui.available_width() / 2.0 - 110.0);
                if ui.button("Back").clicked() {
                    self.phase = Phase::Idle;
                    self.status = String::from("Pick a path and press Scan");
                }
                if ui.button("Retry scan").clicked() {
                    self.start_scan();
                }
            });
        });
    }

    fn current_view_label(&self) -> String {
        self.view_root
            .clone()
            .unwrap_or_else(|| self.display_tree().root_path().to_string())
    }
}

fn is_hovered_directory(rects: &[LayoutRect], hovered: Option<&str>) -> bool {
    hovered
        .and_then(|path| rects.iter().find(|r| r.path == path))
        .map(|r| r.is_dir)
        .unwrap_or(false)
}

impl eframe::App for DiskmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_scan_events();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.on_escape();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            if let Some(intent) = self.controller.on_enter() {
                self.apply_intent(intent);
            }
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Diskmap");
                ui.separator();
                ui.label("Path:");
                ui.text_edit_singleline(&mut self.scan_path);

                if self.phase == Phase::Scanning {
                    if ui.button("Cancel").clicked() {
                        self.cancel_scan();
                    }
                    ui.spinner();
                    ui.label(format!(
                        "{} items",
                        self.aggregator.items_processed()
                    ));
                } else if ui.button("Scan").clicked() {
                    self.start_scan();
                }

                ui.label(&self.status);
            });

            if !self.rects.is_empty() || self.authoritative.is_some() {
                ui.horizontal(|ui| {
                    if !self.navigation_stack.is_empty() && ui.button("⬅ Back").clicked() {
                        self.navigate_back();
                    }
                    ui.separator();
                    ui.label("📁");
                    ui.label(self.current_view_label());
                });
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Phase::Failed(message) = &self.phase {
                let message = message.clone();
                self.draw_error_panel(ui, &message);
                return;
            }

            let area = ui.available_rect_before_wrap();

            if (area.width(), area.height()) != self.layout_size && !self.rects.is_empty() {
                self.scheduler.mark_dirty();
            }
            if self.scheduler.poll(Instant::now()) {
                self.run_layout_pass(area.width(), area.height());
            }

            if self.rects.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(if self.phase == Phase::Scanning {
                        "Listening for scanned paths..."
                    } else {
                        "No data yet. Scan a directory to see its treemap."
                    });
                });
            } else {
                self.draw_treemap(ui, area);
            }

            if self.phase == Phase::Scanning {
                ctx.request_repaint();
            } else {
                // Keep ticking so the trailing-edge pass lands after the
                // stream quiesces.
                ctx.request_repaint_after(std::time::Duration::from_millis(250));
            }
        });
    }
}
