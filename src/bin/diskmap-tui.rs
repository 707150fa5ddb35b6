use anyhow::Context;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use humansize::{format_size, BINARY};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect as UiRect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use ratatui::{Frame, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use diskmap::aggregate::PathAggregator;
use diskmap::commands;
use diskmap::interact::{Intent, InteractionController, MenuAction};
use diskmap::scanner::{self, ScanHandle};
use diskmap::throttle::ThrottleScheduler;
use diskmap::tree::WeightTree;
use diskmap::treemap::{LayoutRect, TreemapLayout};
use diskmap::wire::{FileNode, ScanEvent};

const MENU_COLS: f32 = 26.0;
const MENU_ROWS: f32 = 5.0;
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

#[derive(Parser)]
#[command(version, about = "Disk usage treemap (terminal)")]
struct Cli {
    /// Directory to scan on startup
    path: Option<String>,

    /// Live aggregation depth while a scan is running
    #[arg(long, default_value_t = diskmap::aggregate::DEFAULT_MAX_DEPTH)]
    depth: usize,

    /// Write the completed scan as JSON to this file
    #[arg(long)]
    export: Option<PathBuf>,
}

enum Phase {
    Idle,
    Scanning,
    Ready,
    Failed(String),
}

struct App {
    path_input: String,
    input_mode: bool,
    status: String,
    phase: Phase,

    scan: Option<ScanHandle>,
    aggregator: PathAggregator,
    scheduler: ThrottleScheduler,
    authoritative: Option<WeightTree>,

    engine: TreemapLayout,
    rects: Vec<LayoutRect>,
    treemap_area: Option<UiRect>,

    controller: InteractionController,
    view_root: Option<String>,
    navigation_stack: Vec<String>,

    export: Option<PathBuf>,
    last_click: Option<(u16, u16, Instant)>,
    should_quit: bool,
}

impl App {
    fn new(cli: Cli) -> Self {
        let path_input = cli
            .path
            .clone()
            .or_else(|| commands::home_directory().ok())
            .unwrap_or_else(|| ".".to_string());

        Self {
            path_input,
            input_mode: cli.path.is_none(),
            status: String::from("Type path and press Enter to scan"),
            phase: Phase::Idle,
            scan: None,
            aggregator: PathAggregator::with_depth(cli.depth),
            scheduler: ThrottleScheduler::new(),
            authoritative: None,
            engine: TreemapLayout {
                // Terminal cells are coarse; one cell of padding and one
                // header row are plenty.
                padding: 1.0,
                header: 1.0,
            },
            rects: Vec::new(),
            treemap_area: None,
            controller: InteractionController::new(),
            view_root: None,
            navigation_stack: Vec::new(),
            export: cli.export,
            last_click: None,
            should_quit: false,
        }
    }

    fn start_scan(&mut self) {
        let path = if self.path_input.trim().is_empty() {
            ".".to_string()
        } else {
            self.path_input.trim().to_string()
        };

        if !std::path::Path::new(&path).exists() {
            self.status = format!("Path does not exist: {}", path);
            return;
        }
        self.path_input = path.clone();

        // Old subscription, scheduler and trees all go at once; nothing
        // from the previous session can reach the new one.
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
        self.status = format!("Scanning {} ...", path);
        self.scan = Some(scanner::start_scan(path));
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

    fn poll_scan_updates(&mut self) {
        let Some(scan) = &self.scan else { return };
        let now = Instant::now();
        let mut done: Option<FileNode> = None;
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
                    done = Some(node);
                    break;
                }
                ScanEvent::Failed(message) => {
                    failed = Some(message);
                    break;
                }
            }
        }

        if let Some(message) = failed {
            self.scan = None;
            self.scheduler.stop();
            self.rects.clear();
            self.phase = Phase::Failed(message);
        } else if let Some(node) = done {
            self.scan = None;
            self.phase = Phase::Ready;
            self.status = format!(
                "Scan complete: {} in {}",
                format_size(node.size, BINARY),
                node.path,
            );
            if let Some(path) = self.export.clone() {
                match export_tree(&path, &node) {
                    Ok(()) => self.status = format!("Scan complete, exported to {}", path.display()),
                    Err(err) => self.status = format!("Export failed: {err:#}"),
                }
            }
            self.authoritative = Some(WeightTree::from_wire(&node));
            self.scheduler.mark_dirty();
        }
    }

    fn display_tree(&self) -> &WeightTree {
        self.authoritative
            .as_ref()
            .unwrap_or_else(|| self.aggregator.tree())
    }

    fn is_authoritative(&self) -> bool {
        self.authoritative.is_some()
    }

    fn run_layout_pass(&mut self) {
        let Some(area) = self.treemap_area else { return };
        if area.width <= 2 || area.height <= 2 {
            self.rects.clear();
            return;
        }

        if let Some(path) = self.view_root.clone() {
            if !self.display_tree().contains(&path) {
                self.view_root = None;
                self.navigation_stack.clear();
            }
        }

        let tree = self.display_tree();
        let root = self
            .view_root
            .as_deref()
            .and_then(|p| tree.lookup(p))
            .unwrap_or_else(|| tree.root());
        self.rects = self
            .engine
            .layout(tree, root, f32::from(area.width), f32::from(area.height));

        let tree = self
            .authoritative
            .as_ref()
            .unwrap_or_else(|| self.aggregator.tree());
        self.controller.sync_tree(tree);
    }

    fn hit_test(&self, x: f32, y: f32) -> Option<&LayoutRect> {
        self.rects
            .iter()
            .filter(|r| r.contains(x, y))
            .max_by_key(|r| r.depth)
    }

    fn local_pos(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        let area = self.treemap_area?;
        if column < area.x || row < area.y {
            return None;
        }
        let x = f32::from(column - area.x) + 0.5;
        let y = f32::from(row - area.y) + 0.5;
        if x >= f32::from(area.width) || y >= f32::from(area.height) {
            return None;
        }
        Some((x, y))
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Navigate(path) => self.navigate_to(path),
            Intent::Reveal(path) => {
                self.status = match commands::reveal_in_file_browser(&path) {
                    Ok(()) => format!("Revealed {}", path),
                    Err(err) => format!("Reveal failed: {err:#}"),
                };
            }
            Intent::Trash(path) => {
                self.status = match commands::move_to_trash(&path) {
                    Ok(()) => format!("Moved to trash: {}", path),
                    Err(err) => format!("Trash failed: {err:#}"),
                };
            }
        }
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

    fn navigate_up(&mut self) {
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

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            self.should_quit = true;
            return;
        }

        if self.input_mode {
            match key.code {
                KeyCode::Enter => {
                    self.input_mode = false;
                    self.start_scan();
                }
                KeyCode::Esc => self.input_mode = false,
                KeyCode::Backspace => {
                    self.path_input.pop();
                }
                KeyCode::Char(ch) => self.path_input.push(ch),
                _ => {}
            }
            return;
        }

        if let Phase::Failed(_) = self.phase {
            match key.code {
                KeyCode::Char('b') => {
                    self.phase = Phase::Idle;
                    self.status = String::from("Type path and press Enter to scan");
                }
                KeyCode::Char('s') | KeyCode::Char('r') => self.start_scan(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        // Menu-scoped keys first.
        if self.controller.context_menu().is_some() {
            match key.code {
                KeyCode::Char('r') => {
                    if let Some(intent) = self.controller.on_menu_action(MenuAction::Reveal) {
                        self.apply_intent(intent);
                    }
                }
                KeyCode::Char('t') => {
                    if let Some(intent) = self.controller.on_menu_action(MenuAction::Trash) {
                        self.apply_intent(intent);
                    }
                }
                KeyCode::Esc => self.controller.on_escape(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.input_mode = true,
            KeyCode::Char('s') => self.start_scan(),
            KeyCode::Char('x') => self.cancel_scan(),
            KeyCode::Char('u') | KeyCode::Backspace => self.navigate_up(),
            KeyCode::Enter => {
                if let Some(intent) = self.controller.on_enter() {
                    self.apply_intent(intent);
                }
            }
            KeyCode::Esc => self.controller.on_escape(),
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let local = self.local_pos(mouse.column, mouse.row);
                let hit = local.and_then(|(x, y)| self.hit_test(x, y)).cloned();

                let now = Instant::now();
                let is_double = self
                    .last_click
                    .map(|(c, r, at)| {
                        c == mouse.column && r == mouse.row && now.duration_since(at) < DOUBLE_CLICK_WINDOW
                    })
                    .unwrap_or(false);
                self.last_click = Some((mouse.column, mouse.row, now));

                if is_double {
                    if let Some(intent) = self.controller.on_double_click(hit.as_ref()) {
                        self.apply_intent(intent);
                    }
                } else {
                    self.controller.on_primary_click(hit.as_ref());
                    if let Some(rect) = &hit {
                        self.status = format!(
                            "Selected {} ({})",
                            rect.path,
                            self.describe_weight(rect.weight),
                        );
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some(area) = self.treemap_area {
                    if let Some((x, y)) = self.local_pos(mouse.column, mouse.row) {
                        if let Some(rect) = self.hit_test(x, y).cloned() {
                            self.controller
                                .set_viewport(f32::from(area.width), f32::from(area.height));
                            self.controller.set_menu_size(MENU_COLS, MENU_ROWS, 1.0);
                            self.controller.on_secondary_click(&rect, x, y);
                        }
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Middle) => self.navigate_up(),
            _ => {}
        }
    }

    fn describe_weight(&self, weight: f64) -> String {
        if self.is_authoritative() {
            format_size(weight as u64, BINARY)
        } else {
            format!("activity {:.1}", weight)
        }
    }

    fn current_view_label(&self) -> String {
        self.view_root
            .clone()
            .unwrap_or_else(|| self.display_tree().root_path().to_string())
    }
}

fn export_tree(path: &std::path::Path, node: &FileNode) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(file, node).context("serialization failed")?;
    Ok(())
}

fn tile_color(rect: &LayoutRect, max_weight: f64) -> Color {
    let ratio = if max_weight <= 0.0 {
        0.0
    } else {
        (rect.weight / max_weight).clamp(0.0, 1.0) as f32
    };

    if rect.is_dir {
        let r = (35.0 + ratio * 65.0) as u8;
        let g = (95.0 + ratio * 95.0) as u8;
        let b = (145.0 + ratio * 85.0) as u8;
        Color::Rgb(r, g, b)
    } else {
        let r = (55.0 + ratio * 120.0) as u8;
        let g = (85.0 + ratio * 95.0) as u8;
        let b = (95.0 + ratio * 70.0) as u8;
        Color::Rgb(r, g, b)
    }
}

fn rect_bounds_in_area(rect: &LayoutRect, area: UiRect) -> Option<(u16, u16, u16, u16)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }

    let max_x = area.x.saturating_add(area.width.saturating_sub(1));
    let max_y = area.y.saturating_add(area.height.saturating_sub(1));

    let x0 = area
        .x
        .saturating_add(rect.x0.max(0.0) as u16)
        .clamp(area.x, max_x);
    let y0 = area
        .y
        .saturating_add(rect.y0.max(0.0) as u16)
        .clamp(area.y, max_y);
    let x1 = area
        .x
        .saturating_add((rect.x1.max(1.0) as u16).saturating_sub(1))
        .clamp(area.x, max_x);
    let y1 = area
        .y
        .saturating_add((rect.y1.max(1.0) as u16).saturating_sub(1))
        .clamp(area.y, max_y);

    if x1 < x0 || y1 < y0 {
        return None;
    }
    Some((x0, y0, x1, y1))
}

struct TreemapWidget<'a> {
    rects: &'a [LayoutRect],
    selected_path: Option<&'a str>,
    authoritative: bool,
}

impl Widget for TreemapWidget<'_> {
    fn render(self, area: UiRect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                buf[(x, y)]
                    .set_char(' ')
                    .set_style(Style::default().bg(Color::Rgb(18, 18, 20)));
            }
        }

        let max_weight = self
            .rects
            .iter()
            .map(|r| r.weight)
            .fold(0.0f64, f64::max);

        // rects are already ordered parents-first; children paint on top.
        for rect in self.rects {
            let Some((x0, y0, x1, y1)) = rect_bounds_in_area(rect, area) else {
                continue;
            };

            let is_selected = self.selected_path == Some(rect.path.as_str());
            let bg = tile_color(rect, max_weight);
            let border_color = if is_selected {
                Color::Rgb(246, 211, 101)
            } else {
                Color::Rgb(224, 224, 224)
            };

            for y in y0..=y1 {
                for x in x0..=x1 {
                    buf[(x, y)]
                        .set_char(' ')
                        .set_style(Style::default().bg(bg).fg(Color::White));
                }
            }

            if x1 > x0 {
                for x in x0..=x1 {
                    buf[(x, y0)]
                        .set_char('─')
                        .set_style(Style::default().fg(border_color).bg(bg));
                    buf[(x, y1)]
                        .set_char('─')
                        .set_style(Style::default().fg(border_color).bg(bg));
                }
            }
            if y1 > y0 {
                for y in y0..=y1 {
                    buf[(x0, y)]
                        .set_char('│')
                        .set_style(Style::default().fg(border_color).bg(bg));
                    buf[(x1, y)]
                        .set_char('│')
                        .set_style(Style::default().fg(border_color).bg(bg));
                }
            }
            buf[(x0, y0)]
                .set_char('┌')
                .set_style(Style::default().fg(border_color).bg(bg));
            buf[(x1, y0)]
                .set_char('┐')
                .set_style(Style::default().fg(border_color).bg(bg));
            buf[(x0, y1)]
                .set_char('└')
                .set_style(Style::default().fg(border_color).bg(bg));
            buf[(x1, y1)]
                .set_char('┘')
                .set_style(Style::default().fg(border_color).bg(bg));

            let label_width = x1.saturating_sub(x0).saturating_sub(1) as usize;
            if label_width >= 4 {
                let mut label = if self.authoritative {
                    format!("{} {}", rect.name, format_size(rect.weight as u64, BINARY))
                } else {
                    rect.name.clone()
                };
                if label.len() > label_width {
                    label.truncate(label_width.saturating_sub(1));
                    label.push('…');
                }

                for (i, ch) in label.chars().enumerate() {
                    let x = x0.saturating_add(1).saturating_add(i as u16);
                    if x > x1.saturating_sub(1) {
                        break;
                    }
                    buf[(x, y0)].set_char(ch).set_style(
                        Style::default()
                            .fg(Color::White)
                            .bg(bg)
                            .add_modifier(Modifier::BOLD),
                    );
                }
            }
        }
    }
}

fn draw_ui(frame: &mut Frame, app: &mut App) {
    let root = frame.area();
    let split = Layout::horizontal([Constraint::Length(42), Constraint::Min(30)]).split(root);
    let left = split[0];
    let right = split[1];

    let left_block = Block::default().title(" Diskmap ").borders(Borders::ALL);
    let left_inner = left_block.inner(left);
    frame.render_widget(left_block, left);

    let left_rows = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Min(8),
        Constraint::Length(5),
    ])
    .split(left_inner);

    let input_title = if app.input_mode { " Path (typing) " } else { " Path " };
    let path_block = Block::default().title(input_title).borders(Borders::ALL);
    let path_inner = path_block.inner(left_rows[0]);
    frame.render_widget(path_block, left_rows[0]);
    let path_style = if app.input_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    frame.render_widget(
        Paragraph::new(app.path_input.as_str()).style(path_style),
        path_inner,
    );

    let status_text = if let Phase::Scanning = app.phase {
        format!(
            "Scanning... {} items seen\n{}",
            app.aggregator.items_processed(),
            app.status,
        )
    } else {
        app.status.clone()
    };
    frame.render_widget(
        Paragraph::new(status_text).block(Block::default().title(" Status ").borders(Borders::ALL)),
        left_rows[1],
    );

    let mut lines = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("View: ", Style::default().fg(Color::Gray)),
        Span::raw(app.current_view_label()),
    ]));
    if let Some(path) = app.controller.selected_path() {
        lines.push(Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(Color::Gray)),
            Span::raw(path.to_string()),
        ]));
        if let Some(id) = app.display_tree().lookup(path) {
            let node = app.display_tree().node(id);
            lines.push(Line::from(vec![
                Span::styled("Type: ", Style::default().fg(Color::Gray)),
                Span::raw(if node.is_dir { "directory" } else { "file" }),
                Span::raw("  "),
                Span::styled("Size: ", Style::default().fg(Color::Gray)),
                Span::raw(app.describe_weight(node.weight)),
            ]));
        }
    } else {
        lines.push(Line::from("Selected: (none)"));
    }
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(" Selection ").borders(Borders::ALL)),
        left_rows[2],
    );

    let help_lines = vec![
        Line::from("Enter: scan / drill into selection"),
        Line::from("Click: select   Double-click: drill"),
        Line::from("Right-click: menu   u: up   x: cancel"),
        Line::from("/: edit path   q: quit"),
    ];
    frame.render_widget(
        Paragraph::new(help_lines).block(Block::default().title(" Controls ").borders(Borders::ALL)),
        left_rows[3],
    );

    let treemap_block = Block::default()
        .title(" Treemap ")
        .borders(Borders::ALL);
    let treemap_inner = treemap_block.inner(right);
    frame.render_widget(treemap_block, right);
    app.treemap_area = Some(treemap_inner);

    if let Phase::Failed(message) = &app.phase {
        let error_lines = vec![
            Line::from(Span::styled(
                "Scan failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(message.as_str()),
            Line::from(""),
            Line::from("b: back   s: retry scan"),
        ];
        frame.render_widget(Paragraph::new(error_lines), treemap_inner);
        return;
    }

    if app.rects.is_empty() {
        frame.render_widget(
            Paragraph::new("No treemap yet. Enter a path and scan.")
                .style(Style::default().fg(Color::Gray)),
            treemap_inner,
        );
    } else {
        frame.render_widget(
            TreemapWidget {
                rects: &app.rects,
                selected_path: app.controller.selected_path(),
                authoritative: app.is_authoritative(),
            },
            treemap_inner,
        );
    }

    if let Some(menu) = app.controller.context_menu() {
        let x = treemap_inner.x.saturating_add(menu.anchor_x as u16);
        let y = treemap_inner.y.saturating_add(menu.anchor_y as u16);
        let menu_area = UiRect {
            x,
            y,
            width: (MENU_COLS as u16).min(root.width.saturating_sub(x)),
            height: (MENU_ROWS as u16).min(root.height.saturating_sub(y)),
        };
        let mut name = menu
            .target_path
            .rsplit('/')
            .next()
            .unwrap_or(menu.target_path.as_str())
            .to_string();
        if name.len() > MENU_COLS as usize - 4 {
            name.truncate(MENU_COLS as usize - 5);
            name.push('…');
        }
        let menu_lines = vec![
            Line::from("r: reveal in file browser"),
            Line::from("t: move to trash"),
            Line::from("esc: close"),
        ];
        frame.render_widget(Clear, menu_area);
        frame.render_widget(
            Paragraph::new(menu_lines)
                .block(Block::default().title(format!(" {} ", name)).borders(Borders::ALL)),
            menu_area,
        );
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, mut app: App) -> io::Result<()> {
    if !app.input_mode {
        app.start_scan();
    }

    loop {
        app.poll_scan_updates();
        // The first frame has no measured treemap area yet; polling before
        // one exists would consume the grant without laying anything out.
        if app.treemap_area.is_some() && app.scheduler.poll(Instant::now()) {
            app.run_layout_pass();
        }

        terminal.draw(|frame| {
            draw_ui(frame, &mut app);
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                Event::Resize(_, _) => app.scheduler.mark_dirty(),
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    enable_raw_mode()?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let app_result = run_app(&mut terminal, App::new(cli));

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app_result?;
    Ok(())
}
