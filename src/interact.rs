use crate::tree::WeightTree;
use crate::treemap::LayoutRect;

/// Default context menu box size and viewport margin used to clamp the
/// anchor, in layout units (pixels for the GUI; the TUI overrides these
/// with cell counts).
const MENU_WIDTH: f32 = 180.0;
const MENU_HEIGHT: f32 = 72.0;
const MENU_MARGIN: f32 = 8.0;

/// What the host application is asked to do. The controller never performs
/// navigation or OS actions itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Replace the render root with this directory and re-run layout.
    Navigate(String),
    /// Reveal the path in the system file browser.
    Reveal(String),
    /// Move the path to the trash.
    Trash(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Reveal,
    Trash,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub target_path: String,
    pub target_is_dir: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Selection {
    path: String,
    is_dir: bool,
}

/// Selection, context-menu and drill-down state over the rendered
/// rectangle set.
///
/// Single-select; selection persists across layout passes while the
/// selected path still exists in the tree, and clears on background click,
/// Escape, or navigation.
pub struct InteractionController {
    selection: Option<Selection>,
    menu: Option<ContextMenu>,
    viewport_w: f32,
    viewport_h: f32,
    menu_w: f32,
    menu_h: f32,
    menu_margin: f32,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            selection: None,
            menu: None,
            viewport_w: 0.0,
            viewport_h: 0.0,
            menu_w: MENU_WIDTH,
            menu_h: MENU_HEIGHT,
            menu_margin: MENU_MARGIN,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_w = width;
        self.viewport_h = height;
    }

    pub fn set_menu_size(&mut self, width: f32, height: f32, margin: f32) {
        self.menu_w = width;
        self.menu_h = height;
        self.menu_margin = margin;
    }

    pub fn selected_path(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.path.as_str())
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    /// Primary click. A rectangle selects it; the background clears both
    /// selection and menu.
    pub fn on_primary_click(&mut self, target: Option<&LayoutRect>) {
        self.menu = None;
        self.selection = target.map(|rect| Selection {
            path: rect.path.clone(),
            is_dir: rect.is_dir,
        });
    }

    /// Double activation. Drilling into a non-directory is a no-op.
    pub fn on_double_click(&mut self, target: Option<&LayoutRect>) -> Option<Intent> {
        self.menu = None;
        let rect = target?;
        if !rect.is_dir {
            return None;
        }
        self.on_navigate();
        Some(Intent::Navigate(rect.path.clone()))
    }

    /// Secondary click opens the context menu on the target, selecting it.
    /// The anchor is clamped so the menu box stays inside the viewport.
    pub fn on_secondary_click(&mut self, target: &LayoutRect, anchor_x: f32, anchor_y: f32) {
        self.selection = Some(Selection {
            path: target.path.clone(),
            is_dir: target.is_dir,
        });
        let (x, y) = self.clamp_anchor(anchor_x, anchor_y);
        self.menu = Some(ContextMenu {
            anchor_x: x,
            anchor_y: y,
            target_path: target.path.clone(),
            target_is_dir: target.is_dir,
        });
    }

    fn clamp_anchor(&self, x: f32, y: f32) -> (f32, f32) {
        let max_x = (self.viewport_w - self.menu_w - self.menu_margin).max(0.0);
        let max_y = (self.viewport_h - self.menu_h - self.menu_margin).max(0.0);
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    /// Enter drills into the selected directory; on files it is a no-op.
    pub fn on_enter(&mut self) -> Option<Intent> {
        let sel = self.selection.as_ref()?;
        if !sel.is_dir {
            return None;
        }
        let path = sel.path.clone();
        self.on_navigate();
        Some(Intent::Navigate(path))
    }

    /// Escape closes the menu first; with no menu open it clears selection.
    pub fn on_escape(&mut self) {
        if self.menu.take().is_none() {
            self.selection = None;
        }
    }

    /// An action chosen from the open menu. Closes the menu and returns the
    /// command for the host; selection stays on the target.
    pub fn on_menu_action(&mut self, action: MenuAction) -> Option<Intent> {
        let menu = self.menu.take()?;
        Some(match action {
            MenuAction::Reveal => Intent::Reveal(menu.target_path),
            MenuAction::Trash => Intent::Trash(menu.target_path),
        })
    }

    /// The host navigated (drill-down or drill-up): selection and menu do
    /// not carry over to the new view.
    pub fn on_navigate(&mut self) {
        self.selection = None;
        self.menu = None;
    }

    /// Reconcile with the tree after a layout pass: state pointing at paths
    /// that no longer exist is dropped.
    pub fn sync_tree(&mut self, tree: &WeightTree) {
        if let Some(sel) = &self.selection {
            if !tree.contains(&sel.path) {
                self.selection = None;
            }
        }
        if let Some(menu) = &self.menu {
            if !tree.contains(&menu.target_path) {
                self.menu = None;
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(path: &str, is_dir: bool) -> LayoutRect {
        LayoutRect {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap_or("").to_string(),
            weight: 1.0,
            is_dir,
            subdivided: false,
            depth: 1,
            x0: 0.0,
            y0: 0.0,
            x1: 10.0,
            y1: 10.0,
        }
    }

    #[test]
    fn test_click_selects_background_clears() {
        let mut ctl = InteractionController::new();
        let r = rect("/a", true);

        ctl.on_primary_click(Some(&r));
        assert_eq!(ctl.selected_path(), Some("/a"));

        ctl.on_primary_click(None);
        assert_eq!(ctl.selected_path(), None);
    }

    #[test]
    fn test_double_click_navigates_directories_only() {
        let mut ctl = InteractionController::new();
        assert_eq!(
            ctl.on_double_click(Some(&rect("/a", true))),
            Some(Intent::Navigate("/a".to_string()))
        );
        // Navigation resets selection.
        assert_eq!(ctl.selected_path(), None);
        assert_eq!(ctl.on_double_click(Some(&rect("/f", false))), None);
        assert_eq!(ctl.on_double_click(None), None);
    }

    #[test]
    fn test_enter_on_selected_directory() {
        let mut ctl = InteractionController::new();
        ctl.on_primary_click(Some(&rect("/a", true)));
        assert_eq!(ctl.on_enter(), Some(Intent::Navigate("/a".to_string())));

        ctl.on_primary_click(Some(&rect("/f", false)));
        assert_eq!(ctl.on_enter(), None);
        assert_eq!(ctl.selected_path(), Some("/f"));
    }

    #[test]
    fn test_context_menu_flow() {
        let mut ctl = InteractionController::new();
        ctl.set_viewport(800.0, 600.0);

        ctl.on_secondary_click(&rect("/a", true), 100.0, 100.0);
        let menu = ctl.context_menu().unwrap();
        assert_eq!(menu.target_path, "/a");
        assert!(menu.target_is_dir);
        assert_eq!(ctl.selected_path(), Some("/a"));

        assert_eq!(
            ctl.on_menu_action(MenuAction::Reveal),
            Some(Intent::Reveal("/a".to_string()))
        );
        assert!(ctl.context_menu().is_none());
        // Selection survives the menu action.
        assert_eq!(ctl.selected_path(), Some("/a"));
        // Menu gone, action is a no-op.
        assert_eq!(ctl.on_menu_action(MenuAction::Trash), None);
    }

    #[test]
    fn test_menu_anchor_clamped_to_viewport() {
        let mut ctl = InteractionController::new();
        ctl.set_viewport(800.0, 600.0);

        ctl.on_secondary_click(&rect("/a", false), 795.0, 598.0);
        let menu = ctl.context_menu().unwrap();
        assert!(menu.anchor_x + MENU_WIDTH + MENU_MARGIN <= 800.0);
        assert!(menu.anchor_y + MENU_HEIGHT + MENU_MARGIN <= 600.0);
    }

    #[test]
    fn test_escape_closes_menu_then_selection() {
        let mut ctl = InteractionController::new();
        ctl.set_viewport(800.0, 600.0);
        ctl.on_secondary_click(&rect("/a", true), 10.0, 10.0);

        ctl.on_escape();
        assert!(ctl.context_menu().is_none());
        assert_eq!(ctl.selected_path(), Some("/a"));

        ctl.on_escape();
        assert_eq!(ctl.selected_path(), None);
    }

    #[test]
    fn test_selection_survival_across_layout() {
        let mut tree = WeightTree::new("/", "/", true, 1.0);
        tree.append_child(tree.root(), "a", "/a", true, 1.0);

        let mut ctl = InteractionController::new();
        ctl.on_primary_click(Some(&rect("/a", true)));

        ctl.sync_tree(&tree);
        assert_eq!(ctl.selected_path(), Some("/a"));

        // A new session tree without /a clears the selection.
        let fresh = WeightTree::new("/", "/", true, 1.0);
        ctl.sync_tree(&fresh);
        assert_eq!(ctl.selected_path(), None);
    }
}
