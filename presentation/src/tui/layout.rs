//! Layout engine: weighted box tree, panel registry, visibility and focus.
//!
//! The screen is described as a tree of boxes, each either fixed-size or
//! weighted. The tree is rebuilt from the current visibility / zoom flags on
//! every pass and arranged with ratatui's [`Layout`]:
//!
//! ```text
//! ┌ Left ┬ Conversation (w2, zoomed w1) ┬ Auxiliary (w1, zoomed w4) ┐
//! ├ Input (fixed 3+) ────────────────────────────────────────────────┤
//! └ Status (fixed 1) ────────────────────────────────────────────────┘
//! ```
//!
//! Mutators only flip flags; rectangles and views are (re)computed by the next
//! [`LayoutEngine::layout`] call, which is a pure function of
//! (visibility, zoom, size).

use super::content::{Displayable, PanelContent, RenderContext, RenderError, Scroll};
use super::focus::{FocusChange, FocusState, next_in_order};
use super::panel::{Panel, PanelId, View};
use super::theme::Theme;
use super::widgets::{
    centered_overlay, conversation::ConversationView, debug::DebugLog, diff_viewer::DiffViewer,
    input::InputLine, status_bar::StatusLine, text_viewer::TextViewer,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Color,
    widgets::{Clear, Widget},
};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Which viewer currently owns the auxiliary slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AuxiliaryMode {
    #[default]
    Debug,
    TextViewer,
    DiffViewer,
}

impl AuxiliaryMode {
    pub const ALL: [AuxiliaryMode; 3] = [
        AuxiliaryMode::Debug,
        AuxiliaryMode::TextViewer,
        AuxiliaryMode::DiffViewer,
    ];

    pub fn panel(self) -> PanelId {
        match self {
            AuxiliaryMode::Debug => PanelId::Debug,
            AuxiliaryMode::TextViewer => PanelId::TextViewer,
            AuxiliaryMode::DiffViewer => PanelId::DiffViewer,
        }
    }

    pub fn from_panel(id: &PanelId) -> Option<Self> {
        match id {
            PanelId::Debug => Some(AuxiliaryMode::Debug),
            PanelId::TextViewer => Some(AuxiliaryMode::TextViewer),
            PanelId::DiffViewer => Some(AuxiliaryMode::DiffViewer),
            _ => None,
        }
    }
}

/// State of the right-hand auxiliary slot. Only one mode is ever shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RightPanelState {
    pub visible: bool,
    pub mode: AuxiliaryMode,
    pub zoomed: bool,
}

/// Sizes fed into the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub input_height: u16,
    pub status_height: u16,
    pub left_weight: u16,
    pub conversation_weight: u16,
    pub auxiliary_weight: u16,
    pub zoomed_conversation_weight: u16,
    pub zoomed_auxiliary_weight: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            input_height: 3,
            status_height: 1,
            left_weight: 1,
            conversation_weight: 2,
            auxiliary_weight: 1,
            zoomed_conversation_weight: 1,
            zoomed_auxiliary_weight: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSize {
    Fixed(u16),
    Weight(u16),
}

impl BoxSize {
    fn constraint(self) -> Constraint {
        match self {
            BoxSize::Fixed(n) => Constraint::Length(n),
            BoxSize::Weight(w) => Constraint::Fill(w),
        }
    }
}

/// One node of the layout tree. Leaves name a panel; containers split
/// their area among children along `direction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutBox {
    pub panel: Option<PanelId>,
    pub size: BoxSize,
    pub direction: Direction,
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    pub fn leaf(panel: PanelId, size: BoxSize) -> Self {
        Self {
            panel: Some(panel),
            size,
            direction: Direction::Horizontal,
            children: Vec::new(),
        }
    }

    pub fn container(size: BoxSize, direction: Direction, children: Vec<LayoutBox>) -> Self {
        Self {
            panel: None,
            size,
            direction,
            children,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("panel '{0}' is not registered")]
    UnknownPanel(PanelId),

    #[error("panel '{0}' is not visible")]
    Hidden(PanelId),
}

/// A panel that failed to draw during one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub panel: PanelId,
    pub error: RenderError,
}

/// A centred dialog drawn over the tiled panels (help and the like).
#[derive(Debug)]
struct Overlay {
    content: PanelContent,
    percent_x: u16,
    percent_y: u16,
    view: Option<View>,
}

pub struct LayoutEngine {
    panels: BTreeMap<PanelId, Panel>,
    overlays: BTreeMap<String, Overlay>,
    focus: FocusState,
    right: RightPanelState,
    config: LayoutConfig,
    theme: Theme,
    last_size: Option<(u16, u16)>,
}

impl LayoutEngine {
    pub fn new(theme: Theme, config: LayoutConfig) -> Self {
        Self {
            panels: BTreeMap::new(),
            overlays: BTreeMap::new(),
            focus: FocusState::default(),
            right: RightPanelState::default(),
            config,
            theme,
            last_size: None,
        }
    }

    /// Engine with the standard panel set registered and the input focused.
    pub fn with_default_panels(theme: Theme, config: LayoutConfig) -> Self {
        let mut engine = Self::new(theme, config);
        engine.set_component(
            PanelId::Conversation,
            PanelContent::Conversation(ConversationView::new()),
        );
        engine.set_component(PanelId::Input, PanelContent::Input(InputLine::new()));
        engine.set_component(PanelId::Status, PanelContent::Status(StatusLine::new()));
        engine.set_component(PanelId::Debug, PanelContent::Debug(DebugLog::new()));
        engine.set_component(
            PanelId::TextViewer,
            PanelContent::TextViewer(TextViewer::new()),
        );
        engine.set_component(
            PanelId::DiffViewer,
            PanelContent::DiffViewer(DiffViewer::new()),
        );
        // Input is always registered and visible here
        let _ = engine.focus_panel(&PanelId::Input);
        engine
    }

    // ==================== Registry ====================

    /// Register `content` under `id`, or replace the renderer of an existing
    /// panel. Visibility and screen region are left alone.
    pub fn set_component(&mut self, id: PanelId, mut content: PanelContent) {
        match self.panels.get_mut(&id) {
            Some(panel) => {
                if let Some(view) = &panel.view {
                    content.rewrap(view.area.width);
                }
                panel.content = content;
            }
            None => {
                self.panels.insert(id.clone(), Panel::new(id, content));
            }
        }
        self.refresh_views();
    }

    /// Replace a registered panel's renderer in place, returning the old one.
    ///
    /// The panel keeps its region, visibility and focus. When it holds focus
    /// the outgoing renderer is told it lost focus before the incoming one
    /// gains it.
    pub fn swap_component(
        &mut self,
        id: &PanelId,
        mut content: PanelContent,
    ) -> Result<PanelContent, LayoutError> {
        let focused = self.focus.is(id);
        let panel = self
            .panels
            .get_mut(id)
            .ok_or_else(|| LayoutError::UnknownPanel(id.clone()))?;

        if let Some(view) = &panel.view {
            content.rewrap(view.area.width);
        }
        let mut previous = std::mem::replace(&mut panel.content, content);
        if focused {
            previous.on_focus_lost();
            panel.content.on_focus();
        }
        debug!(
            panel = %id,
            from = previous.kind(),
            to = panel.content.kind(),
            "Swapped panel content"
        );
        self.refresh_views();
        Ok(previous)
    }

    pub fn content(&self, id: &PanelId) -> Option<&PanelContent> {
        match id {
            PanelId::Ephemeral(name) => self.overlays.get(name).map(|o| &o.content),
            _ => self.panels.get(id).map(|p| &p.content),
        }
    }

    pub fn content_mut(&mut self, id: &PanelId) -> Option<&mut PanelContent> {
        match id {
            PanelId::Ephemeral(name) => self.overlays.get_mut(name).map(|o| &mut o.content),
            _ => self.panels.get_mut(id).map(|p| &mut p.content),
        }
    }

    pub fn is_registered(&self, id: &PanelId) -> bool {
        match id {
            PanelId::Ephemeral(name) => self.overlays.contains_key(name),
            _ => self.panels.contains_key(id),
        }
    }

    // ==================== Visibility ====================

    pub fn is_visible(&self, id: &PanelId) -> bool {
        match id {
            PanelId::Ephemeral(name) => self.overlays.contains_key(name),
            _ if id.is_auxiliary() => {
                self.panels.contains_key(id)
                    && self.right.visible
                    && self.right.mode.panel() == *id
            }
            _ => self.panels.get(id).is_some_and(|p| p.visible),
        }
    }

    /// Flip a panel's visibility flag. Auxiliary panels go through the
    /// show / hide helpers so only one of them is ever shown.
    pub fn set_visible(&mut self, id: &PanelId, visible: bool) {
        if let Some(mode) = AuxiliaryMode::from_panel(id) {
            if visible {
                self.show_auxiliary_panel(mode);
            } else if self.right.visible && self.right.mode == mode {
                self.hide_auxiliary_panel();
            }
            return;
        }

        match id {
            PanelId::Ephemeral(name) => {
                if !visible {
                    self.close_overlay(name);
                }
            }
            _ => {
                if let Some(panel) = self.panels.get_mut(id) {
                    panel.visible = visible;
                }
                self.ensure_focus_visible();
            }
        }
    }

    pub fn show_auxiliary_panel(&mut self, mode: AuxiliaryMode) {
        self.right.visible = true;
        self.right.mode = mode;
        self.ensure_focus_visible();
    }

    pub fn hide_auxiliary_panel(&mut self) {
        self.right.visible = false;
        self.right.zoomed = false;
        self.ensure_focus_visible();
    }

    /// Show `mode`, or hide the slot if `mode` is already showing.
    pub fn toggle_auxiliary_panel(&mut self, mode: AuxiliaryMode) {
        if self.right.visible && self.right.mode == mode {
            self.hide_auxiliary_panel();
        } else {
            self.show_auxiliary_panel(mode);
        }
    }

    pub fn right_panel(&self) -> RightPanelState {
        self.right
    }

    /// Open a centred overlay; it becomes focusable as `Ephemeral(name)`.
    pub fn open_overlay(
        &mut self,
        name: impl Into<String>,
        content: PanelContent,
        percent_x: u16,
        percent_y: u16,
    ) -> PanelId {
        let name = name.into();
        self.overlays.insert(
            name.clone(),
            Overlay {
                content,
                percent_x,
                percent_y,
                view: None,
            },
        );
        if let Some((w, h)) = self.last_size {
            self.layout(w, h);
        }
        PanelId::Ephemeral(name)
    }

    pub fn close_overlay(&mut self, name: &str) -> Option<PanelContent> {
        let overlay = self.overlays.remove(name)?;
        self.ensure_focus_visible();
        Some(overlay.content)
    }

    pub fn has_overlay(&self, name: &str) -> bool {
        self.overlays.contains_key(name)
    }

    // ==================== Focus ====================

    pub fn focused(&self) -> Option<&PanelId> {
        self.focus.current()
    }

    /// Move keyboard focus to `id`.
    ///
    /// Overlays are focused directly. Panels must be registered and visible.
    pub fn focus_panel(&mut self, id: &PanelId) -> Result<FocusChange, LayoutError> {
        if !self.is_registered(id) {
            debug!(panel = %id, "Focus requested for unregistered panel");
            return Err(LayoutError::UnknownPanel(id.clone()));
        }
        if !self.is_visible(id) {
            return Err(LayoutError::Hidden(id.clone()));
        }
        Ok(self.transfer_focus(id.clone()))
    }

    /// Focus the next visible panel in navigation order, wrapping around.
    pub fn focus_next(&mut self) -> Option<PanelId> {
        let next = next_in_order(self.focus.current(), |id| self.is_navigable(id))?;
        self.transfer_focus(next.clone());
        Some(next)
    }

    fn is_navigable(&self, id: &PanelId) -> bool {
        *id != PanelId::Status && self.is_visible(id)
    }

    fn transfer_focus(&mut self, id: PanelId) -> FocusChange {
        let lost = self.focus.current().cloned();
        if let Some(previous) = &lost {
            if let Some(content) = self.content_mut(previous) {
                content.on_focus_lost();
            }
        }
        self.focus.set(Some(id.clone()));
        if let Some(content) = self.content_mut(&id) {
            content.on_focus();
        }
        self.refresh_views();
        FocusChange { lost, gained: id }
    }

    /// Keep focus on something visible after a visibility change.
    fn ensure_focus_visible(&mut self) {
        let Some(current) = self.focus.current().cloned() else {
            return;
        };
        if self.is_visible(&current) {
            return;
        }

        let fallback = if self.is_navigable(&PanelId::Input) {
            Some(PanelId::Input)
        } else {
            next_in_order(Some(&current), |id| self.is_navigable(id))
        };

        match fallback {
            Some(id) => {
                self.transfer_focus(id);
            }
            None => {
                if let Some(content) = self.content_mut(&current) {
                    content.on_focus_lost();
                }
                self.focus.set(None);
                self.refresh_views();
            }
        }
    }

    // ==================== Zoom ====================

    /// Give the auxiliary slot most of the width. No-op unless it is shown.
    pub fn zoom(&mut self) -> bool {
        if self.right.zoomed || !self.right.visible {
            return false;
        }
        self.right.zoomed = true;
        self.reflow();
        true
    }

    pub fn unzoom(&mut self) -> bool {
        if !self.right.zoomed {
            return false;
        }
        self.right.zoomed = false;
        self.reflow();
        true
    }

    pub fn toggle_zoom(&mut self) -> bool {
        if self.right.zoomed {
            self.unzoom();
        } else {
            self.zoom();
        }
        self.right.zoomed
    }

    /// Recompute with the last known size, then re-wrap the conversation
    /// (pinned to the bottom) and the auxiliary viewer.
    fn reflow(&mut self) {
        if let Some((w, h)) = self.last_size {
            self.layout(w, h);
        }
        if let Some(panel) = self.panels.get_mut(&PanelId::Conversation) {
            if let Some(view) = &panel.view {
                panel.content.rewrap(view.area.width);
            }
            panel.content.scroll(Scroll::Bottom);
        }
        if let Some(panel) = self.panels.get_mut(&self.right.mode.panel()) {
            if let Some(view) = &panel.view {
                panel.content.rewrap(view.area.width);
            }
        }
    }

    // ==================== Layout ====================

    /// Rows for the input slot: the configured height, or more when the
    /// current content asks for it (a long confirmation message).
    fn input_height(&self, width: u16) -> u16 {
        let wanted = self
            .panels
            .get(&PanelId::Input)
            .map_or(0, |panel| panel.content.desired_height(width));
        self.config.input_height.max(wanted)
    }

    /// Box tree for the current flags at `width` columns.
    pub fn build_tree(&self, width: u16) -> LayoutBox {
        let (conversation_weight, auxiliary_weight) = if self.right.zoomed {
            (
                self.config.zoomed_conversation_weight,
                self.config.zoomed_auxiliary_weight,
            )
        } else {
            (self.config.conversation_weight, self.config.auxiliary_weight)
        };

        let mut centre = vec![
            LayoutBox::leaf(PanelId::Left, BoxSize::Weight(self.config.left_weight)),
            LayoutBox::leaf(PanelId::Conversation, BoxSize::Weight(conversation_weight)),
        ];
        if self.right.visible {
            centre.push(LayoutBox::leaf(
                self.right.mode.panel(),
                BoxSize::Weight(auxiliary_weight),
            ));
        }

        LayoutBox::container(
            BoxSize::Weight(1),
            Direction::Vertical,
            vec![
                LayoutBox::container(BoxSize::Weight(1), Direction::Horizontal, centre),
                LayoutBox::leaf(PanelId::Input, BoxSize::Fixed(self.input_height(width))),
                LayoutBox::leaf(PanelId::Status, BoxSize::Fixed(self.config.status_height)),
            ],
        )
    }

    /// Rectangles for every visible panel at `width` x `height`.
    ///
    /// Leaves naming unregistered or hidden panels are dropped before
    /// arranging, so their share goes to their siblings.
    pub fn compute_rects(&self, width: u16, height: u16) -> BTreeMap<PanelId, Rect> {
        let mut rects = BTreeMap::new();
        if width == 0 || height == 0 {
            return rects;
        }
        self.arrange(&self.build_tree(width), Rect::new(0, 0, width, height), &mut rects);
        rects
    }

    fn arrange(&self, node: &LayoutBox, area: Rect, out: &mut BTreeMap<PanelId, Rect>) {
        if let Some(id) = &node.panel {
            if self.is_visible(id) {
                out.insert(id.clone(), area);
            }
            return;
        }

        let present: Vec<&LayoutBox> = node
            .children
            .iter()
            .filter(|child| self.has_content(child))
            .collect();
        if present.is_empty() {
            return;
        }

        let areas = Layout::default()
            .direction(node.direction)
            .constraints(present.iter().map(|child| child.size.constraint()))
            .split(area);

        for (child, child_area) in present.into_iter().zip(areas.iter()) {
            self.arrange(child, *child_area, out);
        }
    }

    fn has_content(&self, node: &LayoutBox) -> bool {
        match &node.panel {
            Some(id) => self.is_visible(id),
            None => node.children.iter().any(|child| self.has_content(child)),
        }
    }

    /// Arrange panels for a `width` x `height` surface and update their views.
    ///
    /// Returns `false` (and changes nothing) for an empty surface. When the
    /// size differs from the previous pass the conversation is re-wrapped and
    /// scrolled to the bottom.
    pub fn layout(&mut self, width: u16, height: u16) -> bool {
        if width == 0 || height == 0 {
            debug!(width, height, "Skipping layout for empty surface");
            return false;
        }

        let size_changed = self.last_size != Some((width, height));
        let rects = self.compute_rects(width, height);

        for panel in self.panels.values_mut() {
            match rects.get(&panel.id) {
                Some(&area) => {
                    let width_changed = panel.view.as_ref().is_none_or(|v| v.area.width != area.width);
                    if width_changed {
                        panel.content.rewrap(area.width);
                    }
                    let view = panel.view.get_or_insert_with(|| View::new(area));
                    view.area = area;
                    decorate(
                        view,
                        &panel.id,
                        &panel.content,
                        panel.frame_color,
                        self.focus.is(&panel.id),
                        &self.theme,
                    );
                }
                None => panel.view = None,
            }
        }

        let screen = Rect::new(0, 0, width, height);
        for (name, overlay) in self.overlays.iter_mut() {
            let area = centered_overlay(overlay.percent_x, overlay.percent_y, screen);
            let width_changed = overlay.view.as_ref().is_none_or(|v| v.area.width != area.width);
            if width_changed {
                overlay.content.rewrap(area.width);
            }
            let view = overlay.view.get_or_insert_with(|| View::new(area));
            view.area = area;
            let id = PanelId::Ephemeral(name.clone());
            decorate(
                view,
                &id,
                &overlay.content,
                None,
                self.focus.is(&id),
                &self.theme,
            );
        }

        if size_changed {
            if let Some(panel) = self.panels.get_mut(&PanelId::Conversation) {
                if let Some(view) = &panel.view {
                    panel.content.rewrap(view.area.width);
                }
                panel.content.scroll(Scroll::Bottom);
            }
            self.last_size = Some((width, height));
        }
        true
    }

    /// Re-apply focus and colour decoration to the existing views.
    fn refresh_views(&mut self) {
        for panel in self.panels.values_mut() {
            if let Some(view) = panel.view.as_mut() {
                decorate(
                    view,
                    &panel.id,
                    &panel.content,
                    panel.frame_color,
                    self.focus.is(&panel.id),
                    &self.theme,
                );
            }
        }
        for (name, overlay) in self.overlays.iter_mut() {
            if let Some(view) = overlay.view.as_mut() {
                let id = PanelId::Ephemeral(name.clone());
                decorate(
                    view,
                    &id,
                    &overlay.content,
                    None,
                    self.focus.is(&id),
                    &self.theme,
                );
            }
        }
    }

    pub fn view(&self, id: &PanelId) -> Option<&View> {
        match id {
            PanelId::Ephemeral(name) => self.overlays.get(name).and_then(|o| o.view.as_ref()),
            _ => self.panels.get(id).and_then(|p| p.view()),
        }
    }

    pub fn last_size(&self) -> Option<(u16, u16)> {
        self.last_size
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    // ==================== Drawing ====================

    /// Lay out and draw every visible panel, overlays last.
    ///
    /// A panel that fails to render is skipped and reported; the rest of
    /// the frame is still drawn.
    pub fn draw(&mut self, frame: &mut Frame) -> Vec<RenderFailure> {
        let area = frame.area();
        let mut failures = Vec::new();
        if !self.layout(area.width, area.height) {
            return failures;
        }

        {
            let buf = frame.buffer_mut();
            for panel in self.panels.values() {
                let Some(view) = panel.view() else {
                    continue;
                };
                let ctx = RenderContext {
                    theme: &self.theme,
                    view,
                };
                if let Err(error) = panel.content.render(view.area, buf, &ctx) {
                    failures.push(RenderFailure {
                        panel: panel.id.clone(),
                        error,
                    });
                }
            }

            for (name, overlay) in &self.overlays {
                let Some(view) = overlay.view.as_ref() else {
                    continue;
                };
                Clear.render(view.area, buf);
                let ctx = RenderContext {
                    theme: &self.theme,
                    view,
                };
                if let Err(error) = overlay.content.render(view.area, buf, &ctx) {
                    failures.push(RenderFailure {
                        panel: PanelId::Ephemeral(name.clone()),
                        error,
                    });
                }
            }
        }

        if let Some(view) = self.focused().and_then(|id| self.view(id)) {
            if let (true, Some(cursor)) = (view.editable, view.cursor) {
                frame.set_cursor_position(Position::new(
                    view.area.x + cursor.x,
                    view.area.y + cursor.y,
                ));
            }
        }

        failures
    }

    /// Topmost panel under a screen cell.
    pub fn panel_at(&self, x: u16, y: u16) -> Option<PanelId> {
        let point = Position::new(x, y);
        if let Some((name, _)) = self
            .overlays
            .iter()
            .find(|(_, o)| o.view.as_ref().is_some_and(|v| v.area.contains(point)))
        {
            return Some(PanelId::Ephemeral(name.clone()));
        }
        self.panels
            .values()
            .find(|p| p.view().is_some_and(|v| v.area.contains(point)))
            .map(|p| p.id.clone())
    }

    /// Panel that keyboard scrolling applies to: the focused one when it
    /// scrolls, the conversation otherwise.
    pub fn scroll_target(&self) -> PanelId {
        match self.focused() {
            Some(id)
                if id.is_auxiliary()
                    || *id == PanelId::Conversation
                    || matches!(id, PanelId::Ephemeral(_)) =>
            {
                id.clone()
            }
            _ => PanelId::Conversation,
        }
    }

    pub fn scroll(&mut self, id: &PanelId, scroll: Scroll) -> bool {
        match self.content_mut(id) {
            Some(content) => {
                content.scroll(scroll);
                true
            }
            None => false,
        }
    }

    // ==================== Styling ====================

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.refresh_views();
    }

    /// Override a panel's border colour, or go back to the theme's with `None`.
    pub fn set_frame_color(&mut self, id: &PanelId, color: Option<Color>) {
        if let Some(panel) = self.panels.get_mut(id) {
            panel.frame_color = color;
        }
        self.refresh_views();
    }

    // ==================== Typed access ====================

    pub fn conversation_mut(&mut self) -> Option<&mut ConversationView> {
        self.content_mut(&PanelId::Conversation)
            .and_then(PanelContent::as_conversation_mut)
    }

    pub fn input_mut(&mut self) -> Option<&mut InputLine> {
        self.content_mut(&PanelId::Input)
            .and_then(PanelContent::as_input_mut)
    }

    pub fn status_mut(&mut self) -> Option<&mut StatusLine> {
        self.content_mut(&PanelId::Status)
            .and_then(PanelContent::as_status_mut)
    }

    pub fn diff_viewer_mut(&mut self) -> Option<&mut DiffViewer> {
        self.content_mut(&PanelId::DiffViewer)
            .and_then(PanelContent::as_diff_viewer_mut)
    }

    pub fn text_viewer_mut(&mut self) -> Option<&mut TextViewer> {
        self.content_mut(&PanelId::TextViewer)
            .and_then(PanelContent::as_text_viewer_mut)
    }

    pub fn debug_mut(&mut self) -> Option<&mut DebugLog> {
        self.content_mut(&PanelId::Debug)
            .and_then(PanelContent::as_debug_mut)
    }
}

/// Apply focus highlight, frame colour and editing state to a view.
fn decorate(
    view: &mut View,
    id: &PanelId,
    content: &PanelContent,
    frame_override: Option<Color>,
    focused: bool,
    theme: &Theme,
) {
    view.highlight = focused;
    view.frame_color = frame_override.unwrap_or(if focused {
        theme.focus_border
    } else {
        theme.border
    });
    view.editable = focused && *id == PanelId::Input && matches!(content, PanelContent::Input(_));
    view.cursor = if view.editable { content.cursor() } else { None };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::confirmation_prompt::ConfirmationPrompt;
    use confab_domain::{ChatMessage, ConfirmationKind, ExecutionId};
    use ratatui::{Terminal, backend::TestBackend};

    fn engine() -> LayoutEngine {
        LayoutEngine::with_default_panels(Theme::default(), LayoutConfig::default())
    }

    fn prompt() -> PanelContent {
        PanelContent::Prompt(ConfirmationPrompt {
            execution_id: ExecutionId::from("exec-1"),
            kind: ConfirmationKind::Tool,
            title: "Tool: shell".into(),
            message: String::new(),
            confirm_text: "Yes".into(),
            cancel_text: "No".into(),
        })
    }

    fn visible_auxiliaries(engine: &LayoutEngine) -> usize {
        AuxiliaryMode::ALL
            .iter()
            .filter(|m| engine.is_visible(&m.panel()))
            .count()
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut engine = engine();
        engine.show_auxiliary_panel(AuxiliaryMode::TextViewer);

        let first = engine.compute_rects(97, 31);
        let second = engine.compute_rects(97, 31);
        assert_eq!(first, second);

        engine.layout(97, 31);
        let views: Vec<_> = first.keys().map(|id| engine.view(id).cloned()).collect();
        engine.layout(97, 31);
        let again: Vec<_> = first.keys().map(|id| engine.view(id).cloned()).collect();
        assert_eq!(views, again);
    }

    #[test]
    fn test_at_most_one_auxiliary_visible() {
        let mut engine = engine();
        let steps = [
            (true, AuxiliaryMode::Debug),
            (true, AuxiliaryMode::DiffViewer),
            (false, AuxiliaryMode::Debug),
            (true, AuxiliaryMode::TextViewer),
            (true, AuxiliaryMode::TextViewer),
            (false, AuxiliaryMode::DiffViewer),
        ];
        for (show, mode) in steps {
            if show {
                engine.show_auxiliary_panel(mode);
            } else {
                engine.hide_auxiliary_panel();
            }
            assert!(visible_auxiliaries(&engine) <= 1);
        }

        engine.set_visible(&PanelId::Debug, true);
        engine.set_visible(&PanelId::DiffViewer, true);
        assert_eq!(visible_auxiliaries(&engine), 1);
        assert!(engine.is_visible(&PanelId::DiffViewer));

        // Hiding a mode that is not shown leaves the slot alone
        engine.set_visible(&PanelId::Debug, false);
        assert!(engine.is_visible(&PanelId::DiffViewer));
    }

    #[test]
    fn test_focus_stays_on_visible_panel() {
        let mut engine = engine();
        engine.show_auxiliary_panel(AuxiliaryMode::Debug);
        engine.focus_panel(&PanelId::Debug).unwrap();

        engine.show_auxiliary_panel(AuxiliaryMode::DiffViewer);
        let focused = engine.focused().cloned().unwrap();
        assert_eq!(focused, PanelId::Input);
        assert!(engine.is_visible(&focused));

        engine.hide_auxiliary_panel();
        assert_eq!(
            engine.focus_panel(&PanelId::DiffViewer),
            Err(LayoutError::Hidden(PanelId::DiffViewer))
        );

        engine.set_visible(&PanelId::Input, false);
        let focused = engine.focused().cloned().unwrap();
        assert_eq!(focused, PanelId::Conversation);
    }

    #[test]
    fn test_focus_change_reports_previous_holder() {
        let mut engine = engine();
        let change = engine.focus_panel(&PanelId::Conversation).unwrap();
        assert_eq!(change.lost, Some(PanelId::Input));
        assert_eq!(change.gained, PanelId::Conversation);

        engine.layout(80, 24);
        assert!(engine.view(&PanelId::Conversation).unwrap().highlight);
        assert!(!engine.view(&PanelId::Input).unwrap().highlight);
    }

    #[test]
    fn test_input_focus_enables_editing() {
        let mut engine = engine();
        engine.layout(80, 24);
        engine.input_mut().unwrap().insert('x');
        engine.focus_panel(&PanelId::Conversation).unwrap();
        assert!(!engine.view(&PanelId::Input).unwrap().editable);

        engine.focus_panel(&PanelId::Input).unwrap();
        let view = engine.view(&PanelId::Input).unwrap();
        assert!(view.editable);
        assert_eq!(engine.input_mut().unwrap().cursor_index(), 0);
    }

    #[test]
    fn test_unregistered_panel_cannot_take_focus() {
        let mut engine = engine();
        assert_eq!(
            engine.focus_panel(&PanelId::Left),
            Err(LayoutError::UnknownPanel(PanelId::Left))
        );
        assert_eq!(engine.focused(), Some(&PanelId::Input));
    }

    #[test]
    fn test_overlay_focus_and_close() {
        let mut engine = engine();
        engine.layout(80, 24);
        let id = engine.open_overlay(
            "help",
            PanelContent::TextViewer(TextViewer::new()),
            60,
            60,
        );
        engine.focus_panel(&id).unwrap();
        assert_eq!(engine.focused(), Some(&id));
        assert!(engine.view(&id).is_some());
        assert_eq!(engine.panel_at(40, 12), Some(id.clone()));

        engine.close_overlay("help");
        assert_eq!(engine.focused(), Some(&PanelId::Input));
        assert!(engine.view(&id).is_none());
    }

    #[test]
    fn test_resize_while_zoomed() {
        let mut engine = engine();
        engine.show_auxiliary_panel(AuxiliaryMode::DiffViewer);
        assert!(engine.layout(80, 24));
        assert!(engine.zoom());

        assert!(engine.layout(120, 40));
        let conversation = engine.view(&PanelId::Conversation).unwrap().area;
        let diff = engine.view(&PanelId::DiffViewer).unwrap().area;
        let input = engine.view(&PanelId::Input).unwrap().area;
        let status = engine.view(&PanelId::Status).unwrap().area;

        assert_eq!(conversation.width, 24);
        assert_eq!(diff.width, 96);
        assert_eq!(diff.x, 24);
        assert_eq!(conversation.height, 36);
        assert_eq!(input, Rect::new(0, 36, 120, 3));
        assert_eq!(status, Rect::new(0, 39, 120, 1));
    }

    #[test]
    fn test_only_a_new_size_pins_conversation_to_bottom() {
        let mut engine = engine();
        let conversation = engine.conversation_mut().unwrap();
        for i in 0..60 {
            conversation.push(ChatMessage::user(format!("message {}", i)));
        }

        assert!(engine.layout(80, 24));
        assert!(engine.scroll(&PanelId::Conversation, Scroll::Up(5)));
        assert_eq!(engine.conversation_mut().unwrap().scroll_offset(), 5);

        assert!(engine.layout(80, 24));
        assert_eq!(engine.conversation_mut().unwrap().scroll_offset(), 5);

        assert!(engine.layout(120, 40));
        let width = engine.view(&PanelId::Conversation).unwrap().area.width;
        let conversation = engine.conversation_mut().unwrap();
        assert_eq!(conversation.scroll_offset(), 0);
        assert_eq!(conversation.wrap_width(), width);
    }

    #[test]
    fn test_zoom_rewraps_conversation_and_viewer() {
        let mut engine = engine();
        engine.diff_viewer_mut().unwrap().load("diff", "+ added line\n- removed line");
        let conversation = engine.conversation_mut().unwrap();
        for i in 0..40 {
            conversation.push(ChatMessage::assistant(format!("reply {}", i)));
        }
        engine.show_auxiliary_panel(AuxiliaryMode::DiffViewer);
        assert!(engine.layout(90, 30));
        assert_eq!(engine.diff_viewer_mut().unwrap().wrap_width(), 30);

        assert!(engine.scroll(&PanelId::Conversation, Scroll::Up(3)));
        assert_eq!(engine.conversation_mut().unwrap().scroll_offset(), 3);
        assert!(engine.zoom());

        let conversation_width = engine.view(&PanelId::Conversation).unwrap().area.width;
        let diff_width = engine.view(&PanelId::DiffViewer).unwrap().area.width;
        assert_eq!(diff_width, 72);
        assert_eq!(engine.diff_viewer_mut().unwrap().wrap_width(), diff_width);
        let conversation = engine.conversation_mut().unwrap();
        assert_eq!(conversation.wrap_width(), conversation_width);
        assert_eq!(conversation.scroll_offset(), 0);

        assert!(engine.unzoom());
        assert_eq!(engine.diff_viewer_mut().unwrap().wrap_width(), 30);
    }

    #[test]
    fn test_long_confirmation_grows_input_slot() {
        let mut engine = engine();
        assert!(engine.layout(40, 30));
        assert_eq!(engine.view(&PanelId::Input).unwrap().area.height, 3);

        let long = PanelContent::Prompt(ConfirmationPrompt {
            execution_id: ExecutionId::from("exec-2"),
            kind: ConfirmationKind::Tool,
            title: "Tool: shell".into(),
            message: "rm -rf ./target && cargo build --release --workspace --all-features".repeat(3),
            confirm_text: "Yes".into(),
            cancel_text: "No".into(),
        });
        let input = engine.swap_component(&PanelId::Input, long).unwrap();
        assert!(engine.layout(40, 30));
        let grown = engine.view(&PanelId::Input).unwrap().area;
        assert!(grown.height > 3);
        assert!(grown.height <= 6);
        assert_eq!(grown.y + grown.height, 29);

        engine.swap_component(&PanelId::Input, input).unwrap();
        assert!(engine.layout(40, 30));
        assert_eq!(engine.view(&PanelId::Input).unwrap().area.height, 3);
    }

    #[test]
    fn test_zoom_requires_auxiliary_and_hide_resets_it() {
        let mut engine = engine();
        assert!(!engine.zoom());

        engine.show_auxiliary_panel(AuxiliaryMode::TextViewer);
        assert!(engine.zoom());
        assert!(!engine.zoom());
        engine.hide_auxiliary_panel();
        assert!(!engine.right_panel().zoomed);
        assert!(!engine.unzoom());
    }

    #[test]
    fn test_missing_leaf_is_omitted() {
        let engine = engine();
        let rects = engine.compute_rects(80, 24);
        assert!(!rects.contains_key(&PanelId::Left));
        assert_eq!(rects[&PanelId::Conversation].width, 80);
        assert!(!rects.contains_key(&PanelId::Debug));
    }

    #[test]
    fn test_empty_surface_is_a_no_op() {
        let mut engine = engine();
        assert!(engine.layout(80, 24));
        let before = engine.view(&PanelId::Conversation).cloned();

        assert!(!engine.layout(0, 24));
        assert!(!engine.layout(80, 0));
        assert_eq!(engine.view(&PanelId::Conversation).cloned(), before);
        assert_eq!(engine.last_size(), Some((80, 24)));
        assert!(engine.compute_rects(0, 0).is_empty());
    }

    #[test]
    fn test_focus_next_skips_hidden_panels() {
        let mut engine = engine();
        assert_eq!(engine.focus_next(), Some(PanelId::Conversation));
        assert_eq!(engine.focus_next(), Some(PanelId::Input));

        engine.show_auxiliary_panel(AuxiliaryMode::TextViewer);
        engine.focus_next();
        assert_eq!(engine.focus_next(), Some(PanelId::TextViewer));
        assert_eq!(engine.focus_next(), Some(PanelId::Input));
    }

    #[test]
    fn test_swap_keeps_region_and_focus() {
        let mut engine = engine();
        engine.layout(80, 24);
        let before = engine.view(&PanelId::Input).unwrap().area;

        let previous = engine.swap_component(&PanelId::Input, prompt()).unwrap();
        assert_eq!(previous.kind(), "input");
        engine.layout(80, 24);
        let view = engine.view(&PanelId::Input).unwrap();
        assert_eq!(view.area, before);
        assert!(view.highlight);
        assert!(!view.editable);
        assert_eq!(engine.focused(), Some(&PanelId::Input));

        assert_eq!(
            engine
                .swap_component(&PanelId::Left, prompt())
                .unwrap_err(),
            LayoutError::UnknownPanel(PanelId::Left)
        );
    }

    #[test]
    fn test_draw_reports_failures_without_aborting() {
        let mut engine = engine();
        let mut terminal = Terminal::new(TestBackend::new(80, 5)).unwrap();
        let mut failures = Vec::new();
        terminal
            .draw(|frame| failures = engine.draw(frame))
            .unwrap();

        // One row left for the conversation is too small to draw
        assert!(
            failures
                .iter()
                .any(|f| f.panel == PanelId::Conversation)
        );
        let buffer = terminal.backend().buffer();
        let bottom: String = (0..80u16)
            .map(|x| buffer[(x, 4u16)].symbol().to_string())
            .collect();
        assert!(bottom.contains("ready"));
    }

    #[test]
    fn test_draw_full_screen() {
        let mut engine = engine();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut failures = Vec::new();
        terminal
            .draw(|frame| failures = engine.draw(frame))
            .unwrap();
        assert!(failures.is_empty());

        let buffer = terminal.backend().buffer();
        let top: String = (0..80u16)
            .map(|x| buffer[(x, 0u16)].symbol().to_string())
            .collect();
        assert!(top.contains("Conversation"));
    }
}
