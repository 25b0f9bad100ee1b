// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A scriptable [`ViewTree`] that records every call it receives.

use crate::{Application, Command, CommandContext, CommandOutcome, DispatchConfig, InlineVec,
            Key, KeyEvent, MainLoopHandle, MouseEvent, MouseGrabHandler, NavigationDirection,
            Pos, RawInputReceiver, Size, TabBehavior, ViewId, ViewTree};
use std::collections::{HashMap, HashSet};

pub const TOP: ViewId = ViewId(1);
pub const OTHER_TOP: ViewId = ViewId(2);
pub const CHILD: ViewId = ViewId(3);
pub const GRANDCHILD: ViewId = ViewId(4);
pub const POPOVER_A: ViewId = ViewId(10);
pub const POPOVER_B: ViewId = ViewId(11);

#[derive(Debug, Clone)]
pub struct MockView {
    pub superview: Option<ViewId>,
    pub visible: bool,
    pub enabled: bool,
    pub modal: bool,
    pub origin: Pos,
    pub size: Size,
    /// Higher is drawn on top.
    pub layer: u32,
}

impl MockView {
    fn contains(&self, pos: Pos) -> bool {
        pos.col >= self.origin.col
            && pos.row >= self.origin.row
            && pos.col < self.origin.col + i32::from(self.size.cols)
            && pos.row < self.origin.row + i32::from(self.size.rows)
    }
}

#[derive(Debug, Default)]
pub struct MockViewTree {
    pub views: HashMap<ViewId, MockView>,
    /// Innermost first.
    pub tops: Vec<ViewId>,
    pub log: Vec<String>,
    pub handles_key_down: HashSet<ViewId>,
    pub handles_key_up: HashSet<ViewId>,
    pub hotkeys: HashMap<ViewId, Key>,
    pub handles_mouse: HashSet<ViewId>,
    pub cancels_enter: HashSet<ViewId>,
    pub quit_hides_itself: HashSet<ViewId>,
    /// Answers `Quit` with `Unhandled` and stays open.
    pub refuses_quit: HashSet<ViewId>,
    pub supported_commands: HashSet<(ViewId, Command)>,
    pub grab_on_press: HashSet<ViewId>,
    pub ungrab_on_release: HashSet<ViewId>,
}

impl MockViewTree {
    pub fn with_top(top: ViewId) -> Self {
        let mut it = Self::default();
        it.add_view(top, None);
        it.tops.push(top);
        it
    }

    /// Full screen (80x24) view.
    pub fn add_view(&mut self, id: ViewId, superview: Option<ViewId>) {
        self.add_view_at(id, superview, Pos::new(0, 0), Size::new(80, 24));
    }

    pub fn add_view_at(&mut self, id: ViewId, superview: Option<ViewId>, origin: Pos, size: Size) {
        let layer = superview
            .and_then(|it| self.views.get(&it))
            .map_or(0, |it| it.layer + 1);
        self.views.insert(id, MockView {
            superview,
            visible: true,
            enabled: true,
            modal: false,
            origin,
            size,
            layer,
        });
    }

    pub fn set_enabled(&mut self, id: ViewId, enabled: bool) {
        if let Some(view) = self.views.get_mut(&id) {
            view.enabled = enabled;
        }
    }

    pub fn set_modal(&mut self, id: ViewId, modal: bool) {
        if let Some(view) = self.views.get_mut(&id) {
            view.modal = modal;
        }
    }

    /// Entries whose first word is `prefix`.
    pub fn log_of(&self, prefix: &str) -> Vec<String> {
        let with_space = format!("{prefix} ");
        self.log
            .iter()
            .filter(|it| *it == prefix || it.starts_with(&with_space))
            .cloned()
            .collect()
    }
}

impl ViewTree for MockViewTree {
    fn top(&self) -> Option<ViewId> { self.tops.first().copied() }

    fn toplevels(&self) -> InlineVec<ViewId> { self.tops.iter().copied().collect() }

    fn is_modal(&self, view: ViewId) -> bool { self.views.get(&view).is_some_and(|it| it.modal) }

    fn superview(&self, view: ViewId) -> Option<ViewId> {
        self.views.get(&view).and_then(|it| it.superview)
    }

    fn is_visible(&self, view: ViewId) -> bool {
        self.views.get(&view).is_some_and(|it| it.visible)
    }

    fn is_enabled(&self, view: ViewId) -> bool {
        self.views.get(&view).is_some_and(|it| it.enabled)
    }

    fn set_visible(&mut self, view: ViewId, visible: bool) {
        if let Some(it) = self.views.get_mut(&view) {
            it.visible = visible;
        }
    }

    fn views_under_location(&self, screen_position: Pos) -> InlineVec<ViewId> {
        let mut hits: Vec<(u32, ViewId)> = self
            .views
            .iter()
            .filter(|(_, view)| view.visible && view.contains(screen_position))
            .map(|(id, view)| (view.layer, *id))
            .collect();
        hits.sort();
        hits.into_iter().map(|(_, id)| id).collect()
    }

    fn screen_to_viewport(&self, view: ViewId, screen_position: Pos) -> Pos {
        let origin = self.views.get(&view).map_or(Pos::default(), |it| it.origin);
        Pos::new(screen_position.col - origin.col, screen_position.row - origin.row)
    }

    fn new_key_down(&mut self, view: ViewId, event: &mut KeyEvent) -> bool {
        self.log.push(format!("new_key_down {view} {}", event.key));
        self.handles_key_down.contains(&view)
    }

    fn new_key_up(&mut self, view: ViewId, event: &mut KeyEvent) -> bool {
        self.log.push(format!("new_key_up {view} {}", event.key));
        self.handles_key_up.contains(&view)
    }

    fn new_hotkey(&mut self, view: ViewId, event: &mut KeyEvent) -> bool {
        self.log.push(format!("new_hotkey {view} {}", event.key));
        self.hotkeys.get(&view) == Some(&event.key)
    }

    fn new_mouse_event(
        &mut self,
        view: ViewId,
        event: &mut MouseEvent,
        mouse_grab: &mut MouseGrabHandler,
    ) -> bool {
        self.log.push(format!(
            "new_mouse_event {view} {},{}",
            event.position.col, event.position.row
        ));
        if event.is_pressed() && self.grab_on_press.contains(&view) {
            mouse_grab.grab_mouse(view);
        }
        if event.is_released() && self.ungrab_on_release.contains(&view) {
            mouse_grab.ungrab_mouse();
        }
        self.handles_mouse.contains(&view)
    }

    fn new_mouse_enter(&mut self, view: ViewId) -> bool {
        self.log.push(format!("new_mouse_enter {view}"));
        self.cancels_enter.contains(&view)
    }

    fn new_mouse_leave(&mut self, view: ViewId) {
        self.log.push(format!("new_mouse_leave {view}"));
    }

    fn invoke_command(
        &mut self,
        view: ViewId,
        command: Command,
        _context: &CommandContext,
    ) -> Option<CommandOutcome> {
        self.log.push(format!("invoke_command {view} {command}"));
        if command == Command::Quit && self.quit_hides_itself.contains(&view) {
            self.set_visible(view, false);
            return Some(CommandOutcome::Handled);
        }
        if command == Command::Quit && self.refuses_quit.contains(&view) {
            return Some(CommandOutcome::Unhandled);
        }
        self.supported_commands
            .contains(&(view, command))
            .then_some(CommandOutcome::Handled)
    }

    fn advance_focus(&mut self, direction: NavigationDirection, behavior: TabBehavior) -> bool {
        self.log.push(format!("advance_focus {direction:?} {behavior:?}"));
        true
    }

    fn request_redraw(&mut self) { self.log.push("request_redraw".into()); }

    fn suspend(&mut self) -> bool {
        self.log.push("suspend".into());
        true
    }

    fn on_resize(&mut self, size: Size) {
        self.log.push(format!("on_resize {}x{}", size.cols, size.rows));
    }
}

/// Keep the receiver alive for as long as the handle is used.
pub fn application() -> (Application<MockViewTree>, RawInputReceiver) {
    let (sender, receiver) = tokio::sync::mpsc::channel(8);
    let app = Application::new(MainLoopHandle::new(sender), DispatchConfig::default());
    (app, receiver)
}

pub fn initialized_application() -> (Application<MockViewTree>, RawInputReceiver) {
    let (mut app, receiver) = application();
    app.init(MockViewTree::with_top(TOP));
    (app, receiver)
}
