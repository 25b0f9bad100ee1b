// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Application, DEBUG_EVENT_CORE_SHOW_DISPATCH, InlineVec, MouseEvent, ViewId,
            ViewTree};

/// A click outside the active popover hides it and then routes the same click again, so
/// the view that was underneath gets it. This is how many times that may happen per
/// event.
const POPOVER_DISMISS_REDISPATCH_BUDGET: u8 = 1;

enum MouseRoute {
    Done { handled: bool },
    PopoverDismissed,
}

impl<V: ViewTree + 'static> Application<V> {
    /// Routes a mouse event and returns whether anything handled it.
    ///
    /// ```text
    /// record position ─▶ mouse disabled? drop
    ///        │
    ///        ▼
    /// hit test, `view` = deepest ─▶ `mouse_event` subscribers
    ///        │
    ///        ▼
    /// press outside the active popover? hide it, route again (once)
    ///        │
    ///        ▼
    /// grab held? deliver to the grab view only, in its local coordinates
    ///        │ no grab (or it was released during delivery)
    ///        ▼
    /// deepest view outside top-level and active popover? drop
    ///        │
    ///        ▼
    /// enter / leave ─▶ deepest view, then superviews while unhandled and ungrabbed
    /// ```
    ///
    /// Events are dropped while the application isn't initialized.
    pub fn raise_mouse_event(&mut self, event: MouseEvent) -> bool {
        if !self.is_initialized() {
            return false;
        }
        self.last_mouse_position = Some(event.screen_position);
        if self.mouse_disabled {
            return false;
        }
        DEBUG_EVENT_CORE_SHOW_DISPATCH.then(|| {
            tracing::debug!(message = "mouse event", ?event);
        });

        let mut budget = POPOVER_DISMISS_REDISPATCH_BUDGET;
        loop {
            match self.route_mouse_event(event, budget > 0) {
                MouseRoute::Done { handled } => return handled,
                MouseRoute::PopoverDismissed => budget -= 1,
            }
        }
    }

    fn route_mouse_event(&mut self, mut event: MouseEvent, may_dismiss_popover: bool) -> MouseRoute {
        let Self {
            view_tree,
            mouse_event,
            mouse_grab,
            popover,
            cached_views_under_mouse,
            ..
        } = self;
        let Some(tree) = view_tree.as_mut() else {
            return MouseRoute::Done { handled: false };
        };
        let screen = event.screen_position;

        event.position = screen;
        let views_under_mouse = tree.views_under_location(screen);
        let deepest = views_under_mouse.last().copied();
        event.view = deepest;

        if mouse_event.raise(&mut event) {
            return MouseRoute::Done { handled: true };
        }

        if may_dismiss_popover && event.is_pressed() {
            let dismiss = popover
                .active()
                .filter(|it| tree.is_visible(*it))
                .filter(|it| !deepest.is_some_and(|view| tree.is_in_hierarchy(*it, view)));
            if let Some(active) = dismiss {
                popover.hide_with_quit_command(tree, active);
                return MouseRoute::PopoverDismissed;
            }
        }

        if mouse_grab
            .grab_view()
            .is_some_and(|it| !tree.is_visible(it))
        {
            mouse_grab.force_ungrab_mouse();
        }

        if let Some(grab) = mouse_grab.grab_view() {
            let local = tree.screen_to_viewport(grab, screen);
            let mut grabbed_event = event.relative_to(deepest.or(Some(grab)), local);
            if tree.new_mouse_event(grab, &mut grabbed_event, mouse_grab) || grabbed_event.handled
            {
                return MouseRoute::Done { handled: true };
            }
            if mouse_grab.grab_view().is_some() {
                return MouseRoute::Done { handled: false };
            }
        }

        let Some(deepest) = deepest else {
            return MouseRoute::Done { handled: false };
        };

        let in_top = tree
            .top()
            .is_some_and(|top| tree.is_in_hierarchy(top, deepest));
        let in_popover = popover
            .active()
            .is_some_and(|it| tree.is_in_hierarchy(it, deepest));
        if !in_top && !in_popover {
            return MouseRoute::Done { handled: false };
        }

        raise_mouse_enter_leave(tree, cached_views_under_mouse, &views_under_mouse);

        let mut target = deepest;
        loop {
            let local = tree.screen_to_viewport(target, screen);
            let mut view_event = event.relative_to(Some(target), local);
            if tree.new_mouse_event(target, &mut view_event, mouse_grab) || view_event.handled {
                return MouseRoute::Done { handled: true };
            }
            if mouse_grab.grab_view().is_some() {
                return MouseRoute::Done { handled: false };
            }
            match tree.superview(target) {
                Some(superview) => target = superview,
                None => return MouseRoute::Done { handled: false },
            }
        }
    }
}

/// Leave for every cached view that is no longer under the mouse, then enter for every
/// new one, outermost first. A view that cancels its enter stops the rest from
/// entering; they get another chance on the next event.
fn raise_mouse_enter_leave(
    tree: &mut impl ViewTree,
    cached: &mut InlineVec<ViewId>,
    current: &[ViewId],
) {
    let leaving: InlineVec<ViewId> = cached
        .iter()
        .copied()
        .filter(|it| !current.contains(it))
        .collect();
    for view in leaving {
        tree.new_mouse_leave(view);
        cached.retain(|it| *it != view);
    }

    for &view in current {
        if cached.contains(&view) {
            continue;
        }
        cached.push(view);
        if tree.new_mouse_enter(view) {
            break;
        }
    }
}

#[cfg(test)]
mod test_setup {
    use crate::{Application, MouseEvent, MouseFlags, Pos, Size, test_fixtures::*};

    /// `TOP` is the whole screen, `CHILD` is 20x10 at (10, 5) inside it, and
    /// `GRANDCHILD` is 5x5 at (12, 7) inside `CHILD`.
    pub fn mouse_application() -> (Application<MockViewTree>, crate::RawInputReceiver) {
        let (mut app, receiver) = initialized_application();
        let tree = app.view_tree_mut().unwrap();
        tree.add_view_at(CHILD, Some(TOP), Pos::new(10, 5), Size::new(20, 10));
        tree.add_view_at(GRANDCHILD, Some(CHILD), Pos::new(12, 7), Size::new(5, 5));
        (app, receiver)
    }

    pub fn press(col: i32, row: i32) -> MouseEvent {
        MouseEvent::new(Pos::new(col, row), MouseFlags::BUTTON1_PRESSED)
    }

    pub fn release(col: i32, row: i32) -> MouseEvent {
        MouseEvent::new(Pos::new(col, row), MouseFlags::BUTTON1_RELEASED)
    }

    pub fn motion(col: i32, row: i32) -> MouseEvent {
        MouseEvent::new(Pos::new(col, row), MouseFlags::REPORT_MOUSE_POSITION)
    }
}

#[cfg(test)]
mod tests_routing {
    use super::test_setup::*;
    use crate::{DispatchConfig, MainLoopHandle, Application, Pos, ViewId, test_fixtures::*};
    use pretty_assertions::assert_eq;

    #[test]
    fn dropped_until_initialized() {
        let (mut app, _receiver) = application();
        assert!(!app.raise_mouse_event(press(1, 1)));
        assert_eq!(app.last_mouse_position(), None);
    }

    #[test]
    fn disabled_mouse_still_records_position() {
        let (sender, _receiver) = tokio::sync::mpsc::channel(1);
        let mut app = Application::new(MainLoopHandle::new(sender), DispatchConfig {
            mouse_disabled: true,
        });
        app.init(MockViewTree::with_top(TOP));

        assert!(!app.raise_mouse_event(press(3, 4)));
        assert_eq!(app.last_mouse_position(), Some(Pos::new(3, 4)));
        assert!(app.view_tree().unwrap().log.is_empty());

        app.set_mouse_disabled(false);
        app.raise_mouse_event(press(3, 4));
        assert_eq!(app.view_tree().unwrap().log_of("new_mouse_event").len(), 1);
    }

    #[test]
    fn subscriber_sees_deepest_view_and_can_handle() {
        let (mut app, _receiver) = mouse_application();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(None::<ViewId>));
        app.mouse_event.subscribe({
            let seen = seen.clone();
            move |it| {
                *seen.lock().unwrap() = it.view;
                it.handled = true;
            }
        });

        assert!(app.raise_mouse_event(press(13, 8)));
        assert_eq!(*seen.lock().unwrap(), Some(GRANDCHILD));
        assert!(app.view_tree().unwrap().log_of("new_mouse_event").is_empty());
    }

    #[test]
    fn bubbles_up_in_local_coordinates() {
        let (mut app, _receiver) = mouse_application();
        assert!(!app.raise_mouse_event(press(13, 8)));
        assert_eq!(app.view_tree().unwrap().log_of("new_mouse_event"), vec![
            format!("new_mouse_event {GRANDCHILD} 1,1"),
            format!("new_mouse_event {CHILD} 3,3"),
            format!("new_mouse_event {TOP} 13,8"),
        ]);
    }

    #[test]
    fn handled_view_stops_bubbling() {
        let (mut app, _receiver) = mouse_application();
        app.view_tree_mut().unwrap().handles_mouse.insert(CHILD);
        assert!(app.raise_mouse_event(press(13, 8)));
        assert_eq!(app.view_tree().unwrap().log_of("new_mouse_event").len(), 2);
    }

    #[test]
    fn views_outside_the_top_are_ignored() {
        let (mut app, _receiver) = mouse_application();
        app.view_tree_mut()
            .unwrap()
            .add_view_at(OTHER_TOP, None, Pos::new(60, 0), crate::Size::new(10, 5));

        assert!(!app.raise_mouse_event(press(65, 2)));
        assert!(app.view_tree().unwrap().log.is_empty());
    }
}
