// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Control flow signal for loops and threads.
///
/// Used by the [main loop] after each iteration, and by the [input reader thread] after
/// each read.
///
/// [main loop]: crate::MainLoop::run_iteration
/// [input reader thread]: crate::spawn_input_reader_thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    /// Continue to the next iteration.
    #[default]
    Continue,

    /// Stop processing and exit the loop/thread.
    Stop,
}

/// Direction of focus navigation requested by the tab stop and tab group commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationDirection {
    Forward,
    Backward,
}

/// Granularity of focus navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabBehavior {
    /// Move between views that are tab stops inside the current group.
    TabStop,
    /// Move between groups of views (eg: panes).
    TabGroup,
}
