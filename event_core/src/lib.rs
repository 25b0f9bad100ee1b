// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words popover popovers

//! # Input and event core for terminal UIs
//!
//! A terminal delivers one ambiguous character stream. The same three bytes can be an
//! `Esc` key press, the start of a mouse report, or the start of a response to a query
//! that the program sent a moment ago. This crate turns that stream into ordered,
//! attributed application events, and runs the cooperative loop that drives the program
//! from them.
//!
//! ```text
//! ┌────────────────────┐  RawInput   ┌──────────────┐
//! │ reader thread(s)   │────────────▶│  MainLoop    │ (single consumer)
//! │ (blocking read)    │  bounded    │              │
//! └────────────────────┘  mpsc       │  1. events pending (select! on channel,
//!                                    │     wakeup, timer deadline)
//!                                    │  2. InputProcessor ──▶ AnsiResponseParser
//!                                    │         │                 │ expectations
//!                                    │         ▼                 ▼
//!                                    │     Application      callbacks
//!                                    │     (dispatch)
//!                                    │  3. AnsiRequestScheduler::run_schedule
//!                                    │  4. TimedEvents::lock_and_run_timers
//!                                    │  5. TimedEvents::lock_and_run_idles
//!                                    └──────────────┘
//! ```
//!
//! - [`AnsiResponseParser`] is a character level state machine. Ordinary characters pass
//!   straight through, escape sequences are held until they resolve against an
//!   [`Expectation`] or are judged unknown.
//! - [`AnsiRequestScheduler`] sends terminal queries, serializing requests that share a
//!   terminator, throttling sends and evicting stale requests.
//! - [`TimedEvents`] holds timeouts and idle callbacks.
//! - [`MainLoop`] owns the [`ApplicationContext`] and runs one iteration at a time.
//! - [`Application`] routes keyboard and mouse events through popovers, the top-level
//!   view chain, the mouse grab and the global key bindings. The view tree itself is
//!   external and reached through the [`ViewTree`] trait.

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![warn(rust_2018_idioms)]
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod core;
pub mod tui;

// Re-export.
pub use core::*;
pub use tui::*;
