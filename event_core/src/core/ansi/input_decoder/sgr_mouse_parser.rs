// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! SGR (1006) mouse reports: `ESC [ < Cb ; Cx ; Cy M` for a press or motion and
//! `ESC [ < Cb ; Cx ; Cy m` for a release.
//!
//! ```text
//! Cb bits
//! ┌────┬────┬────┬────┬────┬────┬────┐
//! │ 64 │ 32 │ 16 │  8 │  4 │  2 │  1 │
//! └─┬──┴─┬──┴─┬──┴─┬──┴─┬──┴─┬──┴─┬──┘
//!   │    │    │    │    │    ╰────┴── button: 0 left, 1 middle, 2 right, 3 none
//!   │    │    │    │    ╰── shift
//!   │    │    │    ╰── alt (meta)
//!   │    │    ╰── ctrl
//!   │    ╰── motion
//!   ╰── wheel: 64 up, 65 down, 66 left, 67 right
//! ```
//!
//! Some terminals report horizontal wheel as 68 / 69. Those raw values are taken as
//! left / right before the modifier bits are looked at.

use crate::{MouseEvent, MouseFlags, Pos, SGR_MOUSE_PREFIX};

const MODIFIER_SHIFT: u32 = 4;
const MODIFIER_ALT: u32 = 8;
const MODIFIER_CTRL: u32 = 16;
const MOTION: u32 = 32;
const WHEEL: u32 = 64;

/// Decodes a complete SGR mouse report into a [`MouseEvent`] with a 0-based screen
/// position. Returns `None` for anything else, including malformed parameters and
/// coordinates below 1.
#[must_use]
pub fn parse_sgr_mouse(sequence: &str) -> Option<MouseEvent> {
    let body = sequence.strip_prefix(SGR_MOUSE_PREFIX)?;
    let is_press = match body.chars().last()? {
        'M' => true,
        'm' => false,
        _ => return None,
    };
    let body = &body[..body.len() - 1];

    let mut params = body.split(';');
    let cb: u32 = params.next()?.parse().ok()?;
    let cx: i32 = params.next()?.parse().ok()?;
    let cy: i32 = params.next()?.parse().ok()?;
    if params.next().is_some() || cx < 1 || cy < 1 {
        return None;
    }

    let flags = button_flags(cb, is_press) | modifier_flags(cb);
    Some(MouseEvent::new(Pos::new(cx - 1, cy - 1), flags))
}

fn button_flags(cb: u32, is_press: bool) -> MouseFlags {
    match cb {
        68 => return MouseFlags::WHEELED_LEFT,
        69 => return MouseFlags::WHEELED_RIGHT,
        _ => {}
    }

    let is_motion = cb & MOTION != 0;
    let button = cb & !(MODIFIER_SHIFT | MODIFIER_ALT | MODIFIER_CTRL | MOTION);

    let mut flags = match (button, is_press) {
        (0, true) => MouseFlags::BUTTON1_PRESSED,
        (0, false) => MouseFlags::BUTTON1_RELEASED,
        (1, true) => MouseFlags::BUTTON2_PRESSED,
        (1, false) => MouseFlags::BUTTON2_RELEASED,
        (2, true) => MouseFlags::BUTTON3_PRESSED,
        (2, false) => MouseFlags::BUTTON3_RELEASED,
        (it, _) if it == WHEEL => MouseFlags::WHEELED_UP,
        (it, _) if it == WHEEL + 1 => MouseFlags::WHEELED_DOWN,
        (it, _) if it == WHEEL + 2 => MouseFlags::WHEELED_LEFT,
        (it, _) if it == WHEEL + 3 => MouseFlags::WHEELED_RIGHT,
        // 3 is "no button", sent for plain motion.
        _ => MouseFlags::empty(),
    };

    if is_motion {
        flags |= MouseFlags::REPORT_MOUSE_POSITION;
    }
    flags
}

fn modifier_flags(cb: u32) -> MouseFlags {
    if matches!(cb, 68 | 69) {
        return MouseFlags::empty();
    }
    let mut flags = MouseFlags::empty();
    flags.set(MouseFlags::BUTTON_SHIFT, cb & MODIFIER_SHIFT != 0);
    flags.set(MouseFlags::BUTTON_ALT, cb & MODIFIER_ALT != 0);
    flags.set(MouseFlags::BUTTON_CTRL, cb & MODIFIER_CTRL != 0);
    flags
}
