// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;

/// Stack allocated list, that can [`smallvec::SmallVec::spilled`] into the heap if it
/// gets larger than [`INLINE_VEC_SIZE`]. Views under the mouse and the commands of a key
/// binding are short lists, so they live here.
pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;
pub const INLINE_VEC_SIZE: usize = 8;

/// Size of the buffer that the [input reader thread] reads into.
///
/// [input reader thread]: crate::spawn_input_reader_thread
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Default capacity of the bounded channel that carries raw input from the reader threads
/// to the main loop.
pub const DEFAULT_INPUT_CHANNEL_CAPACITY: usize = 1_000;
