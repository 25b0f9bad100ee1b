// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::MutexExt as _;
use std::{fmt::Debug,
          io::{self, Write},
          sync::{Arc, Mutex}};

/// Where the [`AnsiRequestScheduler`] writes query sequences. The real terminal output
/// is owned by the platform driver, which implements this.
///
/// [`AnsiRequestScheduler`]: crate::AnsiRequestScheduler
pub trait OutputSink: Debug + Send {
    /// Transmits `request` (eg: `ESC [ 0 c`) to the terminal.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the write or flush fails.
    fn write_request(&mut self, request: &str) -> io::Result<()>;
}

/// Writes and flushes to any [`Write`].
#[derive(Debug)]
pub struct WriterOutputSink<W: Write + Debug + Send> {
    pub writer: W,
}

impl WriterOutputSink<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self { Self { writer: io::stdout() } }
}

impl<W: Write + Debug + Send> OutputSink for WriterOutputSink<W> {
    fn write_request(&mut self, request: &str) -> io::Result<()> {
        self.writer.write_all(request.as_bytes())?;
        self.writer.flush()
    }
}

/// Records every request instead of sending it. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct VecOutputSink {
    pub writes: Arc<Mutex<Vec<String>>>,
}

impl VecOutputSink {
    #[must_use]
    pub fn get_writes(&self) -> Vec<String> { self.writes.lock_recover().clone() }
}

impl OutputSink for VecOutputSink {
    fn write_request(&mut self, request: &str) -> io::Result<()> {
        self.writes.lock_recover().push(request.to_string());
        Ok(())
    }
}
