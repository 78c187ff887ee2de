// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Line editing state machine.
//!
//! [`LineEditor`] knows nothing about UARTs. It is fed one byte at a time
//! and tells the caller what happened, so the console can decide what to
//! echo. The buffer is NUL-terminated when [`LineEditor::finish`] runs.

use crate::{BACKSPACE, CANCEL};

/// Why a line read stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    /// Carriage return received.
    Complete,
    /// Only room for the terminator was left.
    Full,
    /// The peer sent CAN.
    Cancelled,
    /// Nothing arrived within the receive budget.
    TimedOut,
}

/// Result of a line read.
///
/// `buf[len]` is the NUL terminator whenever the buffer is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRead {
    /// Bytes stored before the terminator.
    pub len: usize,
    /// Why reading stopped.
    pub end: LineEnd,
}

impl LineRead {
    /// Whether the line ended with a carriage return.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.end, LineEnd::Complete)
    }
}

/// What one input byte did to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Byte appended.
    Stored,
    /// Previous byte removed; the terminal needs a rub-out.
    Erased,
    /// Byte dropped (line feed).
    Ignored,
    /// Line is over.
    Finished(LineEnd),
}

/// Cursor and capacity bookkeeping over a caller-owned buffer.
#[derive(Debug)]
pub struct LineEditor<'a> {
    buf: &'a mut [u8],
    cursor: usize,
    remaining: usize,
}

impl<'a> LineEditor<'a> {
    /// Start a line at the beginning of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        let remaining = buf.len();
        Self {
            buf,
            cursor: 0,
            remaining,
        }
    }

    /// Whether another byte may be read. One slot is always kept for the
    /// terminator.
    #[inline]
    #[must_use]
    pub const fn wants_more(&self) -> bool {
        self.remaining > 1
    }

    /// Current write position.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Slots not yet used, counting the terminator's.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Apply one received byte.
    ///
    /// Must only be called while [`wants_more`](Self::wants_more) holds.
    pub fn feed(&mut self, byte: u8) -> Edit {
        match byte {
            BACKSPACE if self.cursor > 0 => {
                self.cursor -= 1;
                self.remaining += 1;
                Edit::Erased
            }
            b'\n' => Edit::Ignored,
            b'\r' => Edit::Finished(LineEnd::Complete),
            CANCEL => {
                // CAN stays in the line so callers of the old protocol see it.
                self.store(byte);
                Edit::Finished(LineEnd::Cancelled)
            }
            // Backspace at the start of the line lands here and is kept as data.
            _ => {
                self.store(byte);
                if self.wants_more() {
                    Edit::Stored
                } else {
                    Edit::Finished(LineEnd::Full)
                }
            }
        }
    }

    /// Record a receive timeout. The line is closed exactly like a cancel.
    pub fn time_out(&mut self) -> Edit {
        self.store(CANCEL);
        Edit::Finished(LineEnd::TimedOut)
    }

    /// NUL-terminate at the cursor and report.
    pub fn finish(self, end: LineEnd) -> LineRead {
        if let Some(slot) = self.buf.get_mut(self.cursor) {
            *slot = 0;
        }
        LineRead {
            len: self.cursor,
            end,
        }
    }

    fn store(&mut self, byte: u8) {
        self.buf[self.cursor] = byte;
        self.cursor += 1;
        self.remaining -= 1;
    }
}
