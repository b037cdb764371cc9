//! Bounded textual reply buffer
//!
//! One reply line is accumulated per submitted command: the session
//! seeds the acknowledgment token, the response translator appends
//! fragments as exchanges complete, and the finished line is read out
//! when the command returns.
//!
//! The buffer is deliberately bounded to the legacy protocol's maximum
//! line length. Appending past capacity silently truncates and a full
//! buffer turns further appends into no-ops; this is the documented
//! truncation policy of the text protocol, not an error condition.

use std::fmt::{self, Write};

/// Default capacity, the legacy protocol's maximum reply line length
pub const REPLY_CAPACITY: usize = 1024;

/// Fixed-capacity accumulator for one textual reply line
#[derive(Debug)]
pub struct ReplyAccumulator {
    buf: Vec<u8>,
    capacity: usize,
}

impl ReplyAccumulator {
    /// Create an accumulator with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(REPLY_CAPACITY)
    }

    /// Create an accumulator with an explicit capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Discard any accumulated text
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Append a fragment, truncating at capacity
    ///
    /// Writes at most the remaining free bytes; once the buffer is full
    /// this is a no-op. Never fails.
    pub fn push(&mut self, fragment: &str) {
        let remaining = self.capacity.saturating_sub(self.buf.len());
        if remaining == 0 {
            return;
        }
        let bytes = fragment.as_bytes();
        let take = bytes.len().min(remaining);
        self.buf.extend_from_slice(&bytes[..take]);
    }

    /// The accumulated reply text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }

    /// Number of bytes accumulated so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the buffer has reached capacity
    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.capacity
    }
}

impl Default for ReplyAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Formatted appends go through the same bounded `push`, so `write!`
/// into the accumulator can never fail or overflow.
impl Write for ReplyAccumulator {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push(s);
        Ok(())
    }
}
