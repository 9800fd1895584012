//! Output buffer growth policy for the generator: the only component
//! allowed to grow a buffer, and it grows in 4 KiB steps capped at 16 MiB.
//!
//! Sentence generation accumulates a variable number of frames (GSV fans
//! out to however many sentences the in-view count needs), so a
//! fixed-capacity buffer doesn't fit and this module owns the growth policy
//! instead.

use alloc::string::String;

use crate::error::Error;

/// Step size output buffers grow by.
pub const GROWTH_INCREMENT: usize = 4096;
/// Hard cap on generator output, in bytes.
pub const MAX_OUTPUT: usize = 16 * 1024 * 1024;

/// A `String` that only ever grows in [`GROWTH_INCREMENT`]-byte steps, up to
/// [`MAX_OUTPUT`].
pub struct OutputBuffer {
    inner: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer { inner: String::new() }
    }

    /// Appends `frame`, growing capacity in [`GROWTH_INCREMENT`] steps as
    /// needed. Fails if doing so would exceed [`MAX_OUTPUT`].
    pub fn push_frame(&mut self, frame: &str) -> Result<(), Error<'static>> {
        let needed = self.inner.len() + frame.len();
        if needed > MAX_OUTPUT {
            return Err(Error::InvalidField("output buffer exceeds 16 MiB cap"));
        }
        if needed > self.inner.capacity() {
            let rounded = needed.div_ceil(GROWTH_INCREMENT) * GROWTH_INCREMENT;
            self.inner.reserve(rounded - self.inner.len());
        }
        self.inner.push_str(frame);
        Ok(())
    }

    pub fn into_string(self) -> String {
        self.inner
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_in_fixed_increments() {
        let mut buf = OutputBuffer::new();
        buf.push_frame("$GPGGA,*00\r\n").unwrap();
        assert!(buf.inner.capacity() >= GROWTH_INCREMENT);
        assert!(buf.inner.capacity() % GROWTH_INCREMENT == 0);
    }

    #[test]
    fn rejects_growth_past_the_cap() {
        let mut buf = OutputBuffer::new();
        let huge = "x".repeat(MAX_OUTPUT + 1);
        assert!(buf.push_frame(&huge).is_err());
    }
}
