//! Streaming frame extractor and its companion [`Context`] trace/error
//! sinks.
//!
//! An explicit byte-at-a-time state machine rather than a
//! buffer-and-search-for-separator approach, since frame extraction has its
//! own small protocol: checksum-optional acceptance, and discard-and-resync
//! on an invalid byte.

use alloc::string::String;

use arrayvec::ArrayString;

use crate::info::Info;
use crate::sentence::sentence_to_info;

/// Default per-parser sentence buffer size (bytes), overridable via
/// [`Parser::with_capacity`].
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Upper bound on the sentence buffer this crate will allocate, chosen to
/// comfortably exceed any real NMEA sentence while keeping a fixed-capacity
/// array. Callers needing more should pre-filter upstream.
const MAX_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SkipUntilStart,
    ReadBody,
    /// First hex digit of the checksum, once seen.
    ReadChecksum(Option<u8>),
    /// Waiting on the trailing `\r\n`. `checksum` is `None` when the frame
    /// carried no `*HH` trailer. `cr_seen` tracks whether the leading `\r`
    /// has already been consumed (it has, when we arrived here straight
    /// from `ReadBody` on an unescaped `\r`).
    ReadEol { checksum: Option<u8>, cr_seen: bool },
}

/// Floor on [`Context::with_buffer_size`]: below this, a long error message
/// (e.g. from a deeply nested parse failure) would be cut mid-word often
/// enough to be useless to a caller logging it.
pub const MIN_CONTEXT_BUFFER_SIZE: usize = 256;

/// Optional trace/error sinks threaded explicitly through [`Parser::parse`],
/// replacing the source's process-wide global sinks per the design notes.
pub struct Context<'a> {
    trace: Option<&'a mut dyn FnMut(&str)>,
    error: Option<&'a mut dyn FnMut(&str)>,
    buffer_size: usize,
}

impl Default for Context<'_> {
    fn default() -> Self {
        Context { trace: None, error: None, buffer_size: MIN_CONTEXT_BUFFER_SIZE }
    }
}

impl<'a> Context<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(mut self, sink: &'a mut dyn FnMut(&str)) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn with_error(mut self, sink: &'a mut dyn FnMut(&str)) -> Self {
        self.error = Some(sink);
        self
    }

    /// Caps how much of a formatted trace/error message reaches the sinks.
    /// Clamped up to [`MIN_CONTEXT_BUFFER_SIZE`] if given a smaller value.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(MIN_CONTEXT_BUFFER_SIZE);
        self
    }

    fn trace(&mut self, msg: &str) {
        if let Some(sink) = self.trace.as_mut() {
            sink(truncate_at_char_boundary(msg, self.buffer_size));
        }
    }

    fn error(&mut self, msg: &str) {
        if let Some(sink) = self.error.as_mut() {
            sink(truncate_at_char_boundary(msg, self.buffer_size));
        }
    }
}

fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Streaming sentence extractor: reassembles `$...*HH\r\n` frames from an
/// arbitrarily chunked byte stream and dispatches each one that passes its
/// checksum to [`sentence_to_info`].
pub struct Parser {
    state: State,
    buffer: ArrayString<MAX_BUFFER_SIZE>,
    capacity: usize,
    running_crc: u8,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// `capacity` is clamped to [`MAX_BUFFER_SIZE`].
    pub fn with_capacity(capacity: usize) -> Self {
        Parser {
            state: State::SkipUntilStart,
            buffer: ArrayString::new(),
            capacity: capacity.min(MAX_BUFFER_SIZE),
            running_crc: 0,
        }
    }

    fn reset(&mut self) {
        self.state = State::SkipUntilStart;
        self.buffer.clear();
        self.running_crc = 0;
    }

    /// Feeds `bytes` through the frame-extraction state machine, merging
    /// every sentence that passes checksum verification into `info`.
    ///
    /// Returns the count of successfully merged sentences. Framing and
    /// merge failures never propagate — they surface only through `ctx`'s
    /// trace/error sinks, so one malformed frame cannot halt the stream.
    pub fn parse(&mut self, bytes: &[u8], info: &mut Info, ctx: &mut Context<'_>) -> usize {
        let mut frames = 0;
        for &byte in bytes {
            if byte == b'$' {
                self.reset();
                self.state = State::ReadBody;
                continue;
            }
            match self.state {
                State::SkipUntilStart => {}
                State::ReadBody => self.step_body(byte, ctx),
                State::ReadChecksum(hi) => self.step_checksum(byte, hi, ctx),
                State::ReadEol { checksum, cr_seen } => {
                    self.step_eol(byte, checksum, cr_seen, info, ctx, &mut frames)
                }
            }
        }
        frames
    }

    fn step_body(&mut self, byte: u8, ctx: &mut Context<'_>) {
        match byte {
            b'*' => self.state = State::ReadChecksum(None),
            b'\r' => self.state = State::ReadEol { checksum: None, cr_seen: true },
            b if is_valid_body_byte(b) => {
                if self.buffer.len() >= self.capacity {
                    ctx.error("frame buffer overflow");
                    self.reset();
                    return;
                }
                self.running_crc ^= b;
                let _ = self.buffer.try_push(b as char);
            }
            _ => {
                ctx.error("invalid byte in frame body");
                self.reset();
            }
        }
    }

    fn step_checksum(&mut self, byte: u8, hi: Option<u8>, ctx: &mut Context<'_>) {
        let Some(digit) = (byte as char).to_digit(16) else {
            ctx.error("non-hex checksum digit");
            self.reset();
            return;
        };
        match hi {
            None => self.state = State::ReadChecksum(Some(digit as u8)),
            Some(hi) => {
                self.state = State::ReadEol { checksum: Some((hi << 4) | digit as u8), cr_seen: false };
            }
        }
    }

    fn step_eol(
        &mut self,
        byte: u8,
        checksum: Option<u8>,
        cr_seen: bool,
        info: &mut Info,
        ctx: &mut Context<'_>,
        frames: &mut usize,
    ) {
        if !cr_seen {
            if byte == b'\r' {
                self.state = State::ReadEol { checksum, cr_seen: true };
            } else {
                ctx.error("expected CR before LF");
                self.reset();
            }
            return;
        }
        if byte == b'\n' {
            self.emit(checksum, info, ctx, frames);
            self.reset();
        } else {
            ctx.error("expected LF after CR");
            self.reset();
        }
    }

    fn emit(&mut self, checksum: Option<u8>, info: &mut Info, ctx: &mut Context<'_>, frames: &mut usize) {
        if let Some(found) = checksum {
            if found != self.running_crc {
                ctx.trace("checksum mismatch, dropping frame");
                return;
            }
        }
        match sentence_to_info(self.buffer.as_str(), info) {
            Ok(_) => *frames += 1,
            Err(e) => {
                let mut msg = String::new();
                let _ = core::fmt::write(&mut msg, format_args!("{e}"));
                ctx.error(&msg);
            }
        }
    }
}

fn is_valid_body_byte(byte: u8) -> bool {
    let c = byte as char;
    c.is_ascii_graphic() && !matches!(c, '$' | '*' | '!' | '\\' | '^' | '~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_frame_with_checksum() {
        let mut parser = Parser::new();
        let mut info = Info::default();
        let mut ctx = Context::new();
        let body = b"GPGGA,104559.64,,,,,,,,,,,,,";
        let cs = crate::tokenize::crc(body);
        let frame = alloc::format!("${}*{:02X}\r\n", core::str::from_utf8(body).unwrap(), cs);
        let count = parser.parse(frame.as_bytes(), &mut info, &mut ctx);
        assert_eq!(count, 1);
        assert_eq!(info.utc.hour, 10);
    }

    #[test]
    fn with_buffer_size_clamps_to_the_minimum() {
        let mut parser = Parser::new();
        let mut info = Info::default();
        let mut seen = alloc::string::String::new();
        let mut sink = |msg: &str| seen.push_str(msg);
        let mut ctx = Context::new().with_buffer_size(1).with_error(&mut sink);
        parser.parse(b"$GPZZZ,1,2,3\r\n", &mut info, &mut ctx);
        assert_eq!(seen, "unknown or malformed sentence header: GPZZZ,1,2,3");
    }

    #[test]
    fn with_buffer_size_truncates_long_messages() {
        let mut seen = alloc::string::String::new();
        let mut sink = |msg: &str| seen.push_str(msg);
        let mut ctx = Context::new().with_buffer_size(300).with_error(&mut sink);
        let long_message: alloc::string::String = core::iter::repeat('x').take(1000).collect();
        ctx.error(&long_message);
        assert_eq!(seen.len(), 300);
    }

    #[test]
    fn drops_frame_on_checksum_mismatch() {
        let mut parser = Parser::new();
        let mut info = Info::default();
        let mut ctx = Context::new();
        let frame = b"$GPGGA,104559.64,,,,,,,,,,,,,*00\r\n";
        let count = parser.parse(frame, &mut info, &mut ctx);
        assert_eq!(count, 0);
    }

    #[test]
    fn accepts_frame_without_checksum() {
        let mut parser = Parser::new();
        let mut info = Info::default();
        let mut ctx = Context::new();
        let frame = b"$GPGGA,104559.64,,,,,,,,,,,,,\r\n";
        let count = parser.parse(frame, &mut info, &mut ctx);
        assert_eq!(count, 1);
    }

    #[test]
    fn byte_granularity_is_invariant() {
        let whole = b"$GPGGA,104559.64,,,,,,,,,,,,,\r\n";
        let mut whole_parser = Parser::new();
        let mut whole_info = Info::default();
        let mut ctx = Context::new();
        whole_parser.parse(whole, &mut whole_info, &mut ctx);

        let mut chunked_parser = Parser::new();
        let mut chunked_info = Info::default();
        for byte in whole {
            chunked_parser.parse(core::slice::from_ref(byte), &mut chunked_info, &mut ctx);
        }
        assert_eq!(whole_info, chunked_info);
    }

    #[test]
    fn resync_on_dollar_mid_frame() {
        let mut parser = Parser::new();
        let mut info = Info::default();
        let mut ctx = Context::new();
        let frame = b"$GPGGA,garbage$GPGGA,104559.64,,,,,,,,,,,,,\r\n";
        let count = parser.parse(frame, &mut info, &mut ctx);
        assert_eq!(count, 1);
    }
}
