//! Error types produced by the tokeniser, sentence parsers, dispatcher and
//! aggregate merge step.

use core::fmt;

use crate::sentence::SentenceType;

/// Anything that can go wrong while turning bytes into an [`crate::Info`], or
/// an [`crate::Info`] back into bytes.
///
/// Framing errors (bad checksum, missing EOL, buffer overflow) never reach
/// this type directly — they only ever show up via a [`crate::Context`]
/// trace sink: a single malformed frame must not halt a continuous
/// telemetry stream.
#[derive(Debug, PartialEq)]
pub enum Error<'a> {
    /// The sentence did not start with `$` followed by a 5-character prefix.
    UnknownSentence(&'a str),
    /// The prefix was recognised but is not one of the five supported
    /// sentence kinds.
    Unsupported(SentenceType),
    /// A parser for one sentence kind was handed data for another.
    WrongSentenceHeader {
        expected: SentenceType,
        found: SentenceType,
    },
    /// `scan` extracted a different number of fields than the sentence's
    /// grammar requires.
    FieldCount { expected: usize, found: usize },
    /// A field's value failed the relevant validator (range, enumerant,
    /// character class).
    InvalidField(&'static str),
    /// A GSV sentence's `sentences`/`sentence`/`satellites` triple is
    /// internally inconsistent.
    GsvSequencing,
    /// The checksum computed over the frame body did not match the `*HH`
    /// trailer.
    ChecksumMismatch { calculated: u8, found: u8 },
    /// Input was empty where a non-empty sentence body was required.
    EmptyInput,
    /// Lower-level grammar failure from the field parsers.
    Parsing(nom::Err<nom::error::Error<&'a str>>),
}

impl<'a> From<nom::Err<nom::error::Error<&'a str>>> for Error<'a> {
    fn from(error: nom::Err<nom::error::Error<&'a str>>) -> Self {
        Self::Parsing(error)
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownSentence(s) => write!(f, "unknown or malformed sentence header: {s}"),
            Error::Unsupported(kind) => write!(f, "unsupported sentence kind: {kind}"),
            Error::WrongSentenceHeader { expected, found } => write!(
                f,
                "wrong sentence header (expected {expected}, found {found})"
            ),
            Error::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Error::InvalidField(name) => write!(f, "invalid value for field {name}"),
            Error::GsvSequencing => write!(f, "inconsistent GSV sentence/satellite count"),
            Error::ChecksumMismatch { calculated, found } => write!(
                f,
                "checksum mismatch (calculated {calculated:02X}, found {found:02X})"
            ),
            Error::EmptyInput => write!(f, "empty input"),
            Error::Parsing(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl core::error::Error for Error<'_> {}
