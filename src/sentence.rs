//! Prefix dispatch: mapping a `$XXYYY` header to a sentence kind, and the
//! two entry points that tie the per-kind parsers to the aggregate.

use core::fmt;

use crate::error::Error;
use crate::info::Info;
use crate::mask::SentenceMask;
use crate::sentences;

/// One of the five sentence kinds this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceType {
    Gga,
    Gsa,
    Gsv,
    Rmc,
    Vtg,
}

impl SentenceType {
    const ALL: [SentenceType; 5] = [
        SentenceType::Gga,
        SentenceType::Gsa,
        SentenceType::Gsv,
        SentenceType::Rmc,
        SentenceType::Vtg,
    ];

    /// The five-character wire prefix, e.g. `"GPGGA"`.
    pub const fn prefix(self) -> &'static str {
        match self {
            SentenceType::Gga => "GPGGA",
            SentenceType::Gsa => "GPGSA",
            SentenceType::Gsv => "GPGSV",
            SentenceType::Rmc => "GPRMC",
            SentenceType::Vtg => "GPVTG",
        }
    }

    /// Classifies a frame body's leading prefix, skipping an optional `$`.
    ///
    /// Returns `None` for anything shorter than 5 bytes or not matching one
    /// of the five supported prefixes; callers fold that into
    /// [`Error::UnknownSentence`].
    pub fn from_prefix(body: &str) -> Option<Self> {
        let body = body.strip_prefix('$').unwrap_or(body);
        if body.len() < 5 {
            return None;
        }
        let prefix = &body[..5];
        SentenceType::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

impl fmt::Display for SentenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A single decoded frame body, split into header and data.
///
/// `checksum` is `None` when the frame carried no `*HH` trailer — a trailing
/// `*` with no hex digits after it is accepted as "no checksum supplied".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NmeaSentence<'a> {
    pub kind: SentenceType,
    pub data: &'a str,
    pub checksum: Option<u8>,
}

/// Splits a sentence body (without the trailing `\r\n`) into its header and
/// comma-separated fields, recognising the five supported prefixes.
///
/// `body` may or may not carry a leading `$`, and may or may not carry a
/// trailing `*HH` (or bare `*`) checksum trailer — both paths are accepted.
pub fn parse_nmea_sentence(body: &str) -> Result<NmeaSentence<'_>, Error<'_>> {
    if body.is_empty() {
        return Err(Error::EmptyInput);
    }
    let stripped = body.strip_prefix('$').unwrap_or(body);
    let kind = SentenceType::from_prefix(stripped).ok_or(Error::UnknownSentence(body))?;

    let rest = &stripped[5..];
    let rest = rest.strip_prefix(',').unwrap_or(rest);

    let (data, checksum) = match rest.rsplit_once('*') {
        Some((data, hex)) if hex.is_empty() => (data, None),
        Some((data, hex)) => {
            let value = u8::from_str_radix(hex, 16).map_err(|_| Error::UnknownSentence(body))?;
            (data, Some(value))
        }
        None => (rest, None),
    };

    if let Some(found) = checksum {
        let calculated = crate::tokenize::crc(stripped[..5 + 1 + data.len()].as_bytes());
        if calculated != found {
            return Err(Error::ChecksumMismatch { calculated, found });
        }
    }

    if !crate::validate::valid_body(data) {
        return Err(Error::InvalidField("body"));
    }

    Ok(NmeaSentence { kind, data, checksum })
}

/// Decodes `sentence` and merges it into `info`, returning the kind that was
/// merged.
///
/// Framing is the caller's concern (either a single externally-framed
/// sentence, or a frame freshly emitted by [`crate::frame::Parser`]).
pub fn sentence_to_info<'a>(sentence: &'a str, info: &mut Info) -> Result<SentenceType, Error<'a>> {
    let parsed = parse_nmea_sentence(sentence)?;
    match parsed.kind {
        SentenceType::Gga => info.merge_gga(sentences::gga::parse(parsed.data)?),
        SentenceType::Gsa => info.merge_gsa(sentences::gsa::parse(parsed.data)?),
        SentenceType::Gsv => info.merge_gsv(sentences::gsv::parse(parsed.data)?),
        SentenceType::Rmc => info.merge_rmc(sentences::rmc::parse(parsed.data)?),
        SentenceType::Vtg => info.merge_vtg(sentences::vtg::parse(parsed.data)?),
    }
    Ok(parsed.kind)
}

/// Projects `info` into each sentence kind set in `mask`, in the fixed order
/// GGA, GSA, GSV, RMC, VTG, and concatenates the generated frames.
///
/// GSV expands into `max(1, ceil(inViewCount / 4))` sentences. The result
/// buffer grows per the generator's allocation policy: 4 KiB steps, capped
/// at 16 MiB.
pub fn sentence_from_info(info: &Info, mask: SentenceMask) -> alloc::string::String {
    use crate::generate::OutputBuffer;
    use crate::mask::SentenceFlag;
    use alloc::string::String;

    let mut scratch = String::new();
    let mut out = OutputBuffer::new();

    let mut emit = |scratch: &mut String, out: &mut OutputBuffer| {
        let _ = out.push_frame(scratch);
        scratch.clear();
    };

    if mask.contains(SentenceFlag::Gpgga) {
        sentences::gga::generate(info, &mut scratch);
        emit(&mut scratch, &mut out);
    }
    if mask.contains(SentenceFlag::Gpgsa) {
        sentences::gsa::generate(info, &mut scratch);
        emit(&mut scratch, &mut out);
    }
    if mask.contains(SentenceFlag::Gpgsv) {
        sentences::gsv::generate(info, &mut scratch);
        emit(&mut scratch, &mut out);
    }
    if mask.contains(SentenceFlag::Gprmc) {
        sentences::rmc::generate(info, &mut scratch);
        emit(&mut scratch, &mut out);
    }
    if mask.contains(SentenceFlag::Gpvtg) {
        sentences::vtg::generate(info, &mut scratch);
        emit(&mut scratch, &mut out);
    }
    out.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_prefix_recognises_supported_kinds() {
        assert_eq!(SentenceType::from_prefix("GPGGA,104559.64"), Some(SentenceType::Gga));
        assert_eq!(SentenceType::from_prefix("$GPRMC,"), Some(SentenceType::Rmc));
        assert_eq!(SentenceType::from_prefix("GPZZZ,"), None);
        assert_eq!(SentenceType::from_prefix("GP"), None);
    }

    #[test]
    fn parse_nmea_sentence_accepts_missing_checksum() {
        let s = parse_nmea_sentence("$GPGGA,104559.64,,,,,,,,,,,,,*").unwrap();
        assert_eq!(s.kind, SentenceType::Gga);
        assert_eq!(s.checksum, None);
        assert_eq!(s.data, "104559.64,,,,,,,,,,,,,");
    }

    #[test]
    fn parse_nmea_sentence_detects_checksum_mismatch() {
        let err = parse_nmea_sentence("$GPGGA,104559.64,,,,,,,,,,,,,*00").unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
    }

    #[test]
    fn parse_nmea_sentence_rejects_unknown_prefix() {
        let err = parse_nmea_sentence("$GPZZZ,1,2,3").unwrap_err();
        assert!(matches!(err, Error::UnknownSentence(_)));
    }

    #[test]
    fn parse_nmea_sentence_rejects_reserved_byte_in_body() {
        let err = parse_nmea_sentence("$GPGGA,10455~.64,,,,,,,,,,,,,").unwrap_err();
        assert!(matches!(err, Error::InvalidField("body")));
    }
}
