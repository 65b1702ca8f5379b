//! Best-effort text decoding for logs and sources.
//!
//! Decoding walks an ordered chain of encodings and keeps the first one that
//! accepts the bytes without replacement characters.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use crate::fs::FileSystem;

/// Text encodings understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// UTF-16 with a byte order mark (either endianness), or BOM-less
    /// little-endian text whose high bytes are mostly NUL.
    #[serde(rename = "utf-16")]
    Utf16,
    /// UTF-8.
    #[serde(rename = "utf-8")]
    Utf8,
    /// ISO-8859-1; every byte maps to the code point of the same value.
    #[serde(rename = "latin-1", alias = "iso-8859-1")]
    Latin1,
    /// Windows code page 1252.
    #[serde(rename = "cp1252", alias = "windows-1252")]
    Windows1252,
}

impl Encoding {
    /// Default chain for build and test logs.
    pub const LOG_CHAIN: [Encoding; 4] = [
        Encoding::Utf16,
        Encoding::Utf8,
        Encoding::Latin1,
        Encoding::Windows1252,
    ];

    /// Chain for source files: UTF-8 with one legacy 8-bit fallback.
    pub const SOURCE_CHAIN: [Encoding; 2] = [Encoding::Utf8, Encoding::Latin1];

    /// Label used in logs and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf16 => "utf-16",
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Windows1252 => "cp1252",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => {
                    strict(UTF_16LE.decode_without_bom_handling_and_without_replacement(rest))
                }
                [0xFE, 0xFF, rest @ ..] => {
                    strict(UTF_16BE.decode_without_bom_handling_and_without_replacement(rest))
                }
                _ if looks_like_utf16le(bytes) => {
                    strict(UTF_16LE.decode_without_bom_handling_and_without_replacement(bytes))
                }
                _ => None,
            },
            Self::Utf8 => {
                strict(UTF_8.decode_without_bom_handling_and_without_replacement(bytes))
            }
            // encoding_rs folds ISO-8859-1 into windows-1252, so map bytes directly.
            Self::Latin1 => Some(bytes.iter().map(|&byte| char::from(byte)).collect()),
            Self::Windows1252 => {
                strict(WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes))
            }
        }
    }
}

/// BOM-less UTF-16LE heuristic: even length and at least half of the
/// high (odd-index) bytes are NUL, as they are for mostly-ASCII text.
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    if bytes.is_empty() || bytes.len() % 2 != 0 {
        return false;
    }
    let units = bytes.len() / 2;
    let nul_high = bytes.iter().skip(1).step_by(2).filter(|&&byte| byte == 0).count();
    nul_high * 2 >= units
}

fn strict(decoded: Option<Cow<'_, str>>) -> Option<String> {
    decoded.map(Cow::into_owned)
}

/// Text together with the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded text.
    pub text: String,
    /// Encoding that accepted the bytes.
    pub encoding: Encoding,
}

/// Why a log could not be turned into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    /// The file does not exist.
    NotFound,
    /// No encoding in the chain accepted the bytes.
    Undecodable,
    /// The file exists but could not be read.
    Unreadable(String),
}

/// Return the first successful attempt among `candidates`, in order.
pub fn first_success<C, T>(
    candidates: impl IntoIterator<Item = C>,
    attempt: impl FnMut(C) -> Option<T>,
) -> Option<T> {
    candidates.into_iter().find_map(attempt)
}

/// Decode `bytes` with the first encoding in `chain` that accepts them.
pub fn decode_with(bytes: &[u8], chain: &[Encoding]) -> Option<Decoded> {
    first_success(chain.iter().copied(), |encoding| {
        encoding
            .decode(bytes)
            .map(|text| Decoded { text, encoding })
    })
}

/// Decode source text. Content containing NUL bytes is treated as binary
/// and rejected.
pub fn decode_source(bytes: &[u8]) -> Option<String> {
    if bytes.contains(&0) {
        return None;
    }
    decode_with(bytes, &Encoding::SOURCE_CHAIN).map(|decoded| decoded.text)
}

/// Read and decode a log file through `chain`.
pub fn decode_log<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    chain: &[Encoding],
) -> Result<Decoded, DecodeFailure> {
    if !fs.is_file(path) {
        log::warn!("log not found: {}", path.display());
        return Err(DecodeFailure::NotFound);
    }
    let bytes = fs.read_bytes(path).map_err(|err| {
        log::warn!("failed to read {}: {err}", path.display());
        DecodeFailure::Unreadable(err.to_string())
    })?;
    match decode_with(&bytes, chain) {
        Some(decoded) => {
            log::info!(
                "decoded {} as {}",
                path.display(),
                decoded.encoding.label()
            );
            Ok(decoded)
        }
        None => {
            log::warn!("could not decode {}", path.display());
            Err(DecodeFailure::Undecodable)
        }
    }
}
