//! Content-type classification from magic bytes.
//!
//! [`detect`] inspects the leading bytes of a payload against a table of
//! known file signatures. It never looks at keys or extensions.

mod file_type;

pub use file_type::FileType;

use crate::{Error, Result};

/// A fixed byte sequence expected at `offset`.
struct Signature {
    offset: usize,
    magic: &'static [u8],
    file_type: FileType,
}

const fn sig(offset: usize, magic: &'static [u8], file_type: FileType) -> Signature {
    Signature {
        offset,
        magic,
        file_type,
    }
}

// Longer and more specific signatures come first.
const SIGNATURES: &[Signature] = &[
    sig(0, &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], FileType::Png),
    sig(0, b"SQLite format 3\0", FileType::Sqlite),
    sig(0, &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C], FileType::SevenZip),
    sig(0, &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00], FileType::Xz),
    sig(0, b"Rar!\x1A\x07", FileType::Rar),
    sig(0, b"GIF87a", FileType::Gif),
    sig(0, b"GIF89a", FileType::Gif),
    sig(0, b"{\\rtf", FileType::Rtf),
    sig(0, b"%PDF", FileType::Pdf),
    sig(0, &[0x50, 0x4B, 0x03, 0x04], FileType::Zip),
    sig(0, &[0x50, 0x4B, 0x05, 0x06], FileType::Zip),
    sig(0, &[0x50, 0x4B, 0x07, 0x08], FileType::Zip),
    sig(0, &[0x28, 0xB5, 0x2F, 0xFD], FileType::Zstd),
    sig(0, &[0x00, 0x61, 0x73, 0x6D], FileType::Wasm),
    sig(0, &[0x7F, 0x45, 0x4C, 0x46], FileType::Elf),
    sig(0, &[0x49, 0x49, 0x2A, 0x00], FileType::Tiff),
    sig(0, &[0x4D, 0x4D, 0x00, 0x2A], FileType::Tiff),
    sig(0, &[0x00, 0x00, 0x01, 0x00], FileType::Ico),
    sig(0, b"fLaC", FileType::Flac),
    sig(0, b"OggS", FileType::Ogg),
    sig(0, b"wOFF", FileType::Woff),
    sig(0, b"wOF2", FileType::Woff2),
    sig(0, b"BZh", FileType::Bzip2),
    sig(0, b"ID3", FileType::Mp3),
    sig(0, &[0xFF, 0xD8, 0xFF], FileType::Jpeg),
    sig(0, &[0x1F, 0x8B], FileType::Gzip),
    sig(0, &[0xFF, 0xFB], FileType::Mp3),
    sig(0, &[0xFF, 0xF3], FileType::Mp3),
    sig(0, &[0xFF, 0xF2], FileType::Mp3),
    sig(0, b"BM", FileType::Bmp),
    sig(257, b"ustar", FileType::Tar),
];

impl Signature {
    fn matches(&self, data: &[u8]) -> bool {
        data.get(self.offset..self.offset + self.magic.len()) == Some(self.magic)
    }
}

/// RIFF containers carry their format at bytes 8..12.
fn detect_riff(data: &[u8]) -> Option<FileType> {
    if !data.starts_with(b"RIFF") {
        return None;
    }

    match data.get(8..12)? {
        b"WEBP" => Some(FileType::Webp),
        b"WAVE" => Some(FileType::Wav),
        b"AVI " => Some(FileType::Avi),
        _ => None,
    }
}

/// ISO base media files start with an `ftyp` box whose major brand
/// follows at bytes 8..12.
fn detect_ftyp(data: &[u8]) -> Option<FileType> {
    if data.get(4..8)? != b"ftyp" {
        return None;
    }

    match data.get(8..12)? {
        b"heic" | b"heix" | b"heim" | b"heis" | b"mif1" | b"msf1" => Some(FileType::Heic),
        b"qt  " => Some(FileType::Mov),
        _ => Some(FileType::Mp4),
    }
}

/// Classifies `data` by its leading bytes.
///
/// Returns [`FileType::Unknown`] when no signature matches.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an empty payload, which carries no
/// signature to inspect.
pub fn detect(data: &[u8]) -> Result<FileType> {
    if data.is_empty() {
        return Err(Error::validation("empty payload"));
    }

    let file_type = detect_riff(data)
        .or_else(|| detect_ftyp(data))
        .or_else(|| {
            SIGNATURES
                .iter()
                .find(|s| s.matches(data))
                .map(|s| s.file_type)
        })
        .unwrap_or_default();

    Ok(file_type)
}
