//! Recognized file formats.

use strum::{Display, EnumIter};

/// File format recognized from a payload's leading bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
    Tiff,
    Ico,
    Heic,
    Pdf,
    Rtf,
    Zip,
    Gzip,
    Bzip2,
    SevenZip,
    Rar,
    Xz,
    Zstd,
    Tar,
    Wasm,
    Elf,
    Sqlite,
    Mp3,
    Flac,
    Ogg,
    Wav,
    Avi,
    Mp4,
    Mov,
    Woff,
    Woff2,
    /// No known signature matched.
    #[default]
    Unknown,
}

impl FileType {
    /// Returns the MIME type recorded as the object's content type.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Ico => "image/vnd.microsoft.icon",
            Self::Heic => "image/heic",
            Self::Pdf => "application/pdf",
            Self::Rtf => "application/rtf",
            Self::Zip => "application/zip",
            Self::Gzip => "application/gzip",
            Self::Bzip2 => "application/x-bzip2",
            Self::SevenZip => "application/x-7z-compressed",
            Self::Rar => "application/vnd.rar",
            Self::Xz => "application/x-xz",
            Self::Zstd => "application/zstd",
            Self::Tar => "application/x-tar",
            Self::Wasm => "application/wasm",
            Self::Elf => "application/x-executable",
            Self::Sqlite => "application/vnd.sqlite3",
            Self::Mp3 => "audio/mpeg",
            Self::Flac => "audio/x-flac",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/x-wav",
            Self::Avi => "video/x-msvideo",
            Self::Mp4 => "video/mp4",
            Self::Mov => "video/quicktime",
            Self::Woff => "font/woff",
            Self::Woff2 => "font/woff2",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Returns the conventional file extension.
    pub fn extension(&self) -> Option<&'static str> {
        let ext = match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tif",
            Self::Ico => "ico",
            Self::Heic => "heic",
            Self::Pdf => "pdf",
            Self::Rtf => "rtf",
            Self::Zip => "zip",
            Self::Gzip => "gz",
            Self::Bzip2 => "bz2",
            Self::SevenZip => "7z",
            Self::Rar => "rar",
            Self::Xz => "xz",
            Self::Zstd => "zst",
            Self::Tar => "tar",
            Self::Wasm => "wasm",
            Self::Elf => "elf",
            Self::Sqlite => "sqlite",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
            Self::Avi => "avi",
            Self::Mp4 => "mp4",
            Self::Mov => "mov",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
            Self::Unknown => return None,
        };
        Some(ext)
    }

    /// Check if a signature matched
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_known_type_has_an_extension() {
        for ty in FileType::iter().filter(FileType::is_known) {
            assert!(ty.extension().is_some(), "{ty} has no extension");
        }
        assert!(FileType::Unknown.extension().is_none());
    }

    #[test]
    fn display() {
        assert_eq!(FileType::Png.to_string(), "png");
        assert_eq!(FileType::SevenZip.to_string(), "sevenzip");
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(FileType::default(), FileType::Unknown);
        assert_eq!(FileType::Unknown.mime(), "application/octet-stream");
    }
}
