/// File formats recognised from leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Png,
    Jpeg,
    Gif,
    Zip,
    Gzip,
    Unknown,
}

const SIGNATURES: &[(&[u8], FileType)] = &[
    (b"%PDF", FileType::Pdf),
    (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], FileType::Png),
    (&[0xFF, 0xD8, 0xFF], FileType::Jpeg),
    (b"GIF8", FileType::Gif),
    (&[0x50, 0x4B, 0x03, 0x04], FileType::Zip),
    (&[0x1F, 0x8B], FileType::Gzip),
];

impl FileType {
    #[must_use]
    pub const fn mime(self) -> Option<&'static str> {
        match self {
            Self::Pdf => Some("application/pdf"),
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Gif => Some("image/gif"),
            Self::Zip => Some("application/zip"),
            Self::Gzip => Some("application/gzip"),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_pdf(self) -> bool {
        matches!(self, Self::Pdf)
    }

    /// MIME type, or `"unknown"` when no signature matched.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.mime().unwrap_or("unknown")
    }
}

/// Classifies a buffer by its content signature. Filenames and declared
/// content types are never consulted.
#[must_use]
pub fn detect_type(bytes: &[u8]) -> FileType {
    SIGNATURES
        .iter()
        .find(|(signature, _)| bytes.starts_with(signature))
        .map_or(FileType::Unknown, |(_, file_type)| *file_type)
}
