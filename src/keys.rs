use image::ImageFormat;

/// The image container formats the handler will thumbnail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// Classify an object key by its suffix.
    ///
    /// Case-sensitive on purpose: only lowercase `.jpg`, `.png` and `.gif`
    /// keys are ours to process, everything else belongs to someone else's
    /// pipeline.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.ends_with(".jpg") {
            Some(Self::Jpeg)
        } else if key.ends_with(".png") {
            Some(Self::Png)
        } else if key.ends_with(".gif") {
            Some(Self::Gif)
        } else {
            None
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

/// Whether an object key denotes a raster image this crate supports.
pub fn is_supported_image(key: &str) -> bool {
    ImageKind::from_key(key).is_some()
}

/// Derive the storage key for a thumbnail by inserting `_thumb` before the
/// extension: `photos/cat.jpg` becomes `photos/cat_thumb.jpg`.
///
/// Returns `None` when the final path segment has no extension to split on,
/// so callers get an explicit skip path instead of a mangled key.
pub fn thumbnail_key(key: &str) -> Option<String> {
    let dot = key.rfind('.')?;
    if key[dot..].contains('/') {
        return None;
    }
    Some(format!("{}_thumb{}", &key[..dot], &key[dot..]))
}
