//! Coarse content-type classification of a file reference.

use std::path::Path;

/// Archive content category assigned to a record's `mediatype`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mediatype {
    Movies,
    Audio,
    Image,
    Texts,
    Software,
    Data,
}

impl Mediatype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mediatype::Movies => "movies",
            Mediatype::Audio => "audio",
            Mediatype::Image => "image",
            Mediatype::Texts => "texts",
            Mediatype::Software => "software",
            Mediatype::Data => "data",
        }
    }
}

const MOVIE_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mpg", "mpeg", "ogv", "wmv", "mkv", "webm", "flv", "m4v",
];

const AUDIO_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "flac", "aac", "ogg", "wma", "m4a", "aiff", "alac",
];

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "tif", "tiff", "gif", "bmp", "png", "webp", "jp2", "svg", "heic",
];

const TEXT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "rtf", "odt", "epub", "csv", "xls", "xlsx", "ppt", "pptx",
];

const SOFTWARE_EXTENSIONS: &[&str] = &[
    "exe", "msi", "dmg", "iso", "apk", "deb", "rpm", "jar", "pkg", "appimage",
];

/// Extension tables in priority order
const EXTENSION_TABLES: &[(Mediatype, &[&str])] = &[
    (Mediatype::Movies, MOVIE_EXTENSIONS),
    (Mediatype::Audio, AUDIO_EXTENSIONS),
    (Mediatype::Image, IMAGE_EXTENSIONS),
    (Mediatype::Texts, TEXT_EXTENSIONS),
    (Mediatype::Software, SOFTWARE_EXTENSIONS),
];

/// Classify a file path or name.
///
/// Known extensions win; otherwise the top-level MIME type guessed from the
/// extension decides. Anything else, including an empty reference, is `Data`.
pub fn classify(file: &str) -> Mediatype {
    let ext = match Path::new(file.trim()).extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => return Mediatype::Data,
    };

    if let Some((mediatype, _)) = EXTENSION_TABLES
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
    {
        return *mediatype;
    }

    match mime_guess::from_ext(&ext).first() {
        Some(mime) => match mime.type_().as_str() {
            "video" => Mediatype::Movies,
            "audio" => Mediatype::Audio,
            "image" => Mediatype::Image,
            "application" => Mediatype::Software,
            "text" => Mediatype::Texts,
            _ => Mediatype::Data,
        },
        None => Mediatype::Data,
    }
}
