//! Font discovery for cloud rendering.

use fontdb::{Database, Family, Query};
use rusttype::Font;
use std::path::Path;

use crate::error::{Error, Result};

/// Families tried in order before falling back to generic ones.
const PREFERRED_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// Load the font used to draw words.
///
/// An explicit path wins; otherwise the system font database is searched for
/// a plain sans-serif face.
pub fn load_font(path: Option<&Path>) -> Result<Font<'static>> {
    if let Some(path) = path {
        let data = fs_err::read(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        return Font::try_from_vec(data)
            .ok_or_else(|| Error::render(format!("{} is not a usable TrueType font", path.display())));
    }

    let mut db = Database::new();
    db.load_system_fonts();
    tracing::debug!("Font database holds {} faces", db.len());

    let mut families: Vec<Family<'_>> = PREFERRED_FAMILIES.iter().map(|name| Family::Name(name)).collect();
    families.push(Family::SansSerif);
    families.push(Family::Monospace);
    families.push(Family::Serif);

    let query = Query {
        families: &families,
        ..Query::default()
    };

    let id = db.query(&query).ok_or_else(|| {
        Error::config(
            "no system font found for the word cloud",
            "Install a TrueType font such as DejaVu Sans or set CLOUD_FONT_PATH",
        )
    })?;

    if let Some(face) = db.face(id) {
        tracing::debug!("Using font '{}'", face.post_script_name);
    }

    db.with_face_data(id, |data, index| Font::try_from_vec_and_index(data.to_vec(), index))
        .flatten()
        .ok_or_else(|| Error::render("system font could not be parsed"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::io::Write;

    #[test]
    fn missing_font_file_is_io_error() {
        let err = load_font(Some(Path::new("/definitely/not/here.ttf"))).err().unwrap();
        assert!(matches!(err, Error::Io { path: Some(_), .. }));
    }

    #[test]
    fn garbage_font_file_is_render_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a font at all").unwrap();
        let err = load_font(Some(file.path())).err().unwrap();
        assert!(matches!(err, Error::Render(_)));
    }
}
