//! Saving rendered clouds to disk.

use std::path::{Path, PathBuf};

use crate::constants::cloud::DOWNLOAD_SUFFIX;
use crate::error::{Error, Result};

/// File name offered for a cloud of `title`.
///
/// Spaces become underscores, as do characters that are unsafe in file
/// names on common platforms.
pub fn download_file_name(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let stem = if stem.is_empty() { "untitled" } else { stem.as_str() };
    format!("{stem}{DOWNLOAD_SUFFIX}")
}

/// Write `png` into `dir` under the download name for `title`.
///
/// The directory is created if needed. Returns the written path.
pub fn save_cloud(dir: &Path, title: &str, png: &[u8]) -> Result<PathBuf> {
    fs_err::create_dir_all(dir).map_err(|e| Error::io(e, dir.to_path_buf()))?;
    let path = dir.join(download_file_name(title));
    fs_err::write(&path, png).map_err(|e| Error::io(e, path.clone()))?;
    tracing::info!("Saved word cloud to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(download_file_name("Love Story"), "Love_Story_wordcloud.png");
        assert_eq!(download_file_name("  Shake It Off "), "Shake_It_Off_wordcloud.png");
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        assert_eq!(download_file_name("Ready/Set: Go?"), "Ready_Set__Go__wordcloud.png");
        assert_eq!(download_file_name("22"), "22_wordcloud.png");
    }

    #[test]
    fn blank_title_gets_placeholder() {
        assert_eq!(download_file_name("   "), "untitled_wordcloud.png");
    }

    #[test]
    fn save_writes_bytes_into_new_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("clouds");
        let path = save_cloud(&dir, "Love Story", b"\x89PNG fake").unwrap();

        assert_eq!(path, dir.join("Love_Story_wordcloud.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG fake");
    }

    #[test]
    fn save_into_file_path_fails_with_context() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let err = save_cloud(tmp.path(), "Love Story", b"x").unwrap_err();
        assert!(matches!(err, Error::Io { path: Some(_), .. }));
    }
}
