//! Image persistence: deterministic naming and PNG re-encoding.

use std::path::{Path, PathBuf};

use unidoc_core::{ExtractError, Result};

/// Synthesize the file name for a persisted image.
///
/// The naming contract is stable across releases: `{base}_img_{index}.png`
/// for page-less sources, `{base}_page_{page+1}_img_{index}.png` for
/// page- or slide-scoped sources. `image_index` is 1-based and local to
/// the enclosing page/slide (or to the whole document when `page_index`
/// is `None`); `page_index` is the 0-based page position.
#[must_use]
pub fn image_file_name(base: &str, page_index: Option<usize>, image_index: usize) -> String {
    match page_index {
        Some(page) => format!("{base}_page_{}_img_{image_index}.png", page + 1),
        None => format!("{base}_img_{image_index}.png"),
    }
}

/// Writes embedded images into a single flat output directory.
///
/// All images are re-encoded as PNG regardless of source encoding; raw
/// bytes the `image` crate cannot decode yield a per-image error for the
/// caller to record. No per-document subfolder is created here — layout
/// beyond the flat directory is a storage-collaborator concern.
#[derive(Debug, Clone)]
pub struct ImageStore {
    output_dir: PathBuf,
}

impl ImageStore {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Decode `data` and write it as a PNG named `file_name`.
    ///
    /// # Errors
    /// `ImageDecode` when the raw bytes are not a decodable raster image,
    /// `ImageWrite` when encoding or writing the PNG fails. Both are meant
    /// to be recorded per image, not propagated.
    pub fn persist(&self, data: &[u8], file_name: &str) -> Result<PathBuf> {
        let image = image::load_from_memory(data).map_err(|e| ExtractError::ImageDecode {
            name: file_name.to_string(),
            reason: e.to_string(),
        })?;
        let path = self.output_dir.join(file_name);
        image.save(&path).map_err(|e| ExtractError::ImageWrite {
            name: file_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 200, 30]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_naming_contract_page_scoped() {
        // 0-based page index 2, image index 1 -> page 3 in the name
        assert_eq!(image_file_name("report", Some(2), 1), "report_page_3_img_1.png");
    }

    #[test]
    fn test_naming_contract_global() {
        assert_eq!(image_file_name("notes", None, 1), "notes_img_1.png");
        assert_eq!(image_file_name("notes", None, 2), "notes_img_2.png");
    }

    #[test]
    fn test_persist_round_trip_preserves_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        store.ensure_output_dir().unwrap();

        let path = store.persist(&png_bytes(7, 5), "doc_img_1.png").unwrap();
        assert!(path.exists());

        let reopened = image::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (7, 5));
    }

    #[test]
    fn test_persist_rejects_undecodable_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        store.ensure_output_dir().unwrap();

        let err = store.persist(b"not an image", "doc_img_1.png").unwrap_err();
        match err {
            ExtractError::ImageDecode { name, .. } => assert_eq!(name, "doc_img_1.png"),
            other => panic!("expected ImageDecode, got {other:?}"),
        }
        assert!(!dir.path().join("doc_img_1.png").exists());
    }
}
