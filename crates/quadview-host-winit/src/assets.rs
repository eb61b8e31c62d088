use std::path::Path;

use quadview_core::{EngineError, Image};
use tracing::debug;

/// Decodes any format the `image` crate understands into an RGBA8 [`Image`].
pub fn load_image(path: &Path) -> Result<Image, EngineError> {
    let decoded = image::open(path).map_err(|e| EngineError::ImageDecode {
        path: path.to_path_buf(),
        msg: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    let (w, h) = rgba.dimensions();
    debug!(path = %path.display(), width = w, height = h, "decoded image");
    Image::from_rgba8(w, h, rgba.into_raw())
}
