use std::path::{Path, PathBuf};

/// Caption printed on the generated placeholder
pub const PLACEHOLDER_CAPTION: &str = "Add your photo";

const PLACEHOLDER_SVG: &str = "<svg xmlns='http://www.w3.org/2000/svg' width='800' height='800'>\
<defs><linearGradient id='g' x1='0' y1='0' x2='1' y2='1'>\
<stop offset='0%' stop-color='#a8edea'/><stop offset='100%' stop-color='#fed6e3'/>\
</linearGradient></defs>\
<rect width='100%' height='100%' fill='url(#g)'/>\
<g fill='rgba(0,0,0,0.35)'><circle cx='400' cy='360' r='140'/>\
<rect x='260' y='360' width='280' height='180' rx='18' ry='18'/></g>\
<text x='50%' y='92%' dominant-baseline='middle' text-anchor='middle' \
font-family='Segoe UI, Arial' font-size='36' fill='rgba(0,0,0,0.55)'>Add your photo</text>\
</svg>";

/// Self-contained placeholder image as a data URI
pub fn placeholder_uri() -> String {
    format!("data:image/svg+xml;utf8,{}", urlencoding::encode(PLACEHOLDER_SVG))
}

pub fn is_placeholder_uri(src: &str) -> bool {
    src.starts_with("data:image/svg+xml")
}

/// Decides whether an image source would load
pub trait ImageProbe {
    fn loads(&self, src: &str) -> bool;
}

/// Checks sources against the file system, relative to a base directory
pub struct FsProbe {
    base: PathBuf,
}

impl FsProbe {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

impl ImageProbe for FsProbe {
    fn loads(&self, src: &str) -> bool {
        let src = src.trim();
        if src.is_empty() {
            return false;
        }
        if src.starts_with("data:") {
            return true;
        }

        let path = self.resolve(src);
        let is_svg = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);
        if is_svg {
            return path.is_file();
        }

        match image::image_dimensions(&path) {
            Ok((width, height)) => {
                log::debug!("{} is {}x{}", path.display(), width, height);
                true
            }
            Err(err) => {
                log::warn!("Image {} failed to load: {}", path.display(), err);
                false
            }
        }
    }
}
