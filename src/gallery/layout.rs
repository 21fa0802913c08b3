use super::fallback::is_placeholder_uri;
use super::{Gallery, PhotoSlot};

pub const SINGLE_PHOTO_NOTE: &str = "💡 Tip: You can add more photos later — this one already looks perfect!";

/// True for `.svg` sources (query strings allowed) and for slots already
/// showing the generated placeholder
pub fn is_placeholder(slot: &PhotoSlot) -> bool {
    if slot.fallback_applied || is_placeholder_uri(&slot.src) {
        return true;
    }
    let src = slot.src.to_ascii_lowercase();
    let path = src.split('?').next().unwrap_or("");
    path.ends_with(".svg")
}

impl Gallery {
    /// Give a lone real photo the whole gallery, otherwise renumber every slot
    pub fn optimize_layout(&mut self) {
        let real: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !is_placeholder(slot))
            .map(|(i, _)| i)
            .collect();

        if let [keep] = *real.as_slice() {
            for (i, slot) in self.slots.iter_mut().enumerate() {
                if i == keep {
                    slot.hidden = false;
                    slot.wide = true;
                    slot.index = Some(0);
                } else {
                    slot.hidden = true;
                    slot.wide = false;
                    slot.index = None;
                }
            }
            self.single = true;
            if self.note.is_some() {
                self.note = Some(SINGLE_PHOTO_NOTE.to_string());
            }
            log::info!("Single photo layout");
        } else {
            for (i, slot) in self.slots.iter_mut().enumerate() {
                slot.hidden = false;
                slot.wide = false;
                slot.index = Some(i);
            }
            self.single = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::Photo;

    fn slot(src: &str) -> PhotoSlot {
        PhotoSlot {
            src: src.to_string(),
            alt: String::new(),
            hidden: false,
            index: None,
            fallback_applied: false,
            wide: false,
        }
    }

    #[test]
    fn test_svg_detection() {
        assert!(is_placeholder(&slot("photos/empty.svg")));
        assert!(is_placeholder(&slot("photos/EMPTY.SVG?v=2")));
        assert!(!is_placeholder(&slot("photos/svg-night.jpg")));
        assert!(!is_placeholder(&slot("photos/us.jpeg")));
    }

    #[test]
    fn test_note_only_changes_when_present() {
        let mut gallery = Gallery::new(vec![Photo::new("us.jpg", "Us")], None);
        gallery.optimize_layout();
        assert!(gallery.is_single());
        assert_eq!(gallery.note(), None);
    }
}
