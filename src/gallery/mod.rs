//! Photo gallery: slots, broken-image fallbacks, the single-photo layout and
//! the lightbox.

pub mod fallback;
pub mod layout;
pub mod lightbox;

pub use self::fallback::{placeholder_uri, FsProbe, ImageProbe, PLACEHOLDER_CAPTION};
pub use self::layout::{is_placeholder, SINGLE_PHOTO_NOTE};
pub use self::lightbox::{Lightbox, LightboxItem, SWIPE_THRESHOLD};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A photo as described in the card file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub src: String,
    #[serde(default = "default_alt")]
    pub alt: String,
}

fn default_alt() -> String {
    "Photo".to_string()
}

impl Photo {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSlot {
    pub src: String,
    pub alt: String,
    pub hidden: bool,
    /// Position in the lightbox, once assigned
    pub index: Option<usize>,
    pub fallback_applied: bool,
    pub wide: bool,
}

pub struct Gallery {
    slots: Vec<PhotoSlot>,
    single: bool,
    note: Option<String>,
    lightbox: Option<Lightbox>,
}

impl Gallery {
    pub fn new(photos: Vec<Photo>, note: Option<String>) -> Self {
        let slots = photos
            .into_iter()
            .map(|photo| PhotoSlot {
                src: photo.src,
                alt: photo.alt,
                hidden: false,
                index: None,
                fallback_applied: false,
                wide: false,
            })
            .collect();
        Self {
            slots,
            single: false,
            note,
            lightbox: None,
        }
    }

    pub fn slots(&self) -> &[PhotoSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Number every slot in order
    pub fn assign_indices(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.index = Some(i);
        }
    }

    /// Probe every slot and swap broken images for the placeholder.
    /// Returns how many were replaced.
    pub fn add_fallbacks(&mut self, probe: &dyn ImageProbe) -> usize {
        let broken: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !probe.loads(&slot.src))
            .map(|(i, _)| i)
            .collect();
        broken.into_iter().filter(|&i| self.image_failed(i)).count()
    }

    /// A slot's image failed to load. The placeholder goes in the first time
    /// only; returns whether it did.
    pub fn image_failed(&mut self, index: usize) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.fallback_applied {
            return false;
        }
        log::info!("Photo '{}' unavailable, showing placeholder", slot.src);
        slot.fallback_applied = true;
        slot.src = placeholder_uri();
        true
    }

    /// Visible photos in lightbox order
    pub fn lightbox_items(&self) -> Vec<LightboxItem> {
        let mut visible: Vec<&PhotoSlot> = self.slots.iter().filter(|slot| !slot.hidden).collect();
        visible.sort_by_key(|slot| slot.index.unwrap_or(usize::MAX));
        visible
            .into_iter()
            .map(|slot| LightboxItem {
                src: slot.src.clone(),
                alt: if slot.alt.is_empty() {
                    default_alt()
                } else {
                    slot.alt.clone()
                },
            })
            .collect()
    }

    /// Open the lightbox on the `index`th visible photo
    pub fn open_lightbox(&mut self, index: usize) -> bool {
        self.lightbox = Lightbox::open(self.lightbox_items(), index);
        self.lightbox.is_some()
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    pub fn lightbox_mut(&mut self) -> Option<&mut Lightbox> {
        self.lightbox.as_mut()
    }

    /// Remove the lightbox once its close fade is done
    pub fn update(&mut self, now: Duration) {
        if let Some(lightbox) = &mut self.lightbox {
            lightbox.update(now);
            if lightbox.is_closed() {
                self.lightbox = None;
            }
        }
    }
}
