//! Presentation. The controller hands out immutable [`Snapshot`]s and a
//! [`View`] draws them; views never touch application state.

#[cfg(feature = "terminal")]
pub mod terminal;

#[cfg(feature = "terminal")]
pub use self::terminal::TerminalView;

use crate::card::Flame;
use crate::countdown::TimeLeft;
use crate::particles::{Sprite, Viewport};
use crate::state::Screen;

#[derive(Debug, Clone, PartialEq)]
pub enum CountdownView {
    Pending(TimeLeft),
    Arrived(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartView {
    pub enabled: bool,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CakeView {
    pub flames: Vec<Flame>,
    pub instruction: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetterView {
    pub paragraphs: Vec<String>,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub label: String,
    pub index: Option<usize>,
    pub placeholder: bool,
    pub wide: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryView {
    pub slots: Vec<SlotView>,
    pub note: Option<String>,
    pub single: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightboxView {
    pub src: String,
    pub alt: String,
    pub position: usize,
    pub total: usize,
    pub opacity: f32,
}

/// A control the card offers, with its key
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonView {
    pub key: char,
    pub label: &'static str,
}

/// Everything a view needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub screen: Screen,
    pub viewport: Viewport,
    pub name: String,
    pub headline: String,
    pub message: String,
    /// Opacity of the welcome screen while it fades out
    pub welcome_opacity: f32,
    pub countdown: Option<CountdownView>,
    pub start: Option<StartView>,
    pub lock_banner: Option<&'static str>,
    pub cake: Option<CakeView>,
    pub buttons: Vec<ButtonView>,
    pub letter: Option<LetterView>,
    pub gallery: Option<GalleryView>,
    pub lightbox: Option<LightboxView>,
    pub toasts: Vec<(String, f32)>,
    pub sprites: Vec<Sprite>,
}

pub trait View {
    fn render(&mut self, snapshot: &Snapshot) -> anyhow::Result<()>;
}
