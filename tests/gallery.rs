use birthday_card::gallery::{
    is_placeholder, placeholder_uri, FsProbe, Gallery, ImageProbe, Photo, PLACEHOLDER_CAPTION, SINGLE_PHOTO_NOTE,
};
use birthday_card::input::{AppEvent, Key};
use birthday_card::particles::Viewport;
use birthday_card::platform::AudioSystem;
use birthday_card::{CardConfig, Controller, ManualClock};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str) {
    image::RgbImage::new(4, 4).save(dir.join(name)).unwrap();
}

fn photos(names: &[&str]) -> Vec<Photo> {
    names.iter().map(|name| Photo::new(*name, format!("Photo {}", name))).collect()
}

fn visible(gallery: &Gallery) -> Vec<(String, Option<usize>)> {
    gallery
        .slots()
        .iter()
        .filter(|slot| !slot.hidden)
        .map(|slot| (slot.src.clone(), slot.index))
        .collect()
}

#[test]
fn test_single_real_photo_takes_the_gallery() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "us.png");
    std::fs::write(dir.path().join("frame.svg"), "<svg/>").unwrap();

    let mut gallery = Gallery::new(
        photos(&["missing.jpg", "us.png", "frame.svg"]),
        Some("📸 Memories".to_string()),
    );
    gallery.assign_indices();
    assert_eq!(gallery.add_fallbacks(&FsProbe::new(dir.path())), 1);
    assert!(is_placeholder(&gallery.slots()[0]));
    let caption = urlencoding::encode(PLACEHOLDER_CAPTION).into_owned();
    assert!(gallery.slots()[0].src.contains(&caption));

    gallery.optimize_layout();
    assert!(gallery.is_single());
    assert_eq!(visible(&gallery), vec![("us.png".to_string(), Some(0))]);
    assert!(gallery.slots()[1].wide);
    assert_eq!(gallery.note(), Some(SINGLE_PHOTO_NOTE));
}

#[test]
fn test_several_real_photos_stay_visible() {
    for names in [&["a.jpg", "b.jpg", "c.svg"][..], &["a.svg", "b.svg"][..], &["a.jpg", "b.jpg"][..]] {
        let mut gallery = Gallery::new(photos(names), None);
        gallery.assign_indices();
        gallery.optimize_layout();

        assert!(!gallery.is_single());
        let indices: Vec<Option<usize>> = visible(&gallery).into_iter().map(|(_, index)| index).collect();
        let expected: Vec<Option<usize>> = (0..names.len()).map(Some).collect();
        assert_eq!(indices, expected);
    }
}

#[test]
fn test_failed_image_is_replaced_once() {
    let mut gallery = Gallery::new(photos(&["a.jpg", "b.jpg"]), None);
    gallery.assign_indices();

    assert!(gallery.image_failed(1));
    assert!(!gallery.image_failed(1));
    assert_eq!(gallery.slots()[1].src, placeholder_uri());
    assert!(!gallery.image_failed(7));
}

#[test]
fn test_lightbox_wraps_both_ways() {
    let mut gallery = Gallery::new(photos(&["a.jpg", "b.jpg", "c.jpg"]), None);
    gallery.assign_indices();
    gallery.optimize_layout();
    assert!(gallery.open_lightbox(0));

    let lightbox = gallery.lightbox_mut().unwrap();
    lightbox.prev();
    assert_eq!(lightbox.current(), 2);
    lightbox.next();
    assert_eq!(lightbox.current(), 0);

    // A swipe to the right goes back
    lightbox.touch_start(300.0);
    lightbox.touch_end(360.0);
    assert_eq!(lightbox.current(), 2);
    // Short drags are ignored
    lightbox.touch_start(300.0);
    lightbox.touch_end(280.0);
    assert_eq!(lightbox.current(), 2);
}

#[test]
fn test_lightbox_closes_after_its_fade() {
    let mut gallery = Gallery::new(photos(&["a.jpg", "b.jpg"]), None);
    gallery.assign_indices();
    // Past the end wraps to the first photo
    assert!(gallery.open_lightbox(5));
    assert_eq!(gallery.lightbox().map(|lightbox| lightbox.current()), Some(0));

    assert!(gallery.open_lightbox(1));
    let lightbox = gallery.lightbox_mut().unwrap();
    assert!(lightbox.handle_key(&Key::Escape, Duration::from_secs(1)));
    assert!(!lightbox.is_listening());
    assert!(!lightbox.handle_key(&Key::Right, Duration::from_secs(1)));

    gallery.update(Duration::from_millis(1100));
    assert!(gallery.lightbox().is_some());
    gallery.update(Duration::from_millis(1200));
    assert!(gallery.lightbox().is_none());
}

struct AllLoad;

impl ImageProbe for AllLoad {
    fn loads(&self, _src: &str) -> bool {
        true
    }
}

#[test]
fn test_card_routes_keys_to_the_open_lightbox() {
    let wall = NaiveDate::from_ymd_opt(2025, 12, 17)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap();
    let clock = ManualClock::new(wall);
    let config = CardConfig {
        song: None,
        photos: photos(&["a.jpg", "b.jpg", "c.jpg"]),
        ..CardConfig::default()
    };
    let mut card = Controller::bootstrap(
        clock.clone(),
        config,
        AudioSystem::silent(),
        Viewport::from_cells(80, 24),
        &AllLoad,
        3,
    );
    assert!(card.start());
    clock.advance(Duration::from_millis(500));
    card.update();

    assert!(card.handle_event(AppEvent::Key(Key::Char('2'))));
    assert!(card.handle_event(AppEvent::Key(Key::Right)));
    let lightbox = card.snapshot().lightbox.unwrap();
    assert_eq!((lightbox.position, lightbox.total), (2, 3));
    assert_eq!(lightbox.alt, "Photo c.jpg");

    // Escape closes the lightbox, not the letter
    assert!(card.handle_event(AppEvent::Key(Key::Escape)));
    // Swipes no longer reach it while it fades
    assert!(!card.handle_event(AppEvent::TouchStart { x: 300.0 }));
    assert!(!card.handle_event(AppEvent::TouchEnd { x: 200.0 }));
    assert_eq!(card.snapshot().lightbox.map(|lightbox| lightbox.position), Some(2));
    clock.advance(Duration::from_millis(250));
    card.update();
    assert!(card.snapshot().lightbox.is_none());
    assert!(!card.handle_event(AppEvent::Key(Key::Left)));
}
