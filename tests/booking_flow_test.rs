use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use villa_booking::core::dates::{derive_checkout, nights_between};
use villa_booking::core::LinkOpener;
use villa_booking::domain::model::ItemRecord;
use villa_booking::{
    BookingInquiry, BookingSession, BookingState, DateRange, Destinations, FavoritesStore, Item,
    JsonFileFavoritesStorage, MemoryFavoritesStorage, MessageComposer, VillaError,
};

const BOOKING: &str = "+6282210081028";
const INQUIRY: &str = "+6283169371998";

#[derive(Clone, Default)]
struct RecordingOpener {
    opened: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingOpener {
    fn sent(&self) -> Vec<(String, String)> {
        self.opened.lock().unwrap().clone()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, destination: &str, text: &str) {
        self.opened
            .lock()
            .unwrap()
            .push((destination.to_string(), text.to_string()));
    }
}

fn villa(id: i64, title: &str, location: &str, rating: f64) -> Item {
    let mut item = Item::from(ItemRecord::default());
    item.id = id;
    item.title = title.to_string();
    item.location = location.to_string();
    item.rating = rating;
    item
}

fn catalog() -> Vec<Item> {
    vec![
        villa(1, "Villa Kabut", "Cisarua, Puncak", 4.8),
        villa(2, "Villa Teh Hijau", "Megamendung", 4.5),
        villa(5, "Villa Curug", "Tugu Selatan", 5.0),
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn session_with(
    storage: MemoryFavoritesStorage,
    opener: RecordingOpener,
) -> BookingSession<MemoryFavoritesStorage, RecordingOpener> {
    BookingSession::new(
        catalog(),
        FavoritesStore::load(storage),
        MessageComposer::default(),
        opener,
        Destinations {
            booking: BOOKING.to_string(),
            inquiry: INQUIRY.to_string(),
        },
    )
}

#[test]
fn test_single_villa_with_three_nights() {
    let opener = RecordingOpener::default();
    let mut session = session_with(MemoryFavoritesStorage::new(), opener.clone());

    let check_out = derive_checkout(Some(date(2025, 11, 11)), 3);
    assert_eq!(check_out, Some(date(2025, 11, 14)));

    session.contact_item(1).unwrap();
    let state = session.submit_dates(Some(date(2025, 11, 11)), check_out).unwrap();
    assert_eq!(state.name(), "ready");

    let text = session.send().unwrap();
    let expected = [
        "🚨🚨🚨🚨🚨",
        "Villa Kabut",
        "Location: Cisarua, Puncak",
        "Rating: 4.8",
        "",
        "Check-In: 11 Nov 2025",
        "Check-Out: 14 Nov 2025",
        "Total: 03 Malam",
        "",
        "Dibantu Cek Availability Kak",
        "*VillaSepuncak*",
    ]
    .join("\n");
    assert_eq!(text, expected);

    assert_eq!(opener.sent(), vec![(BOOKING.to_string(), expected)]);
    assert_eq!(session.state(), &BookingState::Idle);
}

#[test]
fn test_send_all_with_no_favorites_composes_nothing() {
    let opener = RecordingOpener::default();
    let mut session = session_with(MemoryFavoritesStorage::new(), opener.clone());

    let err = session.contact_all_favorites().unwrap_err();
    assert!(matches!(err, VillaError::EmptyRecipientSet));
    assert_eq!(session.state(), &BookingState::Idle);

    // 不在 Ready 狀態，送出必須被拒絕
    assert!(matches!(
        session.send(),
        Err(VillaError::InvalidTransition { .. })
    ));
    assert!(opener.sent().is_empty());
}

#[test]
fn test_send_all_favorites_keeps_order_and_single_closing() {
    let opener = RecordingOpener::default();
    let mut session = session_with(MemoryFavoritesStorage::with_ids(vec![1, 2]), opener.clone());

    session.contact_all_favorites().unwrap();
    session
        .submit_dates(Some(date(2025, 12, 24)), Some(date(2025, 12, 26)))
        .unwrap();
    let text = session.send().unwrap();

    assert_eq!(text.matches("🚨🚨🚨🚨🚨").count(), 1);
    assert_eq!(text.matches("Dibantu Cek Availability Kak").count(), 1);
    assert_eq!(text.matches("*VillaSepuncak*").count(), 1);
    assert_eq!(text.matches("Total: 02 Malam").count(), 2);

    let first = text.find("Villa Kabut").unwrap();
    let second = text.find("Villa Teh Hijau").unwrap();
    assert!(first < second);
    assert!(text.ends_with("Dibantu Cek Availability Kak\n*VillaSepuncak*"));
    assert_eq!(opener.sent().len(), 1);
}

#[test]
fn test_toggle_twice_restores_favorites() {
    let mut session = session_with(
        MemoryFavoritesStorage::with_ids(vec![1, 2]),
        RecordingOpener::default(),
    );
    let before = session.favorites().count();

    assert!(session.toggle_favorite(5));
    assert_eq!(session.favorites().count(), before + 1);
    assert!(session.favorites().is_favorite(5));

    assert!(!session.toggle_favorite(5));
    assert_eq!(session.favorites().count(), before);
    assert_eq!(session.favorites().list(), vec![1, 2]);
}

#[test]
fn test_invalid_range_is_refused() {
    let opener = RecordingOpener::default();
    let mut session = session_with(MemoryFavoritesStorage::new(), opener.clone());

    session.contact_item(2).unwrap();
    let err = session
        .submit_dates(Some(date(2025, 11, 14)), Some(date(2025, 11, 14)))
        .unwrap_err();
    assert!(matches!(err, VillaError::InvalidDateRange { .. }));
    assert_eq!(session.state().name(), "awaiting date input");

    // 修正日期後可以繼續
    session
        .submit_dates(Some(date(2025, 11, 14)), Some(date(2025, 11, 15)))
        .unwrap();
    session.send().unwrap();
    assert_eq!(opener.sent().len(), 1);
}

#[test]
fn test_nights_between_inverts_derived_checkout() {
    let start = date(2024, 2, 27);
    for nights in 1..=45 {
        let end = derive_checkout(Some(start), nights).unwrap();
        assert_eq!(nights_between(start, end).unwrap(), nights as u32);
    }
}

#[test]
fn test_composer_is_deterministic() {
    let composer = MessageComposer::default();
    let items = catalog();
    let range = DateRange::new(date(2025, 11, 11), date(2025, 11, 12)).unwrap();

    let first = composer.compose_multiple(&items, Some(&range)).unwrap();
    let second = composer.compose_multiple(&items, Some(&range)).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        composer.compose_single(&items[0], Some(&range)),
        composer.compose_multiple(&items[..1], Some(&range)).unwrap()
    );
}

#[test]
fn test_inquiry_goes_to_inquiry_number() {
    let opener = RecordingOpener::default();
    let session = session_with(MemoryFavoritesStorage::new(), opener.clone());

    let inquiry = BookingInquiry {
        range: DateRange::from_nights(date(2025, 11, 11), 2).unwrap(),
        adults: 2,
        children: 1,
        children_ages: vec![6],
        notes: Some("Late check-in".to_string()),
    };
    let text = session.send_inquiry(&inquiry).unwrap();

    assert!(text.contains("*Malam:* 2"));
    assert!(text.contains("*Children Ages:* 6"));
    assert_eq!(opener.sent(), vec![(INQUIRY.to_string(), text)]);
    assert_eq!(session.state(), &BookingState::Idle);
}

#[test]
fn test_favorites_persist_across_sessions() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("nested").join("favorites.json");

    {
        let mut store = FavoritesStore::load(JsonFileFavoritesStorage::new(&path));
        store.toggle(3);
        store.toggle(1);
        assert!(store.is_persistent());
    }

    assert_eq!(std::fs::read_to_string(&path)?, "[3,1]");

    let store = FavoritesStore::load(JsonFileFavoritesStorage::new(&path));
    assert_eq!(store.list(), vec![3, 1]);
    Ok(())
}

#[test]
fn test_corrupt_favorites_file_loads_empty() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("favorites.json");
    std::fs::write(&path, "{not json")?;

    let mut store = FavoritesStore::load(JsonFileFavoritesStorage::new(&path));
    assert_eq!(store.count(), 0);

    // 仍可在記憶體中操作
    assert!(store.toggle(9));
    assert!(store.is_favorite(9));
    Ok(())
}
