pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;
pub use config::SiteConfig;

pub use adapters::{JsonFileFavoritesStorage, MemoryFavoritesStorage, RestBackend, StdoutLinkOpener};
pub use core::{
    admin::AdminConsole,
    booking::{BookingFlow, BookingState},
    favorites::FavoritesStore,
    message::{MessageComposer, MessageTemplate},
    session::{BookingSession, Destinations},
};
pub use domain::model::{BookingInquiry, DateRange, Item, ItemId, ItemStatus};
pub use utils::error::{Result, VillaError};
