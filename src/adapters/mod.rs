// Adapters layer: concrete implementations for the external systems behind the ports.

pub mod http;
pub mod storage;
pub mod whatsapp;

pub use http::RestBackend;
pub use storage::{JsonFileFavoritesStorage, MemoryFavoritesStorage};
pub use whatsapp::{chat_link, StdoutLinkOpener};
