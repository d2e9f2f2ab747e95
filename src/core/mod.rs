pub mod admin;
pub mod booking;
pub mod catalog;
pub mod dates;
pub mod favorites;
pub mod message;
pub mod session;

pub use crate::domain::model::{DateRange, Item, ItemId, ItemStatus};
pub use crate::domain::ports::{
    AdminRepository, ConfigProvider, FavoritesStorage, ItemRepository, LinkOpener,
};
pub use crate::utils::error::Result;
