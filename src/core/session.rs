use crate::core::booking::{BookingEvent, BookingFlow, BookingState, Recipients};
use crate::core::favorites::FavoritesStore;
use crate::core::message::MessageComposer;
use crate::domain::model::{BookingInquiry, Item, ItemId};
use crate::domain::ports::{FavoritesStorage, LinkOpener};
use crate::utils::error::{Result, VillaError};
use chrono::NaiveDate;

/// WhatsApp numbers messages go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    /// Villa and favorites messages.
    pub booking: String,
    /// General booking form.
    pub inquiry: String,
}

/// One visitor's session: the villa list they are browsing, their favorites
/// and the send flow in progress.
pub struct BookingSession<S: FavoritesStorage, L: LinkOpener> {
    items: Vec<Item>,
    favorites: FavoritesStore<S>,
    flow: BookingFlow,
    composer: MessageComposer,
    opener: L,
    destinations: Destinations,
}

impl<S: FavoritesStorage, L: LinkOpener> BookingSession<S, L> {
    pub fn new(
        items: Vec<Item>,
        favorites: FavoritesStore<S>,
        composer: MessageComposer,
        opener: L,
        destinations: Destinations,
    ) -> Self {
        Self {
            items,
            favorites,
            flow: BookingFlow::new(),
            composer,
            opener,
            destinations,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    /// Favorite villas in favorites order. Ids no longer in the catalog are skipped.
    pub fn favorite_items(&self) -> Vec<Item> {
        self.resolve(&self.favorites.list())
    }

    pub fn toggle_favorite(&mut self, id: ItemId) -> bool {
        self.favorites.toggle(id)
    }

    pub fn state(&self) -> &BookingState {
        self.flow.state()
    }

    pub fn open_picker(&mut self) -> Result<&BookingState> {
        self.flow.apply(BookingEvent::OpenPicker)
    }

    pub fn contact_item(&mut self, id: ItemId) -> Result<&BookingState> {
        if self.item(id).is_none() {
            return Err(VillaError::ItemNotFound { id });
        }
        self.flow.apply(BookingEvent::ContactItem(id))
    }

    pub fn contact_all_favorites(&mut self) -> Result<&BookingState> {
        let ids = self.favorites.list();
        self.flow.apply(BookingEvent::ContactAllFavorites(ids))
    }

    pub fn submit_dates(
        &mut self,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<&BookingState> {
        self.flow.apply(BookingEvent::SubmitDates {
            check_in,
            check_out,
        })
    }

    pub fn cancel(&mut self) {
        self.flow.reset();
    }

    /// Compose the message for the ready booking, hand it to the link opener
    /// and return to idle. Returns the text that was sent.
    pub fn send(&mut self) -> Result<String> {
        let (recipients, range) = match self.flow.apply(BookingEvent::Send)? {
            BookingState::Sent { recipients, range } => (recipients.clone(), *range),
            other => {
                return Err(VillaError::InvalidTransition {
                    state: other.name().to_string(),
                    event: "send".to_string(),
                })
            }
        };

        let composed = match &recipients {
            Recipients::Single(id) => self
                .item(*id)
                .map(|item| self.composer.compose_single(item, Some(&range)))
                .ok_or(VillaError::ItemNotFound { id: *id }),
            Recipients::AllFavorites(ids) => {
                let items = self.resolve(ids);
                self.composer.compose_multiple(&items, Some(&range))
            }
        };

        let text = match composed {
            Ok(text) => text,
            Err(e) => {
                // 無法組出訊息時不送出，回到 Idle
                self.cancel();
                return Err(e);
            }
        };

        self.opener.open(&self.destinations.booking, &text);
        tracing::info!(
            "Sent booking message for {} night(s) from {}",
            range.nights(),
            range.check_in()
        );

        self.flow.apply(BookingEvent::Complete)?;
        Ok(text)
    }

    /// General booking form; not part of the villa send flow.
    pub fn send_inquiry(&self, inquiry: &BookingInquiry) -> Result<String> {
        let text = self.composer.compose_inquiry(inquiry)?;
        self.opener.open(&self.destinations.inquiry, &text);
        tracing::info!("Sent booking inquiry for {} guest(s)", inquiry.adults + inquiry.children);
        Ok(text)
    }

    fn resolve(&self, ids: &[ItemId]) -> Vec<Item> {
        ids.iter()
            .filter_map(|id| {
                let item = self.item(*id);
                if item.is_none() {
                    tracing::debug!("Favorite villa #{} is no longer listed", id);
                }
                item.cloned()
            })
            .collect()
    }
}
