//! WhatsApp send flow.
//!
//! ```text
//! Idle ──OpenPicker──▶ AwaitingRecipientSelection
//!  │                        │
//!  └──ContactItem / ContactAllFavorites──▶ AwaitingDateInput ──SubmitDates──▶ Ready
//!                                                                         │
//!                                            Idle ◀──Complete── Sent ◀──Send
//! ```
//!
//! `Cancel` returns to `Idle` from anywhere. A refused event never leaves a
//! half-applied state behind.

use crate::domain::model::{DateRange, ItemId};
use crate::utils::error::{Result, VillaError};
use chrono::NaiveDate;
use std::fmt;

/// Who the message is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    Single(ItemId),
    /// Snapshot of the favorites list when the flow started.
    AllFavorites(Vec<ItemId>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookingState {
    #[default]
    Idle,
    AwaitingRecipientSelection,
    AwaitingDateInput {
        recipients: Recipients,
    },
    Ready {
        recipients: Recipients,
        range: DateRange,
    },
    Sent {
        recipients: Recipients,
        range: DateRange,
    },
}

impl BookingState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingRecipientSelection => "awaiting recipient selection",
            Self::AwaitingDateInput { .. } => "awaiting date input",
            Self::Ready { .. } => "ready",
            Self::Sent { .. } => "sent",
        }
    }

    pub fn recipients(&self) -> Option<&Recipients> {
        match self {
            Self::AwaitingDateInput { recipients }
            | Self::Ready { recipients, .. }
            | Self::Sent { recipients, .. } => Some(recipients),
            Self::Idle | Self::AwaitingRecipientSelection => None,
        }
    }

    pub fn range(&self) -> Option<&DateRange> {
        match self {
            Self::Ready { range, .. } | Self::Sent { range, .. } => Some(range),
            _ => None,
        }
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEvent {
    OpenPicker,
    ContactItem(ItemId),
    ContactAllFavorites(Vec<ItemId>),
    SubmitDates {
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    },
    Send,
    Complete,
    Cancel,
}

impl BookingEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenPicker => "open the villa picker",
            Self::ContactItem(_) => "contact about a villa",
            Self::ContactAllFavorites(_) => "contact about all favorites",
            Self::SubmitDates { .. } => "submit dates",
            Self::Send => "send",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookingFlow {
    state: BookingState,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    /// Drop whatever is in progress and go back to `Idle`.
    pub fn reset(&mut self) {
        tracing::debug!("Booking flow reset from {}", self.state);
        self.state = BookingState::Idle;
    }

    /// Apply `event`. On refusal the error is returned and the flow sits in
    /// the state the refusal rules name.
    pub fn apply(&mut self, event: BookingEvent) -> Result<&BookingState> {
        let current = std::mem::take(&mut self.state);
        let (next, outcome) = transition(current, event);

        if let Err(e) = &outcome {
            tracing::debug!("Booking flow refused event, now {}: {}", next, e);
        } else {
            tracing::debug!("Booking flow now {}", next);
        }

        self.state = next;
        outcome.map(|()| &self.state)
    }
}

fn transition(state: BookingState, event: BookingEvent) -> (BookingState, Result<()>) {
    use BookingEvent as E;
    use BookingState as S;

    match (state, event) {
        (_, E::Cancel) => (S::Idle, Ok(())),

        (S::Idle, E::OpenPicker) => (S::AwaitingRecipientSelection, Ok(())),

        (S::Idle | S::AwaitingRecipientSelection, E::ContactItem(id)) => (
            S::AwaitingDateInput {
                recipients: Recipients::Single(id),
            },
            Ok(()),
        ),

        (S::Idle | S::AwaitingRecipientSelection, E::ContactAllFavorites(ids)) => {
            if ids.is_empty() {
                (S::Idle, Err(VillaError::EmptyRecipientSet))
            } else {
                (
                    S::AwaitingDateInput {
                        recipients: Recipients::AllFavorites(ids),
                    },
                    Ok(()),
                )
            }
        }

        (
            S::AwaitingDateInput { recipients } | S::Ready { recipients, .. },
            E::SubmitDates {
                check_in,
                check_out,
            },
        ) => match validate_dates(check_in, check_out) {
            Ok(range) => (S::Ready { recipients, range }, Ok(())),
            Err(e) => (S::AwaitingDateInput { recipients }, Err(e)),
        },

        (S::Ready { recipients, range }, E::Send) => (S::Sent { recipients, range }, Ok(())),

        (S::Sent { .. }, E::Complete) => (S::Idle, Ok(())),

        (state, event) => {
            let err = VillaError::InvalidTransition {
                state: state.name().to_string(),
                event: event.name().to_string(),
            };
            (state, Err(err))
        }
    }
}

fn validate_dates(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> Result<DateRange> {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => DateRange::new(check_in, check_out),
        _ => Err(VillaError::invalid_range(
            "please select both check-in and check-out dates",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 11, d)
    }

    fn submit(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> BookingEvent {
        BookingEvent::SubmitDates {
            check_in,
            check_out,
        }
    }

    #[test]
    fn test_single_item_happy_path() {
        let mut flow = BookingFlow::new();
        flow.apply(BookingEvent::ContactItem(4)).unwrap();
        assert_eq!(flow.state().name(), "awaiting date input");

        flow.apply(submit(date(11), date(14))).unwrap();
        assert_eq!(flow.state().range().unwrap().nights(), 3);

        flow.apply(BookingEvent::Send).unwrap();
        assert!(matches!(flow.state(), BookingState::Sent { .. }));

        flow.apply(BookingEvent::Complete).unwrap();
        assert_eq!(flow.state(), &BookingState::Idle);
    }

    #[test]
    fn test_empty_favorites_stays_idle() {
        let mut flow = BookingFlow::new();
        let result = flow.apply(BookingEvent::ContactAllFavorites(vec![]));
        assert!(matches!(result, Err(VillaError::EmptyRecipientSet)));
        assert_eq!(flow.state(), &BookingState::Idle);

        flow.apply(BookingEvent::OpenPicker).unwrap();
        assert!(flow.apply(BookingEvent::ContactAllFavorites(vec![])).is_err());
        assert_eq!(flow.state(), &BookingState::Idle);
    }

    #[test]
    fn test_invalid_dates_keep_awaiting_input() {
        let mut flow = BookingFlow::new();
        flow.apply(BookingEvent::ContactAllFavorites(vec![1, 2])).unwrap();

        let attempts = [
            (date(11), date(11)),
            (date(14), date(11)),
            (date(11), None),
            (None, date(12)),
        ];
        for (check_in, check_out) in attempts {
            let result = flow.apply(submit(check_in, check_out));
            assert!(matches!(result, Err(VillaError::InvalidDateRange { .. })));
            assert_eq!(
                flow.state(),
                &BookingState::AwaitingDateInput {
                    recipients: Recipients::AllFavorites(vec![1, 2])
                }
            );
        }
    }

    #[test]
    fn test_resubmitting_bad_dates_drops_ready_range() {
        let mut flow = BookingFlow::new();
        flow.apply(BookingEvent::ContactItem(1)).unwrap();
        flow.apply(submit(date(11), date(14))).unwrap();
        assert!(flow.apply(submit(date(14), date(12))).is_err());
        assert_eq!(flow.state().name(), "awaiting date input");
        assert!(flow.state().range().is_none());
    }

    #[test]
    fn test_cancel_from_any_state() {
        let mut flow = BookingFlow::new();
        flow.apply(BookingEvent::Cancel).unwrap();
        assert_eq!(flow.state(), &BookingState::Idle);

        flow.apply(BookingEvent::OpenPicker).unwrap();
        flow.apply(BookingEvent::Cancel).unwrap();
        assert_eq!(flow.state(), &BookingState::Idle);

        flow.apply(BookingEvent::ContactItem(1)).unwrap();
        flow.apply(submit(date(11), date(12))).unwrap();
        flow.apply(BookingEvent::Cancel).unwrap();
        assert_eq!(flow.state(), &BookingState::Idle);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut flow = BookingFlow::new();
        flow.apply(BookingEvent::ContactAllFavorites(vec![3])).unwrap();
        flow.apply(submit(date(11), date(13))).unwrap();
        assert_eq!(flow.state().name(), "ready");

        flow.reset();
        assert_eq!(flow.state(), &BookingState::Idle);

        flow.reset();
        assert_eq!(flow.state(), &BookingState::Idle);
    }

    #[test]
    fn test_out_of_order_events_are_refused() {
        let mut flow = BookingFlow::new();
        assert!(matches!(
            flow.apply(BookingEvent::Send),
            Err(VillaError::InvalidTransition { .. })
        ));
        assert_eq!(flow.state(), &BookingState::Idle);

        flow.apply(BookingEvent::ContactItem(1)).unwrap();
        assert!(flow.apply(BookingEvent::Send).is_err());
        assert!(flow.apply(BookingEvent::ContactItem(2)).is_err());
        assert_eq!(flow.state().recipients(), Some(&Recipients::Single(1)));
    }
}
