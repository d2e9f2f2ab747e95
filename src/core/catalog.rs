use crate::domain::model::{Item, ItemStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const POOL_FEATURE: &str = "Private Pool";
const MOST_BOOKED_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum CatalogFilter {
    #[default]
    All,
    PrivatePool,
    Resort,
    Outside,
}

impl CatalogFilter {
    pub fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::PrivatePool => item.features.iter().any(|f| f == POOL_FEATURE),
            Self::Resort => item.kind == "resort",
            Self::Outside => item.kind == "outside",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Repository order (id ascending).
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    Rating,
    Popularity,
}

impl SortOrder {
    fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            Self::Default => Ordering::Equal,
            Self::PriceAsc => a.price.total_cmp(&b.price),
            Self::PriceDesc => b.price.total_cmp(&a.price),
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::Popularity => b.bookings_this_month.cmp(&a.bookings_this_month),
        }
    }
}

/// Filter then stable-sort a copy of `items`.
pub fn browse(items: &[Item], filter: CatalogFilter, sort: SortOrder) -> Vec<Item> {
    let mut result: Vec<Item> = items
        .iter()
        .filter(|item| filter.matches(item))
        .cloned()
        .collect();
    result.sort_by(|a, b| sort.compare(a, b));
    result
}

/// The villa shown in the hero spot.
pub fn featured(items: &[Item]) -> Option<&Item> {
    items.iter().find(|item| item.status == ItemStatus::Featured)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Featured,
    MostBooked,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::MostBooked => "Most Booked",
        }
    }
}

pub fn badge(item: &Item) -> Option<Badge> {
    if item.status == ItemStatus::Featured {
        Some(Badge::Featured)
    } else if item.bookings_this_month > MOST_BOOKED_THRESHOLD {
        Some(Badge::MostBooked)
    } else {
        None
    }
}

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum AdminTab {
    #[default]
    Promoted,
    All,
}

/// Case-insensitive title/location search, then the tab filter.
pub fn search<'a>(items: &'a [Item], query: &str, tab: AdminTab) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            query.is_empty()
                || item.title.to_lowercase().contains(&query)
                || item.location.to_lowercase().contains(&query)
        })
        .filter(|item| tab == AdminTab::All || item.status == ItemStatus::Featured)
        .collect()
}

/// `1500000` → `1,500,000`
pub fn format_price(price: f64) -> String {
    let whole = price.round().max(0.0) as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
