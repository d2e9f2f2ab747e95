use crate::utils::error::{Result, VillaError};
use crate::utils::validation::{validate_range, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ItemId = i64;

/// Listing status. Exactly one applies to a villa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ItemStatus {
    #[default]
    None,
    Featured,
    New,
    Hot,
}

impl ItemStatus {
    /// Collapse the backend's three flags. Featured wins over New, New over Hot.
    pub fn from_flags(is_featured: bool, is_new: bool, is_hot: bool) -> Self {
        if is_featured {
            Self::Featured
        } else if is_new {
            Self::New
        } else if is_hot {
            Self::Hot
        } else {
            Self::None
        }
    }

    /// `(isFeatured, isBaru, isHot)`
    pub fn to_flags(self) -> (bool, bool, bool) {
        (
            self == Self::Featured,
            self == Self::New,
            self == Self::Hot,
        )
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Featured => Some("Promo"),
            Self::New => Some("Baru"),
            Self::Hot => Some("Hot"),
        }
    }
}

/// A rentable villa listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub location: String,
    pub price: f64,
    pub rating: f64,
    pub bookings_this_month: u32,
    pub kind: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub guests: u32,
    pub size: String,
    pub description: String,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub amenities: Vec<String>,
    pub status: ItemStatus,
}

/// Row shape of the `villas` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub bookings_this_month: u32,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bedrooms: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub bathrooms: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub guests: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub size: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub amenities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(rename = "isBaru", deserialize_with = "null_as_default")]
    pub is_new: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_hot: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            title: record.title,
            location: record.location,
            price: record.price,
            rating: record.rating,
            bookings_this_month: record.bookings_this_month,
            kind: record.kind,
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            guests: record.guests,
            size: record.size,
            description: record.description,
            images: record.images,
            features: record.features,
            amenities: record.amenities,
            status: ItemStatus::from_flags(record.is_featured, record.is_new, record.is_hot),
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        let (is_featured, is_new, is_hot) = item.status.to_flags();
        Self {
            id: Some(item.id),
            title: item.title,
            location: item.location,
            price: item.price,
            rating: item.rating,
            bookings_this_month: item.bookings_this_month,
            kind: item.kind,
            bedrooms: item.bedrooms,
            bathrooms: item.bathrooms,
            guests: item.guests,
            size: item.size,
            description: item.description,
            images: item.images,
            features: item.features,
            amenities: item.amenities,
            is_featured,
            is_new,
            is_hot,
        }
    }
}

/// A stay with `check_out` strictly after `check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self> {
        if check_out <= check_in {
            return Err(VillaError::invalid_range(format!(
                "check-out {} is not after check-in {}",
                check_out, check_in
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn from_nights(check_in: NaiveDate, nights: i64) -> Result<Self> {
        let check_out = crate::core::dates::derive_checkout(Some(check_in), nights)
            .ok_or_else(|| {
                VillaError::invalid_range(format!("{} is not a valid number of nights", nights))
            })?;
        Self::new(check_in, check_out)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> u32 {
        // 建構時已保證 check_out > check_in
        u32::try_from((self.check_out - self.check_in).num_days()).unwrap_or(u32::MAX)
    }
}

/// The site-configuration record (hero carousel images).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteContent {
    #[serde(alias = "intro_images")]
    pub images: Vec<String>,
}

/// General booking form, not tied to a particular villa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingInquiry {
    pub range: DateRange,
    pub adults: u32,
    pub children: u32,
    pub children_ages: Vec<u8>,
    pub notes: Option<String>,
}

const MAX_CHILD_AGE: u8 = 17;

impl Validate for BookingInquiry {
    fn validate(&self) -> Result<()> {
        if self.adults == 0 {
            return Err(VillaError::ValidationError {
                message: "At least one adult is required".to_string(),
            });
        }

        if self.children_ages.len() != self.children as usize {
            return Err(VillaError::ValidationError {
                message: format!(
                    "Expected {} children ages, got {}",
                    self.children,
                    self.children_ages.len()
                ),
            });
        }

        for age in &self.children_ages {
            validate_range("children_ages", *age, 0, MAX_CHILD_AGE)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_flags_collapse_with_precedence() {
        assert_eq!(ItemStatus::from_flags(true, true, true), ItemStatus::Featured);
        assert_eq!(ItemStatus::from_flags(false, true, true), ItemStatus::New);
        assert_eq!(ItemStatus::from_flags(false, false, true), ItemStatus::Hot);
        assert_eq!(ItemStatus::from_flags(false, false, false), ItemStatus::None);
        assert_eq!(ItemStatus::Hot.to_flags(), (false, false, true));
    }

    #[test]
    fn test_item_decodes_backend_row() {
        let row = serde_json::json!({
            "id": 3,
            "title": "Villa Kabut",
            "location": "Puncak, Bogor",
            "price": 1500000,
            "rating": 4.5,
            "bookingsThisMonth": 12,
            "type": "resort",
            "images": ["https://cdn.example.com/a.webp"],
            "features": ["Private Pool"],
            "amenities": null,
            "isFeatured": false,
            "isBaru": true,
            "isHot": true
        });

        let item: Item = serde_json::from_value(row).unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.kind, "resort");
        assert_eq!(item.status, ItemStatus::New);
        assert!(item.amenities.is_empty());
        assert_eq!(item.bedrooms, 0);
    }

    #[test]
    fn test_item_encodes_single_status_flag() {
        let row = serde_json::json!({"id": 1, "title": "A", "isHot": true});
        let item: Item = serde_json::from_value(row).unwrap();
        let encoded = serde_json::to_value(&item).unwrap();
        assert_eq!(encoded["isHot"], true);
        assert_eq!(encoded["isFeatured"], false);
        assert_eq!(encoded["isBaru"], false);
        assert_eq!(encoded["type"], "");
    }

    #[test]
    fn test_date_range_rejects_non_increasing_dates() {
        assert!(DateRange::new(date(2025, 11, 11), date(2025, 11, 11)).is_err());
        assert!(DateRange::new(date(2025, 11, 12), date(2025, 11, 11)).is_err());

        let range = DateRange::new(date(2025, 11, 11), date(2025, 11, 14)).unwrap();
        assert_eq!(range.nights(), 3);
    }

    #[test]
    fn test_inquiry_requires_one_age_per_child() {
        let range = DateRange::new(date(2025, 11, 11), date(2025, 11, 12)).unwrap();
        let mut inquiry = BookingInquiry {
            range,
            adults: 2,
            children: 2,
            children_ages: vec![4],
            notes: None,
        };
        assert!(inquiry.validate().is_err());

        inquiry.children_ages.push(18);
        assert!(inquiry.validate().is_err());

        inquiry.children_ages[1] = 17;
        assert!(inquiry.validate().is_ok());
    }

    #[test]
    fn test_date_range_from_nights() {
        let range = DateRange::from_nights(date(2025, 12, 30), 3).unwrap();
        assert_eq!(range.check_out(), date(2026, 1, 2));
        assert!(DateRange::from_nights(date(2025, 12, 30), 0).is_err());
    }
}
