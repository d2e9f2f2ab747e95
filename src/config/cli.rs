use crate::core::admin::{parse_list, ItemDraft};
use crate::core::catalog::{AdminTab, CatalogFilter, SortOrder};
use crate::core::dates::derive_checkout;
use crate::domain::model::{ItemId, ItemStatus};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "villa-booking")]
#[command(about = "Browse villas, keep favorites and send WhatsApp booking requests")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "villa.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Keep favorites in memory only")]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Session(SessionCommand),
    /// Show the intro carousel images
    Intro,
    /// Dashboard operations
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

/// Commands that run against the visitor's session.
#[derive(Debug, Clone, Subcommand)]
pub enum SessionCommand {
    /// List villas
    List {
        #[arg(long, value_enum, default_value_t = CatalogFilter::All)]
        filter: CatalogFilter,
        #[arg(long, value_enum, default_value_t = SortOrder::Default)]
        sort: SortOrder,
    },
    /// Show the featured villa
    Featured,
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Send one villa to WhatsApp
    Send {
        id: ItemId,
        #[command(flatten)]
        stay: StayArgs,
    },
    /// Send every favorite villa to WhatsApp
    SendAll {
        #[command(flatten)]
        stay: StayArgs,
    },
    /// Send a general booking inquiry
    Inquiry {
        #[command(flatten)]
        stay: StayArgs,
        #[arg(long, default_value = "1")]
        adults: u32,
        #[arg(long, default_value = "0")]
        children: u32,
        /// One per child, e.g. --child-age 4 --child-age 9
        #[arg(long = "child-age")]
        children_ages: Vec<u8>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum FavoritesAction {
    List,
    Toggle { id: ItemId },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AdminAction {
    /// Search by title or location
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long, value_enum, default_value_t = AdminTab::All)]
        tab: AdminTab,
    },
    /// Add a new villa
    Add {
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Edit a villa; fields not given keep their current value
    Edit {
        id: ItemId,
        #[command(flatten)]
        fields: ItemFields,
    },
    /// Make a villa the only featured one
    Promote { id: ItemId },
    /// Change a villa's status
    Status {
        id: ItemId,
        #[arg(value_enum)]
        status: ItemStatus,
    },
    /// Drop an image from a villa and clean up the bucket
    RemoveImage { id: ItemId, url: String },
    /// Delete a villa and its unused images
    Delete { id: ItemId },
}

/// Villa form fields. List fields take comma separated values.
#[derive(Debug, Clone, Default, Args)]
pub struct ItemFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Price per night
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub rating: Option<f64>,
    #[arg(long = "bookings")]
    pub bookings_this_month: Option<u32>,
    /// `resort` or `outside`
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub bedrooms: Option<u32>,
    #[arg(long)]
    pub bathrooms: Option<u32>,
    #[arg(long)]
    pub guests: Option<u32>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// e.g. "Private Pool, BBQ"
    #[arg(long)]
    pub features: Option<String>,
    #[arg(long)]
    pub amenities: Option<String>,
    /// Image URLs
    #[arg(long)]
    pub images: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<ItemStatus>,
}

impl ItemFields {
    /// Overwrite the fields that were given on the command line.
    pub fn apply(&self, draft: &mut ItemDraft) {
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }
        if let Some(location) = &self.location {
            draft.location = location.clone();
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
        if let Some(bookings) = self.bookings_this_month {
            draft.bookings_this_month = bookings;
        }
        if let Some(kind) = &self.kind {
            draft.kind = kind.trim().to_string();
        }
        if let Some(bedrooms) = self.bedrooms {
            draft.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            draft.bathrooms = bathrooms;
        }
        if let Some(guests) = self.guests {
            draft.guests = guests;
        }
        if let Some(size) = &self.size {
            draft.size = size.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(features) = &self.features {
            draft.features = parse_list(features);
        }
        if let Some(amenities) = &self.amenities {
            draft.amenities = parse_list(amenities);
        }
        if let Some(images) = &self.images {
            draft.images = parse_list(images);
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct StayArgs {
    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: NaiveDate,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "nights")]
    pub check_out: Option<NaiveDate>,

    /// Number of nights; check-out is derived
    #[arg(long)]
    pub nights: Option<i64>,
}

impl StayArgs {
    /// Explicit check-out, or the one derived from `--nights`.
    pub fn resolved_check_out(&self) -> Option<NaiveDate> {
        self.check_out.or_else(|| {
            self.nights
                .and_then(|nights| derive_checkout(Some(self.check_in), nights))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_with_nights() {
        let cli = Cli::parse_from([
            "villa-booking",
            "send",
            "3",
            "--check-in",
            "2025-11-11",
            "--nights",
            "3",
        ]);

        match cli.command {
            Command::Session(SessionCommand::Send { id, stay }) => {
                assert_eq!(id, 3);
                assert_eq!(stay.resolved_check_out(), NaiveDate::from_ymd_opt(2025, 11, 14));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_out_conflicts_with_nights() {
        let result = Cli::try_parse_from([
            "villa-booking",
            "send-all",
            "--check-in",
            "2025-11-11",
            "--check-out",
            "2025-11-12",
            "--nights",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_options() {
        let cli = Cli::parse_from([
            "villa-booking",
            "--ephemeral",
            "list",
            "--filter",
            "private-pool",
            "--sort",
            "price-desc",
        ]);
        assert!(cli.ephemeral);
        assert!(matches!(
            cli.command,
            Command::Session(SessionCommand::List {
                filter: CatalogFilter::PrivatePool,
                sort: SortOrder::PriceDesc
            })
        ));
    }

    #[test]
    fn test_parse_admin_add_form() {
        let cli = Cli::parse_from([
            "villa-booking",
            "admin",
            "add",
            "--title",
            "Villa Embun",
            "--price",
            "1250000",
            "--type",
            "resort",
            "--features",
            "Private Pool, BBQ,,",
            "--status",
            "hot",
        ]);

        let fields = match cli.command {
            Command::Admin {
                action: AdminAction::Add { fields },
            } => fields,
            other => panic!("unexpected command: {other:?}"),
        };

        let mut draft = ItemDraft::default();
        fields.apply(&mut draft);
        assert_eq!(draft.title, "Villa Embun");
        assert_eq!(draft.price, 1_250_000.0);
        assert_eq!(draft.kind, "resort");
        assert_eq!(draft.features, vec!["Private Pool", "BBQ"]);
        assert_eq!(draft.status, ItemStatus::Hot);
        assert!(draft.images.is_empty());
    }

    #[test]
    fn test_edit_keeps_fields_not_given() {
        let cli = Cli::parse_from(["villa-booking", "admin", "edit", "7", "--rating", "4.9"]);

        let (id, fields) = match cli.command {
            Command::Admin {
                action: AdminAction::Edit { id, fields },
            } => (id, fields),
            other => panic!("unexpected command: {other:?}"),
        };
        assert_eq!(id, 7);

        let mut draft = ItemDraft {
            id: Some(7),
            title: "Villa Kabut".to_string(),
            rating: 4.5,
            features: vec!["WiFi".to_string()],
            ..ItemDraft::default()
        };
        fields.apply(&mut draft);
        assert_eq!(draft.rating, 4.9);
        assert_eq!(draft.title, "Villa Kabut");
        assert_eq!(draft.features, vec!["WiFi"]);
    }

    #[test]
    fn test_intro_is_not_a_session_command() {
        let cli = Cli::parse_from(["villa-booking", "intro"]);
        assert!(matches!(cli.command, Command::Intro));
    }
}
