use clap::Parser;
use villa_booking::config::cli::{AdminAction, Command, FavoritesAction, SessionCommand, StayArgs};
use villa_booking::core::admin::{join_list, ItemDraft};
use villa_booking::core::catalog::{self, badge, browse};
use villa_booking::core::dates::StayCalculator;
use villa_booking::core::{ConfigProvider, FavoritesStorage, ItemRepository};
use villa_booking::utils::error::ErrorSeverity;
use villa_booking::utils::{logger, validation::Validate};
use villa_booking::{
    AdminConsole, BookingInquiry, BookingSession, Cli, DateRange, Destinations, FavoritesStore,
    Item, ItemStatus, JsonFileFavoritesStorage, MemoryFavoritesStorage, MessageComposer,
    RestBackend, SiteConfig, StdoutLinkOpener, VillaError,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting villa-booking");
    tracing::debug!("CLI args: {:?}", cli);

    let config = match SiteConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli, config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,      // 輸入被拒絕
            ErrorSeverity::Medium => 3,   // 後端無法連線
            ErrorSeverity::High => 4,     // 本機檔案問題
            ErrorSeverity::Critical => 1, // 配置錯誤
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: Cli, config: SiteConfig) -> villa_booking::Result<()> {
    let backend = RestBackend::new(&config)?;

    match cli.command {
        Command::Admin { action } => run_admin(backend, &config, action).await,
        Command::Intro => {
            let content = backend.site_content().await?;
            if content.images.is_empty() {
                println!("No intro images configured.");
            }
            for url in content.images {
                println!("{}", url);
            }
            Ok(())
        }
        Command::Session(command) => {
            let items = backend.list_items().await?;
            tracing::info!("Loaded {} villas", items.len());

            if cli.ephemeral {
                run_session(items, MemoryFavoritesStorage::new(), &config, command)
            } else {
                let storage = JsonFileFavoritesStorage::new(config.favorites_path());
                run_session(items, storage, &config, command)
            }
        }
    }
}

fn run_session<S: FavoritesStorage>(
    items: Vec<Item>,
    storage: S,
    config: &SiteConfig,
    command: SessionCommand,
) -> villa_booking::Result<()> {
    let mut session = BookingSession::new(
        items,
        FavoritesStore::load(storage),
        MessageComposer::new(config.message.clone()),
        StdoutLinkOpener,
        Destinations {
            booking: config.booking_number().to_string(),
            inquiry: config.inquiry_number().to_string(),
        },
    );

    match command {
        SessionCommand::List { filter, sort } => {
            for item in browse(session.items(), filter, sort) {
                let favorite = session.favorites().is_favorite(item.id);
                println!("{}", describe(&item, favorite));
            }
        }
        SessionCommand::Featured => match catalog::featured(session.items()) {
            Some(item) => println!("{}", describe(item, session.favorites().is_favorite(item.id))),
            None => println!("No featured villa."),
        },
        SessionCommand::Favorites { action } => match action {
            FavoritesAction::List => {
                let favorites = session.favorite_items();
                if favorites.is_empty() {
                    println!("Your favorites list is empty.");
                }
                for item in favorites {
                    println!("{}", describe(&item, true));
                }
            }
            FavoritesAction::Toggle { id } => {
                let added = session.toggle_favorite(id);
                let verb = if added { "Added" } else { "Removed" };
                println!(
                    "{} villa #{} ({} favorites)",
                    verb,
                    id,
                    session.favorites().count()
                );
                if !session.favorites().is_persistent() {
                    tracing::warn!("Favorites are not being saved for this session");
                }
            }
        },
        SessionCommand::Send { id, stay } => {
            ensure_not_past(stay.check_in)?;
            session.contact_item(id)?;
            session.submit_dates(Some(stay.check_in), stay.resolved_check_out())?;
            session.send()?;
        }
        SessionCommand::SendAll { stay } => {
            ensure_not_past(stay.check_in)?;
            session.contact_all_favorites()?;
            session.submit_dates(Some(stay.check_in), stay.resolved_check_out())?;
            session.send()?;
        }
        SessionCommand::Inquiry {
            stay,
            adults,
            children,
            children_ages,
            notes,
        } => {
            ensure_not_past(stay.check_in)?;
            let inquiry = BookingInquiry {
                range: inquiry_range(&stay)?,
                adults,
                children,
                children_ages,
                notes,
            };
            session.send_inquiry(&inquiry)?;
        }
    }

    Ok(())
}

async fn run_admin(
    backend: RestBackend,
    config: &SiteConfig,
    action: AdminAction,
) -> villa_booking::Result<()> {
    let mut console = AdminConsole::new(backend, config.image_bucket());
    console.refresh().await?;

    match action {
        AdminAction::Search { query, tab } => {
            for item in catalog::search(console.items(), &query, tab) {
                let status = item.status.label().unwrap_or("-");
                println!(
                    "#{} {} | {} | Rating {} | Price {} | {} | Booked {}",
                    item.id,
                    item.title,
                    item.location,
                    item.rating,
                    catalog::format_price(item.price),
                    status,
                    item.bookings_this_month
                );
            }
        }
        AdminAction::Add { fields } => {
            if fields.status == Some(ItemStatus::Featured) {
                return Err(VillaError::ValidationError {
                    message: "Add the villa first, then run `admin promote <id>`".to_string(),
                });
            }
            let mut draft = ItemDraft::default();
            fields.apply(&mut draft);
            console.save(&draft).await?;
            println!("Added {}", summarize(&draft));
        }
        AdminAction::Edit { id, fields } => {
            let mut draft = draft_for(&console, id)?;
            fields.apply(&mut draft);
            console.save(&draft).await?;
            // 保持只有一間 Featured
            if draft.status == ItemStatus::Featured {
                console.promote(id).await?;
            }
            println!("Updated villa #{}: {}", id, summarize(&draft));
        }
        AdminAction::Promote { id } => {
            console.promote(id).await?;
            println!("Villa #{} is now featured.", id);
        }
        AdminAction::Status { id, status } => {
            if status == ItemStatus::Featured {
                console.promote(id).await?;
            } else {
                let mut draft = draft_for(&console, id)?;
                draft.status = status;
                console.save(&draft).await?;
            }
            println!("Villa #{} status set to {:?}.", id, status);
        }
        AdminAction::RemoveImage { id, url } => {
            let mut draft = draft_for(&console, id)?;
            let before = draft.images.len();
            draft.images.retain(|image| image != &url);
            if draft.images.len() == before {
                return Err(VillaError::ValidationError {
                    message: format!("Villa #{} has no image {}", id, url),
                });
            }
            console.save(&draft).await?;
            println!("Removed image from villa #{}.", id);
        }
        AdminAction::Delete { id } => {
            console.delete(id).await?;
            println!("Deleted villa #{}.", id);
        }
    }

    Ok(())
}

fn draft_for(console: &AdminConsole<RestBackend>, id: i64) -> villa_booking::Result<ItemDraft> {
    console
        .items()
        .iter()
        .find(|item| item.id == id)
        .map(ItemDraft::from_item)
        .ok_or(VillaError::ItemNotFound { id })
}

fn inquiry_range(stay: &StayArgs) -> villa_booking::Result<DateRange> {
    if let Some(check_out) = stay.check_out {
        return DateRange::new(stay.check_in, check_out);
    }

    let mut calculator = StayCalculator::new();
    calculator.set_check_in(Some(stay.check_in));
    calculator.set_nights(stay.nights);
    calculator
        .range()
        .ok_or_else(|| VillaError::invalid_range("provide --check-out or a positive --nights"))
}

/// The date picker on the site refuses past dates; so do we.
fn ensure_not_past(check_in: chrono::NaiveDate) -> villa_booking::Result<()> {
    let today = chrono::Local::now().date_naive();
    if check_in < today {
        return Err(VillaError::invalid_range(format!(
            "check-in {} is in the past",
            check_in
        )));
    }
    Ok(())
}

fn describe(item: &Item, favorite: bool) -> String {
    let mut line = format!(
        "#{} {} | {} | Rating {} | Starts From {}/Malam",
        item.id,
        item.title,
        item.location,
        item.rating,
        catalog::format_price(item.price)
    );
    if let Some(badge) = badge(item) {
        line.push_str(&format!(" [{}]", badge.label()));
    }
    if favorite {
        line.push_str(" ♥");
    }
    line
}

fn summarize(draft: &ItemDraft) -> String {
    format!(
        "'{}' | features: {} | amenities: {} | {} image(s)",
        draft.title.trim(),
        join_list(&draft.features),
        join_list(&draft.amenities),
        draft.images.len()
    )
}
