#[cfg(feature = "cli")]
pub mod cli;
pub mod site_config;

#[cfg(feature = "cli")]
pub use cli::Cli;
pub use site_config::SiteConfig;
