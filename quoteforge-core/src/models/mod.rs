//! Domain payload types.
//!
//! Each type here is the payload of one sync-store domain: the business
//! profile, the working basket, the saved-quote history, quote settings,
//! and per-service price overrides.

mod basket;
mod overrides;
mod profile;
mod quote;
mod settings;

pub use basket::{Basket, Extra, LineItem};
pub use overrides::PriceOverrides;
pub use profile::BusinessProfile;
pub use quote::{CustomerInfo, ExportMethod, QuoteHistory, QuoteStatus, SavedQuote, Totals, TAX_RATE};
pub use settings::QuoteSettings;
