//! QuoteForge Core Library
//!
//! Domain models, the local-first sync store, and the quote export
//! pipeline shared by QuoteForge applications.

pub mod export;
pub mod models;
pub mod store;

pub use export::{
    assemble_pdf, build_content, render_binary, render_printable, Bitmap, ExportError,
    QuoteContent, QuoteSnapshot, Rasterizer, DEFAULT_VALIDITY_DAYS,
};
pub use models::{
    Basket, BusinessProfile, CustomerInfo, Extra, ExportMethod, LineItem, PriceOverrides,
    QuoteHistory, QuoteSettings, QuoteStatus, SavedQuote, Totals, TAX_RATE,
};
pub use store::{
    Advisory, CacheError, Domain, DomainPayload, FileCache, HttpRemoteStore, LocalCache, Owner,
    RemoteError, RemoteStore, SyncStore,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
