mod artwork;
mod auth;
mod lyrics;
mod secret;

pub use artwork::ArtworkResolver;
pub use artwork::ArtworkSource;
pub use artwork::FALLBACK_ORDER;
pub use auth::TokenManager;
pub use lyrics::LyricsFetcher;
pub use secret::SecretStore;
