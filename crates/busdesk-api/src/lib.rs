pub mod agency;
pub mod client;
pub mod error;
pub mod profile;
pub mod station;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use profile::{AgencyProfileStore, FileProfileCache, MemoryProfileCache, ProfileCache};
pub use types::{AgencyMe, CachedProfile};
