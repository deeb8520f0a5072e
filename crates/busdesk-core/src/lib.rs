pub mod agency;
pub mod app_config;
pub mod completion;
pub mod config;
pub mod contact;
pub mod draft;
pub mod error;
pub mod files;

pub use agency::AgencyProfile;
pub use app_config::{AppConfig, Environment};
pub use completion::{CompletionStatus, Requirement, RequirementStatus};
pub use config::{load_app_config, load_app_config_from_env};
pub use contact::{ContactEntry, ContactKind, Coordinates, EntryId, PaymentMethod, PaymentProvider};
pub use draft::{AgencyDraft, AgencyPatch, Draft, StationDraft, StationPatch};
pub use error::{ConfigError, CoreError};
pub use files::PendingFile;
