pub mod model;
pub mod remote;
pub mod sync;

pub use model::{PartialSiteContent, SiteContent};
pub use sync::{ContentSource, ContentSync, SyncState, SITE_CONTENT_KEY};
