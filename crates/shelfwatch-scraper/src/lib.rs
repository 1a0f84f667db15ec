pub mod adapter;
pub mod browser;
pub mod error;
pub mod extract;
pub mod money;
pub mod platforms;
mod retry;
pub mod site;

pub use adapter::{AdapterRegistry, PlatformAdapter};
pub use browser::{BrowserSession, CapturedResponse, ResponseInterceptor};
pub use error::ScrapeError;
pub use extract::assemble_records;
pub use platforms::ParsedListing;
pub use site::{SiteAdapter, SiteProfile};
