//! Core types - pure abstractions shared across the codebase.

mod category;
mod locale;
mod site;
mod state;
mod url;

pub use category::{CategoryClass, DocumentCategory, SingletonKind, UnknownCategory};
pub use locale::{Locale, LocaleError, LocaleSet};
pub use site::{IndexPolicy, RoutePolicy, Site};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
pub use url::CanonicalPath;
