//! Configuration section definitions.
//!
//! Each module corresponds to a section in `lanes.toml`:
//!
//! | Module      | TOML Section    | Purpose                              |
//! |-------------|-----------------|--------------------------------------|
//! | `i18n`      | `[i18n]`        | Supported and default locales        |
//! | `ratelimit` | `[ratelimit]`   | Refresh endpoint rate limit          |
//! | `refresh`   | `[refresh]`     | Refresh secret and allow-list        |
//! | `routes`    | `[routes]`      | Listing paths, site index membership |
//! | `serve`     | `[serve]`       | Hook server                          |
//! | `site`      | `[site]`        | Base URL                             |

mod i18n;
mod ratelimit;
mod refresh;
mod routes;
mod serve;
mod site;

pub use i18n::I18nConfig;
pub use ratelimit::RateLimitConfig;
pub use refresh::RefreshConfig;
pub use routes::{IndexConfig, RoutesConfig};
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
