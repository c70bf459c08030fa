//! `storefront-i18n` — locales, message catalogs, and the request-scoped
//! active locale.
//!
//! User-facing text is looked up with [`t`] / [`t_with`], which read the
//! locale made active by [`scope`]. The active locale lives in a tokio
//! task-local, so it is bound to one request future and can never leak into
//! another request.

pub mod catalog;
pub mod locale;
pub mod scope;

pub use catalog::{t, t_with, translate};
pub use locale::{Locale, ParseLocaleError, SUPPORTED_LOCALES};
pub use scope::{current, scope, sync_scope};
