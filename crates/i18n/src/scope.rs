//! Request-scoped active locale.
//!
//! [`scope`] makes a locale active for exactly the lifetime of one future.
//! When the future completes, fails, or is dropped, whatever locale was
//! active before (an outer scope, or none) is active again.

use std::future::Future;

use crate::locale::Locale;

tokio::task_local! {
    static ACTIVE_LOCALE: Locale;
}

/// Run `fut` with `locale` active.
pub async fn scope<F>(locale: Locale, fut: F) -> F::Output
where
    F: Future,
{
    ACTIVE_LOCALE.scope(locale, fut).await
}

/// Run a synchronous closure with `locale` active.
pub fn sync_scope<R>(locale: Locale, f: impl FnOnce() -> R) -> R {
    ACTIVE_LOCALE.sync_scope(locale, f)
}

/// The active locale, or [`Locale::default`] outside any scope.
pub fn current() -> Locale {
    ACTIVE_LOCALE.try_with(|l| *l).unwrap_or_default()
}
