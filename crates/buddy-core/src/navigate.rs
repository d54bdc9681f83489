//! Navigation port.
//!
//! After a successful submission the surrounding view re-fetches its
//! server-derived data and then returns to the home route.

/// Route the form returns to after a successful save.
pub const HOME_ROUTE: &str = "/";

/// Router collaborator. Never invoked on failure.
pub trait Navigator: Send + Sync {
    /// Force the current view to re-fetch server data.
    fn refresh(&self);

    /// Navigate to `path`.
    fn push(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for std::sync::Arc<N> {
    fn refresh(&self) {
        (**self).refresh()
    }

    fn push(&self, path: &str) {
        (**self).push(path)
    }
}
