//! Application configuration.
//!
//! [`AppConfig`] holds the plain, serializable switches and can be loaded
//! from JSON. [`AppOption`] values are one-shot adjustments applied by
//! [`AppBuilder::build`](crate::AppBuilder::build), and are the only way
//! to install the fallback and panic handlers.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{Context, Handler};
use crate::error::ConfigError;

/// Idle contexts kept for reuse unless configured otherwise.
pub const DEFAULT_MAX_IDLE_CONTEXTS: usize = 1024;

/// Dispatcher switches.
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes:
///
/// ```
/// use gweb_core::AppConfig;
///
/// let config = AppConfig::from_json(r#"{"redirect_fixed_path": false}"#).unwrap();
/// assert!(!config.redirect_fixed_path);
/// assert!(config.redirect_trailing_slash);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Name used in log events.
    pub name: String,
    /// Redirect `/foo/` to `/foo` (or the reverse) when only the other
    /// spelling is registered.
    pub redirect_trailing_slash: bool,
    /// Redirect to a cleaned, case-corrected path when one is registered.
    pub redirect_fixed_path: bool,
    /// Answer `OPTIONS` requests with an `Allow` header automatically.
    pub handle_options: bool,
    /// Answer `405` when another method matches the path.
    pub handle_method_not_allowed: bool,
    /// Upper bound on pooled idle contexts.
    pub max_idle_contexts: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "gweb".to_owned(),
            redirect_trailing_slash: true,
            redirect_fixed_path: true,
            handle_options: true,
            handle_method_not_allowed: true,
            max_idle_contexts: DEFAULT_MAX_IDLE_CONTEXTS,
        }
    }
}

impl AppConfig {
    /// The default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Name reported in logs.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Redirect to the path with the trailing slash toggled when only that variant is routed.
    #[must_use]
    pub fn redirect_trailing_slash(mut self, enabled: bool) -> Self {
        self.redirect_trailing_slash = enabled;
        self
    }

    /// Redirect to the cleaned, case-corrected path when it is routed.
    #[must_use]
    pub fn redirect_fixed_path(mut self, enabled: bool) -> Self {
        self.redirect_fixed_path = enabled;
        self
    }

    /// Answer `OPTIONS` requests with the allowed methods.
    #[must_use]
    pub fn handle_options(mut self, enabled: bool) -> Self {
        self.handle_options = enabled;
        self
    }

    /// Answer `405` when the path is routed for other methods.
    #[must_use]
    pub fn handle_method_not_allowed(mut self, enabled: bool) -> Self {
        self.handle_method_not_allowed = enabled;
        self
    }

    /// Idle contexts kept for reuse.
    #[must_use]
    pub fn max_idle_contexts(mut self, max: usize) -> Self {
        self.max_idle_contexts = max;
        self
    }
}

/// Called with the context and the payload of a panic raised by a handler.
pub type PanicHandler = Arc<dyn Fn(&mut Context, &(dyn Any + Send)) + Send + Sync>;

/// Everything [`AppOption`]s can change.
#[derive(Default)]
pub(crate) struct Settings {
    pub(crate) config: AppConfig,
    pub(crate) method_not_allowed: Option<Handler>,
    pub(crate) not_found: Option<Handler>,
    pub(crate) panic_handler: Option<PanicHandler>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("config", &self.config)
            .field("method_not_allowed", &self.method_not_allowed.is_some())
            .field("not_found", &self.not_found.is_some())
            .field("panic_handler", &self.panic_handler.is_some())
            .finish()
    }
}

/// A configuration adjustment applied once when the app is built.
///
/// Options run in the order they were added, after the builder's
/// [`AppConfig`] is in place, so a later option wins.
pub struct AppOption(Box<dyn FnOnce(&mut Settings) + Send>);

impl AppOption {
    fn new(f: impl FnOnce(&mut Settings) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub(crate) fn apply(self, settings: &mut Settings) {
        (self.0)(settings);
    }

    /// Set the app name.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |s| s.config.name = name)
    }

    /// Toggle trailing-slash redirects.
    #[must_use]
    pub fn redirect_trailing_slash(enabled: bool) -> Self {
        Self::new(move |s| s.config.redirect_trailing_slash = enabled)
    }

    /// Toggle cleaned, case-corrected path redirects.
    #[must_use]
    pub fn redirect_fixed_path(enabled: bool) -> Self {
        Self::new(move |s| s.config.redirect_fixed_path = enabled)
    }

    /// Toggle automatic `OPTIONS` replies.
    #[must_use]
    pub fn handle_options(enabled: bool) -> Self {
        Self::new(move |s| s.config.handle_options = enabled)
    }

    /// Turn `405` handling on or off.
    ///
    /// When enabled, `handler` replaces the plain-text default if given.
    /// Disabling also drops any handler installed earlier.
    #[must_use]
    pub fn method_not_allowed(enabled: bool, handler: Option<Handler>) -> Self {
        Self::new(move |s| {
            s.config.handle_method_not_allowed = enabled;
            s.method_not_allowed = if enabled { handler } else { None };
        })
    }

    /// Handler for requests no route accepts.
    #[must_use]
    pub fn not_found(handler: impl Into<Handler>) -> Self {
        let handler = handler.into();
        Self::new(move |s| s.not_found = Some(handler))
    }

    /// Recover from handler panics instead of propagating them.
    #[must_use]
    pub fn panic_handler<F>(f: F) -> Self
    where
        F: Fn(&mut Context, &(dyn Any + Send)) + Send + Sync + 'static,
    {
        let handler: PanicHandler = Arc::new(f);
        Self::new(move |s| s.panic_handler = Some(handler))
    }
}

impl fmt::Debug for AppOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppOption").finish_non_exhaustive()
    }
}
