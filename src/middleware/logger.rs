//! LoggerMiddleware - logs every dispatched action

use crate::core::Action;
use crate::middleware::{Middleware, MiddlewareApi};
use crate::store::{Dispatch, DispatchResult};
use chrono::Utc;
use log::Level;
use std::fmt::Debug;

/// Logs each action with its timestamp and duration, and optionally the
/// state before and after it. Failed dispatches are logged as errors.
///
/// Nothing is printed unless the application installs a `log` backend.
#[derive(Clone, Debug)]
pub struct LoggerMiddleware {
    level: Level,
    log_state: bool,
}

impl LoggerMiddleware {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for LoggerMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Middleware<S> for LoggerMiddleware
where
    S: Clone + Debug + Send + Sync + 'static,
{
    fn handle(&self, api: &MiddlewareApi<S>, next: &Dispatch, action: Action) -> DispatchResult {
        if !log::log_enabled!(self.level) {
            return next(action);
        }

        let started = Utc::now();
        let title = format!("{} @ {}", action.action_type(), started.format("%H:%M:%S%.3f"));
        let previous = self.log_state.then(|| api.get_state().ok()).flatten();
        log::log!(self.level, "action {title} {}", action.to_value());

        let result = next(action);
        let elapsed = Utc::now().signed_duration_since(started);

        match &result {
            Ok(_) => {
                log::log!(
                    self.level,
                    "action {title} done in {:.3} ms",
                    elapsed.num_microseconds().unwrap_or(i64::MAX) as f64 / 1000.0
                );
                if let Some(previous) = previous {
                    log::log!(self.level, "  prev state {previous:?}");
                    match api.get_state() {
                        Ok(next_state) => log::log!(self.level, "  next state {next_state:?}"),
                        Err(error) => log::log!(self.level, "  next state unavailable: {error}"),
                    }
                }
            }
            Err(error) => log::error!("action {title} failed: {error}"),
        }

        result
    }
}

/// Builder for [`LoggerMiddleware`].
#[derive(Clone, Debug)]
pub struct LoggerBuilder {
    level: Level,
    log_state: bool,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            level: Level::Debug,
            log_state: true,
        }
    }

    /// Level used for action and state lines. Failures always log at `Error`.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Whether to log the state before and after each action.
    pub fn log_state(mut self, enabled: bool) -> Self {
        self.log_state = enabled;
        self
    }

    pub fn build(self) -> LoggerMiddleware {
        LoggerMiddleware {
            level: self.level,
            log_state: self.log_state,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
