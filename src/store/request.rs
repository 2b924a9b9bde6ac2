//! Request State
//!
//! Tracks the last network operation of a store slice.

use gloo_timers::future::TimeoutFuture;

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Requested,
    Success,
    Error,
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        *self == RequestState::Requested
    }

    /// State after a failed call; a call cut off by logout leaves nothing to report
    pub fn failed(err: &ApiError) -> Self {
        match err {
            ApiError::Cancelled => RequestState::Idle,
            _ => RequestState::Error,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            RequestState::Idle => "request-idle",
            RequestState::Requested => "request-pending",
            RequestState::Success => "request-success",
            RequestState::Error => "request-error",
        }
    }
}

/// Wait `ms` milliseconds, then run `reset`
///
/// The only path back to `Idle`; callers check the state is still the
/// one they want to clear.
pub async fn reset_after(ms: u32, reset: impl FnOnce()) {
    TimeoutFuture::new(ms).await;
    reset();
}
