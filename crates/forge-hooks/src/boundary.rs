//! The fail-silent boundary.
//!
//! Every hook entry point runs inside [`run_fail_silent`]. It is the only
//! place errors and panics stop; nothing past it ever reaches the host.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::errors::HookError;
use crate::types::{HookOutcome, HookType};

/// Run one hook, logging its outcome. Errors and panics are logged and
/// swallowed; the return value is `None` in both cases.
pub async fn run_fail_silent<T, F>(hook: HookType, hook_future: F) -> Option<HookOutcome<T>>
where
    F: Future<Output = Result<HookOutcome<T>, HookError>>,
{
    let span = info_span!("hook", hook = %hook);
    let result = AssertUnwindSafe(hook_future)
        .catch_unwind()
        .instrument(span.clone())
        .await;

    let _guard = span.enter();
    let error = match result {
        Ok(Ok(outcome)) => {
            match outcome.skip_reason() {
                None => info!("hook completed"),
                Some(reason) => debug!(%reason, "hook skipped"),
            }
            return Some(outcome);
        }
        Ok(Err(error)) => error,
        Err(payload) => HookError::Panicked(panic_message(payload.as_ref())),
    };

    if matches!(error, HookError::Panicked(_)) {
        error!(error = %error, "hook aborted");
    } else {
        warn!(error = %error, "hook failed");
    }
    None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
