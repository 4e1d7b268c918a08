//! One async contract, two delivery channels.
//!
//! Every imaging operation first *prepares* its work synchronously (argument
//! validation, envelope construction) into a `Result<Pending<T>, ImagingError>`
//! and then hands it to [`deliver`], which picks the channel:
//!
//! * no callback: the caller gets the future back. A preparation failure is an
//!   already-settled failed future.
//! * callback: the caller gets `None`. A preparation failure reaches the
//!   callback before `deliver` returns; otherwise the future is spawned on the
//!   current Tokio runtime and the callback receives its output.
//!
//! Either way the outcome is delivered exactly once.

use crate::errors::ImagingError;
use futures::future::{self, BoxFuture, FutureExt};
use log::{debug, warn};
use tokio::runtime::Handle;

/// Deferred outcome of an imaging operation.
pub type Pending<T> = BoxFuture<'static, Result<T, ImagingError>>;

/// Completion handler, the callback flavour of [`Pending`].
pub type Completion<T> = Box<dyn FnOnce(Result<T, ImagingError>) + Send + 'static>;

/// What a public operation hands back: the future, or `None` once the
/// outcome has been routed into a callback.
pub type Dispatched<T> = Option<Pending<T>>;

/// Boxes a closure as a [`Completion`].
pub fn completion<T, F>(f: F) -> Completion<T>
where
    F: FnOnce(Result<T, ImagingError>) + Send + 'static,
{
    Box::new(f)
}

pub fn deliver<T>(
    operation: &'static str,
    prepared: Result<Pending<T>, ImagingError>,
    callback: Option<Completion<T>>,
) -> Dispatched<T>
where
    T: Send + 'static,
{
    let Some(callback) = callback else {
        return Some(prepared.unwrap_or_else(|e| future::ready(Err(e)).boxed()));
    };

    match prepared {
        Err(e) => {
            debug!("{} rejected before dispatch: {}", operation, e);
            callback(Err(e));
        }
        Ok(pending) => match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { callback(pending.await) });
            }
            Err(_) => {
                warn!("⚠️ {} called with a callback outside of a Tokio runtime", operation);
                callback(Err(ImagingError::NoRuntime { operation }));
            }
        },
    }
    None
}
