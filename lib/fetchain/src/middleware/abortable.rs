//! Cancellation.

use crate::{AbortController, Middleware, from_fn};

/// Attach `controller`'s signal; aborting it fails the transport call.
///
/// ```ignore
/// let controller = AbortController::new();
/// let timer = controller.clone();
/// tokio::spawn(async move {
///     tokio::time::sleep(Duration::from_millis(500)).await;
///     timer.abort();
/// });
/// api.call(chain![abortable(&controller)]).await?;
/// ```
pub fn abortable(controller: &AbortController) -> impl Middleware {
    let signal = controller.signal();
    from_fn(move |ctx, next| {
        ctx.set_signal(signal.clone());
        next.run(ctx)
    })
}
