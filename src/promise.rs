use std::future::Future;

use toastline_util::{ToastDuration, ToastKind, ToastRequest};
use tracing::debug;

use crate::manager::ToastManager;

/// How a terminal toast's content is produced: a fixed string, a prepared
/// request, or a function of the operation's outcome
pub enum MessageSpec<A> {
    Text(String),
    Request(ToastRequest),
    With(Box<dyn FnOnce(&A) -> ToastRequest + Send>),
}

impl<A> MessageSpec<A> {
    /// Late-bound content computed from the resolved value or error
    pub fn with(f: impl FnOnce(&A) -> ToastRequest + Send + 'static) -> Self {
        MessageSpec::With(Box::new(f))
    }

    fn resolve(self, value: &A) -> ToastRequest {
        match self {
            MessageSpec::Text(message) => ToastRequest::new(message),
            MessageSpec::Request(request) => request,
            MessageSpec::With(f) => f(value),
        }
    }
}

impl<A> From<&str> for MessageSpec<A> {
    fn from(message: &str) -> Self {
        MessageSpec::Text(message.to_string())
    }
}

impl<A> From<String> for MessageSpec<A> {
    fn from(message: String) -> Self {
        MessageSpec::Text(message)
    }
}

impl<A> From<ToastRequest> for MessageSpec<A> {
    fn from(request: ToastRequest) -> Self {
        MessageSpec::Request(request)
    }
}

/// The three message slots driven by [`handle_promise`]
pub struct PromiseToasts<T, E> {
    pub loading: ToastRequest,
    pub success: MessageSpec<T>,
    pub error: MessageSpec<E>,
}

impl<T, E> PromiseToasts<T, E> {
    pub fn new(
        loading: impl Into<ToastRequest>,
        success: impl Into<MessageSpec<T>>,
        error: impl Into<MessageSpec<E>>,
    ) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error: error.into(),
        }
    }
}

/// Drive one toast through loading → success/error in lockstep with the
/// given operation.
///
/// The loading toast is forced permanent so it cannot expire mid-operation.
/// On completion it is dismissed and replaced by a success or error toast;
/// the operation's own `Result` is returned unchanged, so a failure still
/// reaches the caller after the error toast is shown.
pub async fn handle_promise<T, E, F>(
    manager: &ToastManager,
    operation: F,
    toasts: PromiseToasts<T, E>,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let mut loading = toasts.loading;
    loading.duration = ToastDuration::Permanent;
    let loading_id = manager.show(loading).id().cloned();

    let result = operation.await;

    if let Some(id) = &loading_id {
        manager.dismiss(id);
    }

    match &result {
        Ok(value) => {
            let mut request = toasts.success.resolve(value);
            request.kind = ToastKind::Success;
            debug!("operation resolved, showing success toast");
            manager.show(request);
        }
        Err(err) => {
            let mut request = toasts.error.resolve(err);
            request.kind = ToastKind::Error;
            debug!("operation failed, showing error toast");
            manager.show(request);
        }
    }

    result
}
