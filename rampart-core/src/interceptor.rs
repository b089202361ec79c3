// Interceptors that run before a handler is invoked

use crate::{Error, HttpResponse, SessionHandle};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// One handler call as seen by interceptors.
///
/// Arguments are the already deserialised handler parameters in declaration
/// order. `null` stands for an absent value.
pub struct Invocation<'a> {
    /// Stable handler identifier, e.g. `"UserController::login"`
    pub handler: &'a str,
    pub args: &'a [Value],
    pub session: &'a dyn SessionHandle,
}

impl<'a> Invocation<'a> {
    pub fn new(handler: &'a str, args: &'a [Value], session: &'a dyn SessionHandle) -> Self {
        Self {
            handler,
            args,
            session,
        }
    }
}

/// Runs before the handler and may reject the call.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn before(&self, invocation: &Invocation<'_>) -> Result<(), Error>;
}

/// Ordered interceptors placed in front of every handler.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run every interceptor, then the handler. The handler is not called
    /// if any interceptor fails.
    pub async fn dispatch<F, Fut, T>(
        &self,
        invocation: &Invocation<'_>,
        handler: F,
    ) -> Result<T, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        for interceptor in &self.interceptors {
            interceptor.before(invocation).await?;
        }
        handler().await
    }

    /// Like [`dispatch`](Self::dispatch) but errors become error responses.
    pub async fn respond<F, Fut>(&self, invocation: &Invocation<'_>, handler: F) -> HttpResponse
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<HttpResponse, Error>>,
    {
        match self.dispatch(invocation, handler).await {
            Ok(response) => response,
            Err(error) => error.to_response(),
        }
    }
}
