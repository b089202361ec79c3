// Interceptor validating handler arguments before the handler runs

use crate::{Evaluate, ParameterScanner, RegistryError, RuleError, RuleEvaluator, RuleRegistry};
use async_trait::async_trait;
use rampart_config::Settings;
use rampart_core::{Error, Interceptor, Invocation, LoginGuard};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// Stage of one intercepted call, attached to log events as `phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scanning,
    Evaluating,
    Passed,
    Rejected,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Scanning => "scanning",
            Phase::Evaluating => "evaluating",
            Phase::Passed => "passed",
            Phase::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates every rule registered for the invoked handler, then checks the
/// handler's login requirement.
///
/// Rules are evaluated in scan order and evaluation stops at the first
/// failure. The session is only read once all parameters are valid.
pub struct ValidationInterceptor<E = RuleEvaluator> {
    registry: Arc<RuleRegistry>,
    evaluator: E,
    guard: LoginGuard,
}

impl ValidationInterceptor<RuleEvaluator> {
    pub fn new(registry: Arc<RuleRegistry>, evaluator: RuleEvaluator) -> Self {
        Self::with_evaluator(registry, evaluator)
    }

    /// Patterns, messages and the login key taken from settings.
    pub fn from_settings(registry: Arc<RuleRegistry>, settings: &Settings) -> Result<Self, RegistryError> {
        let evaluator = RuleEvaluator::from_settings(settings)?;
        Ok(Self::with_evaluator(registry, evaluator)
            .with_login_guard(LoginGuard::new(settings.session.login_key.clone())))
    }
}

impl<E: Evaluate> ValidationInterceptor<E> {
    pub fn with_evaluator(registry: Arc<RuleRegistry>, evaluator: E) -> Self {
        Self {
            registry,
            evaluator,
            guard: LoginGuard::default(),
        }
    }

    pub fn with_login_guard(mut self, guard: LoginGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Check the arguments of `handler` without touching the session.
    pub fn validate_params(&self, handler: &str, args: &[Value]) -> Result<(), Error> {
        let Some(descriptor) = self.registry.handler(handler) else {
            trace!(handler, "no rules registered");
            return Ok(());
        };

        trace!(handler, phase = %Phase::Scanning, "discovering parameter bindings");
        let bindings = ParameterScanner::new(&self.registry)
            .discover(descriptor, args)
            .map_err(|e| {
                error!(handler, phase = %Phase::Rejected, error = %e, "arguments do not match rule metadata");
                Error::from(e)
            })?;

        debug!(handler, phase = %Phase::Evaluating, bindings = bindings.len(), "validating parameters");

        for binding in &bindings {
            for rule in binding.rules {
                trace!(handler, path = %binding.path(), rule = rule.kind(), "checking rule");

                match self.evaluator.check(rule, binding.value) {
                    Ok(()) => {}
                    Err(RuleError::Violation(violation)) => {
                        debug!(
                            handler,
                            phase = %Phase::Rejected,
                            path = %binding.path(),
                            rule = rule.kind(),
                            kind = ?violation.kind,
                            "parameter rejected"
                        );
                        return Err(Error::validation(violation.message).with_field(binding.path()));
                    }
                    Err(other) => {
                        error!(
                            handler,
                            phase = %Phase::Rejected,
                            path = %binding.path(),
                            error = %other,
                            "rule cannot be applied"
                        );
                        return Err(Error::Reflection(format!("{}: {}", binding.path(), other)));
                    }
                }
            }
        }

        Ok(())
    }

    /// Full check: parameters first, then the login requirement.
    pub async fn check(&self, invocation: &Invocation<'_>) -> Result<(), Error> {
        self.validate_params(invocation.handler, invocation.args)?;

        let login = self
            .registry
            .handler(invocation.handler)
            .and_then(|d| d.login.as_ref());

        self.guard
            .check(login, invocation.session)
            .await
            .inspect_err(|e| match e {
                Error::Auth(_) => debug!(handler = invocation.handler, "login required"),
                other => warn!(handler = invocation.handler, error = %other, "session lookup failed"),
            })?;

        trace!(handler = invocation.handler, phase = %Phase::Passed, "invocation accepted");
        Ok(())
    }
}

#[async_trait]
impl<E: Evaluate + 'static> Interceptor for ValidationInterceptor<E> {
    async fn before(&self, invocation: &Invocation<'_>) -> Result<(), Error> {
        self.check(invocation).await
    }
}
