// Rampart - declarative request validation for handler invocations
//
// Parameter rules and login requirements are declared once in a registry and
// enforced by an interceptor before the handler runs.

pub use rampart_core::*;

pub use rampart_log as log;

#[cfg(feature = "config")]
pub use rampart_config;

#[cfg(feature = "validation")]
pub use rampart_validation;

/// Logging configuration matching the `[log]` section of `settings`.
///
/// Unknown level or format names are rejected rather than silently replaced.
#[cfg(feature = "config")]
pub fn log_config(
    settings: &rampart_config::Settings,
) -> Result<rampart_log::LogConfig, rampart_log::ParseLogError> {
    Ok(rampart_log::LogConfig::new()
        .level(settings.log.level.parse()?)
        .format(settings.log.format.parse()?))
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Error, HttpResponse, Interceptor, InterceptorChain, Invocation, LoginGuard,
        LoginRequirement, NoSession, SessionHandle,
    };

    #[cfg(feature = "config")]
    pub use rampart_config::Settings;

    #[cfg(feature = "validation")]
    pub use rampart_validation::prelude::*;
}

#[cfg(all(test, feature = "config"))]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_from_settings() {
        let mut settings = rampart_config::Settings::default();
        settings.log.level = "debug".into();
        settings.log.format = "pretty".into();
        assert!(log_config(&settings).is_ok());

        settings.log.format = "xml".into();
        assert!(log_config(&settings).is_err());
    }
}
