//! Declarative parameter validation for Rampart handlers.
//!
//! Rules are attached to handler parameters, or to the fields of a
//! structured parameter, in a [`RuleRegistry`]. The [`ValidationInterceptor`]
//! checks them before the handler runs and then enforces the handler's
//! login requirement.
//!
//! # Examples
//!
//! ```
//! use rampart_validation::{Evaluate, NumberRule, PatternId, RuleDescriptor, RuleEvaluator};
//! use serde_json::json;
//!
//! let evaluator = RuleEvaluator::with_defaults().unwrap();
//! let rule = RuleDescriptor::from(NumberRule::new().pattern(PatternId::Age));
//!
//! assert!(evaluator.check(&rule, Some(&json!(42))).is_ok());
//! assert!(evaluator.check(&rule, Some(&json!(130))).is_err());
//! ```

mod errors;
mod evaluator;
mod interceptor;
mod pattern;
mod registry;
mod rule;
mod scanner;

pub use errors::*;
pub use evaluator::*;
pub use interceptor::*;
pub use pattern::*;
pub use registry::*;
pub use rule::*;
pub use scanner::*;

pub mod prelude {
    pub use crate::{
        Evaluate, FieldSpec, HandlerDescriptor, NotNullRule, NumberRule, ParamSpec, PasswordRule,
        PatternId, RuleEvaluator, RuleRegistry, TypeSpec, ValidationInterceptor,
    };
}
