// Pairs handler arguments with the rules declared for them

use crate::errors::value_kind;
use crate::{HandlerDescriptor, RuleDescriptor, RuleRegistry, ScanError};
use serde_json::Value;

/// A value to check and the rules that apply to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding<'a> {
    pub index: usize,
    pub param: &'a str,
    /// Set for fields of a nested parameter
    pub field: Option<&'a str>,
    /// `None` when the argument or field is absent or null
    pub value: Option<&'a Value>,
    pub rules: &'a [RuleDescriptor],
}

impl ParameterBinding<'_> {
    /// `param` or `param.field`
    pub fn path(&self) -> String {
        match self.field {
            Some(field) => format!("{}.{}", self.param, field),
            None => self.param.to_string(),
        }
    }
}

/// Walks a handler's parameters in declaration order. A parameter's own
/// rules come before the rules on its fields; fields are expanded one level
/// deep only.
pub struct ParameterScanner<'r> {
    registry: &'r RuleRegistry,
}

impl<'r> ParameterScanner<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn discover<'a>(
        &self,
        handler: &'a HandlerDescriptor,
        args: &'a [Value],
    ) -> Result<Vec<ParameterBinding<'a>>, ScanError>
    where
        'r: 'a,
    {
        if args.len() != handler.params.len() {
            return Err(ScanError::ArityMismatch {
                handler: handler.id.clone(),
                declared: handler.params.len(),
                actual: args.len(),
            });
        }

        let mut bindings = Vec::new();
        for (index, (param, arg)) in handler.params.iter().zip(args).enumerate() {
            if !param.rules.is_empty() {
                bindings.push(ParameterBinding {
                    index,
                    param: &param.name,
                    field: None,
                    value: Some(arg).filter(|v| !v.is_null()),
                    rules: &param.rules,
                });
            }

            if !param.validate_nested {
                continue;
            }

            let type_name = param.type_name.as_deref().unwrap_or_default();
            let registry: &'a RuleRegistry = self.registry;
            let spec = registry
                .type_spec(type_name)
                .ok_or_else(|| ScanError::UnknownType {
                    param: param.name.clone(),
                    type_name: type_name.to_string(),
                })?;

            let object = match arg {
                Value::Object(map) => map,
                Value::Null => {
                    return Err(ScanError::NullTarget {
                        param: param.name.clone(),
                        type_name: spec.name.clone(),
                    });
                }
                other => {
                    return Err(ScanError::NotAnObject {
                        param: param.name.clone(),
                        type_name: spec.name.clone(),
                        found: value_kind(other),
                    });
                }
            };

            for field in spec.fields.iter().filter(|f| !f.rules.is_empty()) {
                bindings.push(ParameterBinding {
                    index,
                    param: &param.name,
                    field: Some(&field.name),
                    value: object.get(&field.name).filter(|v| !v.is_null()),
                    rules: &field.rules,
                });
            }
        }

        Ok(bindings)
    }
}
