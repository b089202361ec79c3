//! Rule metadata for handlers and their parameter types.
//!
//! Everything is declared once at startup through [`RuleRegistry::builder`]
//! and read concurrently afterwards.
//!
//! ```
//! use rampart_validation::{FieldSpec, HandlerDescriptor, ParamSpec, PasswordRule, RuleRegistry, TypeSpec};
//!
//! let registry = RuleRegistry::builder()
//!     .register_type(TypeSpec::new("LoginVo").field(FieldSpec::new("password").rule(PasswordRule::default())))
//!     .register_handler(HandlerDescriptor::new("UserController::login").param(ParamSpec::new("vo").nested("LoginVo")))
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.rules_for("UserController::login", 0, Some("password")).is_some());
//! ```

use crate::{RegistryError, RuleDescriptor};
use rampart_core::{DEFAULT_LOGIN_MESSAGE, LoginRequirement};
use rampart_config::Settings;
use std::collections::HashMap;

/// A field of a registered parameter type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    /// Declared type of the field. Never expanded further.
    pub type_name: Option<String>,
    pub rules: Vec<RuleDescriptor>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            rules: Vec::new(),
        }
    }

    pub fn of_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn rule(mut self, rule: impl Into<RuleDescriptor>) -> Self {
        self.rules.push(rule.into());
        self
    }
}

/// A structured parameter type with its fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub type_name: Option<String>,
    /// Expand the fields of `type_name` one level deep
    pub validate_nested: bool,
    pub rules: Vec<RuleDescriptor>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            validate_nested: false,
            rules: Vec::new(),
        }
    }

    pub fn of_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Validate the fields of `type_name` declared on a registered [`TypeSpec`].
    pub fn nested(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self.validate_nested = true;
        self
    }

    pub fn rule(mut self, rule: impl Into<RuleDescriptor>) -> Self {
        self.rules.push(rule.into());
        self
    }
}

/// A handler and its parameters in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerDescriptor {
    pub id: String,
    pub params: Vec<ParamSpec>,
    pub login: Option<LoginRequirement>,
}

impl HandlerDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: Vec::new(),
            login: None,
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Require a login, failing with the registry's default message.
    pub fn login_required(mut self) -> Self {
        self.login = Some(LoginRequirement::new(String::new()));
        self
    }

    /// Require a login, failing with `message`.
    pub fn require_login(mut self, message: impl Into<String>) -> Self {
        self.login = Some(LoginRequirement::new(message));
        self
    }

    pub fn login(mut self, requirement: LoginRequirement) -> Self {
        self.login = Some(requirement);
        self
    }
}

/// Read-only lookup from handler id to its descriptor.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    handlers: HashMap<String, HandlerDescriptor>,
    types: HashMap<String, TypeSpec>,
}

impl RuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn handler(&self, id: &str) -> Option<&HandlerDescriptor> {
        self.handlers.get(id)
    }

    pub fn type_spec(&self, name: &str) -> Option<&TypeSpec> {
        self.types.get(name)
    }

    /// Rules on parameter `index` of `handler`, or on one of its fields.
    ///
    /// Fields are only visible through parameters that validate nested
    /// fields.
    pub fn rules_for(&self, handler: &str, index: usize, field: Option<&str>) -> Option<&[RuleDescriptor]> {
        let param = self.handler(handler)?.params.get(index)?;
        match field {
            None => Some(&param.rules),
            Some(field) => {
                if !param.validate_nested {
                    return None;
                }
                let spec = self.type_spec(param.type_name.as_deref()?)?;
                spec.get_field(field).map(|f| f.rules.as_slice())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Collects descriptors and checks them in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    handlers: Vec<HandlerDescriptor>,
    types: Vec<TypeSpec>,
    login_message: String,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            types: Vec::new(),
            login_message: DEFAULT_LOGIN_MESSAGE.to_string(),
        }
    }

    pub fn register_handler(mut self, handler: HandlerDescriptor) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn register_type(mut self, spec: TypeSpec) -> Self {
        self.types.push(spec);
        self
    }

    /// Message for login requirements declared without one.
    pub fn login_message(mut self, message: impl Into<String>) -> Self {
        self.login_message = message.into();
        self
    }

    pub fn with_settings(self, settings: &Settings) -> Self {
        self.login_message(settings.messages.login_required.clone())
    }

    pub fn build(self) -> Result<RuleRegistry, RegistryError> {
        let mut types = HashMap::with_capacity(self.types.len());
        for spec in self.types {
            for field in &spec.fields {
                check_lengths(&format!("{}.{}", spec.name, field.name), &field.rules)?;
            }
            if types.contains_key(&spec.name) {
                return Err(RegistryError::DuplicateType(spec.name));
            }
            types.insert(spec.name.clone(), spec);
        }

        let mut handlers = HashMap::with_capacity(self.handlers.len());
        for mut handler in self.handlers {
            for param in &handler.params {
                let owner = format!("{}({})", handler.id, param.name);
                check_lengths(&owner, &param.rules)?;

                if param.validate_nested {
                    let type_name = param
                        .type_name
                        .as_ref()
                        .ok_or_else(|| RegistryError::NestedWithoutType { owner: owner.clone() })?;
                    if !types.contains_key(type_name) {
                        return Err(RegistryError::UnknownType {
                            owner,
                            type_name: type_name.clone(),
                        });
                    }
                }
            }

            if let Some(login) = handler.login.as_mut()
                && login.message.is_empty()
            {
                login.message = self.login_message.clone();
            }

            if handlers.contains_key(&handler.id) {
                return Err(RegistryError::DuplicateHandler(handler.id));
            }
            handlers.insert(handler.id.clone(), handler);
        }

        Ok(RuleRegistry { handlers, types })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_lengths(owner: &str, rules: &[RuleDescriptor]) -> Result<(), RegistryError> {
    for rule in rules {
        if let RuleDescriptor::Password(rule) = rule
            && rule.min_length > rule.max_length
        {
            return Err(RegistryError::InvalidLength {
                owner: owner.to_string(),
                min: rule.min_length,
                max: rule.max_length,
            });
        }
    }
    Ok(())
}
