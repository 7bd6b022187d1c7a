//! Configuration schemas: field descriptors, validation, merge and partial derivation
//!
//! A [`Schema`] describes the record a module accepts. It is the single place
//! where stage state is inspected at runtime; modules otherwise work with
//! typed accessors on [`crate::Config`].

use crate::error::{Result, ScaffoldError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A structured validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Field path, outermost first (list indices are rendered as numbers)
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Issue attached to a single top-level field
    pub fn at(field: &str, message: impl Into<String>) -> Self {
        Self::new(vec![field.to_string()], message)
    }

    /// Issue that is not about any particular field
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

/// Shape of a single field value
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Bool,
    Number,
    /// A string restricted to a fixed set of choices
    Enum(Vec<String>),
    List(Box<FieldType>),
    Record(Schema),
}

impl FieldType {
    pub fn one_of<I, T>(choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        FieldType::Enum(choices.into_iter().map(Into::into).collect())
    }

    pub fn list_of(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    fn describe(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Bool => "boolean".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::Enum(choices) => format!("enum({})", choices.join("|")),
            FieldType::List(inner) => format!("array<{}>", inner.describe()),
            FieldType::Record(schema) => {
                let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
                format!("object{{{}}}", names.join(","))
            }
        }
    }

    /// Structural compatibility used when merging schemas
    fn compatible(&self, other: &FieldType) -> bool {
        match (self, other) {
            (FieldType::String, FieldType::String)
            | (FieldType::Bool, FieldType::Bool)
            | (FieldType::Number, FieldType::Number) => true,
            (FieldType::Enum(a), FieldType::Enum(b)) => a == b,
            (FieldType::List(a), FieldType::List(b)) => a.compatible(b),
            (FieldType::Record(a), FieldType::Record(b)) => {
                a.fields.len() == b.fields.len()
                    && a.fields.iter().all(|fa| {
                        b.field(&fa.name)
                            .is_some_and(|fb| fa.required == fb.required && fa.ty.compatible(&fb.ty))
                    })
            }
            _ => false,
        }
    }
}

/// Custom predicate run on a present, correctly typed value
pub type Check = Arc<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>;

/// One named field of a schema
#[derive(Clone)]
pub struct Field {
    name: String,
    ty: FieldType,
    required: bool,
    checks: Vec<Check>,
}

impl Field {
    pub fn required(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            checks: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Attach a check; it only runs once the value has the right type
    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.checks.push(Arc::new(check));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("required", &self.required)
            .field("checks", &self.checks.len())
            .finish()
    }
}

/// Immutable description of a record of named, typed fields
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Schema without fields; accepts any object
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schema; duplicate names are unified like in [`Schema::merge`]
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Result<Self> {
        let mut schema = Self::empty();
        for field in fields {
            schema = schema.with_field(field)?;
        }
        Ok(schema)
    }

    fn with_field(&self, field: Field) -> Result<Self> {
        let mut fields = self.fields.clone();
        match fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => {
                if !existing.ty.compatible(&field.ty) {
                    return Err(ScaffoldError::SchemaConflict {
                        field: field.name,
                        left: existing.ty.describe(),
                        right: field.ty.describe(),
                    });
                }
                existing.required |= field.required;
                existing.checks.extend(field.checks);
            }
            None => fields.push(field),
        }
        Ok(Self { fields })
    }

    /// Union of both schemas' fields
    pub fn merge(&self, other: &Schema) -> Result<Self> {
        other
            .fields
            .iter()
            .cloned()
            .try_fold(self.clone(), |schema, field| schema.with_field(field))
    }

    /// Same fields, none of them required (shallow)
    pub fn partial(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .cloned()
                .map(|f| Field {
                    required: false,
                    ..f
                })
                .collect(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a candidate record; unknown keys are passed through untouched
    pub fn validate(&self, candidate: &Value) -> std::result::Result<(), Vec<Issue>> {
        let mut issues = Vec::new();
        self.collect_issues(candidate, &[], &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Validate, then deserialize into a typed value
    pub fn parse<T: DeserializeOwned>(&self, candidate: &Value) -> std::result::Result<T, Vec<Issue>> {
        self.validate(candidate)?;
        serde_json::from_value(candidate.clone()).map_err(|e| vec![Issue::root(e.to_string())])
    }

    /// Validate any serializable state, returning the issues found
    pub fn issues_for<S: Serialize>(&self, state: &S) -> Vec<Issue> {
        match serde_json::to_value(state) {
            Ok(value) => self.validate(&value).err().unwrap_or_default(),
            Err(e) => vec![Issue::root(format!("State is not serializable: {}", e))],
        }
    }

    fn collect_issues(&self, candidate: &Value, path: &[String], issues: &mut Vec<Issue>) {
        let Some(object) = candidate.as_object() else {
            issues.push(Issue::new(
                path.to_vec(),
                format!("Expected object, received {}", kind_of(candidate)),
            ));
            return;
        };

        for field in &self.fields {
            let mut field_path = path.to_vec();
            field_path.push(field.name.clone());

            match object.get(&field.name).filter(|v| !v.is_null()) {
                None if field.required => issues.push(Issue::new(field_path, "Required")),
                None => {}
                Some(value) => {
                    let before = issues.len();
                    check_type(&field.ty, value, &field_path, issues);
                    if issues.len() == before {
                        for check in &field.checks {
                            if let Err(message) = check(value) {
                                issues.push(Issue::new(field_path.clone(), message));
                            }
                        }
                    }
                }
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_type(ty: &FieldType, value: &Value, path: &[String], issues: &mut Vec<Issue>) {
    let mismatch = |expected: &str| {
        Issue::new(
            path.to_vec(),
            format!("Expected {}, received {}", expected, kind_of(value)),
        )
    };

    match ty {
        FieldType::String if !value.is_string() => issues.push(mismatch("string")),
        FieldType::Bool if !value.is_boolean() => issues.push(mismatch("boolean")),
        FieldType::Number if !value.is_number() => issues.push(mismatch("number")),
        FieldType::Enum(choices) => match value.as_str() {
            Some(s) if choices.iter().any(|c| c == s) => {}
            _ => issues.push(Issue::new(
                path.to_vec(),
                format!(
                    "Invalid enum value. Expected {}, received {}",
                    choices
                        .iter()
                        .map(|c| format!("'{}'", c))
                        .collect::<Vec<_>>()
                        .join(" | "),
                    value
                ),
            )),
        },
        FieldType::List(inner) => match value.as_array() {
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    let mut item_path = path.to_vec();
                    item_path.push(idx.to_string());
                    check_type(inner, item, &item_path, issues);
                }
            }
            None => issues.push(mismatch("array")),
        },
        FieldType::Record(schema) => schema.collect_issues(value, path, issues),
        _ => {}
    }
}
