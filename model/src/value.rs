//! Typed declarations: variable types, named variables, parameters and return values.

use std::fmt;

use crate::format::{quote_if_special, sanitize_identifier};
use crate::node::{Comment, Render};
use crate::text::TextAssembler;

/// The object a `Record`, `Codeunit` or `Page` value points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectRef {
    Name(String),
    Id(u32),
}

impl From<&str> for ObjectRef {
    fn from(name: &str) -> Self {
        ObjectRef::Name(name.to_string())
    }
}

impl From<String> for ObjectRef {
    fn from(name: String) -> Self {
        ObjectRef::Name(name)
    }
}

impl From<u32> for ObjectRef {
    fn from(id: u32) -> Self {
        ObjectRef::Id(id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectRef::Name(name) => f.write_str(&quote_if_special(name)),
            ObjectRef::Id(id) => write!(f, "{id}"),
        }
    }
}

/// A `Label` constant. The text is emitted between single quotes as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub comment: Option<String>,
    pub locked: bool,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            comment: None,
            locked: false,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label '{}'", self.text)?;
        if let Some(comment) = &self.comment {
            write!(f, ", Comment = '{comment}'")?;
        }
        if self.locked {
            f.write_str(", Locked = true")?;
        }
        Ok(())
    }
}

/// The type of a variable, parameter, return value or table field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    BigInteger,
    Blob,
    Boolean,
    Date,
    DateFormula,
    DateTime,
    Decimal,
    FieldRef,
    FilterPageBuilder,
    Guid,
    Integer,
    RecordRef,
    Time,
    /// `Code[N]`, or bare `Code` without a length.
    Code(Option<u32>),
    /// `Text[N]`, or bare `Text` without a length.
    Text(Option<u32>),
    Label(Label),
    Record { subtype: ObjectRef, temporary: bool },
    Codeunit(ObjectRef),
    Page(ObjectRef),
}

impl Value {
    pub fn record(subtype: impl Into<ObjectRef>) -> Self {
        Value::Record {
            subtype: subtype.into(),
            temporary: false,
        }
    }

    pub fn temporary_record(subtype: impl Into<ObjectRef>) -> Self {
        Value::Record {
            subtype: subtype.into(),
            temporary: true,
        }
    }

    pub fn codeunit(subtype: impl Into<ObjectRef>) -> Self {
        Value::Codeunit(subtype.into())
    }

    pub fn page(subtype: impl Into<ObjectRef>) -> Self {
        Value::Page(subtype.into())
    }

    pub fn code(length: u32) -> Self {
        Value::Code(Some(length))
    }

    pub fn text(length: u32) -> Self {
        Value::Text(Some(length))
    }

    /// The bare type keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Value::BigInteger => "BigInteger",
            Value::Blob => "Blob",
            Value::Boolean => "Boolean",
            Value::Date => "Date",
            Value::DateFormula => "DateFormula",
            Value::DateTime => "DateTime",
            Value::Decimal => "Decimal",
            Value::FieldRef => "FieldRef",
            Value::FilterPageBuilder => "FilterPageBuilder",
            Value::Guid => "Guid",
            Value::Integer => "Integer",
            Value::RecordRef => "RecordRef",
            Value::Time => "Time",
            Value::Code(_) => "Code",
            Value::Text(_) => "Text",
            Value::Label(_) => "Label",
            Value::Record { .. } => "Record",
            Value::Codeunit(_) => "Codeunit",
            Value::Page(_) => "Page",
        }
    }
}

impl From<Label> for Value {
    fn from(label: Label) -> Self {
        Value::Label(label)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Code(Some(len)) | Value::Text(Some(len)) => {
                write!(f, "{}[{len}]", self.keyword())
            }
            Value::Label(label) => label.fmt(f),
            Value::Record { subtype, temporary } => {
                write!(f, "Record {subtype}")?;
                if *temporary {
                    f.write_str(" temporary")?;
                }
                Ok(())
            }
            Value::Codeunit(subtype) | Value::Page(subtype) => {
                write!(f, "{} {subtype}", self.keyword())
            }
            _ => f.write_str(self.keyword()),
        }
    }
}

/// `<name>: <type>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedValue {
    comment: Option<Comment>,
    name: String,
    value: Value,
}

impl NamedValue {
    /// Characters outside `[0-9a-zA-Z]` are dropped from `name`.
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        Self {
            comment: None,
            name: sanitize_identifier(name),
            value: value.into(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

impl Render for NamedValue {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        TextAssembler::with(self.to_string(), 0)
    }
}

/// A method parameter, passed by value unless marked otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    inner: NamedValue,
    by_reference: bool,
}

impl Parameter {
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        Self {
            inner: NamedValue::new(name, value),
            by_reference: false,
        }
    }

    /// A `var` parameter.
    pub fn by_reference(name: &str, value: impl Into<Value>) -> Self {
        Self {
            inner: NamedValue::new(name, value),
            by_reference: true,
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn is_by_reference(&self) -> bool {
        self.by_reference
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.by_reference {
            f.write_str("var ")?;
        }
        self.inner.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnValue {
    /// Renders as `: Type` after the parameter list.
    Unnamed(Value),
    /// Renders as ` Name: Type` after the parameter list.
    Named(NamedValue),
}

impl From<Value> for ReturnValue {
    fn from(value: Value) -> Self {
        ReturnValue::Unnamed(value)
    }
}

impl From<NamedValue> for ReturnValue {
    fn from(value: NamedValue) -> Self {
        ReturnValue::Named(value)
    }
}

impl fmt::Display for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnValue::Unnamed(value) => write!(f, ": {value}"),
            ReturnValue::Named(named) => write!(f, " {named}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_kinds_render_their_keyword() {
        assert_eq!(Value::Boolean.to_string(), "Boolean");
        assert_eq!(Value::FilterPageBuilder.to_string(), "FilterPageBuilder");
        assert_eq!(Value::Text(None).to_string(), "Text");
        assert_eq!(Value::code(20).to_string(), "Code[20]");
    }

    #[test]
    fn test_label_rendering() {
        let label = Label::new("Hello").with_comment("greeting").locked();
        assert_eq!(
            Value::from(label).to_string(),
            "Label 'Hello', Comment = 'greeting', Locked = true"
        );
        assert_eq!(Value::from(Label::new("Dataverse")).to_string(), "Label 'Dataverse'");
    }

    #[test]
    fn test_object_references() {
        assert_eq!(Value::record("Customer").to_string(), "Record Customer");
        assert_eq!(
            Value::temporary_record("Name/Value Buffer").to_string(),
            "Record \"Name/Value Buffer\" temporary"
        );
        assert_eq!(Value::codeunit(5330u32).to_string(), "Codeunit 5330");
        assert_eq!(Value::page("CDS Worker List").to_string(), "Page \"CDS Worker List\"");
    }

    #[test]
    fn test_named_value_sanitizes_name() {
        let var = NamedValue::new("CRM Integration Management", Value::codeunit("CRM Integration Management"));
        assert_eq!(var.name(), "CRMIntegrationManagement");
        assert_eq!(
            var.to_string(),
            "CRMIntegrationManagement: Codeunit \"CRM Integration Management\""
        );
    }

    #[test]
    fn test_parameters() {
        assert_eq!(Parameter::new("a", Value::Integer).to_string(), "a: Integer");
        assert_eq!(
            Parameter::by_reference("b", Value::Boolean).to_string(),
            "var b: Boolean"
        );
    }

    #[test]
    fn test_return_values() {
        assert_eq!(ReturnValue::from(Value::Boolean).to_string(), ": Boolean");
        assert_eq!(
            ReturnValue::from(NamedValue::new("Result", Value::Text(None))).to_string(),
            " Result: Text"
        );
    }
}
