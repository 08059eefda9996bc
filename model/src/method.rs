//! Procedures and triggers.
//!
//! Both render through the same shape:
//!
//! ```text
//! [annotation]
//! <header>(<params>)[<return>]
//! var
//!     <local variables>
//! begin
//!     <code>
//! end;
//! ```

use std::fmt;

use crate::format::{quote_if_special, sanitize_identifier, single_quote};
use crate::node::{render_all, Comment, Render, Spacing};
use crate::object::ObjectKind;
use crate::text::{Fragment, TextAssembler};
use crate::value::{NamedValue, Parameter, ReturnValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    OnAction,
    OnAfterGetCurrRecord,
    OnDelete,
    OnInit,
    OnInsert,
    OnModify,
    OnOpenPage,
    OnRename,
    OnRun,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::OnAction => "OnAction",
            TriggerKind::OnAfterGetCurrRecord => "OnAfterGetCurrRecord",
            TriggerKind::OnDelete => "OnDelete",
            TriggerKind::OnInit => "OnInit",
            TriggerKind::OnInsert => "OnInsert",
            TriggerKind::OnModify => "OnModify",
            TriggerKind::OnOpenPage => "OnOpenPage",
            TriggerKind::OnRename => "OnRename",
            TriggerKind::OnRun => "OnRun",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `[EventSubscriber(...)]` attribute placed above a procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSubscriber {
    pub object_kind: ObjectKind,
    pub object_name: String,
    pub event_name: String,
    pub element_name: Option<String>,
    pub skip_on_missing_license: bool,
    pub skip_on_missing_permission: bool,
}

impl EventSubscriber {
    pub fn new(object_kind: ObjectKind, object_name: &str, event_name: &str) -> Self {
        Self {
            object_kind,
            object_name: object_name.to_string(),
            event_name: event_name.to_string(),
            element_name: None,
            skip_on_missing_license: false,
            skip_on_missing_permission: false,
        }
    }

    pub fn element(mut self, element_name: &str) -> Self {
        self.element_name = Some(element_name.to_string());
        self
    }

    pub fn skip_on_missing_license(mut self) -> Self {
        self.skip_on_missing_license = true;
        self
    }

    pub fn skip_on_missing_permission(mut self) -> Self {
        self.skip_on_missing_permission = true;
        self
    }
}

impl fmt::Display for EventSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.object_kind.type_name();
        write!(
            f,
            "[EventSubscriber(ObjectType::{kind}, {kind}::{}, {}, {}, {}, {})]",
            quote_if_special(&self.object_name),
            single_quote(&self.event_name),
            single_quote(self.element_name.as_deref().unwrap_or_default()),
            self.skip_on_missing_license,
            self.skip_on_missing_permission,
        )
    }
}

/// Everything a procedure and a trigger have in common.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Signature {
    parameters: Vec<Parameter>,
    variables: Vec<NamedValue>,
    returns: Option<ReturnValue>,
    code: TextAssembler,
}

impl Signature {
    fn render(&self, header: &str, annotation: Option<String>) -> TextAssembler {
        let params = self
            .parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        let returns = self
            .returns
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let mut out = TextAssembler::new();
        out.append(annotation, 0);
        out.append(format!("{header}({params}){returns}"), 0);
        if !self.variables.is_empty() {
            out.append("var", 0);
            out.append(render_all(&self.variables, Spacing::Compact), 1);
        }
        out.append("begin", 0);
        out.append(self.code.clone(), 1);
        out.append("end;", 0);
        out
    }
}

macro_rules! signature_builders {
    ($ty:ty) => {
        impl $ty {
            pub fn params(mut self, parameters: Vec<Parameter>) -> Self {
                self.signature.parameters = parameters;
                self
            }

            pub fn vars(mut self, variables: Vec<NamedValue>) -> Self {
                self.signature.variables = variables;
                self
            }

            pub fn returns(mut self, value: impl Into<ReturnValue>) -> Self {
                self.signature.returns = Some(value.into());
                self
            }

            /// The statements between `begin` and `end;`, written at depth 0.
            pub fn code(mut self, code: impl Into<Fragment>) -> Self {
                self.signature.code = TextAssembler::with(code, 0);
                self
            }

            pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
                self.comment = Some(comment.into());
                self
            }
        }
    };
}

/// A named method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    comment: Option<Comment>,
    name: String,
    local: bool,
    event_subscriber: Option<EventSubscriber>,
    signature: Signature,
}

impl Procedure {
    pub fn new(name: &str) -> Self {
        Self {
            comment: None,
            name: sanitize_identifier(name),
            local: false,
            event_subscriber: None,
            signature: Signature::default(),
        }
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    pub fn subscribe(mut self, event: EventSubscriber) -> Self {
        self.event_subscriber = Some(event);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

signature_builders!(Procedure);

impl Render for Procedure {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        let header = if self.local {
            format!("local procedure {}", self.name)
        } else {
            format!("procedure {}", self.name)
        };
        let annotation = self.event_subscriber.as_ref().map(ToString::to_string);
        self.signature.render(&header, annotation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    comment: Option<Comment>,
    kind: TriggerKind,
    signature: Signature,
}

impl Trigger {
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            comment: None,
            kind,
            signature: Signature::default(),
        }
    }

    pub fn kind(&self) -> TriggerKind {
        self.kind
    }
}

signature_builders!(Trigger);

impl Render for Trigger {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        self.signature.render(&format!("trigger {}", self.kind), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_parameters_are_semicolon_joined() {
        let proc = Procedure::new("X").params(vec![
            Parameter::new("a", Value::Integer),
            Parameter::by_reference("b", Value::Boolean),
        ]);
        assert_eq!(
            proc.render().lines(),
            &["procedure X(a: Integer; var b: Boolean)", "begin", "end;"]
        );
    }

    #[test]
    fn test_local_procedure_with_vars_and_return() {
        let proc = Procedure::new("Get Table Filter")
            .local()
            .returns(Value::Text(None))
            .vars(vec![NamedValue::new("FilterBuilder", Value::FilterPageBuilder)])
            .code(vec!["FilterBuilder.AddTable(Caption, TableID);", "exit('');"]);

        assert_eq!(
            proc.render().to_string(),
            [
                "local procedure GetTableFilter(): Text",
                "var",
                "    FilterBuilder: FilterPageBuilder;",
                "begin",
                "    FilterBuilder.AddTable(Caption, TableID);",
                "    exit('');",
                "end;",
            ]
            .join("\r\n")
        );
    }

    #[test]
    fn test_event_subscriber_annotation() {
        let event = EventSubscriber::new(ObjectKind::Codeunit, "CRM Setup Defaults", "OnGetCDSTableNo");
        assert_eq!(
            event.to_string(),
            "[EventSubscriber(ObjectType::Codeunit, Codeunit::\"CRM Setup Defaults\", 'OnGetCDSTableNo', '', false, false)]"
        );

        let event = EventSubscriber::new(ObjectKind::Table, "Customer", "OnAfterValidateEvent")
            .element("Name")
            .skip_on_missing_license();
        assert_eq!(
            event.to_string(),
            "[EventSubscriber(ObjectType::Table, Table::Customer, 'OnAfterValidateEvent', 'Name', true, false)]"
        );
    }

    #[test]
    fn test_comment_precedes_annotation() {
        let proc = Procedure::new("Handle")
            .local()
            .with_comment("// handles it")
            .subscribe(EventSubscriber::new(ObjectKind::Codeunit, "Lookup CRM Tables", "OnLookupCRMTables"));
        let lines = proc.render();
        assert_eq!(lines.lines()[0], "// handles it");
        assert!(lines.lines()[1].starts_with("[EventSubscriber("));
        assert_eq!(lines.lines()[2], "local procedure Handle()");
    }

    #[test]
    fn test_trigger_header_and_nested_code() {
        let mut code = TextAssembler::new();
        code.append("if DataverseIntegrationEnabled then", 0);
        code.append("DataverseIsCoupledToRecord := true;", 1);
        let trigger = Trigger::new(TriggerKind::OnAfterGetCurrRecord).code(code);
        assert_eq!(
            trigger.render().lines(),
            &[
                "trigger OnAfterGetCurrRecord()",
                "begin",
                "    if DataverseIntegrationEnabled then",
                "        DataverseIsCoupledToRecord := true;",
                "end;",
            ]
        );
    }
}
