use alforge_model::{
    AlObject, Codeunit, FieldGroup, GroupKind, ModelError, NamedValue, Page, PageField,
    Parameter, Procedure, Property, PropertyKind, Spacing, Table, TableField, Trigger,
    TriggerKind, Value,
};

fn worker_fields() -> Vec<TableField> {
    vec![
        TableField::new(1, "No.", Value::code(20)),
        TableField::new(2, "Coupled to CRM", Value::Boolean)
            .props(vec![Property::new(PropertyKind::Editable, false)]),
    ]
}

fn sample_page() -> Page {
    Page::new(50100, "Worker List")
        .unwrap()
        .props(vec![Property::new(PropertyKind::SourceTable, "CDS Worker")])
        .field_groups(vec![FieldGroup::new(GroupKind::Repeater, "General", Spacing::Compact)
            .fields(vec![
                PageField::new("No.", "Rec.\"No.\""),
                PageField::new("Name", "Rec.Name"),
            ])])
        .triggers(vec![Trigger::new(TriggerKind::OnOpenPage).code("Rec.SetRange(Blocked, false);")])
        .vars(vec![NamedValue::new("Selected", Value::Integer)])
}

#[test]
fn test_serialization_is_idempotent() {
    let object: AlObject = sample_page().into();
    assert_eq!(object.serialize(), object.serialize());

    let clone = object.clone();
    assert_eq!(clone.serialize(), object.serialize());
}

#[test]
fn test_only_extensions_declare_extends() {
    let base = Table::new(50100, "Worker Buffer")
        .unwrap()
        .fields(worker_fields())
        .serialize();
    let ext = Table::extension(50100, "Worker Buffer", "Employee")
        .unwrap()
        .fields(worker_fields())
        .serialize();

    assert!(base.contains("\r\ntable 50100 \"Worker Buffer\"\r\n"));
    assert!(!base.contains("extends"));
    assert!(ext.contains("\r\ntableextension 50100 \"Worker Buffer\" extends Employee\r\n"));

    let body = |text: &str| text.split_once("{").map(|(_, rest)| rest.to_string());
    assert_eq!(body(&base), body(&ext));
}

#[test]
fn test_header_keeps_unsanitized_name() {
    let name = "Sales & Receivables Sync";
    let codeunit = Codeunit::new(50110, name).unwrap();
    assert!(codeunit.serialize().contains("codeunit 50110 \"Sales & Receivables Sync\""));

    let err = Codeunit::new(50110, "Sales and Receivables Synchronization").unwrap_err();
    assert!(matches!(err, ModelError::NameTooLong { limit: 30, .. }));
}

#[test]
fn test_repeater_inside_page_layout() {
    let text = sample_page().serialize();
    let expected = [
        "    layout",
        "    {",
        "        area(content)",
        "        {",
        "            repeater(General)",
        "            {",
        "                field(\"No.\"; Rec.\"No.\")",
        "                {",
        "                }",
        "                field(Name; Rec.Name)",
        "                {",
        "                }",
        "            }",
        "        }",
        "    }",
    ]
    .join("\r\n");
    assert!(text.contains(&expected), "unexpected layout:\n{text}");
}

#[test]
fn test_procedure_with_mixed_parameters() {
    let codeunit = Codeunit::new(50120, "Worker Sync")
        .unwrap()
        .procedures(vec![Procedure::new("X")
            .params(vec![
                Parameter::new("a", Value::Integer),
                Parameter::by_reference("b", Value::Boolean),
            ])
            .code("b := a > 0;")]);

    assert!(codeunit
        .serialize()
        .contains("    procedure X(a: Integer; var b: Boolean)\r\n    begin\r\n        b := a > 0;\r\n    end;"));
}
