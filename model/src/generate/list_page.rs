use alforge_symbols::SymbolQuery;

use crate::error::GenerateError;
use crate::field::PageField;
use crate::format::{quote_if_special, sanitize_identifier, truncate_object_name};
use crate::layout::{Action, FieldGroup, GroupKind};
use crate::method::{Procedure, Trigger, TriggerKind};
use crate::node::Spacing;
use crate::object::Page;
use crate::property::{Property, PropertyKind};
use crate::value::{NamedValue, Parameter, Value};

use super::object_id_for;

/// `<proxy table> List`, cut down to a valid object name.
pub fn list_page_name(proxy_table: &str) -> String {
    truncate_object_name(&format!("{proxy_table} List"))
}

/// A read-only list page over a Dataverse proxy table.
///
/// Every field of the table is listed but hidden; the `CreateFromDataverse`
/// action creates Business Central records from the selected rows.
pub fn list_page(
    symbols: &impl SymbolQuery,
    entity: &str,
    proxy_table: &str,
    object_id: Option<u32>,
) -> Result<Page, GenerateError> {
    let short_proxy = sanitize_identifier(proxy_table);

    let fields = symbols
        .table_fields(proxy_table)?
        .into_iter()
        .map(|field| {
            let name = quote_if_special(&field.name);
            PageField::new(&field.name, format!("Rec.{name}")).props(vec![
                Property::new(PropertyKind::ApplicationArea, "All"),
                Property::new(PropertyKind::Caption, &field.name),
                Property::new(
                    PropertyKind::ToolTip,
                    format!("Specifies the {} value of the {proxy_table} record.", field.name),
                ),
                Property::new(PropertyKind::Visible, false),
            ])
        })
        .collect::<Vec<_>>();
    tracing::debug!("Listing {} fields of {}", fields.len(), proxy_table);
    let id = object_id_for(symbols, proxy_table, object_id)?;

    let create_from_dataverse = Action::new("CreateFromDataverse")
        .props(vec![
            Property::new(PropertyKind::ApplicationArea, "All"),
            Property::new(PropertyKind::Caption, "Create in Business Central"),
            Property::new(PropertyKind::Promoted, true),
            Property::new(PropertyKind::PromotedCategory, "Process"),
            Property::new(
                PropertyKind::ToolTip,
                format!("Generate the record from the coupled Microsoft Dataverse {entity}."),
            ),
        ])
        .triggers(vec![Trigger::new(TriggerKind::OnAction)
            .vars(vec![
                NamedValue::new(proxy_table, Value::record(proxy_table)),
                NamedValue::new(
                    "CRM Integration Management",
                    Value::codeunit("CRM Integration Management"),
                ),
            ])
            .code(vec![
                format!("CurrPage.SetSelectionFilter({short_proxy});"),
                format!("CRMIntegrationManagement.CreateNewRecordsFromCRM({short_proxy});"),
            ])]);

    let page = Page::new(id, &list_page_name(proxy_table))?
        .with_comment(format!(
            "// This page shows the fields on the proxy table {proxy_table}."
        ))
        .props(vec![
            Property::new(PropertyKind::PageType, "List"),
            Property::new(PropertyKind::SourceTable, proxy_table),
            Property::new(PropertyKind::Editable, false),
            Property::new(PropertyKind::ApplicationArea, "All"),
            Property::new(PropertyKind::UsageCategory, "Lists"),
            Property::new(PropertyKind::Caption, format!("CDS {entity}")),
        ])
        .field_groups(vec![FieldGroup::new(GroupKind::Repeater, "General", Spacing::Separated)
            .with_comment(format!(
                "// Please toggle the {} property below to show the fields needed on the page.",
                PropertyKind::Visible
            ))
            .fields(fields)])
        .actions(vec![create_from_dataverse])
        .vars(vec![NamedValue::new(
            &format!("CurrentlyCoupled{proxy_table}"),
            Value::record(proxy_table),
        )])
        .triggers(vec![Trigger::new(TriggerKind::OnInit)
            .code("Codeunit.Run(Codeunit::\"CRM Integration Management\");")])
        .procedures(vec![Procedure::new(&format!("SetCurrentlyCoupled{short_proxy}"))
            .params(vec![Parameter::new(proxy_table, Value::record(proxy_table))])
            .code(format!("CurrentlyCoupled{short_proxy} := {short_proxy};"))]);

    tracing::debug!("Generated list page {} for {}", page.name(), proxy_table);
    Ok(page)
}
