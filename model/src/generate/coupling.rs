use alforge_symbols::{source_table, PagePredicate, SymbolQuery};

use crate::error::GenerateError;
use crate::field::TableField;
use crate::format::{quote_if_special, sanitize_identifier, truncate_object_name};
use crate::layout::{Action, ActionGroup};
use crate::method::{Procedure, Trigger, TriggerKind};
use crate::node::{Comment, Spacing};
use crate::object::{Page, Table};
use crate::property::{Property, PropertyKind};
use crate::text::TextAssembler;
use crate::value::{NamedValue, Value};

use super::CouplingTarget;

/// Flag field the integration framework keeps in sync with the coupling table.
pub const COUPLED_TO_CRM_FIELD: &str = "Coupled to CRM";
const COUPLED_TO_DATAVERSE_CAPTION: &str = "Coupled to Dataverse";

fn extension_name(bc_table: &str) -> String {
    truncate_object_name(&format!("{bc_table} Ext"))
}

/// Adds the `Coupled to CRM` flag to the Business Central table.
///
/// Returns `None` when the table, or one of its extensions, already has it.
pub fn coupling_table_extension(
    symbols: &impl SymbolQuery,
    target: &CouplingTarget,
) -> Result<Option<Table>, GenerateError> {
    let exists = symbols
        .table_fields(&target.bc_table)?
        .iter()
        .any(|f| f.name == COUPLED_TO_CRM_FIELD);
    if exists {
        tracing::warn!(
            "A field with name {} already exists on the {} table",
            COUPLED_TO_CRM_FIELD,
            target.bc_table
        );
        return Ok(None);
    }

    let id = target.object_id(symbols)?;
    let mut comment = TextAssembler::new();
    comment
        .append(
            format!(
                "// This table extension adds the {COUPLED_TO_CRM_FIELD} field to the {} table",
                target.bc_table
            ),
            0,
        )
        .append(
            format!(
                "// to maintain its coupling status with the {} table.",
                target.proxy_table
            ),
            0,
        );

    let mut code = TextAssembler::with(
        format!(
            "CRMIntegrationRecord.SetRange(\"Table ID\", Database::{});",
            quote_if_special(&target.bc_table)
        ),
        0,
    );
    code.append("if CRMIntegrationRecord.FindSet() then", 0)
        .append("repeat", 1)
        .append("CRMIntegrationManagement.SetCoupledFlag(CRMIntegrationRecord, true);", 2)
        .append("until CRMIntegrationRecord.Next() = 0;", 1);

    let table = Table::extension(id, &extension_name(&target.bc_table), &target.bc_table)?
        .with_comment(Comment::Block(comment))
        .fields(vec![TableField::new(id, COUPLED_TO_CRM_FIELD, Value::Boolean).props(vec![
            Property::new(PropertyKind::DataClassification, "SystemMetadata"),
            Property::new(PropertyKind::Caption, COUPLED_TO_DATAVERSE_CAPTION),
            Property::new(PropertyKind::Editable, false),
        ])])
        .procedures(vec![Procedure::new("SetCoupledFlags")
            .with_comment(format!(
                "// Call this procedure to initialize the {COUPLED_TO_CRM_FIELD} field if the records had already been coupled before."
            ))
            .vars(vec![
                NamedValue::new("CRMIntegrationRecord", Value::record("CRM Integration Record")),
                NamedValue::new(
                    "CRMIntegrationManagement",
                    Value::codeunit("CRM Integration Management"),
                ),
            ])
            .code(code)]);

    tracing::debug!("Generated table extension {} on {}", table.name(), target.bc_table);
    Ok(Some(table))
}

fn on_action(code: &str) -> Vec<Trigger> {
    vec![Trigger::new(TriggerKind::OnAction).code(code)]
}

/// Coupling and synchronization actions on the first page built on the
/// Business Central table.
///
/// Returns `None` when no such page exists.
pub fn card_page_extension(
    symbols: &impl SymbolQuery,
    target: &CouplingTarget,
) -> Result<Option<Page>, GenerateError> {
    let table_id = symbols.table_id(&target.bc_table);
    let on_table = source_table(&target.bc_table, table_id);
    let predicates: [PagePredicate<'_>; 1] = [&on_table];
    let Some(card_page) = symbols.find_page(&predicates) else {
        tracing::warn!(
            "Skipping creating page extension as card page not found on table {}",
            target.bc_table
        );
        return Ok(None);
    };

    let id = target.object_id(symbols)?;
    let entity = &target.entity;
    let bc_table = &target.bc_table;

    let coupling = ActionGroup::new("Coupling", Spacing::Separated)
        .props(vec![
            Property::new(PropertyKind::Caption, "Coupling"),
            Property::new(PropertyKind::Image, "LinkAccount"),
            Property::new(
                PropertyKind::ToolTip,
                "Create, change, or delete a coupling between the Business Central record and a Microsoft Dataverse row.",
            ),
        ])
        .actions(vec![
            Action::new("ManageDataverseCoupling")
                .props(vec![
                    Property::new(PropertyKind::ApplicationArea, "All"),
                    Property::new(PropertyKind::Caption, "Set Up Coupling"),
                    Property::new(PropertyKind::Image, "LinkAccount"),
                    Property::new(
                        PropertyKind::ToolTip,
                        format!("Create or modify the coupling to the Microsoft Dataverse {entity}."),
                    ),
                ])
                .triggers(on_action("CRMIntegrationManagement.DefineCoupling(Rec.RecordId);")),
            Action::new("DeleteDataverseCoupling")
                .props(vec![
                    Property::new(PropertyKind::ApplicationArea, "All"),
                    Property::new(PropertyKind::Caption, "Delete Coupling"),
                    Property::new(PropertyKind::Image, "UnLinkAccount"),
                    Property::new(PropertyKind::Enabled, "DataverseIsCoupledToRecord"),
                    Property::new(
                        PropertyKind::ToolTip,
                        format!("Delete the coupling to the Microsoft Dataverse {entity}."),
                    ),
                ])
                .triggers(on_action("CRMCouplingManagement.RemoveCoupling(Rec.RecordId);")),
        ]);

    let dataverse = ActionGroup::new("ActionGroupDataverse", Spacing::Separated)
        .props(vec![
            Property::new(PropertyKind::Caption, "Dataverse"),
            Property::new(PropertyKind::Visible, "DataverseIntegrationEnabled"),
        ])
        .actions(vec![
            Action::new(format!("GoTo{}", sanitize_identifier(&target.proxy_table)))
                .props(vec![
                    Property::new(PropertyKind::ApplicationArea, "All"),
                    Property::new(PropertyKind::Caption, entity),
                    Property::new(PropertyKind::Enabled, "DataverseIsCoupledToRecord"),
                    Property::new(PropertyKind::Image, "CoupledCustomer"),
                    Property::new(
                        PropertyKind::ToolTip,
                        format!("Open the coupled Dataverse {entity}."),
                    ),
                ])
                .triggers(on_action(
                    "CRMIntegrationManagement.ShowCRMEntityFromRecordID(Rec.RecordId);",
                )),
            Action::new("CDSSynchronizeNow")
                .props(vec![
                    Property::new(PropertyKind::ApplicationArea, "All"),
                    Property::new(PropertyKind::Caption, "Synchronize"),
                    Property::new(PropertyKind::Image, "Refresh"),
                    Property::new(
                        PropertyKind::ToolTip,
                        "Send or get updated data to or from Microsoft Dataverse.",
                    ),
                    Property::new(PropertyKind::Enabled, "DataverseIsCoupledToRecord"),
                ])
                .triggers(on_action("CRMIntegrationManagement.UpdateOneNow(Rec.RecordId);")),
            Action::new("ShowLog")
                .props(vec![
                    Property::new(PropertyKind::ApplicationArea, "All"),
                    Property::new(PropertyKind::Caption, "Synchronization Log"),
                    Property::new(PropertyKind::Image, "Log"),
                    Property::new(
                        PropertyKind::ToolTip,
                        format!("View integration synchronization jobs for the {bc_table} table."),
                    ),
                ])
                .triggers(on_action("CRMIntegrationManagement.ShowLog(Rec.RecordId);")),
        ])
        .groups(vec![coupling]);

    let mut after_get_record = TextAssembler::with("if DataverseIntegrationEnabled then", 0);
    after_get_record.append(
        "DataverseIsCoupledToRecord := CRMCouplingManagement.IsRecordCoupledToCRM(Rec.RecordId);",
        1,
    );

    let page = Page::extension(id, &extension_name(bc_table), &card_page)?
        .with_comment(format!(
            "// Manage couplings and synchronization for the {bc_table} records."
        ))
        .action_groups(vec![dataverse])
        .triggers(vec![
            Trigger::new(TriggerKind::OnOpenPage).code(
                "DataverseIntegrationEnabled := CRMIntegrationManagement.IsCDSIntegrationEnabled();",
            ),
            Trigger::new(TriggerKind::OnAfterGetCurrRecord).code(after_get_record),
        ])
        .vars(vec![
            NamedValue::new(
                "CRMIntegrationManagement",
                Value::codeunit("CRM Integration Management"),
            ),
            NamedValue::new(
                "CRMCouplingManagement",
                Value::codeunit("CRM Coupling Management"),
            ),
            NamedValue::new("DataverseIntegrationEnabled", Value::Boolean),
            NamedValue::new("DataverseIsCoupledToRecord", Value::Boolean),
        ]);

    tracing::debug!("Generated page extension {} on {}", page.name(), card_page);
    Ok(Some(page))
}
