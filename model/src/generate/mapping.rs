use std::collections::HashSet;

use alforge_symbols::SymbolQuery;
use serde::Deserialize;

use crate::error::GenerateError;
use crate::format::{quote_if_special, sanitize_identifier, truncate, truncate_object_name};
use crate::method::{EventSubscriber, Procedure};
use crate::object::{Codeunit, ObjectKind};
use crate::text::TextAssembler;
use crate::value::{Label, NamedValue, Parameter, Value};

use super::{page_on_table, CouplingTarget};

/// Integration table mapping names are `Code[20]`.
const MAPPING_NAME_LENGTH: usize = 20;

/// Which way a mapped field is synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    #[default]
    Both,
    /// From Dataverse into Business Central.
    ToBc,
    /// From Business Central into Dataverse.
    ToDataverse,
}

impl SyncDirection {
    /// Member of the `Integration Table Mapping` direction option.
    pub fn integration_direction(&self) -> &'static str {
        match self {
            SyncDirection::Both => "Bidirectional",
            SyncDirection::ToBc => "FromIntegrationTable",
            SyncDirection::ToDataverse => "ToIntegrationTable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingSource {
    /// `value` names a field on the proxy table.
    #[default]
    #[serde(alias = "field")]
    ProxyField,
    /// `value` is written into the Business Central field as is.
    Constant,
}

impl MappingSource {
    fn describe(&self) -> &'static str {
        match self {
            MappingSource::ProxyField => "proxyField",
            MappingSource::Constant => "constant",
        }
    }
}

/// One Business Central field and where its data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    pub bc_field: String,
    #[serde(default)]
    pub source: MappingSource,
    pub value: String,
    #[serde(default)]
    pub direction: SyncDirection,
}

impl FieldMapping {
    pub fn field(bc_field: &str, proxy_field: &str, direction: SyncDirection) -> Self {
        Self {
            bc_field: bc_field.to_string(),
            source: MappingSource::ProxyField,
            value: proxy_field.to_string(),
            direction,
        }
    }

    pub fn constant(bc_field: &str, value: &str) -> Self {
        Self {
            bc_field: bc_field.to_string(),
            source: MappingSource::Constant,
            value: value.to_string(),
            direction: SyncDirection::ToBc,
        }
    }
}

fn first_duplicate<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    values.into_iter().find(|v| !seen.insert(*v))
}

/// Reject empty or ambiguous mappings and force constants to flow into
/// Business Central only.
pub fn curate_mappings(mappings: Vec<FieldMapping>) -> Result<Vec<FieldMapping>, GenerateError> {
    if mappings.is_empty() {
        return Err(GenerateError::InvalidMappings(
            "No field mappings specified.".to_string(),
        ));
    }

    if let Some(dup) = first_duplicate(mappings.iter().map(|m| m.bc_field.as_str())) {
        return Err(GenerateError::InvalidMappings(format!(
            "The {dup} field in the Business Central table has been mapped more than once."
        )));
    }

    let proxy_fields = mappings
        .iter()
        .filter(|m| m.source == MappingSource::ProxyField)
        .map(|m| m.value.as_str());
    if let Some(dup) = first_duplicate(proxy_fields) {
        return Err(GenerateError::InvalidMappings(format!(
            "The {dup} field in the proxy table has been mapped more than once."
        )));
    }

    Ok(mappings
        .into_iter()
        .map(|mut m| {
            if m.source == MappingSource::Constant {
                m.direction = SyncDirection::ToBc;
            }
            m
        })
        .collect())
}

/// Direction of the table mapping as a whole.
pub fn table_sync_direction(mappings: &[FieldMapping]) -> SyncDirection {
    let any = |direction: SyncDirection| mappings.iter().any(|m| m.direction == direction);
    match (any(SyncDirection::Both), any(SyncDirection::ToBc), any(SyncDirection::ToDataverse)) {
        (true, _, _) | (false, true, true) => SyncDirection::Both,
        (false, true, false) => SyncDirection::ToBc,
        (false, false, true) => SyncDirection::ToDataverse,
        (false, false, false) => SyncDirection::Both,
    }
}

fn ensure_fields_exist(
    symbols: &impl SymbolQuery,
    table: &str,
    names: impl IntoIterator<Item = String>,
) -> Result<(), GenerateError> {
    let known: HashSet<String> = symbols
        .table_fields(table)?
        .into_iter()
        .map(|f| f.name)
        .collect();
    for name in names {
        if !known.contains(&name) {
            return Err(GenerateError::InvalidMappings(format!(
                "The {name} field does not exist on the {table} table."
            )));
        }
    }
    Ok(())
}

/// Names and quoted forms reused across the codeunit body.
struct Names {
    bc_table: String,
    short_bc_table: String,
    proxy_table: String,
    short_proxy_table: String,
}

impl Names {
    fn new(target: &CouplingTarget) -> Self {
        Self {
            bc_table: quote_if_special(&target.bc_table),
            short_bc_table: sanitize_identifier(&target.bc_table),
            proxy_table: quote_if_special(&target.proxy_table),
            short_proxy_table: sanitize_identifier(&target.proxy_table),
        }
    }
}

/// A codeunit that registers the integration table mapping between the
/// Business Central table and the proxy table, with one field mapping per
/// entry in `mappings`.
pub fn mapping_codeunit(
    symbols: &impl SymbolQuery,
    target: &CouplingTarget,
    mappings: &[FieldMapping],
) -> Result<Codeunit, GenerateError> {
    let mappings = curate_mappings(mappings.to_vec())?;
    ensure_fields_exist(
        symbols,
        &target.bc_table,
        mappings.iter().map(|m| m.bc_field.clone()),
    )?;
    ensure_fields_exist(
        symbols,
        &target.proxy_table,
        mappings
            .iter()
            .filter(|m| m.source == MappingSource::ProxyField)
            .map(|m| m.value.clone()),
    )?;

    page_on_table(symbols, &target.bc_table, "Card")
        .or_else(|| page_on_table(symbols, &target.bc_table, "List"))
        .ok_or_else(|| GenerateError::PageNotFound {
            kind: "card or list",
            table: target.bc_table.clone(),
        })?;
    let proxy_list_page = page_on_table(symbols, &target.proxy_table, "List").ok_or_else(|| {
        GenerateError::PageNotFound {
            kind: "list",
            table: target.proxy_table.clone(),
        }
    })?;
    let primary_key = symbols
        .primary_key_field(&target.proxy_table)
        .map(|pk| quote_if_special(&pk))
        .ok_or_else(|| GenerateError::PrimaryKeyNotFound(target.proxy_table.clone()))?;

    let names = Names::new(target);
    let direction = table_sync_direction(&mappings);
    let id = target.object_id(symbols)?;

    let codeunit = Codeunit::new(
        id,
        &truncate_object_name(&format!("{}-{} Map", target.proxy_table, target.bc_table)),
    )?
    .with_comment(format!(
        "// This codeunit maps the {} table to the {} table based on the Dataverse entity {}.",
        target.bc_table, target.proxy_table, target.entity
    ))
    .vars(vec![
        NamedValue::new(
            "IntegrationTablePrefixTok",
            Label::new("Dataverse").with_comment("Product name").locked(),
        ),
        NamedValue::new(
            "JobQueueEntryNameTok",
            Label::new("%1 - %2 synchronization job.").with_comment(
                "%1 = The Integration Table Name to synchronized (ex. CUSTOMER), %2 = CRM product name",
            ),
        ),
    ])
    .procedures(vec![
        handle_get_cds_table_no(target, &names),
        handle_lookup_crm_tables(target, &names),
        lookup_proxy(target, &names, &proxy_list_page, &primary_key),
        handle_add_entity_table_mapping(target, &names),
        handle_after_reset_configuration(target),
        add_mapping(target, &names, &mappings, &primary_key),
        get_table_filter_from_view(),
        insert_integration_field_mapping(),
        insert_integration_table_mapping(direction),
        recreate_job_queue_entry(),
        change_field_data(target, &names, direction),
    ]);

    tracing::debug!(
        "Generated mapping codeunit {} with {} field mappings ({})",
        codeunit.name(),
        mappings.len(),
        direction.integration_direction()
    );
    Ok(codeunit)
}

fn mapping_name(target: &CouplingTarget) -> String {
    format!(
        "{}-{}",
        sanitize_identifier(&target.bc_table.to_uppercase()),
        sanitize_identifier(&target.proxy_table.to_uppercase())
    )
}

fn mapping_procedure_name(target: &CouplingTarget) -> String {
    format!(
        "Add{}Mapping",
        sanitize_identifier(&format!("{}{}", target.bc_table, target.entity))
    )
}

fn crm_setup_defaults(event: &str) -> EventSubscriber {
    EventSubscriber::new(ObjectKind::Codeunit, "CRM Setup Defaults", event)
}

fn handle_get_cds_table_no(target: &CouplingTarget, names: &Names) -> Procedure {
    let mut code = TextAssembler::with(
        format!("if BCTableNo = DATABASE::{} then begin", names.bc_table),
        0,
    );
    code.append(format!("CDSTableNo := DATABASE::{};", names.proxy_table), 1)
        .append("handled := true;", 1)
        .append("end;", 0);

    Procedure::new("HandleOnGetCDSTableNo")
        .local()
        .subscribe(crm_setup_defaults("OnGetCDSTableNo"))
        .with_comment(format!(
            "// Declare that the {} table is mapped to the {} table.",
            target.proxy_table, target.bc_table
        ))
        .params(vec![
            Parameter::new("BCTableNo", Value::Integer),
            Parameter::by_reference("CDSTableNo", Value::Integer),
            Parameter::by_reference("handled", Value::Boolean),
        ])
        .code(code)
}

fn handle_lookup_crm_tables(target: &CouplingTarget, names: &Names) -> Procedure {
    let mut code = TextAssembler::with(
        format!("if CRMTableID = Database::{} then", names.proxy_table),
        0,
    );
    code.append(
        format!(
            "Handled := Lookup{}(SavedCRMId, CRMId, IntTableFilter);",
            names.short_proxy_table
        ),
        1,
    );

    Procedure::new("HandleOnLookupCRMTables")
        .local()
        .subscribe(EventSubscriber::new(
            ObjectKind::Codeunit,
            "Lookup CRM Tables",
            "OnLookupCRMTables",
        ))
        .with_comment(format!(
            "// Provide lookup functionality for the {} table that opens the page to show its contents.",
            target.proxy_table
        ))
        .params(vec![
            Parameter::new("CRMTableID", Value::Integer),
            Parameter::new("NAVTableId", Value::Integer),
            Parameter::new("SavedCRMId", Value::Guid),
            Parameter::by_reference("CRMId", Value::Guid),
            Parameter::new("IntTableFilter", Value::Text(None)),
            Parameter::by_reference("Handled", Value::Boolean),
        ])
        .code(code)
}

fn lookup_proxy(
    target: &CouplingTarget,
    names: &Names,
    proxy_list_page: &str,
    primary_key: &str,
) -> Procedure {
    let proxy = &names.short_proxy_table;
    let page = sanitize_identifier(proxy_list_page);

    let mut code = TextAssembler::new();
    code.append("if not IsNullGuid(CRMId) then begin", 0)
        .append(format!("if {proxy}.Get(CRMId) then"), 1)
        .append(format!("{page}.SetRecord({proxy});"), 2)
        .append("if not IsNullGuid(SavedCRMId) then", 1)
        .append(format!("if Original{proxy}.Get(SavedCRMId) then"), 2)
        .append(
            format!("{page}.SetCurrentlyCoupled{proxy}(Original{proxy});"),
            3,
        )
        .append("end;", 0)
        .append("", 0)
        .append(format!("{proxy}.SetView(IntTableFilter);"), 0)
        .append(format!("{page}.SetTableView({proxy});"), 0)
        .append(format!("{page}.LookupMode(true);"), 0)
        .append(
            format!("if {page}.RunModal = ACTION::LookupOK then begin"),
            0,
        )
        .append(format!("{page}.GetRecord({proxy});"), 1)
        .append(format!("CRMId := {proxy}.{primary_key};"), 1)
        .append("exit(true);", 1)
        .append("end;", 0)
        .append("exit(false);", 0);

    Procedure::new(&format!("Lookup{proxy}"))
        .local()
        .params(vec![
            Parameter::new("SavedCRMId", Value::Guid),
            Parameter::by_reference("CRMId", Value::Guid),
            Parameter::new("IntTableFilter", Value::Text(None)),
        ])
        .returns(Value::Boolean)
        .vars(vec![
            NamedValue::new(proxy, Value::record(target.proxy_table.as_str())),
            NamedValue::new(
                &format!("Original{proxy}"),
                Value::record(target.proxy_table.as_str()),
            ),
            NamedValue::new(&page, Value::page(proxy_list_page)),
        ])
        .code(code)
}

fn handle_add_entity_table_mapping(target: &CouplingTarget, names: &Names) -> Procedure {
    Procedure::new("HandleOnAddEntityTableMapping")
        .local()
        .subscribe(crm_setup_defaults("OnAddEntityTableMapping"))
        .params(vec![Parameter::by_reference(
            "TempNameValueBuffer",
            Value::temporary_record("Name/Value Buffer"),
        )])
        .vars(vec![NamedValue::new(
            "CRMSetupDefaults",
            Value::codeunit("CRM Setup Defaults"),
        )])
        .code(vec![
            format!(
                "CRMSetupDefaults.AddEntityTableMapping('{}', Database::{}, TempNameValueBuffer);",
                target.entity, names.bc_table
            ),
            format!(
                "CRMSetupDefaults.AddEntityTableMapping('{}', Database::{}, TempNameValueBuffer);",
                target.entity, names.proxy_table
            ),
        ])
}

fn handle_after_reset_configuration(target: &CouplingTarget) -> Procedure {
    let name = mapping_name(target);
    let mut call = format!(
        "{}('{}', true);",
        mapping_procedure_name(target),
        truncate(&name, MAPPING_NAME_LENGTH)
    );
    if name.chars().count() > MAPPING_NAME_LENGTH {
        call.push_str(&format!(" // truncated to {MAPPING_NAME_LENGTH} characters from {name}"));
    }

    Procedure::new("HandleOnAfterResetConfiguration")
        .local()
        .subscribe(EventSubscriber::new(
            ObjectKind::Codeunit,
            "CDS Setup Defaults",
            "OnAfterResetConfiguration",
        ))
        .params(vec![Parameter::new(
            "CDSConnectionSetup",
            Value::record("CDS Connection Setup"),
        )])
        .code(call)
}

/// One `InsertIntegrationFieldMapping` call per mapping.
pub fn field_mapping_code(
    mappings: &[FieldMapping],
    proxy_table: &str,
    short_bc_table: &str,
) -> TextAssembler {
    let mut code = TextAssembler::new();
    for m in mappings {
        let (field_no, constant, direction) = match m.source {
            MappingSource::Constant => ("0".to_string(), m.value.as_str(), SyncDirection::ToBc),
            MappingSource::ProxyField => (
                format!(
                    "{}.FieldNo({})",
                    sanitize_identifier(proxy_table),
                    quote_if_special(&m.value)
                ),
                "",
                m.direction,
            ),
        };
        code.append(
            format!("// Map {} {} to {}", m.source.describe(), m.value, m.bc_field),
            0,
        )
        .append(
            format!(
                "InsertIntegrationFieldMapping(IntegrationTableMappingName, {short_bc_table}.FieldNo({}),",
                quote_if_special(&m.bc_field)
            ),
            0,
        )
        .append(
            format!(
                "{field_no}, IntegrationTableMapping.Direction::{}, '{constant}', true, false);",
                direction.integration_direction()
            ),
            1,
        );
    }
    code
}

fn add_mapping(
    target: &CouplingTarget,
    names: &Names,
    mappings: &[FieldMapping],
    primary_key: &str,
) -> Procedure {
    let proxy = &names.short_proxy_table;

    let mut code = TextAssembler::new();
    code.append("InsertIntegrationTableMapping(", 0)
        .append("IntegrationTableMapping, IntegrationTableMappingName,", 1)
        .append(
            format!(
                "Database::{}, Database::{},",
                names.bc_table, names.proxy_table
            ),
            1,
        )
        .append(
            format!("{proxy}.FieldNo({primary_key}), {proxy}.FieldNo(ModifiedOn),"),
            1,
        )
        .append("'', '', true);", 1)
        .append("", 0)
        .append(format!("{proxy}.Reset();"), 0)
        .append(
            format!("// Add filters on the {} table before sync", target.proxy_table),
            0,
        )
        .append("IntegrationTableMapping.SetIntegrationTableFilter(", 0)
        .append(
            format!(
                "GetTableFilterFromView(Database::{}, {proxy}.TableCaption(), {proxy}.GetView()));",
                names.proxy_table
            ),
            1,
        )
        .append("IntegrationTableMapping.Modify();", 0)
        .append("", 0)
        .append(
            field_mapping_code(mappings, &target.proxy_table, &names.short_bc_table),
            0,
        )
        .append("", 0)
        .append(
            "RecreateJobQueueEntryFromIntTableMapping(IntegrationTableMapping, 30, ShouldRecreateJobQueueEntry, 720);",
            0,
        );

    Procedure::new(&mapping_procedure_name(target))
        .local()
        .params(vec![
            Parameter::new("IntegrationTableMappingName", Value::code(20)),
            Parameter::new("ShouldRecreateJobQueueEntry", Value::Boolean),
        ])
        .vars(vec![
            NamedValue::new(
                "IntegrationTableMapping",
                Value::record("Integration Table Mapping"),
            ),
            NamedValue::new(
                "IntegrationFieldMapping",
                Value::record("Integration Field Mapping"),
            ),
            NamedValue::new(proxy, Value::record(target.proxy_table.as_str())),
            NamedValue::new(
                &names.short_bc_table,
                Value::record(target.bc_table.as_str()),
            ),
        ])
        .code(code)
}

fn get_table_filter_from_view() -> Procedure {
    Procedure::new("GetTableFilterFromView")
        .local()
        .params(vec![
            Parameter::new("TableID", Value::Integer),
            Parameter::new("Caption", Value::Text(None)),
            Parameter::new("View", Value::Text(None)),
        ])
        .returns(Value::Text(None))
        .vars(vec![NamedValue::new(
            "FilterBuilder",
            Value::FilterPageBuilder,
        )])
        .code(vec![
            "FilterBuilder.AddTable(Caption, TableID);",
            "FilterBuilder.SetView(Caption, View);",
            "exit(FilterBuilder.GetView(Caption, true));",
        ])
}

fn insert_integration_field_mapping() -> Procedure {
    let mut code = TextAssembler::with(
        "IntegrationFieldMapping.CreateRecord(IntegrationTableMappingName, TableFieldNo, IntegrationTableFieldNo, SyncDirection,",
        0,
    );
    code.append(
        "ConstValue, ValidateField, ValidateIntegrationTableField);",
        1,
    );

    Procedure::new("InsertIntegrationFieldMapping")
        .local()
        .params(vec![
            Parameter::new("IntegrationTableMappingName", Value::code(20)),
            Parameter::new("TableFieldNo", Value::Integer),
            Parameter::new("IntegrationTableFieldNo", Value::Integer),
            Parameter::new("SyncDirection", Value::Integer),
            Parameter::new("ConstValue", Value::Text(None)),
            Parameter::new("ValidateField", Value::Boolean),
            Parameter::new("ValidateIntegrationTableField", Value::Boolean),
        ])
        .vars(vec![NamedValue::new(
            "IntegrationFieldMapping",
            Value::record("Integration Field Mapping"),
        )])
        .code(code)
}

fn insert_integration_table_mapping(direction: SyncDirection) -> Procedure {
    let mut code = TextAssembler::with(
        "IntegrationTableMapping.CreateRecord(MappingName, TableNo, IntegrationTableNo, IntegrationTableUIDFieldNo,",
        0,
    );
    code.append(
        "IntegrationTableModifiedFieldNo, TableConfigTemplateCode, IntegrationTableConfigTemplateCode,",
        1,
    )
    .append(
        format!(
            "SynchOnlyCoupledRecords, IntegrationTableMapping.Direction::{}, IntegrationTablePrefixTok);",
            direction.integration_direction()
        ),
        1,
    );

    Procedure::new("InsertIntegrationTableMapping")
        .local()
        .params(vec![
            Parameter::by_reference(
                "IntegrationTableMapping",
                Value::record("Integration Table Mapping"),
            ),
            Parameter::new("MappingName", Value::code(20)),
            Parameter::new("TableNo", Value::Integer),
            Parameter::new("IntegrationTableNo", Value::Integer),
            Parameter::new("IntegrationTableUIDFieldNo", Value::Integer),
            Parameter::new("IntegrationTableModifiedFieldNo", Value::Integer),
            Parameter::new("TableConfigTemplateCode", Value::code(10)),
            Parameter::new("IntegrationTableConfigTemplateCode", Value::code(10)),
            Parameter::new("SynchOnlyCoupledRecords", Value::Boolean),
        ])
        .code(code)
}

fn recreate_job_queue_entry() -> Procedure {
    let mut code = TextAssembler::new();
    code.append(
        vec![
            "JobQueueEntry.SetRange(\"Object Type to Run\", JobQueueEntry.\"Object Type to Run\"::Codeunit);",
            "JobQueueEntry.SetRange(\"Object ID to Run\", Codeunit::\"Integration Synch. Job Runner\");",
            "JobQueueEntry.SetRange(\"Record ID to Process\", IntegrationTableMapping.RecordId);",
            "JobQueueEntry.DeleteTasks();",
            "",
            "JobQueueEntry.InitRecurringJob(IntervalInMinutes);",
            "JobQueueEntry.\"Object Type to Run\" := JobQueueEntry.\"Object Type to Run\"::Codeunit;",
            "JobQueueEntry.\"Object ID to Run\" := Codeunit::\"Integration Synch. Job Runner\";",
            "JobQueueEntry.\"Record ID to Process\" := IntegrationTableMapping.RecordId;",
            "JobQueueEntry.\"Run in User Session\" := false;",
            "JobQueueEntry.Description :=",
        ],
        0,
    )
    .append(
        "CopyStr(StrSubstNo(JobQueueEntryNameTok, IntegrationTableMapping.Name, 'Dataverse'), 1, MaxStrLen(JobQueueEntry.Description));",
        1,
    )
    .append(
        vec![
            "JobQueueEntry.\"Maximum No. of Attempts to Run\" := 10;",
            "JobQueueEntry.Status := JobQueueEntry.Status::Ready;",
            "JobQueueEntry.\"Rerun Delay (sec.)\" := 30;",
            "JobQueueEntry.\"Inactivity Timeout Period\" := InactivityTimeoutPeriod;",
            "if ShouldRecreateJobQueueEntry then",
        ],
        0,
    )
    .append(
        "Codeunit.Run(Codeunit::\"Job Queue - Enqueue\", JobQueueEntry)",
        1,
    )
    .append("else", 0)
    .append("JobQueueEntry.Insert(true);", 1);

    Procedure::new("RecreateJobQueueEntryFromIntTableMapping")
        .local()
        .params(vec![
            Parameter::new(
                "IntegrationTableMapping",
                Value::record("Integration Table Mapping"),
            ),
            Parameter::new("IntervalInMinutes", Value::Integer),
            Parameter::new("ShouldRecreateJobQueueEntry", Value::Boolean),
            Parameter::new("InactivityTimeoutPeriod", Value::Integer),
        ])
        .vars(vec![NamedValue::new(
            "JobQueueEntry",
            Value::record("Job Queue Entry"),
        )])
        .code(code)
}

fn transfer_block(heading: &str, from: (&str, &str), to: (&str, &str)) -> TextAssembler {
    let ((from, short_from), (to, short_to)) = (from, to);
    let mut out = TextAssembler::with(heading, 0);
    out.append(
        format!(
            "if (SourceRecordRef.Number = Database::{from}) and (DestinationRecordRef.Number = Database::{to}) then begin"
        ),
        0,
    )
    .append(format!("SourceRecordRef.SetTable({short_from});"), 1)
    .append(format!("DestinationRecordRef.SetTable({short_to});"), 1)
    .append(format!("// initialize or transform {to} fields"), 1)
    .append(format!("// {short_to}.field := value;"), 1)
    .append(format!("DestinationRecordRef.GetTable({short_to});"), 1)
    .append("end;", 0);
    out
}

/// Hooks for transforming records before fields are transferred, one block
/// per direction the table mapping synchronizes in.
pub fn field_transformation_code(
    bc_table: &str,
    proxy_table: &str,
    direction: SyncDirection,
) -> TextAssembler {
    let (bc, short_bc) = (quote_if_special(bc_table), sanitize_identifier(bc_table));
    let (proxy, short_proxy) = (quote_if_special(proxy_table), sanitize_identifier(proxy_table));

    let mut code = TextAssembler::new();
    if matches!(direction, SyncDirection::Both | SyncDirection::ToDataverse) {
        code.append(
            transfer_block(
                "// Initialize before moving data from the Business Central table to the Dataverse",
                (bc.as_str(), short_bc.as_str()),
                (proxy.as_str(), short_proxy.as_str()),
            ),
            0,
        );
    }
    if matches!(direction, SyncDirection::Both | SyncDirection::ToBc) {
        code.append(
            transfer_block(
                "// Initialize before moving data from the Dataverse to the Business Central table",
                (proxy.as_str(), short_proxy.as_str()),
                (bc.as_str(), short_bc.as_str()),
            ),
            0,
        );
    }
    code
}

fn change_field_data(target: &CouplingTarget, names: &Names, direction: SyncDirection) -> Procedure {
    Procedure::new("ChangeFieldDataOnBeforeTransferRecordFields")
        .local()
        .subscribe(EventSubscriber::new(
            ObjectKind::Codeunit,
            "Integration Rec. Synch. Invoke",
            "OnBeforeTransferRecordFields",
        ))
        .params(vec![
            Parameter::new("SourceRecordRef", Value::RecordRef),
            Parameter::by_reference("DestinationRecordRef", Value::RecordRef),
        ])
        .vars(vec![
            NamedValue::new(
                &names.short_proxy_table,
                Value::record(target.proxy_table.as_str()),
            ),
            NamedValue::new(&names.short_bc_table, Value::record(target.bc_table.as_str())),
        ])
        .code(field_transformation_code(
            &target.bc_table,
            &target.proxy_table,
            direction,
        ))
}
