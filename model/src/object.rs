//! Top-level declarations: codeunits, pages and tables with their extensions.

use std::fmt;

use crate::error::ModelError;
use crate::field::{PageField, TableField};
use crate::format::{quote_if_special, sanitize_identifier, MAX_OBJECT_NAME_LENGTH};
use crate::layout::{Action, ActionGroup, FieldGroup};
use crate::method::{Procedure, Trigger};
use crate::node::{render_all, Comment, Spacing};
use crate::property::Property;
use crate::text::TextAssembler;
use crate::value::NamedValue;

/// Prepended to every generated object.
pub const BANNER: [&str; 4] = [
    "// This file contains AL code that has been generated programmatically using a tool.",
    "// You are responsible for ensuring that it aligns with the best practices for",
    "// AL development. The makers of the tool are not responsible for the consequences",
    "// of executing this code in a production environment.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Codeunit,
    Page,
    PageExtension,
    Table,
    TableExtension,
}

impl ObjectKind {
    /// Keyword opening the declaration, also used in file names.
    pub fn keyword(&self) -> &'static str {
        match self {
            ObjectKind::Codeunit => "codeunit",
            ObjectKind::Page => "page",
            ObjectKind::PageExtension => "pageextension",
            ObjectKind::Table => "table",
            ObjectKind::TableExtension => "tableextension",
        }
    }

    /// Name in `ObjectType::<name>` expressions.
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Codeunit => "Codeunit",
            ObjectKind::Page => "Page",
            ObjectKind::PageExtension => "PageExtension",
            ObjectKind::Table => "Table",
            ObjectKind::TableExtension => "TableExtension",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Whether a page or table defines a new object or extends an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Base,
    Extension { extends: String },
}

/// State every object kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Common {
    comment: Option<Comment>,
    id: u32,
    name: String,
    properties: Vec<Property>,
    variables: Vec<NamedValue>,
    triggers: Vec<Trigger>,
    procedures: Vec<Procedure>,
}

impl Common {
    /// Only the alphanumeric characters of `name` count towards the limit.
    /// The generators pass every name through `truncate_object_name` first,
    /// which keeps the full header name within it as well.
    fn new(kind: ObjectKind, id: u32, name: &str) -> Result<Self, ModelError> {
        if sanitize_identifier(name).chars().count() > MAX_OBJECT_NAME_LENGTH {
            return Err(ModelError::NameTooLong {
                kind,
                name: name.to_string(),
                limit: MAX_OBJECT_NAME_LENGTH,
            });
        }
        Ok(Self {
            comment: None,
            id,
            name: quote_if_special(name),
            properties: Vec::new(),
            variables: Vec::new(),
            triggers: Vec::new(),
            procedures: Vec::new(),
        })
    }

    fn render(
        &self,
        kind: ObjectKind,
        declaration: &Declaration,
        custom: TextAssembler,
    ) -> TextAssembler {
        let header = match declaration {
            Declaration::Base => format!("{} {} {}", kind, self.id, self.name),
            Declaration::Extension { extends } => format!(
                "{} {} {} extends {}",
                kind,
                self.id,
                self.name,
                quote_if_special(extends)
            ),
        };

        let mut out = TextAssembler::with(BANNER.to_vec(), 0);
        out.append(self.comment.clone(), 0);
        out.append(header, 0);
        out.append("{", 0);
        out.append(render_all(&self.properties, Spacing::Compact), 1);
        out.append(custom, 1);
        out.append(render_all(&self.triggers, Spacing::Separated), 1);
        out.append("", 0);
        if !self.variables.is_empty() {
            out.append("var", 1);
            out.append(render_all(&self.variables, Spacing::Compact), 2);
        }
        out.append(render_all(&self.procedures, Spacing::Separated), 1);
        out.append("}", 0);
        out
    }
}

macro_rules! object_builders {
    ($ty:ty) => {
        impl $ty {
            pub fn props(mut self, properties: Vec<Property>) -> Self {
                self.common.properties = properties;
                self
            }

            /// Object-level (global) variables.
            pub fn vars(mut self, variables: Vec<NamedValue>) -> Self {
                self.common.variables = variables;
                self
            }

            pub fn triggers(mut self, triggers: Vec<Trigger>) -> Self {
                self.common.triggers = triggers;
                self
            }

            pub fn procedures(mut self, procedures: Vec<Procedure>) -> Self {
                self.common.procedures = procedures;
                self
            }

            /// Rendered right below the banner.
            pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
                self.common.comment = Some(comment.into());
                self
            }

            pub fn id(&self) -> u32 {
                self.common.id
            }

            /// The name as it appears in the header, quoted when needed.
            pub fn name(&self) -> &str {
                &self.common.name
            }

            pub fn serialize(&self) -> String {
                self.render().to_string()
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codeunit {
    common: Common,
}

impl Codeunit {
    pub fn new(id: u32, name: &str) -> Result<Self, ModelError> {
        Ok(Self {
            common: Common::new(ObjectKind::Codeunit, id, name)?,
        })
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Codeunit
    }

    pub fn render(&self) -> TextAssembler {
        self.common
            .render(self.kind(), &Declaration::Base, TextAssembler::new())
    }
}

object_builders!(Codeunit);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    common: Common,
    declaration: Declaration,
    fields: Vec<PageField>,
    field_groups: Vec<FieldGroup>,
    actions: Vec<Action>,
    action_groups: Vec<ActionGroup>,
}

impl Page {
    pub fn new(id: u32, name: &str) -> Result<Self, ModelError> {
        Self::declare(id, name, Declaration::Base)
    }

    /// A `pageextension` of the page named `extends`.
    pub fn extension(id: u32, name: &str, extends: &str) -> Result<Self, ModelError> {
        Self::declare(
            id,
            name,
            Declaration::Extension {
                extends: extends.to_string(),
            },
        )
    }

    fn declare(id: u32, name: &str, declaration: Declaration) -> Result<Self, ModelError> {
        let kind = match declaration {
            Declaration::Base => ObjectKind::Page,
            Declaration::Extension { .. } => ObjectKind::PageExtension,
        };
        Ok(Self {
            common: Common::new(kind, id, name)?,
            declaration,
            fields: Vec::new(),
            field_groups: Vec::new(),
            actions: Vec::new(),
            action_groups: Vec::new(),
        })
    }

    pub fn fields(mut self, fields: Vec<PageField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field_groups(mut self, groups: Vec<FieldGroup>) -> Self {
        self.field_groups = groups;
        self
    }

    pub fn actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn action_groups(mut self, groups: Vec<ActionGroup>) -> Self {
        self.action_groups = groups;
        self
    }

    pub fn kind(&self) -> ObjectKind {
        match self.declaration {
            Declaration::Base => ObjectKind::Page,
            Declaration::Extension { .. } => ObjectKind::PageExtension,
        }
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    pub fn render(&self) -> TextAssembler {
        let (content, processing) = match self.declaration {
            Declaration::Base => ("area(content)", "area(processing)"),
            Declaration::Extension { .. } => ("addlast(content)", "addlast(processing)"),
        };

        let mut custom = TextAssembler::new();
        custom.append(vec!["", "layout", "{"], 0);
        custom.append(vec![content, "{"], 1);
        custom.append(render_all(&self.fields, Spacing::Compact), 2);
        custom.append(render_all(&self.field_groups, Spacing::Compact), 2);
        custom.append("}", 1);
        custom.append(vec!["}", "actions", "{"], 0);
        custom.append(vec![processing, "{"], 1);
        custom.append(render_all(&self.actions, Spacing::Compact), 2);
        custom.append(render_all(&self.action_groups, Spacing::Compact), 2);
        custom.append("}", 1);
        custom.append("}", 0);

        self.common.render(self.kind(), &self.declaration, custom)
    }
}

object_builders!(Page);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    common: Common,
    declaration: Declaration,
    fields: Vec<TableField>,
}

impl Table {
    pub fn new(id: u32, name: &str) -> Result<Self, ModelError> {
        Self::declare(id, name, Declaration::Base)
    }

    /// A `tableextension` of the table named `extends`.
    pub fn extension(id: u32, name: &str, extends: &str) -> Result<Self, ModelError> {
        Self::declare(
            id,
            name,
            Declaration::Extension {
                extends: extends.to_string(),
            },
        )
    }

    fn declare(id: u32, name: &str, declaration: Declaration) -> Result<Self, ModelError> {
        let kind = match declaration {
            Declaration::Base => ObjectKind::Table,
            Declaration::Extension { .. } => ObjectKind::TableExtension,
        };
        Ok(Self {
            common: Common::new(kind, id, name)?,
            declaration,
            fields: Vec::new(),
        })
    }

    pub fn fields(mut self, fields: Vec<TableField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn kind(&self) -> ObjectKind {
        match self.declaration {
            Declaration::Base => ObjectKind::Table,
            Declaration::Extension { .. } => ObjectKind::TableExtension,
        }
    }

    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    pub fn render(&self) -> TextAssembler {
        let mut custom = TextAssembler::with(vec!["fields", "{"], 0);
        custom.append(render_all(&self.fields, Spacing::Compact), 1);
        custom.append("}", 0);

        self.common.render(self.kind(), &self.declaration, custom)
    }
}

object_builders!(Table);

/// Any top-level declaration, ready to be written to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlObject {
    Codeunit(Codeunit),
    Page(Page),
    Table(Table),
}

impl AlObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            AlObject::Codeunit(c) => c.kind(),
            AlObject::Page(p) => p.kind(),
            AlObject::Table(t) => t.kind(),
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            AlObject::Codeunit(c) => c.id(),
            AlObject::Page(p) => p.id(),
            AlObject::Table(t) => t.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AlObject::Codeunit(c) => c.name(),
            AlObject::Page(p) => p.name(),
            AlObject::Table(t) => t.name(),
        }
    }

    pub fn render(&self) -> TextAssembler {
        match self {
            AlObject::Codeunit(c) => c.render(),
            AlObject::Page(p) => p.render(),
            AlObject::Table(t) => t.render(),
        }
    }

    /// The full source text, CRLF separated.
    pub fn serialize(&self) -> String {
        self.render().to_string()
    }

    /// `<sanitized name>.<kind>.al`
    pub fn file_name(&self) -> String {
        format!("{}.{}.al", sanitize_identifier(self.name()), self.kind())
    }
}

impl From<Codeunit> for AlObject {
    fn from(codeunit: Codeunit) -> Self {
        AlObject::Codeunit(codeunit)
    }
}

impl From<Page> for AlObject {
    fn from(page: Page) -> Self {
        AlObject::Page(page)
    }
}

impl From<Table> for AlObject {
    fn from(table: Table) -> Self {
        AlObject::Table(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyKind;
    use crate::value::Value;

    #[test]
    fn test_name_length_counts_alphanumerics_only() {
        // 30 letters plus separators
        assert!(Codeunit::new(1, "Abcde Fghij Klmno Pqrst Uvwxy Zabcd").is_ok());

        let err = Codeunit::new(1, "Abcde Fghij Klmno Pqrst Uvwxy Zabcde").unwrap_err();
        assert_eq!(
            err,
            ModelError::NameTooLong {
                kind: ObjectKind::Codeunit,
                name: "Abcde Fghij Klmno Pqrst Uvwxy Zabcde".to_string(),
                limit: 30,
            }
        );
    }

    #[test]
    fn test_truncated_names_fit_the_header() {
        let name = crate::format::truncate_object_name("A B C D E F G H I J K L M N O P Q R S T");
        let codeunit = Codeunit::new(1, &name).unwrap();
        assert_eq!(codeunit.name(), "\"A B C D E F G H I J K L M N O \"");
        assert!(codeunit.name().trim_matches('"').chars().count() <= 30);
    }

    #[test]
    fn test_extension_error_names_extension_kind() {
        let err = Table::extension(1, &"x".repeat(31), "Customer").unwrap_err();
        assert!(matches!(
            err,
            ModelError::NameTooLong {
                kind: ObjectKind::TableExtension,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_codeunit_layout() {
        let codeunit = Codeunit::new(50100, "Worker Sync").unwrap();
        let rendered = codeunit.render();
        let body: Vec<&str> = rendered.lines()[BANNER.len()..]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(body, vec!["codeunit 50100 \"Worker Sync\"", "{", "", "}"]);
    }

    #[test]
    fn test_object_variables_sit_in_var_block() {
        let codeunit = Codeunit::new(50100, "Worker Sync")
            .unwrap()
            .with_comment("// Syncs workers.")
            .vars(vec![NamedValue::new("Enabled", Value::Boolean)]);
        let text = codeunit.serialize();
        assert!(text.contains(
            "// of executing this code in a production environment.\r\n// Syncs workers.\r\ncodeunit"
        ));
        assert!(text.ends_with("{\r\n\r\n    var\r\n        Enabled: Boolean;\r\n}"));
    }

    #[test]
    fn test_table_extension_header_and_fields() {
        let table = Table::extension(50100, "Employee Ext", "Employee")
            .unwrap()
            .fields(vec![TableField::new(50100, "Coupled to CRM", Value::Boolean)
                .props(vec![Property::new(PropertyKind::Editable, false)])]);

        let rendered = table.render();
        let body: Vec<&str> = rendered.lines()[BANNER.len()..]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(
            body,
            vec![
                "tableextension 50100 \"Employee Ext\" extends Employee",
                "{",
                "    fields",
                "    {",
                "        field(50100; \"Coupled to CRM\"; Boolean)",
                "        {",
                "            Editable = false;",
                "        }",
                "    }",
                "",
                "}",
            ]
        );
    }

    #[test]
    fn test_page_areas_depend_on_declaration() {
        let base = Page::new(50100, "Worker List").unwrap().serialize();
        let ext = Page::extension(50100, "Worker List", "Employee Card")
            .unwrap()
            .serialize();

        assert!(base.contains("    area(content)"));
        assert!(base.contains("    area(processing)"));
        assert!(!base.contains("extends"));
        assert!(ext.contains("    addlast(content)"));
        assert!(ext.contains("    addlast(processing)"));
        assert!(ext.contains("pageextension 50100 \"Worker List\" extends \"Employee Card\""));
    }

    #[test]
    fn test_file_name() {
        let page: AlObject = Page::extension(50100, "Employee Card Ext", "Employee Card")
            .unwrap()
            .into();
        assert_eq!(page.file_name(), "EmployeeCardExt.pageextension.al");
        assert_eq!(page.kind(), ObjectKind::PageExtension);
    }
}
