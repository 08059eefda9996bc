use std::fmt;

use crate::format::{quote_if_special, single_quote};
use crate::text::TextAssembler;
use crate::{Comment, Render};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    ApplicationArea,
    Caption,
    DrillDownPageId,
    Editable,
    DataClassification,
    Enabled,
    ExternalName,
    Image,
    LookupPageId,
    PageType,
    Promoted,
    PromotedCategory,
    TableRelation,
    ToolTip,
    SourceTable,
    TableType,
    UsageCategory,
    Visible,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::ApplicationArea => "ApplicationArea",
            PropertyKind::Caption => "Caption",
            PropertyKind::DrillDownPageId => "DrillDownPageID",
            PropertyKind::Editable => "Editable",
            PropertyKind::DataClassification => "DataClassification",
            PropertyKind::Enabled => "Enabled",
            PropertyKind::ExternalName => "ExternalName",
            PropertyKind::Image => "Image",
            PropertyKind::LookupPageId => "LookupPageId",
            PropertyKind::PageType => "PageType",
            PropertyKind::Promoted => "Promoted",
            PropertyKind::PromotedCategory => "PromotedCategory",
            PropertyKind::TableRelation => "TableRelation",
            PropertyKind::ToolTip => "ToolTip",
            PropertyKind::SourceTable => "SourceTable",
            PropertyKind::TableType => "TableType",
            PropertyKind::UsageCategory => "UsageCategory",
            PropertyKind::Visible => "Visible",
        }
    }

    /// Format a raw value the way this property expects it in source.
    fn format_value(&self, raw: &str) -> String {
        match self {
            PropertyKind::Caption | PropertyKind::ToolTip => single_quote(raw),
            PropertyKind::SourceTable | PropertyKind::ExternalName => quote_if_special(raw),
            _ => raw.to_string(),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<Kind> = <value>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    comment: Option<Comment>,
    kind: PropertyKind,
    value: String,
}

impl Property {
    /// The value is formatted once, here; `true`, `50100` and `"All"` are all accepted.
    pub fn new(kind: PropertyKind, value: impl ToString) -> Self {
        Self {
            comment: None,
            value: kind.format_value(&value.to_string()),
            kind,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Render for Property {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        TextAssembler::with(format!("{} = {}", self.kind, self.value), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_and_tooltip_are_single_quoted() {
        let caption = Property::new(PropertyKind::Caption, "CDS cdm_worker");
        assert_eq!(caption.render().to_string(), "Caption = 'CDS cdm_worker'");

        let tooltip = Property::new(PropertyKind::ToolTip, "'Already quoted'");
        assert_eq!(tooltip.value(), "'Already quoted'");
    }

    #[test]
    fn test_table_names_quoted_only_when_special() {
        let plain = Property::new(PropertyKind::SourceTable, "Customer");
        assert_eq!(plain.render().to_string(), "SourceTable = Customer");

        let spaced = Property::new(PropertyKind::SourceTable, "CDS Worker");
        assert_eq!(spaced.render().to_string(), "SourceTable = \"CDS Worker\"");

        let external = Property::new(PropertyKind::ExternalName, "cdm_worker");
        assert_eq!(external.value(), "\"cdm_worker\"");
    }

    #[test]
    fn test_other_values_render_as_is() {
        assert_eq!(
            Property::new(PropertyKind::Editable, false).render().to_string(),
            "Editable = false"
        );
        assert_eq!(
            Property::new(PropertyKind::DrillDownPageId, 50100)
                .render()
                .to_string(),
            "DrillDownPageID = 50100"
        );
        assert_eq!(
            Property::new(PropertyKind::Visible, "DataverseIntegrationEnabled")
                .render()
                .to_string(),
            "Visible = DataverseIntegrationEnabled"
        );
    }
}
