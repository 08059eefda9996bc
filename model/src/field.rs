use crate::format::quote_if_special;
use crate::node::{render_all, Comment, Render, Spacing};
use crate::property::Property;
use crate::text::TextAssembler;
use crate::value::Value;

fn render_field(header: String, properties: &[Property]) -> TextAssembler {
    let mut out = TextAssembler::with(header, 0);
    out.append("{", 0);
    out.append(render_all(properties, Spacing::Compact), 1);
    out.append("}", 0);
    out
}

/// `field(<name>; <source expression>)` on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageField {
    comment: Option<Comment>,
    name: String,
    source: String,
    properties: Vec<Property>,
}

impl PageField {
    pub fn new(name: &str, source: impl Into<String>) -> Self {
        Self {
            comment: None,
            name: quote_if_special(name),
            source: source.into(),
            properties: Vec::new(),
        }
    }

    pub fn props(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Render for PageField {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        render_field(format!("field({}; {})", self.name, self.source), &self.properties)
    }
}

/// `field(<id>; <name>; <type>)` on a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableField {
    comment: Option<Comment>,
    id: u32,
    name: String,
    value: Value,
    properties: Vec<Property>,
}

impl TableField {
    pub fn new(id: u32, name: &str, value: Value) -> Self {
        Self {
            comment: None,
            id,
            name: quote_if_special(name),
            value,
            properties: Vec::new(),
        }
    }

    pub fn props(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Render for TableField {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        render_field(
            format!("field({}; {}; {})", self.id, self.name, self.value),
            &self.properties,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyKind;

    #[test]
    fn test_table_field_quotes_special_names() {
        let field = TableField::new(1, "Name With Space", Value::Boolean)
            .props(vec![Property::new(PropertyKind::Editable, false)]);
        assert_eq!(
            field.render().lines(),
            &[
                "field(1; \"Name With Space\"; Boolean)",
                "{",
                "    Editable = false;",
                "}",
            ]
        );
    }

    #[test]
    fn test_page_field_without_properties() {
        let field = PageField::new("No.", "Rec.\"No.\"");
        assert_eq!(field.render().lines(), &["field(\"No.\"; Rec.\"No.\")", "{", "}"]);
    }

    #[test]
    fn test_typed_table_field() {
        let field = TableField::new(50100, "Description", Value::text(100));
        assert_eq!(field.render().lines()[0], "field(50100; Description; Text[100])");
    }
}
