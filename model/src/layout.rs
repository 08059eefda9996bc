//! Page actions and the groups that hold actions or fields.

use std::fmt;

use crate::field::PageField;
use crate::method::Trigger;
use crate::node::{render_all, Comment, Render, Spacing};
use crate::property::Property;
use crate::text::TextAssembler;

/// `action(<name>) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    comment: Option<Comment>,
    name: String,
    properties: Vec<Property>,
    triggers: Vec<Trigger>,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            comment: None,
            name: name.into(),
            properties: Vec::new(),
            triggers: Vec::new(),
        }
    }

    pub fn props(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    /// `OnAction` triggers.
    pub fn triggers(mut self, triggers: Vec<Trigger>) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl Render for Action {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        let mut out = TextAssembler::with(format!("action({})", self.name), 0);
        out.append("{", 0);
        out.append(render_all(&self.properties, Spacing::Compact), 1);
        out.append(render_all(&self.triggers, Spacing::Separated), 1);
        out.append("}", 0);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Repeater,
    Group,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Repeater => "repeater",
            GroupKind::Group => "group",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared shape of [`ActionGroup`] and [`FieldGroup`].
struct GroupParts<'a, T: Render, G: Render> {
    kind: GroupKind,
    name: &'a str,
    properties: &'a [Property],
    items: &'a [T],
    item_spacing: Spacing,
    groups: &'a [G],
}

impl<T: Render, G: Render> GroupParts<'_, T, G> {
    fn render(&self) -> TextAssembler {
        let mut out = TextAssembler::with(format!("{}({})", self.kind, self.name), 0);
        out.append("{", 0);
        out.append(render_all(self.properties, Spacing::Compact), 1);
        out.append(render_all(self.items, self.item_spacing), 1);
        out.append(render_all(self.groups, Spacing::Separated), 1);
        out.append("}", 0);
        out
    }
}

/// `group(<name>)` holding actions and nested action groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGroup {
    comment: Option<Comment>,
    name: String,
    item_spacing: Spacing,
    properties: Vec<Property>,
    actions: Vec<Action>,
    groups: Vec<ActionGroup>,
}

impl ActionGroup {
    /// `item_spacing` decides whether a blank line precedes each action.
    pub fn new(name: impl Into<String>, item_spacing: Spacing) -> Self {
        Self {
            comment: None,
            name: name.into(),
            item_spacing,
            properties: Vec::new(),
            actions: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn props(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn groups(mut self, groups: Vec<ActionGroup>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl Render for ActionGroup {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        GroupParts {
            kind: GroupKind::Group,
            name: &self.name,
            properties: &self.properties,
            items: &self.actions,
            item_spacing: self.item_spacing,
            groups: &self.groups,
        }
        .render()
    }
}

/// `repeater(<name>)` or `group(<name>)` holding page fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    comment: Option<Comment>,
    kind: GroupKind,
    name: String,
    item_spacing: Spacing,
    properties: Vec<Property>,
    fields: Vec<PageField>,
    groups: Vec<FieldGroup>,
}

impl FieldGroup {
    /// `item_spacing` decides whether a blank line precedes each field.
    pub fn new(kind: GroupKind, name: impl Into<String>, item_spacing: Spacing) -> Self {
        Self {
            comment: None,
            kind,
            name: name.into(),
            item_spacing,
            properties: Vec::new(),
            fields: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn props(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    pub fn fields(mut self, fields: Vec<PageField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn groups(mut self, groups: Vec<FieldGroup>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Comment>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl Render for FieldGroup {
    fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    fn render_body(&self) -> TextAssembler {
        GroupParts {
            kind: self.kind,
            name: &self.name,
            properties: &self.properties,
            items: &self.fields,
            item_spacing: self.item_spacing,
            groups: &self.groups,
        }
        .render()
    }
}
