//! # alforge-model
//!
//! Object model and source serializer for AL, the language of Business
//! Central extensions.
//!
//! - **Text assembly** - indentable line builder every node renders into
//! - **Formatting rules** - quoting, identifier sanitizing and name truncation
//! - **Nodes** - properties, variables, procedures, triggers, actions, page
//!   groups, fields and the top-level objects that own them
//! - **Generation** - routines that build complete objects from symbol lookups
//! - **Writer** - writes a serialized object to `<name>.<kind>.al`
//!
//! ## Example
//!
//! ```rust,ignore
//! use alforge_model::{Codeunit, NamedValue, Procedure, Value};
//!
//! let codeunit = Codeunit::new(50100, "Worker Sync")?
//!     .vars(vec![NamedValue::new("Enabled", Value::Boolean)])
//!     .procedures(vec![Procedure::new("Run").code("Enabled := true;")]);
//! println!("{}", codeunit.serialize());
//! ```

pub mod error;
pub mod field;
pub mod format;
pub mod generate;
pub mod layout;
pub mod method;
pub mod node;
pub mod object;
pub mod property;
pub mod text;
pub mod value;
pub mod writer;

pub use error::{GenerateError, ModelError, WriteError};
pub use field::{PageField, TableField};
pub use layout::{Action, ActionGroup, FieldGroup, GroupKind};
pub use method::{EventSubscriber, Procedure, Trigger, TriggerKind};
pub use node::{render_all, Comment, Render, Spacing};
pub use object::{AlObject, Codeunit, Declaration, ObjectKind, Page, Table, BANNER};
pub use property::{Property, PropertyKind};
pub use text::{Fragment, TextAssembler};
pub use value::{Label, NamedValue, ObjectRef, Parameter, ReturnValue, Value};
pub use writer::write_object;
