//! # scriptwright-schema
//!
//! Action schema loading and verb resolution for Scriptwright.
//!
//! A site-script schema describes its action vocabulary as a list of
//! alternatives, most of them `$ref` pointers into `definitions`. This crate
//! turns that document into verb-keyed tables and answers the questions the
//! editor asks while rendering and mutating a script:
//!
//! - which verbs may be added at the root, or under a given parent verb
//! - which schema fragment describes a node
//! - which form fields a fragment yields, and their default values
//!
//! ## Sources
//!
//! | Locator | Loaded from |
//! |---------|-------------|
//! | absent / empty | the embedded site-script schema |
//! | `/path/schema.json` | `schema.base_url` + path, over HTTP |
//! | `http(s)://...` | that URL |
//! | anything else | parsed as a JSON document |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use scriptwright_schema::SchemaResolver;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = SchemaResolver::with_default_source()?;
//! resolver.configure(None, false).await?;
//!
//! for verb in resolver.available_verbs()? {
//!     println!("{verb}");
//! }
//! let list = resolver.action_schema("createSPList")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod form;
pub mod resolver;
pub mod source;

pub use error::SchemaError;
pub use form::{
    coerce_value, declares_sub_actions, default_properties, default_value_for, form_fields,
    FieldKind, FieldValueError, FormField,
};
pub use resolver::{verb_of, ResolvedSchema, SchemaResolver};
pub use source::{parse_document, HttpSchemaSource, SchemaSource, SourceKind, DEFAULT_SCHEMA};
