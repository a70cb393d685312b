//! Template rendering and document access for student account views.
//!
//! This crate provides:
//! - `Renderer` / `TemplateRegistry` - Named templates turned into markup
//! - `Dom` / `MemoryDom` - The document operations a view needs, and an
//!   in-memory document for fixtures
//! - `Selector` - `#id` / `.class` element addressing

mod dom;
mod error;
mod selector;
mod template;
pub mod templates;

pub use dom::{Dom, MemoryDom, HIDDEN_CLASS};
pub use error::ViewError;
pub use selector::Selector;
pub use template::{escape_html, Renderer, TemplateRegistry};
