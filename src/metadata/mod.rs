//! Build metadata: description composition and generated artifacts
//!
//! - **document**: template rendering and license loading
//! - **emitter**: whole-file replacement of the description and module
//! - **module**: generated module layout, rendering and re-reading
//! - **literal**: string literal quoting for the module

pub mod document;
pub mod emitter;
pub mod literal;
pub mod module;

pub use document::{ComposedDocument, DocumentComposer, read_license};
pub use emitter::{GeneratedArtifact, MetadataEmitter};
pub use module::PriorModule;
