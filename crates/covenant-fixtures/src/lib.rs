//! In-memory collaborator fakes: a `VectorIndex`, a `GraphStore`, a
//! scriptable `ModelProvider`, and a scriptable `PdfParser`. Exercises the
//! core pipeline without any real external service.

pub mod graph_store;
pub mod model_provider;
pub mod pdf_parser;
pub mod vector_index;

pub use graph_store::InMemoryGraphStore;
pub use model_provider::{ok_output, ScriptedProvider};
pub use pdf_parser::ScriptedPdfParser;
pub use vector_index::InMemoryVectorIndex;
