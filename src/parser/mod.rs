pub mod model_loader;
pub mod model_writer;

// Re-export key types from the parser module
pub use model_loader::{DescriptionLoader, MemoryLoader, ProtoModelLoader};
pub use model_writer::ModelWriter;
