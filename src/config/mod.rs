pub mod loader;
pub mod model;

pub use loader::{export_project, load_project, ConfigOverrides};
pub use model::{ExecutionContext, OntologyProject};
