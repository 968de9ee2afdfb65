pub mod policy;
pub mod tree;

pub use policy::{InstallAction, InstallDecision, PolicySet};
pub use tree::{install_tree, DYNAMIC_PREFIX, TEMPLATE_SUFFIX};
