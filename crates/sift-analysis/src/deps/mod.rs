//! Dependency inference between signals and its application back onto them.

mod apply;
pub mod dag;
mod infer;

pub use apply::apply_deps_to_signals;
pub use infer::infer_dependencies;
