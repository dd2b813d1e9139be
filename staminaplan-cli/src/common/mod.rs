pub mod loader;
pub mod util;

pub use loader::{FileLoader, LoadError, PlanOverrides};
pub use util::split_csv;
