pub mod catalog;
pub mod dataset;
pub mod display;
pub mod recommendations;
pub mod sessions;

pub use catalog::CatalogIndex;
pub use sessions::{Session, SessionStore};
