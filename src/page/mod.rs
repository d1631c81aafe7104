pub mod loader;
pub mod page_model;
