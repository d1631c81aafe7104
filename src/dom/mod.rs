pub mod dom_model;
pub mod message;
pub mod selector;
