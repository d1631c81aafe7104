pub mod clear;
pub mod fill;
pub mod serialize;
