pub mod base;
pub mod youtube;
