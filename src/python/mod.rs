pub mod support;
pub mod version;
