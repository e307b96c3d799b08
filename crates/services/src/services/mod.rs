pub mod flash;
pub mod pages;
pub mod props;
pub mod props_validator;
pub mod schema;
pub mod version;
