pub mod navigation;
pub mod page;
