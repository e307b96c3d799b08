//! Wire types shared by the server adapter and the navigating client.

pub mod headers;
pub mod models;

pub use models::{
    navigation::{NavigationRequest, PartialReload, VisitMethod},
    page::PageObject,
};
