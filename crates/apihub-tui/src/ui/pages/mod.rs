//! Content for each route.

pub mod api_doc;
pub mod forms;
pub mod home;
