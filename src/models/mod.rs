pub mod common;
pub mod grades;
pub mod notifications;
pub mod session;
pub mod students;
pub mod terms;

pub use common::response::ApiResponse;
