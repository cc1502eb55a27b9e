pub mod classify;
pub mod message;
pub mod model;
pub mod rotation;

pub use classify::*;
pub use model::*;
pub use rotation::{select_reviewer, ActivityLog};
