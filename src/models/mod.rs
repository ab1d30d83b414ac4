//! Data models for the Lost & Found server

pub mod datetime;
pub mod item;
pub mod staff;
pub mod user;

// Re-export commonly used types
pub use item::{Item, ItemStatus, ItemView};
pub use staff::Staff;
pub use user::User;
