/// Database models
///
/// - `user`: Registered accounts and credential lookups
/// - `task`: Owner-scoped to-do items

pub mod task;
pub mod user;
