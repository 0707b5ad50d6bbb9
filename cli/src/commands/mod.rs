//! Command implementations for the people CLI.

pub mod render;
pub mod users;
pub mod watch;

pub use render::run_render;
pub use users::run_users;
pub use watch::run_watch;
