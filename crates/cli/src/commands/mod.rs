pub mod check;
pub mod debug;
pub mod languages;
pub mod reset;
pub mod watch;

pub use check::check_command;
pub use debug::debug_command;
pub use languages::languages_command;
pub use reset::reset_command;
pub use watch::watch_command;
