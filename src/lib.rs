// Library surface for headless/integration tests and reuse.
// The TUI (main.rs, ui) stays bin-only.
pub mod app_dirs;
pub mod config;
pub mod controls;
pub mod export;
pub mod leaderboard;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod store;
pub mod targets;
pub mod util;
