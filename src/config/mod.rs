//! Configuration for the re-dubbing pipeline.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each
//! collaborator boundary, `AppPaths` for the platform settings location, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save_to`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, MediaConfig, RewriteConfig, SttConfig, TtsConfig};
