//! Configuration: built-in defaults, `code-review.yaml`, `.gitignore` and
//! environment overrides.

pub mod loader;
pub mod merge;
pub mod schema;

pub use loader::{CONFIG_FILE_NAME, load_config, parse_gitignore, read_config};
pub use merge::deep_merge;
pub use schema::{Config, DEFAULT_MAIN_TEMPLATE, LlmConfig, LlmCredentials, PromptTemplate};
