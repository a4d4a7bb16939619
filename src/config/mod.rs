pub mod paths;
pub mod tasks;

pub use paths::{default_config_path, expand_home};
pub use tasks::{load_tasks, Action, RepoTask};
