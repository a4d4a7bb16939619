pub mod locate;
pub mod vcs;

pub use locate::locate;
pub use vcs::{Git, Vcs};
