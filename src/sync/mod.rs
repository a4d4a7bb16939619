pub mod driver;
pub mod state;

pub use driver::run;
