mod spinner;

pub use spinner::create_spinner;
