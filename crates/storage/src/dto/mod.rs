pub mod eco;
pub mod receipt;
