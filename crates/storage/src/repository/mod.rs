pub mod receipt;
pub mod transaction;
