pub mod analysis;
pub mod fetch;
pub mod process;
