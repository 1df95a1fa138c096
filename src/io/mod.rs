pub mod config_file;
pub mod csv;
pub mod json;

pub use config_file::RunFile;
