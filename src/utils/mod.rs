pub mod color;
pub mod entropy;
pub mod file_size;
