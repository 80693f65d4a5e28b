pub mod image;
pub mod tags_file;
