pub mod init;
pub mod list_sources;
pub mod play;
pub mod validate;
