pub mod build;
pub mod init;
pub mod list;
pub mod new;
pub mod preview;
pub mod serve;
