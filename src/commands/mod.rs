pub mod init_config;
pub mod layout;
pub mod now;
pub mod watch;
pub mod window;
