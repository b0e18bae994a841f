pub mod adaptive;
pub mod curves;
pub mod generate;
pub mod init;
