pub mod connection;
pub mod credential_loader;
pub mod preparer;

pub use connection::ConnectionFactory;
pub use preparer::prepare;
