pub mod casefold;
pub mod channel;
pub mod commands;
pub mod connection;
pub mod constants;
pub mod errors;
pub mod message;
pub mod net;
pub mod parsers;
pub mod replies;
pub mod server;
