pub mod config;
pub mod logging;

pub mod client;
pub mod convert;
pub mod jobspace;
pub mod request;
pub mod retry;
