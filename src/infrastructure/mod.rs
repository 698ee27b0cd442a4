pub mod logging;
pub mod observability;
pub mod storage;
pub mod user;
