pub mod client;
pub mod day_bucket;
pub mod error;
pub mod freeze;
