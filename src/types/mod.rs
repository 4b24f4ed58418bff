pub mod climate;
pub mod forecast;
pub mod station;
