pub mod job;
pub mod passenger;
pub mod prediction;
