pub mod progression;
pub mod ranking;
pub mod scoring;
pub mod standings;
pub mod validation;
