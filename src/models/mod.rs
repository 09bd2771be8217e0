pub mod bet;
pub mod common;
pub mod league;
pub mod matches;
pub mod team;
pub mod user;
