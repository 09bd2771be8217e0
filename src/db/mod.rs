pub mod bet_queries;
pub mod injuries;
pub mod match_queries;
pub mod records;
