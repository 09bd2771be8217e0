pub mod match_completion_service;

pub use match_completion_service::MatchCompletionService;
