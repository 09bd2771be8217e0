pub mod evaluation;
pub mod notifications;
pub mod placement;
pub mod resolution;

pub use evaluation::{settle, BetOutcome};
pub use notifications::NotificationService;
pub use placement::BetPlacementService;
pub use resolution::BetResolutionEngine;
