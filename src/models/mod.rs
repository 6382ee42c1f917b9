pub mod config;
pub mod legacy;
pub mod leveling;

pub use config::*;
pub use legacy::{LegacyDailyGoal, LegacyDocument, LegacyGuildMeta, LegacyUserRecord};
pub use leveling::{DailyGoal, UserProfile};
