pub mod cli;
pub mod config;
pub mod dates;
pub mod goals;
pub mod models;
pub mod storage;
pub mod store;
pub mod subscription;
pub mod utils;

pub use config::Config;
pub use models::{Goal, GoalColor, GoalIcon, NewGoal, PaymentOutcome};
pub use storage::Storage;
pub use store::AppStore;
pub use utils::Profile;
