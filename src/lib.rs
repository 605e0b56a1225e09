pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod scorecard;
pub mod stats;
pub mod storage;
pub mod tally;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_state;
