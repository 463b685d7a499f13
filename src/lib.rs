pub mod config;
pub mod coords;
pub mod definition;
pub mod direction;
pub mod engine;
pub mod lawn;
pub mod logging;
pub mod messages;
pub mod mower;
pub mod report;
pub mod results;

// Re-exports for convenience in tests and integration users.
pub use config::{Config, ConfigError};
pub use coords::{Cell, LawnBounds};
pub use definition::{Definition, DefinitionError};
pub use direction::{Direction, ParseDirectionError};
pub use engine::Engine;
pub use lawn::{Lawn, Terrain};
pub use messages::MessageLog;
pub use mower::{CrashReason, MowerState, MowerStatus};
pub use report::{SimStatus, format_report, format_summary};
pub use results::{ResultsError, load_status, save_status};
