//! Service layer - business logic orchestration
//!
//! The session manager owns authentication; the resource clients build on
//! the authenticated request helper. Each client covers one API resource.

mod children;
mod health;
pub mod logging;
mod nutrition;
mod request;
mod session;
mod stats;

pub use children::ChildrenClient;
pub use health::HealthClient;
pub use logging::{user_ref, EntryPoint, LogEntry, LogEvent, LoggingService};
pub use nutrition::NutritionClient;
pub use request::AuthenticatedRequest;
pub use session::SessionManager;
pub use stats::StatsClient;
