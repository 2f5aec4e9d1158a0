//! HTTP API for nexus-sync

pub mod assignments;
pub mod health;
pub mod proxy;
pub mod sync;

pub use assignments::assignment_routes;
pub use health::health_routes;
pub use proxy::proxy_routes;
pub use sync::sync_routes;
