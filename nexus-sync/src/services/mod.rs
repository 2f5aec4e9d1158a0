//! Upstream client adapters
//!
//! One client per upstream system. Each hides that system's authentication
//! header conventions and endpoint layout and returns raw JSON records for
//! the normalizer.

pub mod canvas_client;
pub mod gradescope_client;

pub use canvas_client::{CanvasClient, CanvasConfig, CanvasError};
pub use gradescope_client::{GradescopeClient, GradescopeConfig, GradescopeError};
