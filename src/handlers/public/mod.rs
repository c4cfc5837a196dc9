// handlers/public/mod.rs - Public handlers (no authentication)
//
// Security Level: None
// Route Prefix: / and /health (static media under /public is served by ServeDir)

pub mod health;

pub use health::{health, root};
