// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Pro (app key + subscription gate) → Collection (JWT,
// owner only) → Admin (JWT with admin flag)
//
pub mod admin;      // /subscription*: legacy subscription queue
pub mod collection; // /collection*: owner CRUD
pub mod pro;        // /pro/*: gated content reads
pub mod public;     // /, /health
