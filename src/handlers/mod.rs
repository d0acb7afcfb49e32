// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Elevated (admin JWT required, /api/root/*)
pub mod elevated;
pub mod public;
