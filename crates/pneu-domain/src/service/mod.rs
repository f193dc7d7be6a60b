//! Domain services

pub mod alert_emitter;
pub mod effects;
pub mod verification_engine;

pub use alert_emitter::decide;
pub use effects::{plan_effects, Effect, EffectKind};
pub use verification_engine::classify;
