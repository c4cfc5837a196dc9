pub mod subscription_gate;

pub use subscription_gate::{AccessDecision, SubscriptionGate, ACCESS_DENIED};
