pub mod decision;
pub mod evaluate;

pub use decision::{
    ClassificationVerdict, DenialReason, RenderDecision, VariantChoice, TARGETS_NOT_FOUND,
};
pub use evaluate::{decide, verdict_for};
