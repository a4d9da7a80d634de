use thiserror::Error;

/// Contract violations surfaced to callers. Expected game outcomes (a miss,
/// a failed save, resisted damage) are ordinary result values, never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("invalid dice formula: {0:?}")]
    InvalidFormula(String),

    #[error("unsupported die size: d{0}")]
    InvalidDieSize(u32),

    #[error("spell level must be 1-9, got {0}")]
    InvalidSpellLevel(u8),

    #[error("no level-{level} spell slot available")]
    NoSlotAvailable { level: u8 },

    #[error("unknown content id: {0:?}")]
    UnknownContent(String),
}
