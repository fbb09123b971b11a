use thiserror::Error;

/// Rejected engine configuration. Raised only at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("sprite width {sprite_width} must be smaller than strip width {strip_width}")]
    SpriteTooWide { strip_width: f64, sprite_width: f64 },

    #[error("{field} must be zero or greater, got {value}")]
    NegativeMargin { field: &'static str, value: f64 },

    #[error(
        "walkable span {span} leaves no room between the target margins (need more than {needed})"
    )]
    StripTooNarrow { span: f64, needed: f64 },

    #[error("damping must lie in (0, 1], got {0}")]
    DampingOutOfRange(f64),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
