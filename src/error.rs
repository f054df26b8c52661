use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("atlas map index {0} is outside 1..=26")]
    AtlasIndexOutOfRange(i64),

    #[error("no map selected: give an atlas index or both corner coordinates")]
    MissingMapSelection,

    #[error("malformed coordinate {input:?}: {reason}")]
    CoordinateParse { input: String, reason: String },

    /// The frame corners project onto a line or a point, so no scale exists.
    #[error("chart corners span an empty area")]
    DegenerateFrame,

    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}

impl ChartError {
    pub fn coordinate_parse(input: &str, reason: impl Into<String>) -> Self {
        Self::CoordinateParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::InvalidConfig {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
