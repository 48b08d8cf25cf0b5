pub type MorphResult<T> = Result<T, MorphError>;

#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    #[error("word list must contain at least one word")]
    EmptyWordList,

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error(
        "surface too small: need {needed_width}x{needed_height} cells, have {actual_width}x{actual_height}"
    )]
    SurfaceTooSmall {
        needed_width: u16,
        needed_height: u16,
        actual_width: u16,
        actual_height: u16,
    },
}

impl MorphError {
    pub fn invalid_duration(msg: impl Into<String>) -> Self {
        Self::InvalidDuration(msg.into())
    }
}
