#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("empty transaction input")]
    EmptyInput,

    #[error("decode error: {reason}")]
    Decode { reason: String },

    #[error("payload error: {reason}")]
    Payload { reason: String },
}
