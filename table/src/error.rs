use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("lucky number out of range (got={got}, max={max})")]
    InvalidLuckyNumber { got: u8, max: u8 },
    #[error("{field} is invalid: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("chip with face value {value} already exists")]
    DuplicateChip { value: u64 },
    #[error("cannot spin while chip {value} is being dragged")]
    ChipInHand { value: u64 },
}
