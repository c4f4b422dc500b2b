use thiserror::Error;

#[derive(Error, Debug)]
pub enum EhtError {
    #[error("allocation failure")]
    Alloc,
    #[error("requested capacity overflows usize arithmetic")]
    CapacityOverflow,
}

pub type Result<T> = std::result::Result<T, EhtError>;
