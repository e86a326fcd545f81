use thiserror::Error;

pub mod todo;


/// Failure reported by a driven port when a write targets data that may not be there
#[derive(Error, Debug)]
pub enum DrivenPortError {
    #[error("a communication failure occurred: {0}")]
    CommsFailure(#[from] anyhow::Error),
    #[error("the requested data does not exist")]
    DoesNotExist,
}
