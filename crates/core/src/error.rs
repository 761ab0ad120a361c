use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenealogyError {
    /// The injected animal store failed (storage unavailable, query error,
    /// ...). A missing animal is *not* an error; stores signal that with
    /// `Ok(None)`.
    #[error("Animal store error: {0}")]
    Store(String),

    #[error("Pedigree error: {0}")]
    Pedigree(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GenealogyError>;
