use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Section count {0} is out of range")]
    CountOutOfRange(i32),

    #[error("Duplicate SNO id {0} in CoreTOC")]
    DuplicateSnoId(i32),

    #[error("CoreTOC group offset {0} is outside the blob")]
    OffsetOutOfRange(i64),

    #[error("CoreTOC name pointer {0} is outside the blob")]
    NamePointerOutOfRange(i64),

    #[error("Root manifest has no \"Base\" entry")]
    BaseNotFound,

    #[error("CoreTOC.dat was not found in the Base sub-root")]
    CoreTocNotFound,

    #[error("Content hash {0} is not present in the encoding table")]
    ContentNotFound(String),

    #[error("Storage backend failure: {0}")]
    Storage(String),

    #[error("Load aborted by caller")]
    Aborted,
}
