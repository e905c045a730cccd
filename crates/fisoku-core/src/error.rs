//! Error types for the fisoku-core library.

use std::fmt;

use thiserror::Error;

/// Errors raised while turning raw bytes into an OCR-ready image.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The bytes could not be decoded into a raster (corrupt or unsupported).
    #[error("unsupported or corrupt image: {0}")]
    Decode(#[from] image::ImageError),

    /// The decoded raster has no pixels.
    #[error("unsupported or corrupt image: {width}x{height} raster")]
    EmptyImage { width: u32, height: u32 },

    /// Failed to re-encode the normalized raster.
    #[error("failed to encode normalized image: {0}")]
    Encode(String),
}

/// Errors related to OCR text extraction.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The engine produced only whitespace.
    #[error("could not extract text from image")]
    NoTextFound,

    /// The engine failed to initialise (missing language data, bad model path).
    #[error("failed to initialise OCR engine: {0}")]
    Init(String),

    /// The engine failed while recognising the image.
    #[error("OCR engine error: {0}")]
    Engine(String),

    /// No OCR backend was compiled into this build.
    #[error("OCR backend not available: {0}")]
    Unavailable(String),
}

/// Errors related to heuristic field parsing.
///
/// These indicate a fault in the parser itself, never a missing field.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A keyword pattern failed to compile.
    #[error("invalid {field} pattern: {source}")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Writing the diagnostic block failed.
    #[error("failed to render diagnostic block: {0}")]
    Render(#[from] fmt::Error),
}

/// Pipeline stage at which processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the input file.
    Read,
    /// Decoding and normalizing the image.
    Normalize,
    /// Running OCR.
    Extract,
    /// Parsing fields out of the text.
    Parse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Read => write!(f, "read"),
            Stage::Normalize => write!(f, "normalize"),
            Stage::Extract => write!(f, "extract"),
            Stage::Parse => write!(f, "parse"),
        }
    }
}

/// The original cause wrapped by [`InvoiceProcessingError`].
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl StageError {
    /// The pipeline stage this cause belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Io(_) => Stage::Read,
            StageError::Normalize(_) => Stage::Normalize,
            StageError::Ocr(_) => Stage::Extract,
            StageError::Parse(_) => Stage::Parse,
        }
    }
}

/// The single failure kind reported by the invoice pipeline.
#[derive(Error, Debug)]
#[error("invoice processing failed: {cause}")]
pub struct InvoiceProcessingError {
    #[source]
    cause: StageError,
}

impl InvoiceProcessingError {
    /// Stage at which processing stopped.
    pub fn stage(&self) -> Stage {
        self.cause.stage()
    }

    /// The wrapped stage error.
    pub fn cause(&self) -> &StageError {
        &self.cause
    }

    /// Unwrap into the stage error.
    pub fn into_cause(self) -> StageError {
        self.cause
    }
}

impl From<StageError> for InvoiceProcessingError {
    fn from(cause: StageError) -> Self {
        Self { cause }
    }
}

impl From<std::io::Error> for InvoiceProcessingError {
    fn from(err: std::io::Error) -> Self {
        StageError::from(err).into()
    }
}

impl From<NormalizeError> for InvoiceProcessingError {
    fn from(err: NormalizeError) -> Self {
        StageError::from(err).into()
    }
}

impl From<OcrError> for InvoiceProcessingError {
    fn from(err: OcrError) -> Self {
        StageError::from(err).into()
    }
}

impl From<ParseError> for InvoiceProcessingError {
    fn from(err: ParseError) -> Self {
        StageError::from(err).into()
    }
}

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, InvoiceProcessingError>;
