pub mod error;
pub mod traits;
pub mod types;

pub use error::ConvertError;
pub use traits::PdfRenderer;
pub use types::{
    ConvertRequest, ErrorBody, PdfOptions, CONVERSION_FAILED_MESSAGE, CONVERT_PATH,
    HEALTH_PATH, INVALID_INPUT_MESSAGE, PDF_CONTENT_TYPE, PDF_FILENAME,
};
