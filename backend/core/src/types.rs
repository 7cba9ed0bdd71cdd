use serde::{Deserialize, Serialize};

/// Route of the conversion endpoint.
pub const CONVERT_PATH: &str = "/api/convert";

/// Route of the health endpoint.
pub const HEALTH_PATH: &str = "/api/health";

/// Returned with a 400 when the request body has no usable `markdown` string.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid markdown input";

/// Returned with a 500 for any parse, compose, or render failure.
pub const CONVERSION_FAILED_MESSAGE: &str = "Failed to generate PDF";

/// Suggested name for the downloaded artifact.
pub const PDF_FILENAME: &str = "output.pdf";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const MM_PER_INCH: f64 = 25.4;

/// JSON body of `POST /api/convert`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConvertRequest {
    pub markdown: String,
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Page layout handed to the render stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfOptions {
    pub paper_width_mm: f64,
    pub paper_height_mm: f64,
    /// Uniform margin applied to all four sides.
    pub margin_mm: f64,
    pub print_background: bool,
    pub landscape: bool,
}

impl PdfOptions {
    /// A4 portrait, 10mm margins, background colors printed.
    pub fn a4() -> Self {
        Self {
            paper_width_mm: 210.0,
            paper_height_mm: 297.0,
            margin_mm: 10.0,
            print_background: true,
            landscape: false,
        }
    }

    /// The DevTools protocol measures paper in inches.
    pub fn paper_width_in(&self) -> f64 {
        self.paper_width_mm / MM_PER_INCH
    }

    pub fn paper_height_in(&self) -> f64 {
        self.paper_height_mm / MM_PER_INCH
    }

    pub fn margin_in(&self) -> f64 {
        self.margin_mm / MM_PER_INCH
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self::a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_converts_to_inches() {
        let opts = PdfOptions::a4();
        assert!((opts.paper_width_in() - 8.2677).abs() < 0.001);
        assert!((opts.paper_height_in() - 11.6929).abs() < 0.001);
        assert!((opts.margin_in() - 0.3937).abs() < 0.001);
        assert!(opts.print_background);
    }

    #[test]
    fn error_body_serializes_flat() {
        let body = serde_json::to_string(&ErrorBody::new(INVALID_INPUT_MESSAGE)).unwrap();
        assert_eq!(body, r#"{"error":"Invalid markdown input"}"#);
    }

    #[test]
    fn convert_request_requires_markdown() {
        assert!(serde_json::from_str::<ConvertRequest>("{}").is_err());
        let req: ConvertRequest = serde_json::from_str(r##"{"markdown":"# Hi"}"##).unwrap();
        assert_eq!(req.markdown, "# Hi");
    }
}
