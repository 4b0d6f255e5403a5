/// Errors from the fal.ai client.
#[derive(Debug, thiserror::Error)]
pub enum FalAiError {
    /// Transport failure, timeout, or a provider-side 5xx / 429.
    #[error("fal.ai unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the request (4xx other than 429).
    #[error("fal.ai rejected the request ({status}): {body}")]
    Rejected {
        status: u16,
        body: String,
    },

    /// A successful response did not carry the expected output.
    #[error("fal.ai response missing output: {0}")]
    MissingOutput(String),
}

impl From<reqwest::Error> for FalAiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::MissingOutput(err.to_string());
        }
        Self::Unavailable(err.to_string())
    }
}

impl FalAiError {
    /// Classify a non-2xx provider status.
    pub fn from_status(status: u16, body: String) -> Self {
        if status >= 500 || status == 429 {
            Self::Unavailable(format!("status {status}: {body}"))
        } else {
            Self::Rejected { status, body }
        }
    }
}
