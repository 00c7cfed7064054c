use serde::Serialize;
use thiserror::Error;

/// What the user asked to share.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ShareOutcome {
    /// Handed to a platform share sheet.
    Shared,
    /// No share sheet; the link went to the clipboard.
    Copied { url: String },
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ShareError(pub String);

/// A place links can be shared to.
pub trait ShareTarget: Send + Sync {
    fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, ShareError>;
}

/// Fallback used when no share sheet is present: the link is handed back for
/// the caller to place on its clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipboardShare;

impl ShareTarget for ClipboardShare {
    fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, ShareError> {
        Ok(ShareOutcome::Copied {
            url: request.url.clone(),
        })
    }
}

/// Result returned by every share endpoint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ShareResponse {
    pub request: ShareRequest,
    pub outcome: Option<ShareOutcome>,
    pub message: Option<String>,
}

/// Share through `target`. A rejected share is reported as a message and
/// never as an error.
pub fn share_link(target: &dyn ShareTarget, request: ShareRequest) -> ShareResponse {
    match target.share(&request) {
        Ok(ShareOutcome::Shared) => ShareResponse {
            request,
            outcome: Some(ShareOutcome::Shared),
            message: None,
        },
        Ok(outcome @ ShareOutcome::Copied { .. }) => ShareResponse {
            request,
            outcome: Some(outcome),
            message: Some("Link copied to clipboard".to_string()),
        },
        Err(e) => {
            tracing::warn!("Share of {} failed: {}", request.url, e);
            ShareResponse {
                request,
                outcome: None,
                message: Some(format!("Error sharing: {}", e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Refusing;

    impl ShareTarget for Refusing {
        fn share(&self, _request: &ShareRequest) -> Result<ShareOutcome, ShareError> {
            Err(ShareError("Share canceled".to_string()))
        }
    }

    struct Sheet;

    impl ShareTarget for Sheet {
        fn share(&self, _request: &ShareRequest) -> Result<ShareOutcome, ShareError> {
            Ok(ShareOutcome::Shared)
        }
    }

    fn request() -> ShareRequest {
        ShareRequest {
            title: "AAPL Financial Ratios".into(),
            text: "Check out the financial ratios for AAPL".into(),
            url: "http://localhost:5173/ratios/AAPL".into(),
        }
    }

    #[test]
    fn clipboard_fallback_copies_the_url() {
        let response = share_link(&ClipboardShare, request());
        assert_eq!(
            response.outcome,
            Some(ShareOutcome::Copied {
                url: "http://localhost:5173/ratios/AAPL".into()
            })
        );
        assert_eq!(response.message.as_deref(), Some("Link copied to clipboard"));
    }

    #[test]
    fn rejection_becomes_a_message() {
        let response = share_link(&Refusing, request());
        assert_eq!(response.outcome, None);
        assert_eq!(response.message.as_deref(), Some("Error sharing: Share canceled"));
    }

    #[test]
    fn share_sheet_is_silent() {
        let response = share_link(&Sheet, request());
        assert_eq!(response.outcome, Some(ShareOutcome::Shared));
        assert!(response.message.is_none());
    }
}
