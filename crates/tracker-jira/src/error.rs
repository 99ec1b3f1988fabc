use std::time::Duration;

use sweep_tracker::TrackerError;

use crate::wire::summarize_error;

/// `timeout` is the client's configured request timeout, reported when the
/// request expired.
#[allow(clippy::needless_pass_by_value)] // signature required for use with .map_err()
pub(crate) fn map_reqwest_err(e: reqwest::Error, timeout: Duration) -> TrackerError {
    if e.is_timeout() {
        TrackerError::Timeout(timeout)
    } else if e.is_connect() {
        TrackerError::Connection(e.to_string())
    } else if e.is_decode() {
        TrackerError::Decode(e.to_string())
    } else {
        TrackerError::Other(e.to_string())
    }
}

pub(crate) fn map_status(status: reqwest::StatusCode, body: &str) -> TrackerError {
    let message = summarize_error(body);
    match status.as_u16() {
        401 | 403 => TrackerError::Auth(message),
        404 => TrackerError::NotFound(message),
        code => TrackerError::Rejected {
            status: code,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn auth_statuses() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, ""),
            TrackerError::Auth(_)
        ));
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, "{\"errorMessages\":[\"nope\"]}"),
            TrackerError::Auth(ref m) if m == "nope"
        ));
    }

    #[test]
    fn other_statuses_are_rejections() {
        match map_status(StatusCode::BAD_REQUEST, "{\"errorMessages\":[\"bad jql\"]}") {
            TrackerError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad jql");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, "Issue Does Not Exist"),
            TrackerError::NotFound(_)
        ));
    }
}
