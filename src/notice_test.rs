use super::*;

#[derive(Debug, thiserror::Error)]
enum Sample {
    #[error("offline")]
    Offline,
    #[error("bad title")]
    BadTitle,
}

impl ErrorCode for Sample {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Offline => "E_OFFLINE",
            Self::BadTitle => "E_BAD_TITLE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Offline)
    }
}

#[test]
fn notice_carries_code_and_message() {
    let notice = Notice::from_error("save set", &Sample::BadTitle);
    assert_eq!(notice.code, "E_BAD_TITLE");
    assert_eq!(notice.message, "save set failed: bad title");
    assert!(!notice.retryable);
    assert_eq!(notice.to_string(), "[E_BAD_TITLE] save set failed: bad title");
}

#[test]
fn retryable_hint_is_rendered() {
    let notice = Notice::from_error("load cards", &Sample::Offline);
    assert!(notice.retryable);
    assert!(notice.to_string().ends_with("(try again)"));
}
