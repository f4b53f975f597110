use popcorn_api::traits::FetchFailure;

pub const OFFLINE_MESSAGE: &str = "You're offline.";

/// Text to show for a failed fetch, or `None` when it should stay silent.
///
/// `status_message` is used for non-success HTTP statuses, where the body
/// is not meant for users.
pub(crate) fn user_message(failure: FetchFailure, status_message: &str) -> Option<String> {
    match failure {
        FetchFailure::Cancelled => None,
        FetchFailure::Offline => Some(OFFLINE_MESSAGE.to_string()),
        FetchFailure::Provider(message) | FetchFailure::Other(message) => Some(message),
        FetchFailure::Status(_) => Some(status_message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        assert_eq!(user_message(FetchFailure::Cancelled, "x"), None);
        assert_eq!(
            user_message(FetchFailure::Offline, "x").as_deref(),
            Some(OFFLINE_MESSAGE)
        );
        assert_eq!(
            user_message(FetchFailure::Provider("Movie not found!".into()), "x").as_deref(),
            Some("Movie not found!")
        );
        assert_eq!(
            user_message(FetchFailure::Status(503), "Something broke").as_deref(),
            Some("Something broke")
        );
        assert_eq!(
            user_message(FetchFailure::Other("boom".into()), "x").as_deref(),
            Some("boom")
        );
    }
}
