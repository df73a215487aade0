/// The only text ever shown to the user when an extraction fails.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to process this URL. Please make sure it's from a supported Jewish media site.";

/// Shown when a media save could not be written locally.
pub const STORAGE_FAILURE_MESSAGE: &str = "Could not write the file to local storage.";

/// Why a request failed, as far as the session cares.
///
/// The technical detail lives with whoever produced the failure and goes to
/// the log; the core only keeps the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The collaborator could not be reached or the connection broke.
    Transport,
    /// The collaborator answered with a non-success status.
    HttpStatus(u16),
    /// The body did not have the expected structure.
    Decode,
    /// Local storage rejected the write.
    Storage,
}

impl FailureCause {
    /// Translates a cause into its fixed user-facing message. Every remote
    /// failure collapses to [`GENERIC_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureCause::Transport | FailureCause::HttpStatus(_) | FailureCause::Decode => {
                GENERIC_FAILURE_MESSAGE
            }
            FailureCause::Storage => STORAGE_FAILURE_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_remote_cause_collapses_to_the_generic_message() {
        for cause in [
            FailureCause::Transport,
            FailureCause::HttpStatus(422),
            FailureCause::HttpStatus(500),
            FailureCause::Decode,
        ] {
            assert_eq!(cause.user_message(), GENERIC_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn storage_failures_do_not_blame_the_site() {
        assert_eq!(FailureCause::Storage.user_message(), STORAGE_FAILURE_MESSAGE);
        assert_ne!(FailureCause::Storage.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
