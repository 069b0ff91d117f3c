//! # UI State Module
//!
//! General UI state that is not tied to the grid itself.
//!
//! ## Responsibilities:
//! - Loading and submitting flags
//! - User-facing error messages
//! - Count of saved records hidden because they could not be read
//!
//! ## Purpose:
//! Every failed or rolled-back operation ends up here as a message, so the
//! interface always returns to an interactive state.

/// Loading indicators and user feedback
#[derive(Debug, Default)]
pub struct UiState {
    /// Initial data load in progress
    pub loading: bool,

    /// A form submission is awaiting the remote
    pub submitting: bool,

    /// Error message to display to the user
    pub error_message: Option<String>,

    /// Saved records left out of the last load; survives `clear_messages`
    pub hidden_records: usize,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            loading: true,
            submitting: false,
            error_message: None,
            hidden_records: 0,
        }
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Banner text while some saved records are hidden
    pub fn hidden_records_notice(&self) -> Option<String> {
        match self.hidden_records {
            0 => None,
            1 => Some("1 saved record could not be read and is hidden.".to_string()),
            n => Some(format!("{} saved records could not be read and are hidden.", n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_records_notice() {
        let mut ui = UiState::new();
        assert!(ui.hidden_records_notice().is_none());

        ui.hidden_records = 1;
        assert_eq!(
            ui.hidden_records_notice().as_deref(),
            Some("1 saved record could not be read and is hidden.")
        );

        ui.hidden_records = 3;
        ui.clear_messages();
        assert_eq!(
            ui.hidden_records_notice().as_deref(),
            Some("3 saved records could not be read and are hidden.")
        );
    }
}
