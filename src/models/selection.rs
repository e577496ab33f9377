use serde::{Deserialize, Serialize};

use super::FilmRecord;

/// What happens to the selection when the user searches another film
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchResetPolicy {
    /// Selection survives the new search
    #[default]
    Keep,
    /// Details collapse and the pinned recommendation is dropped
    Reset,
}

impl SearchResetPolicy {
    pub fn from_reset_flag(reset: bool) -> Self {
        if reset {
            SearchResetPolicy::Reset
        } else {
            SearchResetPolicy::Keep
        }
    }
}

/// Interaction events raised by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    ToggleDetails,
    PinRecommendation(FilmRecord),
    ClosePinned,
    NewSearch(SearchResetPolicy),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No pinned recommendation to close")]
    NothingPinned,
}

/// Per-session UI selection
///
/// Transitions are pure: `apply` returns the next state and leaves `self` untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SelectionState {
    /// Whether the searched film's extended details are shown
    pub details_expanded: bool,
    /// Recommended film opened for detail viewing
    pub pinned_recommendation: Option<FilmRecord>,
}

impl SelectionState {
    /// Initial state: details collapsed, nothing pinned
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the state following `event`
    pub fn apply(&self, event: SelectionEvent) -> Result<SelectionState, SelectionError> {
        match event {
            SelectionEvent::ToggleDetails => Ok(SelectionState {
                details_expanded: !self.details_expanded,
                pinned_recommendation: self.pinned_recommendation.clone(),
            }),
            SelectionEvent::PinRecommendation(film) => Ok(SelectionState {
                details_expanded: self.details_expanded,
                pinned_recommendation: Some(film),
            }),
            SelectionEvent::ClosePinned => match self.pinned_recommendation {
                Some(_) => Ok(SelectionState {
                    details_expanded: self.details_expanded,
                    pinned_recommendation: None,
                }),
                None => Err(SelectionError::NothingPinned),
            },
            SelectionEvent::NewSearch(SearchResetPolicy::Keep) => Ok(self.clone()),
            SelectionEvent::NewSearch(SearchResetPolicy::Reset) => Ok(SelectionState::new()),
        }
    }

    pub fn has_pinned(&self) -> bool {
        self.pinned_recommendation.is_some()
    }
}
