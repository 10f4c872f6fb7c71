use formbridge_types::{
    FormId, Submission,
    submission::{source_page_key, target_page_key},
};

/// The page transition a request represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTransition {
    /// First render or a backwards move. Nothing is validated.
    InitialLoad,
    /// The user asked to advance from `source_page` to a later page.
    NextClicked { source_page: u32, target_page: u32 },
    /// The last page was submitted (target page `0`).
    FinalSubmit,
}

impl PageTransition {
    pub fn from_signals(source_page: u32, target_page: u32, next_clicked: bool) -> Self {
        if target_page > source_page && next_clicked {
            Self::NextClicked { source_page, target_page }
        } else if target_page == 0 {
            Self::FinalSubmit
        } else {
            Self::InitialLoad
        }
    }

    /// Reads the page markers posted for `form_id`. Missing or non-numeric markers count as `0`.
    pub fn from_submission(submission: &Submission, form_id: FormId) -> Self {
        let source_page = submission.page_number(&source_page_key(form_id)).unwrap_or(0);
        let target_page = submission.page_number(&target_page_key(form_id)).unwrap_or(0);
        Self::from_signals(source_page, target_page, submission.next_requested())
    }
}
