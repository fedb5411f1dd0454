/// Aggregated view of session progress, useful for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current word.
    pub position: usize,
    /// Current queue length, including re-inserted words.
    pub total: usize,
    pub answered: usize,
    pub is_complete: bool,
}
