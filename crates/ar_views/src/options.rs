use ar_core::PAGE_SIZE;

/// Which page responses a list controller applies when several are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// Every response is applied in the order it resolves, so a slow response
    /// to an older request overwrites a newer one.
    #[default]
    LastResolved,
    /// Only the response to the most recently issued request is applied.
    LatestIssued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub page_size: u32,
    pub ordering: ResponseOrdering,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            ordering: ResponseOrdering::default(),
        }
    }
}
