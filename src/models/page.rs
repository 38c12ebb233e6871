//! Offset/size pagination as accepted by the listing endpoints

use crate::error::{AppError, AppResult};

/// A page of results. `from` is an element offset on the wire, but it is
/// turned into a page number by integer division, so an offset that is not a
/// multiple of `size` snaps back to the start of its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    /// Build a page from optional `from`/`size` query values.
    ///
    /// Returns `Ok(None)` (no pagination) unless both values are present.
    pub fn from_params(from: Option<i64>, size: Option<i64>) -> AppResult<Option<Self>> {
        let (from, size) = match (from, size) {
            (Some(from), Some(size)) => (from, size),
            _ => return Ok(None),
        };

        if from < 0 || size <= 0 {
            return Err(AppError::Validation("Invalid pagination data".to_string()));
        }

        Ok(Some(Self {
            page: from / size,
            size,
        }))
    }

    pub fn offset(&self) -> i64 {
        self.page * self.size
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}
