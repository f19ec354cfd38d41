//! Page position for paginated GitHub listings.
//!
//! Both the repository listing and the comment listing walk pages one at a
//! time; `PageInfo` tells the caller where it is and whether to keep going.

/// Current page state for a paginated response.
///
/// # Example
///
/// ```
/// use pullbox::github::pagination::PageInfo;
///
/// let info = PageInfo::builder(2, 100)
///     .total_pages(Some(3))
///     .has_next(true)
///     .build();
/// assert!(!info.is_last_page());
/// assert_eq!(info.next_page(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    current_page: u32,
    per_page: u8,
    total_pages: Option<u32>,
    has_next: bool,
}

/// Builder for [`PageInfo`].
#[derive(Debug, Clone, Copy)]
pub struct PageInfoBuilder {
    info: PageInfo,
}

impl PageInfoBuilder {
    /// Sets the total number of pages when the response reports it.
    #[must_use]
    pub const fn total_pages(mut self, total_pages: Option<u32>) -> Self {
        self.info.total_pages = total_pages;
        self
    }

    /// Sets whether another page follows this one.
    #[must_use]
    pub const fn has_next(mut self, has_next: bool) -> Self {
        self.info.has_next = has_next;
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub const fn build(self) -> PageInfo {
        self.info
    }
}

impl PageInfo {
    /// Starts building page info for `current_page` (1-based).
    #[must_use]
    pub const fn builder(current_page: u32, per_page: u8) -> PageInfoBuilder {
        PageInfoBuilder {
            info: Self {
                current_page,
                per_page,
                total_pages: None,
                has_next: false,
            },
        }
    }

    /// Returns the current page number (1-based).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Returns the total number of pages if known.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Returns true if more pages exist after the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next
    }

    /// Number of the following page, if there is one.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.has_next {
            self.current_page.checked_add(1)
        } else {
            None
        }
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::builder(1, 100).build()
    }
}
