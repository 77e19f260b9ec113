//! View state for resource lists: fetched collections, client-side
//! filtering and paging, and mutations that only touch local state once the
//! backend has confirmed them.
//!
//! Loads are split into `begin_*` (take a ticket) and `finish_*` (apply the
//! response if the ticket is still current) so that an older response
//! arriving after a newer request has started is dropped.

pub mod files;
pub mod filter;
pub mod projects;
pub mod publications;
pub mod search;

pub use files::FilesView;
pub use filter::PublicationFilter;
pub use projects::ProjectsView;
pub use publications::PublicationsView;
pub use search::{GuardedSearch, MemberSearch};

/// Identifies one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Last-request-wins guard.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: u64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier ticket.
    pub fn begin(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }

    /// Supersede any in-flight request without starting a new one.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped to the available pages.
    pub number: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Slice `items` into page `number` (1-based). Out-of-range page numbers are
/// clamped; `per_page` of zero is treated as one.
pub fn paginate<T>(items: Vec<T>, number: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let number = number.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((number - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        number,
        per_page,
        total_items,
        total_pages,
    }
}
