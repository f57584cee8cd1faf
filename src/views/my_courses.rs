use tracing::{debug, error, instrument};

use crate::auth::UserId;
use crate::models::PurchaseRecord;
use crate::services::CourseService;
use crate::views::LoadState;

/// State behind the purchased courses screen: the user's purchase records,
/// the live search text, and client-side pagination over the filtered set.
pub struct MyCoursesView {
    user_id: UserId,
    courses: CourseService,
    state: LoadState,
    records: Vec<PurchaseRecord>,
    search_text: String,
    current_page: usize,
    items_per_page: usize,
}

impl MyCoursesView {
    pub fn new(courses: CourseService, user_id: UserId, items_per_page: usize) -> Self {
        Self {
            user_id,
            courses,
            state: LoadState::Loading,
            records: Vec::new(),
            search_text: String::new(),
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    /// Fetches the user's purchases in one unpaginated request. Runs once
    /// per mount. Records whose course has been soft-deleted come back with
    /// a null course reference and are dropped here.
    #[instrument(skip(self), fields(user = %self.user_id))]
    pub async fn load(&mut self) {
        if self.state != LoadState::Loading {
            debug!("load called after mount completed; ignoring");
            return;
        }

        match self.courses.purchased_courses(&self.user_id).await {
            Ok(records) => {
                let total = records.len();
                self.records = records.into_iter().filter(|r| r.course.is_some()).collect();
                if self.records.len() < total {
                    debug!(
                        dropped = total - self.records.len(),
                        "dropped purchase records without a course"
                    );
                }
                self.state = LoadState::Ready;
            }
            Err(err) => {
                error!(error = %err, "failed to load purchased courses");
                self.state = LoadState::Failed;
            }
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The "No courses found" state: loaded fine, nothing owned.
    pub fn is_empty(&self) -> bool {
        self.state == LoadState::Ready && self.records.is_empty()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Updates the search text, recomputed on every keystroke. A filter
    /// change always snaps back to the first page.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.current_page = 1;
    }

    /// Purchases whose course title contains the search text,
    /// case-insensitively, in fetch order.
    pub fn filtered(&self) -> Vec<&PurchaseRecord> {
        let needle = self.search_text.to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                record
                    .course
                    .as_ref()
                    .is_some_and(|course| course.title.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.items_per_page)
    }

    /// Current page, clamped into the valid range for the filtered set.
    pub fn current_page(&self) -> usize {
        self.current_page.min(self.page_count().max(1))
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.page_count().max(1));
    }

    /// The records on the current page: entries `[(k-1)*size, k*size)` of
    /// the filtered sequence.
    pub fn visible(&self) -> Vec<&PurchaseRecord> {
        let start = (self.current_page() - 1) * self.items_per_page;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.items_per_page)
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn with_records_for_test(mut self, records: Vec<PurchaseRecord>) -> Self {
        self.records = records;
        self.state = LoadState::Ready;
        self
    }
}
