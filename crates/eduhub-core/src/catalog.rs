//! Process-wide cache of the exam list.
//!
//! The list is fetched on first use and kept until the process exits. A
//! failed fetch leaves the cache empty, so the next request tries again.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::content::{ExamCategory, Paper};
use crate::fetch::{fetch_as, ContentSource, FetchError};

/// Cached exam categories.
pub struct ExamCatalog {
    source: Arc<dyn ContentSource>,
    url: String,
    exams: RwLock<Option<Arc<[ExamCategory]>>>,
}

impl ExamCatalog {
    pub fn new(source: Arc<dyn ContentSource>, url: impl Into<String>) -> Self {
        Self {
            source,
            url: url.into(),
            exams: RwLock::new(None),
        }
    }

    /// The exam list, fetching it if it has never been loaded.
    pub async fn load(&self) -> Result<Arc<[ExamCategory]>, FetchError> {
        if let Some(exams) = self.exams.read().await.as_ref() {
            return Ok(Arc::clone(exams));
        }

        let mut slot = self.exams.write().await;
        // Another handler may have filled the cache while we waited.
        if let Some(exams) = slot.as_ref() {
            return Ok(Arc::clone(exams));
        }

        let fetched: Vec<ExamCategory> = fetch_as(self.source.as_ref(), &self.url).await?;
        info!(
            categories = fetched.len(),
            papers = fetched.iter().map(|e| e.papers.len()).sum::<usize>(),
            "Exam list loaded"
        );
        let exams: Arc<[ExamCategory]> = fetched.into();
        *slot = Some(Arc::clone(&exams));
        Ok(exams)
    }

    /// The exam list if it has already been loaded.
    pub async fn cached(&self) -> Option<Arc<[ExamCategory]>> {
        self.exams.read().await.clone()
    }
}

/// Find an exam by exact title.
pub fn find_exam<'a>(exams: &'a [ExamCategory], title: &str) -> Option<(usize, &'a ExamCategory)> {
    exams.iter().enumerate().find(|(_, e)| e.title == title)
}

/// Find a paper by `meta_id`, scanning every category in order.
pub fn find_paper<'a>(exams: &'a [ExamCategory], meta_id: &str) -> Option<&'a Paper> {
    exams
        .iter()
        .flat_map(|e| e.papers.iter())
        .find(|p| p.meta_id == meta_id)
}
