//! Ordering, filtering and paging of content for display.

use super::model::{Category, Project};

/// Preferred navigation order; other categories follow in the order the CMS
/// returned them.
pub const CATEGORY_ORDER: [&str; 4] = [
    "runtime-art",
    "generative-art",
    "degen-art",
    "post-photography",
];

pub const PROJECTS_PER_PAGE: usize = 10;

pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by_key(|c| {
        CATEGORY_ORDER
            .iter()
            .position(|slug| *slug == c.slug)
            .unwrap_or(CATEGORY_ORDER.len())
    });
}

/// Newest first; projects of the same year keep their relative order.
pub fn sort_by_year_desc(projects: &mut [Project]) {
    projects.sort_by_key(|p| std::cmp::Reverse(p.year()));
}

/// A project list with "load more" paging: page `n` shows the first
/// `n * PROJECTS_PER_PAGE` projects.
#[derive(Clone, Debug)]
pub struct ProjectFeed {
    projects: Vec<Project>,
    category: Option<String>,
    page: usize,
}

impl ProjectFeed {
    /// Keeps the projects of `category` (all when `None`) sorted newest first.
    pub fn new(mut projects: Vec<Project>, category: Option<&str>) -> Self {
        if let Some(slug) = category {
            projects.retain(|p| p.in_category(slug));
        }
        sort_by_year_desc(&mut projects);
        Self {
            projects,
            category: category.map(str::to_string),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn visible(&self) -> &[Project] {
        let end = self
            .page
            .saturating_mul(PROJECTS_PER_PAGE)
            .min(self.projects.len());
        &self.projects[..end]
    }

    pub fn has_more(&self) -> bool {
        self.visible().len() < self.projects.len()
    }

    /// Reveals the next page. Returns false when everything is already shown.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Jumps to `page` (1-based), clamped to the pages that exist.
    pub fn show_pages(&mut self, page: usize) {
        let last = self.projects.len().div_ceil(PROJECTS_PER_PAGE).max(1);
        self.page = page.clamp(1, last);
    }

    pub fn empty_message(&self) -> &'static str {
        if self.category.is_some() {
            "No projects found in this category."
        } else {
            "No projects found."
        }
    }
}
