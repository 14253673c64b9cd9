//! One-shot content commands: print categories, project listings or a single
//! project to a writer and return.

use crate::config::ContentCommand;
use crate::content::catalog::{sort_categories, ProjectFeed};
use crate::content::gallery::{self, distribute, masonry_columns};
use crate::content::{ContentSource, LoadState, Project};
use std::io::Write;

/// `viewport_px` is the nominal display width used to pick gallery columns.
pub fn run_command<S: ContentSource>(
    source: &S,
    command: &ContentCommand,
    viewport_px: u32,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        ContentCommand::ListCategories => list_categories(source, out),
        ContentCommand::ListProjects { category, pages } => {
            list_projects(source, category.as_deref(), *pages, out)
        }
        ContentCommand::Project(slug) => show_project(source, slug, viewport_px, out),
    }
}

fn list_categories<S: ContentSource>(source: &S, out: &mut dyn Write) -> anyhow::Result<()> {
    let mut categories = match LoadState::from_result("categories", source.categories()) {
        LoadState::Ready(c) => c,
        LoadState::NotFound => Vec::new(),
        LoadState::Failed(msg) => anyhow::bail!(msg),
    };
    sort_categories(&mut categories);
    if categories.is_empty() {
        writeln!(out, "No categories found.")?;
    }
    for c in &categories {
        writeln!(out, "{}\t{}", c.slug, c.name)?;
    }
    Ok(())
}

fn list_projects<S: ContentSource>(
    source: &S,
    category: Option<&str>,
    pages: usize,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let fetched = match category {
        Some(slug) => source.projects_in_category(slug),
        None => source.projects(),
    };
    let projects = match LoadState::from_result("projects", fetched) {
        LoadState::Ready(p) => p,
        LoadState::NotFound => Vec::new(),
        LoadState::Failed(msg) => anyhow::bail!(msg),
    };

    let mut feed = ProjectFeed::new(projects, category);
    if feed.is_empty() {
        writeln!(out, "{}", feed.empty_message())?;
        return Ok(());
    }
    feed.show_pages(pages);
    for project in feed.visible() {
        writeln!(out, "{}", card_line(project))?;
    }
    if feed.has_more() {
        writeln!(
            out,
            "-- {} of {} shown; --page {} for more",
            feed.visible().len(),
            feed.total(),
            feed.page() + 1
        )?;
    }
    Ok(())
}

/// One listing row: year, title, primary category and slug.
pub fn card_line(project: &Project) -> String {
    format!(
        "{:>4}  {}  [{}]  ({})",
        project.year_label().unwrap_or("----"),
        project.title,
        project.primary_category(),
        project.slug
    )
}

fn show_project<S: ContentSource>(
    source: &S,
    slug: &str,
    viewport_px: u32,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let project = match LoadState::from_lookup("project", source.project(slug)) {
        LoadState::Ready(p) => p,
        LoadState::NotFound => {
            writeln!(out, "Project not found.")?;
            return Ok(());
        }
        LoadState::Failed(msg) => anyhow::bail!(msg),
    };
    write_detail(&project, viewport_px, out)
}

pub fn write_detail(project: &Project, viewport_px: u32, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "{}", project.title)?;
    writeln!(out, "{}", project.primary_category())?;

    let meta: Vec<&str> = [project.platform(), project.year_label()]
        .into_iter()
        .flatten()
        .collect();
    if !meta.is_empty() {
        writeln!(out, "{}", meta.join(" | "))?;
    }
    if !project.technologies().is_empty() {
        writeln!(out, "Technologies: {}", project.technologies().join(", "))?;
    }
    if let Some(link) = project.project_link() {
        writeln!(out, "View project: {link}")?;
    }
    if let Some(link) = project.other_link() {
        writeln!(out, "Additional link: {link}")?;
    }
    if let Some(url) = project.image_url() {
        writeln!(out, "Image: {url} ({})", project.image_alt())?;
    }

    let body = gallery::extract(&project.content);
    let text = gallery::plain_text(&body.html);
    if !text.is_empty() {
        writeln!(out)?;
        writeln!(out, "{text}")?;
    }

    if !body.images.is_empty() {
        let columns = masonry_columns(&body.images, viewport_px);
        writeln!(out)?;
        writeln!(out, "Gallery: {} images, {columns} columns", body.images.len())?;
        for (i, column) in distribute(body.images.len(), columns).iter().enumerate() {
            for &idx in column {
                let img = &body.images[idx];
                writeln!(out, "  [{}] {} ({})", i + 1, img.url, img.alt)?;
            }
        }
    }
    tracing::debug!(slug = %project.slug, images = body.images.len(), "project rendered");
    Ok(())
}
