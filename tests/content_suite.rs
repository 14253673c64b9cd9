use glitchfolio::browse::{card_line, run_command};
use glitchfolio::config::ContentCommand;
use glitchfolio::content::catalog::{sort_by_year_desc, sort_categories, ProjectFeed, PROJECTS_PER_PAGE};
use glitchfolio::content::gallery::{distribute, extract, masonry_columns, plain_text, GalleryImage};
use glitchfolio::content::{
    Category, ContentError, ContentResult, ContentSource, GraphQlClient, LoadState, Project,
    Transport,
};
use serde_json::{json, Value};
use std::cell::RefCell;

/// Answers each request with the response whose key appears in the query text
/// and records the request bodies.
struct FakeTransport {
    responses: Vec<(&'static str, ContentResult<Value>)>,
    requests: RefCell<Vec<Value>>,
}

impl FakeTransport {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn answer(mut self, query_key: &'static str, response: Value) -> Self {
        self.responses.push((query_key, Ok(response)));
        self
    }

    fn fail(mut self, query_key: &'static str) -> Self {
        self.responses
            .push((query_key, Err(ContentError::Transport("connection refused".into()))));
        self
    }
}

impl Transport for FakeTransport {
    fn execute(&self, body: &Value) -> ContentResult<Value> {
        self.requests.borrow_mut().push(body.clone());
        let query = body["query"].as_str().unwrap_or_default();
        for (key, response) in &self.responses {
            if query.contains(key) {
                return match response {
                    Ok(v) => Ok(v.clone()),
                    Err(e) => Err(ContentError::Transport(e.to_string())),
                };
            }
        }
        Err(ContentError::Transport(format!("no canned response for {query}")))
    }
}

fn project_json(title: &str, slug: &str, year: Value, categories: &[(&str, &str)]) -> Value {
    let nodes: Vec<Value> = categories
        .iter()
        .map(|(name, slug)| json!({ "name": name, "slug": slug }))
        .collect();
    json!({
        "title": title,
        "slug": slug,
        "content": "<p>Body</p>",
        "featuredImage": { "node": { "sourceUrl": format!("https://img/{slug}.jpg"), "altText": "" } },
        "infosProjet": {
            "platform": "fxhash",
            "annee": year,
            "technologies": ["p5.js", "GLSL"],
            "lienProjet": format!("https://example.org/{slug}"),
            "autrelien": null,
            "couleurPrincipale": "#ff0044"
        },
        "categoriesProjet": { "nodes": nodes }
    })
}

fn project(title: &str, year: &str, categories: &[(&str, &str)]) -> Project {
    let slug = title.to_lowercase().replace(' ', "-");
    serde_json::from_value(project_json(title, &slug, json!(year), categories)).unwrap()
}

fn category(name: &str, slug: &str) -> Category {
    Category {
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

fn image(w: u32, h: u32) -> GalleryImage {
    GalleryImage {
        url: format!("https://img/{w}x{h}.jpg"),
        alt: String::new(),
        width: Some(w),
        height: Some(h),
    }
}

// ── Decoding ────────────────────────────────────────────────────────────────

#[test]
fn categories_are_decoded_from_the_connection() {
    let client = GraphQlClient::new(FakeTransport::new().answer(
        "GetAllCategories",
        json!({ "data": { "categoriesProjet": { "nodes": [
            { "name": "Generative Art", "slug": "generative-art" },
            { "name": "Runtime Art", "slug": "runtime-art" }
        ] } } }),
    ));
    let categories = client.categories().unwrap();
    assert_eq!(
        categories,
        vec![
            category("Generative Art", "generative-art"),
            category("Runtime Art", "runtime-art")
        ]
    );
    let requests = client.transport().requests.borrow();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]["query"].as_str().unwrap().contains("categoriesProjet"));
}

#[test]
fn project_fields_are_decoded() {
    let client = GraphQlClient::new(FakeTransport::new().answer(
        "GetAllProjects",
        json!({ "data": { "projets": { "nodes": [
            project_json("Drift", "drift", json!("2023"), &[("Runtime Art", "runtime-art")])
        ] } } }),
    ));
    let projects = client.projects().unwrap();
    assert_eq!(projects.len(), 1);
    let p = &projects[0];
    assert_eq!(p.title, "Drift");
    assert_eq!(p.year(), 2023);
    assert_eq!(p.year_label(), Some("2023"));
    assert_eq!(p.platform(), Some("fxhash"));
    assert_eq!(p.technologies(), ["p5.js".to_string(), "GLSL".to_string()]);
    assert_eq!(p.project_link(), Some("https://example.org/drift"));
    assert_eq!(p.other_link(), None);
    assert_eq!(p.primary_category(), "Runtime Art");
    assert_eq!(p.image_url(), Some("https://img/drift.jpg"));
    assert_eq!(p.image_alt(), "Drift", "empty alt text falls back to the title");
    assert_eq!(
        p.info.as_ref().unwrap().main_color.as_deref(),
        Some("#ff0044")
    );
}

#[test]
fn technologies_accept_string_list_or_null() {
    let decode = |tech: Value| -> Project {
        serde_json::from_value(json!({
            "title": "T", "slug": "t",
            "infosProjet": { "technologies": tech }
        }))
        .unwrap()
    };
    assert_eq!(decode(json!("TouchDesigner")).technologies(), ["TouchDesigner".to_string()]);
    assert_eq!(
        decode(json!(["a", null, "", "b"])).technologies(),
        ["a".to_string(), "b".to_string()]
    );
    assert!(decode(Value::Null).technologies().is_empty());
}

#[test]
fn sparse_projects_fall_back_gracefully() {
    let p: Project = serde_json::from_value(json!({
        "title": "Bare",
        "slug": "bare",
        "content": null,
        "featuredImage": null,
        "infosProjet": null,
        "categoriesProjet": null
    }))
    .unwrap();
    assert_eq!(p.content, "");
    assert_eq!(p.year(), 0);
    assert_eq!(p.year_label(), None);
    assert_eq!(p.primary_category(), "Uncategorized");
    assert_eq!(p.image_url(), None);
    assert!(p.technologies().is_empty());
}

#[test]
fn null_title_does_not_sink_the_list() {
    let mut untitled = project_json("", "untitled", json!("2020"), &[]);
    untitled["title"] = Value::Null;
    let client = GraphQlClient::new(FakeTransport::new().answer(
        "GetAllProjects",
        json!({ "data": { "projets": { "nodes": [
            project_json("Void", "void", json!("2021"), &[]),
            untitled,
        ] } } }),
    ));
    let projects = client.projects().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1].title, "");
    assert_eq!(projects[1].slug, "untitled");
}

#[test]
fn year_uses_leading_digits() {
    assert_eq!(project("A", "2021-2022", &[]).year(), 2021);
    assert_eq!(project("B", " 2019 ", &[]).year(), 2019);
    assert_eq!(project("C", "ongoing", &[]).year(), 0);
}

#[test]
fn category_query_sends_the_slug_as_a_list() {
    let client = GraphQlClient::new(FakeTransport::new().answer(
        "GetProjectsByCategory",
        json!({ "data": { "projets": { "nodes": [] } } }),
    ));
    assert!(client.projects_in_category("generative-art").unwrap().is_empty());
    let requests = client.transport().requests.borrow();
    assert_eq!(requests[0]["variables"], json!({ "slug": ["generative-art"] }));
    assert!(requests[0]["query"].as_str().unwrap().contains("CATEGORIEPROJET"));
}

#[test]
fn unknown_project_is_none_not_an_error() {
    let client = GraphQlClient::new(
        FakeTransport::new().answer("GetProjectBySlug", json!({ "data": { "projet": null } })),
    );
    assert!(client.project("missing").unwrap().is_none());
    assert_eq!(
        client.transport().requests.borrow()[0]["variables"],
        json!({ "slug": "missing" })
    );
    assert_eq!(
        LoadState::from_lookup("project", client.project("missing")),
        LoadState::<Project>::NotFound
    );
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn graphql_errors_win_over_partial_data() {
    let client = GraphQlClient::new(FakeTransport::new().answer(
        "GetAllCategories",
        json!({
            "data": { "categoriesProjet": null },
            "errors": [{ "message": "boom" }, { "message": "again" }]
        }),
    ));
    match client.categories() {
        Err(ContentError::GraphQl(messages)) => assert_eq!(messages, vec!["boom", "again"]),
        other => panic!("expected graphql error, got {other:?}"),
    }
}

#[test]
fn shape_mismatch_is_a_decode_error() {
    let client = GraphQlClient::new(FakeTransport::new().answer(
        "GetAllProjects",
        json!({ "data": { "projets": { "nodes": [{ "title": 5, "slug": "x" }] } } }),
    ));
    assert!(matches!(client.projects(), Err(ContentError::Decode(_))));
}

#[test]
fn empty_envelope_is_missing_data() {
    let client = GraphQlClient::new(FakeTransport::new().answer("GetAllProjects", json!({})));
    assert!(matches!(client.projects(), Err(ContentError::MissingData)));
}

#[test]
fn transport_failures_become_failed_load_states() {
    let client = GraphQlClient::new(FakeTransport::new().fail("GetAllCategories"));
    let err = client.categories().unwrap_err();
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(
        LoadState::from_result("categories", client.categories()),
        LoadState::Failed("Failed to load categories".to_string())
    );
}

// ── Catalog ─────────────────────────────────────────────────────────────────

#[test]
fn categories_follow_the_preferred_order() {
    let mut categories = vec![
        category("Zines", "zines"),
        category("Post Photography", "post-photography"),
        category("Runtime Art", "runtime-art"),
        category("Audio", "audio"),
        category("Generative Art", "generative-art"),
    ];
    sort_categories(&mut categories);
    let slugs: Vec<&str> = categories.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["runtime-art", "generative-art", "post-photography", "zines", "audio"]
    );
}

#[test]
fn projects_sort_by_year_descending_and_stably() {
    let mut projects = vec![
        project("Old", "2018", &[]),
        project("First 2022", "2022", &[]),
        project("Undated", "", &[]),
        project("Second 2022", "2022", &[]),
        project("New", "2024", &[]),
    ];
    sort_by_year_desc(&mut projects);
    let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["New", "First 2022", "Second 2022", "Old", "Undated"]);
}

#[test]
fn feed_pages_ten_at_a_time() {
    let projects: Vec<Project> = (0..25)
        .map(|i| project(&format!("P{i}"), &format!("{}", 2000 + i), &[]))
        .collect();
    let mut feed = ProjectFeed::new(projects, None);
    assert_eq!(feed.total(), 25);
    assert_eq!(feed.visible().len(), PROJECTS_PER_PAGE);
    assert_eq!(feed.visible()[0].title, "P24");
    assert!(feed.has_more());

    assert!(feed.load_more());
    assert_eq!(feed.visible().len(), 20);
    assert!(feed.load_more());
    assert_eq!(feed.visible().len(), 25);
    assert!(!feed.has_more());
    assert!(!feed.load_more());
    assert_eq!(feed.page(), 3);

    feed.show_pages(99);
    assert_eq!(feed.page(), 3);
    feed.show_pages(0);
    assert_eq!(feed.page(), 1);
}

#[test]
fn feed_filters_by_category_slug() {
    let projects = vec![
        project("A", "2020", &[("Runtime Art", "runtime-art")]),
        project("B", "2021", &[("Degen Art", "degen-art")]),
        project("C", "2022", &[("Degen Art", "degen-art"), ("Runtime Art", "runtime-art")]),
    ];
    let feed = ProjectFeed::new(projects.clone(), Some("runtime-art"));
    let titles: Vec<&str> = feed.visible().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A"]);

    let empty = ProjectFeed::new(projects, Some("post-photography"));
    assert!(empty.is_empty());
    assert_eq!(empty.empty_message(), "No projects found in this category.");
    assert_eq!(ProjectFeed::new(Vec::new(), None).empty_message(), "No projects found.");
}

// ── Gallery ─────────────────────────────────────────────────────────────────

const GALLERY_HTML: &str = r#"<p>Intro &amp; context</p>
<!-- wp:gallery {"linkTo":"none"} -->
<figure class="wp-block-gallery has-nested-images columns-2">
  <figure class="wp-block-image size-large"><img src="https://img/one.jpg" alt="First view" width="1200" height="800"/></figure>
  <figure class="wp-block-image"><img src='https://img/two.jpg' alt="" width="1200" height="790"><figcaption class="wp-element-caption">Second <em>view</em> &quot;night&quot;</figcaption></figure>
  <figure class="wp-block-image"><img src="https://img/three.jpg"></figure>
</figure>
<!-- /wp:gallery -->
<p>Outro</p>"#;

#[test]
fn gallery_images_are_extracted() {
    let body = extract(GALLERY_HTML);
    assert_eq!(body.images.len(), 3);

    assert_eq!(body.images[0].url, "https://img/one.jpg");
    assert_eq!(body.images[0].alt, "First view");
    assert_eq!(body.images[0].width, Some(1200));
    assert_eq!(body.images[0].height, Some(800));

    assert_eq!(body.images[1].url, "https://img/two.jpg");
    assert_eq!(body.images[1].alt, "Second view \"night\"");

    assert_eq!(body.images[2].alt, "");
    assert_eq!(body.images[2].aspect_ratio(), None);
}

#[test]
fn gallery_blocks_are_removed_from_the_body() {
    let body = extract(GALLERY_HTML);
    assert!(!body.html.contains("wp-block-gallery"));
    assert!(!body.html.contains("img/one.jpg"));
    assert!(body.html.contains("<p>Intro &amp; context</p>"));
    assert!(body.html.contains("<p>Outro</p>"));
    assert_eq!(plain_text(&body.html), "Intro & context\nOutro");
}

#[test]
fn bodies_without_galleries_are_untouched() {
    let html = "<p>Just text with <img src=\"inline.jpg\"></p>";
    let body = extract(html);
    assert!(body.images.is_empty());
    assert_eq!(body.html, html);
}

#[test]
fn gallery_class_must_match_a_whole_class_name() {
    let html = r#"<div class="wp-block-gallery-like"><figure><img src="x.jpg"></figure></div>"#;
    assert!(extract(html).images.is_empty());
}

// ── Masonry ─────────────────────────────────────────────────────────────────

#[test]
fn similar_ratios_minimize_orphans() {
    let six: Vec<GalleryImage> = (0..6).map(|_| image(1200, 800)).collect();
    assert_eq!(masonry_columns(&six, 1400), 2);

    let nine: Vec<GalleryImage> = (0..9).map(|_| image(1200, 800)).collect();
    assert_eq!(masonry_columns(&nine, 1400), 3);

    let eight: Vec<GalleryImage> = (0..8).map(|_| image(800, 800)).collect();
    assert_eq!(masonry_columns(&eight, 1400), 2);

    // Four columns only ever tie with two, and ties keep the earlier pick.
    let twelve: Vec<GalleryImage> = (0..12).map(|_| image(800, 800)).collect();
    assert_eq!(masonry_columns(&twelve, 1400), 2);
}

#[test]
fn mixed_ratios_use_viewport_breakpoints() {
    let mixed = vec![image(1200, 800), image(800, 1200), image(1000, 1000)];
    assert_eq!(masonry_columns(&mixed, 1400), 3);
    assert_eq!(masonry_columns(&mixed, 900), 2);
    assert_eq!(masonry_columns(&mixed, 500), 1);
}

#[test]
fn narrow_viewports_cap_the_columns() {
    let nine: Vec<GalleryImage> = (0..9).map(|_| image(1200, 800)).collect();
    assert_eq!(masonry_columns(&nine, 1024), 2);
    assert_eq!(masonry_columns(&nine, 640), 1);
}

#[test]
fn round_robin_distribution() {
    assert_eq!(distribute(5, 2), vec![vec![0, 2, 4], vec![1, 3]]);
    assert_eq!(distribute(2, 3), vec![vec![0], vec![1], vec![]]);
    assert_eq!(distribute(3, 0), vec![vec![0, 1, 2]]);
}

// ── Commands ────────────────────────────────────────────────────────────────

fn run(source: &impl ContentSource, command: ContentCommand) -> anyhow::Result<String> {
    let mut out = Vec::new();
    run_command(source, &command, 1400, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn list_projects_prints_the_first_page_and_a_hint() {
    let nodes: Vec<Value> = (0..12)
        .map(|i| project_json(&format!("Work {i}"), &format!("work-{i}"), json!(format!("{}", 2010 + i)), &[]))
        .collect();
    let client = GraphQlClient::new(
        FakeTransport::new().answer("GetAllProjects", json!({ "data": { "projets": { "nodes": nodes } } })),
    );
    let out = run(
        &client,
        ContentCommand::ListProjects {
            category: None,
            pages: 1,
        },
    )
    .unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].contains("Work 11"));
    assert!(lines[0].contains("Uncategorized"));
    assert_eq!(lines[10], "-- 10 of 12 shown; --page 2 for more");
}

#[test]
fn card_line_shows_year_title_and_category() {
    let p = project("Drift", "2023", &[("Runtime Art", "runtime-art")]);
    assert_eq!(card_line(&p), "2023  Drift  [Runtime Art]  (drift)");
}

#[test]
fn list_categories_prints_in_preferred_order() {
    let client = GraphQlClient::new(FakeTransport::new().answer(
        "GetAllCategories",
        json!({ "data": { "categoriesProjet": { "nodes": [
            { "name": "Degen Art", "slug": "degen-art" },
            { "name": "Runtime Art", "slug": "runtime-art" }
        ] } } }),
    ));
    let out = run(&client, ContentCommand::ListCategories).unwrap();
    assert_eq!(out, "runtime-art\tRuntime Art\ndegen-art\tDegen Art\n");
}

#[test]
fn project_detail_includes_gallery_layout() {
    let mut node = project_json("Night Walk", "night-walk", json!("2022"), &[("Post Photography", "post-photography")]);
    node["content"] = json!(GALLERY_HTML);
    let client = GraphQlClient::new(
        FakeTransport::new().answer("GetProjectBySlug", json!({ "data": { "projet": node } })),
    );
    let out = run(&client, ContentCommand::Project("night-walk".to_string())).unwrap();
    assert!(out.starts_with("Night Walk\nPost Photography\nfxhash | 2022\n"));
    assert!(out.contains("Technologies: p5.js, GLSL"));
    assert!(out.contains("View project: https://example.org/night-walk"));
    assert!(out.contains("Intro & context"));
    // Both known ratios sit within 10% of their mean and three images fill three columns.
    assert!(out.contains("Gallery: 3 images, 3 columns"));
    assert!(out.contains("  [1] https://img/one.jpg (First view)"));
    assert!(out.contains("  [2] https://img/two.jpg (Second view \"night\")"));
    assert!(out.contains("  [3] https://img/three.jpg ()"));
}

#[test]
fn missing_project_prints_not_found() {
    let client = GraphQlClient::new(
        FakeTransport::new().answer("GetProjectBySlug", json!({ "data": { "projet": null } })),
    );
    let out = run(&client, ContentCommand::Project("nope".to_string())).unwrap();
    assert_eq!(out, "Project not found.\n");
}

#[test]
fn failed_loads_surface_as_errors() {
    let client = GraphQlClient::new(FakeTransport::new().fail("GetAllProjects"));
    let err = run(
        &client,
        ContentCommand::ListProjects {
            category: None,
            pages: 1,
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Failed to load projects");
}
