//! Template renderer.

use super::views::{
    CategoryDigestView, IndexView, RepositoryDigestView, UnsubscribeView, WelcomeView,
};
use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use serde::Serialize;

const INDEX: &str = "index";
const UNSUBSCRIBE: &str = "unsubscribe";
const CATEGORY_DIGEST: &str = "category_digest";
const REPOSITORY_DIGEST: &str = "repository_digest";
const WELCOME: &str = "welcome";

/// Built-in templates, embedded at compile time.
const TEMPLATES: &[(&str, &str)] = &[
    (INDEX, include_str!("../../templates/index.html.hbs")),
    (UNSUBSCRIBE, include_str!("../../templates/unsubscribe.html.hbs")),
    (
        CATEGORY_DIGEST,
        include_str!("../../templates/category_digest.html.hbs"),
    ),
    (
        REPOSITORY_DIGEST,
        include_str!("../../templates/repository_digest.html.hbs"),
    ),
    (WELCOME, include_str!("../../templates/welcome.html.hbs")),
];

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - HTML escaping (the default)
/// - Strict mode (catches missing variables)
/// - `eq` helper for equality comparisons
/// - `format_number` helper for compact counts (`1.2K`, `3.4M`)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs.register_helper("eq", Box::new(eq_helper));
    hbs.register_helper("format_number", Box::new(format_number));

    hbs
}

/// Helper function for equality comparison in templates.
///
/// Usage: `{{#if (eq variable "value")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

handlebars_helper!(format_number: |n: u64| compact_number(n));

/// Formats large counts with `K`/`M` suffixes.
#[must_use]
pub fn compact_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Renders the report pages and email bodies.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Creates a renderer with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to compile.
    pub fn new() -> Result<Self, super::TemplateError> {
        let mut handlebars = create_handlebars_registry();
        for (name, source) in TEMPLATES {
            handlebars.register_template_string(name, source)?;
        }
        Ok(Self { handlebars })
    }

    /// Renders the main report page.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_index(&self, view: &IndexView) -> Result<String, super::TemplateError> {
        self.render(INDEX, view)
    }

    /// Renders the unsubscribe page.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_unsubscribe(
        &self,
        view: &UnsubscribeView,
    ) -> Result<String, super::TemplateError> {
        self.render(UNSUBSCRIBE, view)
    }

    /// Renders a category digest email body.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_category_digest(
        &self,
        view: &CategoryDigestView,
    ) -> Result<String, super::TemplateError> {
        self.render(CATEGORY_DIGEST, view)
    }

    /// Renders a repository digest email body.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_repository_digest(
        &self,
        view: &RepositoryDigestView,
    ) -> Result<String, super::TemplateError> {
        self.render(REPOSITORY_DIGEST, view)
    }

    /// Renders the subscription confirmation email body.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_welcome(&self, view: &WelcomeView) -> Result<String, super::TemplateError> {
        self.render(WELCOME, view)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, super::TemplateError> {
        Ok(self.handlebars.render(name, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::views::RepoView;

    fn repo() -> RepoView {
        RepoView {
            name: "openai/gpt-4".to_string(),
            link: "https://github.com/openai/gpt-4".to_string(),
            description: "<b>gpt</b> samples".to_string(),
            language: "Python".to_string(),
            rank: 1,
            stars: Some(12_345),
            forks: None,
            streak: 3,
            category: "AI/ML".to_string(),
        }
    }

    #[test]
    fn compact_numbers() {
        assert_eq!(compact_number(999), "999");
        assert_eq!(compact_number(12_345), "12.3K");
        assert_eq!(compact_number(2_500_000), "2.5M");
    }

    #[test]
    fn renders_category_digest() {
        let renderer = TemplateRenderer::new().unwrap();
        let view = CategoryDigestView {
            category: "AI/ML".to_string(),
            date: "2024-01-03".to_string(),
            count: 1,
            repos: vec![repo()],
            site_url: "https://example.com/".to_string(),
            unsubscribe_url: "https://example.com/unsubscribe.html?email=a%40b.c".to_string(),
        };

        let html = renderer.render_category_digest(&view).unwrap();

        assert!(html.contains("GitHub Trending Update - AI/ML"));
        assert!(html.contains("openai/gpt-4"));
        assert!(html.contains("3 days"));
        assert!(html.contains("12.3K"));
        assert!(html.contains("unsubscribe.html?email=a%40b.c"));
    }

    #[test]
    fn escapes_html_in_descriptions() {
        let renderer = TemplateRenderer::new().unwrap();
        let view = RepositoryDigestView {
            date: "2024-01-03".to_string(),
            repo: repo(),
            site_url: "https://example.com/".to_string(),
            unsubscribe_url: "https://example.com/unsubscribe.html".to_string(),
        };

        let html = renderer.render_repository_digest(&view).unwrap();

        assert!(html.contains("&lt;b&gt;gpt&lt;/b&gt; samples"));
        assert!(!html.contains("<b>gpt</b>"));
    }

    #[test]
    fn eq_helper_in_conditionals() {
        let mut hbs = create_handlebars_registry();
        hbs.register_template_string("t", r#"{{#if (eq label "Other")}}muted{{else}}loud{{/if}}"#)
            .unwrap();

        let other = hbs.render("t", &serde_json::json!({"label": "Other"})).unwrap();
        let ai = hbs.render("t", &serde_json::json!({"label": "AI/ML"})).unwrap();

        assert_eq!(other, "muted");
        assert_eq!(ai, "loud");
    }
}
