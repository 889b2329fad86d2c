//! Absolute links into the published report site.

use super::TemplateError;
use url::Url;

/// Builds absolute URLs relative to the report site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    base: Url,
}

impl SiteLinks {
    /// Creates links rooted at `base`. A trailing slash is added if missing so
    /// that page paths resolve beneath it.
    #[must_use]
    pub fn new(base: &Url) -> Self {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        Self { base }
    }

    /// The site root.
    #[must_use]
    pub fn home(&self) -> &str {
        self.base.as_str()
    }

    /// One-click unsubscribe link for `email`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::LinkError`] if the page URL can't be formed.
    pub fn unsubscribe(&self, email: &str) -> Result<String, TemplateError> {
        let mut url = self.page("unsubscribe.html")?;
        url.query_pairs_mut().append_pair("email", email);
        Ok(url.into())
    }

    fn page(&self, path: &str) -> Result<Url, TemplateError> {
        self.base.join(path).map_err(|e| TemplateError::LinkError {
            path: path.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_trailing_slash() {
        let links = SiteLinks::new(&Url::parse("https://example.github.io/trending").unwrap());
        assert_eq!(links.home(), "https://example.github.io/trending/");
    }

    #[test]
    fn encodes_unsubscribe_email() {
        let links = SiteLinks::new(&Url::parse("https://example.github.io/trending/").unwrap());
        assert_eq!(
            links.unsubscribe("a+b@example.com").unwrap(),
            "https://example.github.io/trending/unsubscribe.html?email=a%2Bb%40example.com"
        );
    }
}
