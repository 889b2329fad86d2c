//! Keyword-based repository categorization.
//!
//! Categories are assigned from an ordered rule table: the first rule with a
//! keyword found in the description or language wins. Repositories with no
//! keyword match fall back to a per-language default, then to [`OTHER`].

/// Label for repositories that match no rule and no language fallback.
pub const OTHER: &str = "Other";

/// One entry of the category taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    /// Category label.
    pub label: &'static str,

    /// Lowercase keywords matched as substrings.
    pub keywords: &'static [&'static str],
}

impl CategoryRule {
    /// Returns true if any keyword appears in either lowercase haystack.
    fn matches(&self, description: &str, language: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| description.contains(keyword) || language.contains(keyword))
    }
}

/// Category rules in priority order.
pub const TAXONOMY: &[CategoryRule] = &[
    CategoryRule {
        label: "AI/ML",
        keywords: &[
            "machine learning",
            "ai",
            "neural",
            "tensorflow",
            "pytorch",
            "llm",
            "gpt",
            "chatgpt",
            "agent",
            "model",
            "deep learning",
            "nlp",
            "computer vision",
        ],
    },
    CategoryRule {
        label: "Web Development",
        keywords: &[
            "web",
            "frontend",
            "backend",
            "react",
            "vue",
            "angular",
            "node",
            "javascript",
            "typescript",
            "css",
            "html",
            "api",
            "framework",
        ],
    },
    CategoryRule {
        label: "Mobile",
        keywords: &[
            "mobile",
            "ios",
            "android",
            "flutter",
            "react native",
            "swift",
            "kotlin",
        ],
    },
    CategoryRule {
        label: "DevOps",
        keywords: &[
            "docker",
            "kubernetes",
            "ci/cd",
            "infrastructure",
            "deployment",
            "cloud",
            "aws",
            "azure",
            "gcp",
            "terraform",
        ],
    },
    CategoryRule {
        label: "Data Science",
        keywords: &[
            "data",
            "analytics",
            "pandas",
            "numpy",
            "scipy",
            "jupyter",
            "notebook",
            "visualization",
        ],
    },
    CategoryRule {
        label: "System/OS",
        keywords: &[
            "os",
            "operating system",
            "kernel",
            "driver",
            "system",
            "low-level",
            "embedded",
        ],
    },
    CategoryRule {
        label: "Security",
        keywords: &[
            "security",
            "cryptography",
            "encryption",
            "authentication",
            "authorization",
            "vulnerability",
        ],
    },
    CategoryRule {
        label: "Learning",
        keywords: &[
            "tutorial",
            "course",
            "guide",
            "documentation",
            "book",
            "learning",
            "education",
            "example",
        ],
    },
];

/// Category used when no keyword matches, keyed by exact lowercase language.
pub const LANGUAGE_FALLBACK: &[(&str, &str)] = &[
    ("python", "AI/ML"),
    ("javascript", "Web Development"),
    ("typescript", "Web Development"),
    ("go", "System/OS"),
    ("rust", "System/OS"),
    ("java", "Web Development"),
    ("c++", "System/OS"),
    ("c", "System/OS"),
];

/// Assigns a category label from a repository's description and language.
///
/// Matching is case-insensitive. Keyword rules always take precedence over the
/// language fallback.
#[must_use]
pub fn categorize(description: &str, language: &str) -> &'static str {
    let description = description.to_lowercase();
    let language = language.trim().to_lowercase();

    if let Some(rule) = TAXONOMY
        .iter()
        .find(|rule| rule.matches(&description, &language))
    {
        return rule.label;
    }

    LANGUAGE_FALLBACK
        .iter()
        .find(|(lang, _)| *lang == language)
        .map_or(OTHER, |(_, label)| label)
}

/// All category labels in display order, ending with [`OTHER`].
pub fn labels() -> impl Iterator<Item = &'static str> {
    TAXONOMY
        .iter()
        .map(|rule| rule.label)
        .chain(std::iter::once(OTHER))
}
