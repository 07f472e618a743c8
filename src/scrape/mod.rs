mod sites;

pub use sites::SelectorScraper;

use crate::error::ExtractError;
use log::debug;
use scraper::Html;
use url::Url;

/// A fully structured scrape of a supported site. Instructions come back as
/// a single raw text blob; the pipeline splits it into steps.
#[derive(Debug, Clone)]
pub struct ScrapedRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image_url: Option<String>,
}

/// A site-domain-specific extraction strategy.
pub trait SiteScraper: Send + Sync {
    /// Short name used in logs (e.g. "allrecipes")
    fn name(&self) -> &str;

    /// Domains this strategy is registered for, without a `www.` prefix
    fn domains(&self) -> &[&str];

    /// Extract a structured recipe from the parsed page.
    /// Failure here is `ExtractionFailed`: the strategy matched the site,
    /// so the pipeline must not fall back.
    fn scrape(&self, document: &Html) -> Result<ScrapedRecipe, ExtractError>;
}

/// Registry of site strategies, resolved by URL domain.
///
/// Constructed once at process start and injected into the pipeline.
#[derive(Default)]
pub struct ScraperRegistry {
    scrapers: Vec<Box<dyn SiteScraper>>,
}

impl ScraperRegistry {
    pub fn new() -> Self {
        ScraperRegistry {
            scrapers: Vec::new(),
        }
    }

    /// Registry pre-loaded with the bundled site strategies.
    pub fn with_builtin_sites() -> Self {
        let mut registry = ScraperRegistry::new();
        for scraper in sites::builtin_scrapers() {
            registry.register(scraper);
        }
        registry
    }

    pub fn register(&mut self, scraper: Box<dyn SiteScraper>) {
        self.scrapers.push(scraper);
    }

    pub fn is_empty(&self) -> bool {
        self.scrapers.is_empty()
    }

    /// Resolve the strategy registered for the URL's domain, if any.
    /// Host matching is case-insensitive, ignores a `www.` prefix and
    /// accepts subdomains of a registered domain.
    pub fn resolve(&self, url: &str) -> Option<&dyn SiteScraper> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);

        let found = self.scrapers.iter().find(|s| {
            s.domains()
                .iter()
                .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
        });

        match &found {
            Some(s) => debug!("resolved scraper '{}' for host {host}", s.name()),
            None => debug!("no scraper registered for host {host}"),
        }
        found.map(|s| s.as_ref())
    }
}

/// Split a raw instructions blob into ordered, trimmed, non-empty steps.
pub fn split_instruction_steps(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(str::to_string)
        .collect()
}
