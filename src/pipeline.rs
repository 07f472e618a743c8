use crate::clean::Cleaner;
use crate::config::AppConfig;
use crate::error::ExtractError;
use crate::extractors::HeuristicExtractor;
use crate::fetch::PageFetcher;
use crate::llm::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::llm::ModelClient;
use crate::model::ExtractedRecipe;
use crate::preprocess::preprocess_html;
use crate::recover::RecoveryParser;
use crate::scrape::{split_instruction_steps, ScraperRegistry};
use log::{debug, info, warn};
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;

/// Multi-strategy recipe extraction with fallback and repair.
///
/// Strategy order per URL: registered site scraper, then (after a fetch)
/// generic DOM heuristics, then model extraction over the preprocessed page
/// text. `UnsupportedSite` and `NoRecipeFound` move to the next strategy;
/// every other error is terminal for the request. Each call is independent
/// and stateless; the pipeline itself is built once at process start.
pub struct ExtractionPipeline {
    fetcher: PageFetcher,
    registry: ScraperRegistry,
    model: Arc<dyn ModelClient>,
    cleaner: Cleaner,
    recovery: RecoveryParser,
    llm_timeout: Duration,
    prompt_budget: usize,
    dom_heuristics: bool,
}

impl ExtractionPipeline {
    pub fn new(config: &AppConfig, model: Arc<dyn ModelClient>) -> Self {
        ExtractionPipeline::from_parts(
            PageFetcher::new(
                Duration::from_secs(config.fetcher.timeout_secs),
                &config.fetcher.user_agent,
            ),
            ScraperRegistry::with_builtin_sites(),
            model,
            Duration::from_secs(config.llm.timeout_secs),
            config.llm.prompt_budget,
            config.pipeline.dom_heuristics,
        )
    }

    pub fn from_parts(
        fetcher: PageFetcher,
        registry: ScraperRegistry,
        model: Arc<dyn ModelClient>,
        llm_timeout: Duration,
        prompt_budget: usize,
        dom_heuristics: bool,
    ) -> Self {
        ExtractionPipeline {
            fetcher,
            registry,
            model,
            cleaner: Cleaner::new(),
            recovery: RecoveryParser::new(),
            llm_timeout,
            prompt_budget,
            dom_heuristics,
        }
    }

    /// Extract a structured recipe from a URL.
    pub async fn extract(&self, url: &str) -> Result<ExtractedRecipe, ExtractError> {
        match self.scrape_site(url).await {
            Ok(recipe) => return Ok(recipe),
            // The one error kind that triggers the fallback pipeline
            Err(ExtractError::UnsupportedSite) => {
                debug!("no site scraper for {url}, running fallback pipeline")
            }
            Err(e) => return Err(e),
        }

        let html = self.fetcher.fetch(url).await?;

        if self.dom_heuristics {
            let document = Html::parse_document(&html);
            match HeuristicExtractor::extract(&document) {
                Ok(recipe) => {
                    info!("extracted recipe from {url} via DOM heuristics");
                    return Ok(self.finish(recipe, url));
                }
                Err(ExtractError::NoRecipeFound) => {
                    debug!("DOM heuristics found nothing on {url}, trying model extraction")
                }
                Err(e) => return Err(e),
            }
        }

        let page_text = preprocess_html(&html);
        let raw_output = self.model_extract(&page_text).await?;
        let recovered = self.recovery.parse(&raw_output)?;

        info!("extracted recipe from {url} via model fallback");
        Ok(self.finish(
            ExtractedRecipe::new(recovered.title, recovered.ingredients, recovered.instructions),
            url,
        ))
    }

    /// Primary strategy: a scraper registered for the URL's domain.
    async fn scrape_site(&self, url: &str) -> Result<ExtractedRecipe, ExtractError> {
        let Some(site_scraper) = self.registry.resolve(url) else {
            return Err(ExtractError::UnsupportedSite);
        };

        let html = self.fetcher.fetch(url).await?;
        let document = Html::parse_document(&html);
        let scraped = site_scraper.scrape(&document)?;

        info!(
            "extracted recipe from {url} via '{}' scraper",
            site_scraper.name()
        );
        let mut recipe = ExtractedRecipe::new(
            scraped.title,
            scraped.ingredients,
            split_instruction_steps(&scraped.instructions),
        );
        recipe.image_url = scraped.image_url;
        Ok(self.finish(recipe, url))
    }

    /// Dispatch the model call on its own task and wait at most the
    /// configured deadline. On timeout the task is abandoned (it may run to
    /// completion in the background, unobserved) and the caller gets
    /// `TimedOut` immediately.
    async fn model_extract(&self, page_text: &str) -> Result<String, ExtractError> {
        let model = Arc::clone(&self.model);
        let user_prompt = build_user_prompt(page_text, self.prompt_budget);

        let call = tokio::spawn(async move { model.chat(SYSTEM_PROMPT, &user_prompt).await });

        match tokio::time::timeout(self.llm_timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ExtractError::UpstreamUnavailable(join_error.to_string())),
            Err(_) => {
                warn!(
                    "model call exceeded {:?} deadline, abandoning task",
                    self.llm_timeout
                );
                Err(ExtractError::TimedOut(self.llm_timeout))
            }
        }
    }

    /// Final normalization, identical for every strategy: clean the
    /// ingredient list, then filter instructions against the cleaned
    /// ingredients, then stamp the source URL.
    fn finish(&self, mut recipe: ExtractedRecipe, url: &str) -> ExtractedRecipe {
        recipe.ingredients = self.cleaner.clean_ingredients(&recipe.ingredients);
        recipe.instructions = self
            .cleaner
            .filter_instructions(recipe.instructions, &recipe.ingredients);
        recipe.original_url = Some(url.to_string());
        recipe
    }
}
