//! Crawl command.

use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;

use crate::analysis::summarize;
use crate::cli::icons::{arrow, success, warning};
use crate::config::Config;
use crate::models::{Corpus, ProductInfo};
use crate::pipeline::{run_crawl, CrawlDeps};
use crate::scrapers::{ChromeDriver, Credentials};
use crate::services::ImageDownloader;
use crate::utils::crawl_folder_name;

/// Parsed `crawl` arguments.
pub struct CrawlArgs {
    pub url: String,
    pub output: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    pub max_terms: Option<usize>,
    pub batch_size: Option<usize>,
    pub headed: bool,
    pub email: String,
    pub password: String,
}

pub async fn cmd_crawl(mut config: Config, args: CrawlArgs) -> anyhow::Result<()> {
    if args.max_terms.is_some() {
        config.crawl.max_terms = args.max_terms;
    }
    if let Some(batch_size) = args.batch_size {
        config.crawl.batch_size = batch_size;
    }
    if args.headed {
        config.browser.headless = false;
    }

    // Reject unusable URLs before a browser is started.
    let target = config
        .site
        .target(&args.url)
        .with_context(|| format!("Cannot crawl {}", args.url))?;

    let today = chrono::Local::now().date_naive();
    let staging = args.images_dir.is_none();
    let folder = match &args.images_dir {
        Some(dir) => dir.clone(),
        None => config
            .output_dir()
            .join(crawl_folder_name(&target.product_id, today)),
    };
    tokio::fs::create_dir_all(&folder)
        .await
        .with_context(|| format!("Could not create {}", folder.display()))?;

    let classifier = config.classifier().context("Could not load classifier table")?;
    let downloader =
        ImageDownloader::new(&config.images).context("Could not build image HTTP client")?;
    let credentials = Credentials::new(args.email, args.password);

    eprintln!(
        "{} Crawling reviews for {}",
        style("→").cyan(),
        style(&target.product_id).bold()
    );
    let mut driver = ChromeDriver::launch(config.browser.clone())
        .await
        .context("Could not start the browser")?;

    let deps = CrawlDeps {
        settings: &config.crawl,
        profile: &config.site,
        vocabulary: &config.vocabulary,
        labeler: &config.sentiment,
        classifier: &classifier,
        images: &downloader,
        image_dir: &folder,
    };
    let result = run_crawl(&mut driver, &args.url, &credentials, &deps).await;
    driver.close().await;
    let corpus = result.context("Crawl failed")?;

    let folder = if staging {
        rename_to_product(&folder, corpus.product.as_ref(), today).await
    } else {
        folder
    };
    let output = args.output.unwrap_or_else(|| folder.join("reviews.json"));
    write_corpus(&corpus, &output).await?;
    report(&config, &corpus, &folder, &output);
    Ok(())
}

/// Rename the crawl folder after the product once its name is known.
/// Keeps the original folder if the name is unknown or the target exists.
async fn rename_to_product(
    folder: &Path,
    product: Option<&ProductInfo>,
    today: chrono::NaiveDate,
) -> PathBuf {
    let Some(product) = product.filter(|p| p.name != ProductInfo::UNKNOWN_NAME) else {
        return folder.to_path_buf();
    };
    let Some(parent) = folder.parent() else {
        return folder.to_path_buf();
    };
    let renamed = parent.join(crawl_folder_name(&product.name, today));
    if renamed == folder || tokio::fs::try_exists(&renamed).await.unwrap_or(true) {
        return folder.to_path_buf();
    }
    match tokio::fs::rename(folder, &renamed).await {
        Ok(()) => renamed,
        Err(e) => {
            tracing::warn!("Could not rename {}: {}", folder.display(), e);
            folder.to_path_buf()
        }
    }
}

async fn write_corpus(corpus: &Corpus, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(corpus)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Could not write {}", path.display()))
}

fn report(config: &Config, corpus: &Corpus, folder: &Path, output: &Path) {
    let summary = summarize(corpus, &config.vocabulary);
    let product = corpus
        .product
        .as_ref()
        .map(|p| p.name.as_str())
        .unwrap_or(ProductInfo::UNKNOWN_NAME);

    eprintln!("{} Crawled {}", success(), style(product).bold());
    eprintln!(
        "  {} {} reviews ({} from the initial batch), {} search terms",
        arrow(),
        summary.total_reviews,
        corpus.initial_batch,
        corpus.search_terms.len()
    );
    eprintln!(
        "  {} {} packaging-related ({:.1}%)",
        arrow(),
        summary.packaging_reviews,
        summary.packaging_percentage
    );
    eprintln!("  {} Images: {}", arrow(), folder.display());
    eprintln!("  {} Corpus: {}", arrow(), output.display());
    if !corpus.warnings.is_empty() {
        eprintln!(
            "{} {} warnings recorded in the corpus",
            warning(),
            corpus.warnings.len()
        );
    }
}
