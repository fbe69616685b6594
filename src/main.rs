use clap::Parser;
use listing_crawl::{CrawlConfig, SearchStore};
use std::path::PathBuf;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = run(args).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> listing_crawl::Result<()> {
    let data_dir = args.data_dir;

    match args.command {
        Command::Crawl {
            url,
            save,
            config,
            max_pages,
            page_timeout,
        } => {
            let mut crawl_config = match config {
                Some(path) => {
                    ::log::info!("Loading configuration from file: {}", path.display());
                    let mut loaded = CrawlConfig::from_file(path)?;
                    loaded.start_url = url;
                    loaded
                }
                None => CrawlConfig::new(&url),
            };
            crawl_config.apply_env();
            if let Some(limit) = max_pages {
                crawl_config.max_pages = Some(limit as usize);
            }
            if let Some(secs) = page_timeout {
                crawl_config.page_timeout_secs = secs.max(1);
            }
            if let Some(dir) = data_dir {
                crawl_config.data_dir = dir;
            }

            let start_time = std::time::Instant::now();
            let links = listing_crawl::crawl(&crawl_config).await?;
            ::log::info!(
                "Crawl complete - {} links in {:.2} seconds",
                links.len(),
                start_time.elapsed().as_secs_f64()
            );

            for link in &links {
                println!("{link}");
            }

            if let Some(name) = save {
                let store = SearchStore::new(&crawl_config.data_dir);
                let total = store.save(&name, &links)?;
                ::log::info!("Search {} now holds {} links", name, total);
            }
        }
        Command::List => {
            for name in store_at(data_dir).list()? {
                println!("{name}");
            }
        }
        Command::Show { name } => {
            let store = store_at(data_dir);
            if !store.exists(&name) {
                ::log::warn!("No saved search named {}", name);
            }
            for link in store.load(&name) {
                println!("{link}");
            }
        }
        Command::Remove { name } => {
            if !store_at(data_dir).remove(&name)? {
                ::log::warn!("No saved search named {}", name);
            }
        }
    }

    Ok(())
}

fn store_at(data_dir: Option<PathBuf>) -> SearchStore {
    SearchStore::new(data_dir.unwrap_or_else(|| PathBuf::from("data")))
}
