use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-crawl")]
#[command(about = "Collects every listing link of a paginated search and keeps them per named search")]
#[command(version)]
pub struct Args {
    /// Directory holding saved searches (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk the results pages starting at URL and print the listing links
    Crawl {
        /// First results page of the search
        url: String,

        /// Merge the collected links into this saved search
        #[arg(short, long)]
        save: Option<String>,

        /// Path to JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after this many pages
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_pages: Option<u64>,

        /// Seconds to wait for each page
        #[arg(long)]
        page_timeout: Option<u64>,
    },

    /// List saved searches
    List,

    /// Print the links saved under NAME
    Show { name: String },

    /// Delete the saved search NAME
    Remove { name: String },
}
