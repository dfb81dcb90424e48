//! TextBook CLI
//!
//! Command-line front end for a TextBook data directory.

use std::fs;
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use textbook::{harness, Config, FeedPost, PostStore, SyncStrategy, TextBook};
use tracing_subscriber::{fmt, EnvFilter};

/// TextBook CLI
#[derive(Parser, Debug)]
#[command(name = "textbook")]
#[command(about = "Durable post and comment store for a social feed")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./textbook_data")]
    data_dir: String,

    /// Leave flushing to the OS instead of syncing every write
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Store(StoreCommand),

    /// Run the store contract self-test in a scratch directory
    Selftest,
}

/// Commands that operate on the data directory
#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// List all posts with their indexes
    List,

    /// Show a post and its comments
    Show {
        /// Position of the post in the list
        index: usize,
    },

    /// Add a new post
    Post {
        /// Single-word author name
        author: String,

        /// Post text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Comment on a post
    Comment {
        /// Position of the post in the list
        index: usize,

        /// Single-word author name
        author: String,

        /// Comment text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Remove a post
    Remove {
        /// Position of the post in the list
        index: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,textbook=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("TextBook v{}", textbook::VERSION);

    let command = match args.command {
        Commands::Selftest => run_selftest(&args.data_dir),
        Commands::Store(command) => command,
    };

    let sync_strategy = if args.no_sync {
        SyncStrategy::OsBuffered
    } else {
        SyncStrategy::EveryWrite
    };
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .sync_strategy(sync_strategy)
        .build();

    let mut textbook = match TextBook::open(config) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            process::exit(1);
        }
    };

    match run_command(&mut textbook, command) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!(
                "No post at that index (store has {} posts)",
                textbook.post_count()
            );
            process::exit(1);
        }
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    }
}

/// Run the self-test under `data_dir` and exit with its status
fn run_selftest(data_dir: &str) -> ! {
    let scratch = harness::scratch_dir(Path::new(data_dir));
    let report = harness::run(&scratch);
    let _ = fs::remove_dir_all(&scratch);
    println!("{}", report);
    process::exit(if report.is_success() { 0 } else { 1 });
}

/// Run one store command; `Ok(false)` means the index was out of range
fn run_command(textbook: &mut TextBook, command: StoreCommand) -> textbook::Result<bool> {
    match command {
        StoreCommand::List => {
            println!("{}", textbook.render());
            Ok(true)
        }
        StoreCommand::Show { index } => Ok(match textbook.post_string(index) {
            Some(rendered) => {
                println!("{}", rendered);
                true
            }
            None => false,
        }),
        StoreCommand::Post { author, text } => {
            let id = textbook.add_post(&author, &text.join(" "))?;
            println!("Added post {:05}", id);
            Ok(true)
        }
        StoreCommand::Comment { index, author, text } => {
            let added = textbook.add_comment(index, &author, &text.join(" "))?;
            if added {
                println!("Comment added to post at index {}", index);
            }
            Ok(added)
        }
        StoreCommand::Remove { index } => Ok(match textbook.remove_post(index)? {
            Some(post) => {
                println!("Removed {}", post.render_summary());
                true
            }
            None => false,
        }),
    }
}
