// src/main.rs
use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, info};
use newsguru::{
    config::{load_config, load_env, Config},
    utils::setup_logging,
    views::{CreateView, DetailView, ListView, Navigation, Notifier},
    NewsApp,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "newsguru", version, about = "Terminal front end for the news service")]
struct Cli {
    /// Base URL of the news service, overrides NEWS_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List articles, optionally for one category
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one article
    Show { id: String },
    /// Publish a new article
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        category: String,
    },
    /// Delete an article
    Delete { id: String },
    /// Open any front end path, e.g. `/news/3`
    Open { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging comes first so configuration warnings are not lost.
    load_env();
    setup_logging(&Config::log_level_from_env()).context("Failed to initialize logging")?;

    let mut config = (*load_config().context("Invalid configuration")?).clone();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
        config = config.validate().context("Invalid --api-url")?;
    }
    config.log_settings();

    let app = NewsApp::new(Arc::new(config))?;
    info!("newsguru starting");
    run(&app, cli.command).await;
    debug!("{}", app.queries().cache().stats().summary());

    print_notifications(app.notifier());
    Ok(())
}

async fn run(app: &NewsApp, command: Command) {
    let notifier = app.notifier();
    match command {
        Command::List { category } => {
            let mut view = ListView::mount(app.queries());
            if let Some(category) = category {
                view.toggle_category(&category);
            }
            print!("{}", view.render(notifier).await);
        }
        Command::Show { id } => {
            print!("{}", app.open(&format!("/news/{}", id)).await);
        }
        Command::Create {
            title,
            body,
            author,
            category,
        } => {
            let mut view = CreateView::mount(app.queries());
            let form = view.form_mut();
            form.title = title;
            form.body = body;
            form.author_name = author;
            form.category = category;

            let navigation = view.submit(notifier).await;
            for field in view.field_errors() {
                println!("{}", field);
            }
            follow(app, navigation).await;
        }
        Command::Delete { id } => {
            let navigation = DetailView::mount(app.queries(), &id).delete(notifier).await;
            follow(app, navigation).await;
        }
        Command::Open { path } => {
            print!("{}", app.open(&path).await);
        }
    }
}

async fn follow(app: &NewsApp, navigation: Navigation) {
    if let Navigation::To(route) = navigation {
        print!("{}", app.open(&route.to_string()).await);
    }
}

fn print_notifications(notifier: &Notifier) {
    for notification in notifier.drain() {
        eprintln!("{}", notification);
    }
}
