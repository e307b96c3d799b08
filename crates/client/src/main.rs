use anyhow::Context;
use clap::Parser;
use client::{Navigator, VisitOutcome, pages};
use protocol::{NavigationRequest, PageObject, VisitMethod};
use services::services::pages::PageRegistry;
use tracing::info;

/// Visit pages of a running app the way the browser client does
#[derive(Debug, Parser)]
#[command(name = "inertia-visit", version)]
struct Args {
    /// Application origin, e.g. http://127.0.0.1:3000
    #[arg(long, env = "APP_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Paths to visit; the first is loaded as a full page
    #[arg(required = true)]
    paths: Vec<String>,

    /// Props to fetch on the follow-up visits
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Props to leave out of the follow-up visits
    #[arg(long, value_delimiter = ',')]
    except: Vec<String>,

    /// Method of the follow-up visits
    #[arg(long, default_value = "get")]
    method: VisitMethod,

    /// JSON body for non-GET visits
    #[arg(long)]
    data: Option<String>,

    /// Print the page object as JSON after each visit
    #[arg(long)]
    json: bool,
}

fn print_page(registry: &PageRegistry<String>, page: &PageObject, json: bool) -> anyhow::Result<()> {
    println!("== {} ({}, version {})", page.component, page.url, page.version);
    match registry.render(page) {
        Ok(text) => println!("{text}"),
        Err(e) => println!("{e}"),
    }
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    utils::logging::init("warn");

    let args = Args::parse();
    let data: Option<serde_json::Value> = args
        .data
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("--data is not valid JSON")?;

    let registry = pages::registry().context("failed to build page renderers")?;
    let mut navigator = Navigator::new(&args.base_url)?;

    let (first, rest) = args
        .paths
        .split_first()
        .context("at least one path is required")?;
    let page = navigator
        .boot(first)
        .await
        .with_context(|| format!("failed to load {first}"))?;
    print_page(&registry, page, args.json)?;

    for path in rest {
        let mut request = NavigationRequest::new(args.method, path.as_str())
            .only(args.only.iter().cloned())
            .except(args.except.iter().cloned());
        if let Some(data) = &data {
            request = request.data(data.clone());
        }

        let outcome = navigator
            .visit(request)
            .await
            .with_context(|| format!("visit to {path} failed"))?;
        match &outcome {
            VisitOutcome::Satisfied => info!(path = %path, "Visit satisfied"),
            VisitOutcome::FullReload { location } => {
                println!("-- reloaded {location} as a full page");
            }
            VisitOutcome::External { location } => {
                println!("-- leaving the application for {location}");
                continue;
            }
        }

        if let Some(page) = navigator.page() {
            print_page(&registry, page, args.json)?;
        }
    }

    Ok(())
}
