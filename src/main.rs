mod settings;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use reqwest::header::{self, HeaderMap, HeaderValue};
use shareoxide_shorten::{
    terminal::{render_links, CommandLineSubmit, TerminalPage},
    HttpLinkApi, Outcome, SubmissionHandler,
};
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::settings::{env_name, Settings, CONFIG_FILE_ENV};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built on ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Shorten a link on a ShareOxide server
#[derive(Parser, Debug)]
#[command(version = VERSION, about)]
struct Args {
    /// The link to shorten
    link: String,

    /// Custom short link (a random one is generated if omitted)
    #[arg(short, long)]
    shortlink: Option<String>,

    /// Extra configuration file, layered over `config.toml`
    #[arg(long, env = CONFIG_FILE_ENV)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    dotenvy::dotenv().ok();
    init_tracing().wrap_err("failed to set global tracing subscriber")?;

    let args = Args::parse();

    info!(
        "Starting {} {} (built on {})...",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP")
    );

    let settings = Settings::try_load(args.config.as_deref())?;

    let http_client = init_reqwest(&settings).wrap_err("failed to initialize HTTP client")?;
    let api = HttpLinkApi::new(http_client, &settings.general.server_url)
        .wrap_err("failed to build the link API URL")?;
    debug!(url = %api.link_url(), "using link API");

    let page = TerminalPage::new(&args.link, args.shortlink.as_deref().unwrap_or_default());
    let handler = SubmissionHandler::new(page, api);

    let outcome = handler.handle(&CommandLineSubmit).await;

    if handler.page().reload_requested() {
        let links = handler
            .api()
            .links()
            .await
            .wrap_err("the link was created, but listing your links failed")?;

        render_links(&links, &mut std::io::stdout().lock())
            .wrap_err("failed to print your links")?;
    }

    Ok(match outcome {
        Outcome::Reloaded => ExitCode::SUCCESS,
        Outcome::Invalid | Outcome::Failed | Outcome::Busy => ExitCode::FAILURE,
    })
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var(env_name("LOG"))
                .from_env()?,
        )
        .try_init()?;

    Ok(())
}

fn init_reqwest(settings: &Settings) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();

    if let Some(cookie) = &settings.general.session_cookie {
        let mut value =
            HeaderValue::from_str(cookie).wrap_err("session cookie is not a valid header value")?;
        value.set_sensitive(true);
        headers.insert(header::COOKIE, value);
    }

    Ok(reqwest::ClientBuilder::new()
        .default_headers(headers)
        .build()?)
}
