// SPDX-License-Identifier: MPL-2.0

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Args, Command, HELP, StdinPrompt};
use network_client::api::{NetworkApi, NetworkClient};
use network_client::config::{CSRF_COOKIE, SESSION_COOKIE};
use network_client::dom::{render_to_html, render_to_text};
use network_client::nav::{History, Route, SessionHistory};
use network_client::runtime;
use network_client::state::AppSettings;
use network_client::view::RenderOptions;
use network_client::{AppOptions, NetworkApp, Prompt};
use std::io::{self, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type App = NetworkApp<NetworkClient, SessionHistory, StdinPrompt>;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with rendered views.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,network_client=debug")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut settings = match AppSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "using default settings");
            AppSettings::default()
        }
    };
    args.apply(&mut settings);
    if args.save_settings {
        let path = settings.save().context("failed to save settings")?;
        info!(path = %path.display(), "settings saved");
    }

    let client = NetworkClient::new(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("invalid server URL {}", settings.server_url))?;
    if let Some(session) = &settings.session_cookie {
        client.set_cookie(SESSION_COOKIE, session);
    }
    info!(server = %client.base_url(), "Starting {} v{}", network_client::config::APP_NAME, env!("CARGO_PKG_VERSION"));

    // Ask the server for a CSRF cookie while the first view loads.
    let primer = match &settings.csrf_token {
        Some(token) => {
            client.set_cookie(CSRF_COOKIE, token);
            None
        }
        None => {
            let client = client.clone();
            Some(runtime::spawn(async move { client.prime_csrf().await }))
        }
    };

    let start = Route::from_path(&args.start)
        .with_context(|| format!("cannot open {}", args.start))?;

    let options = AppOptions {
        render: RenderOptions {
            timestamp_format: settings.timestamp_format.clone(),
            offset: None,
        },
        alert_on_error: settings.alert_on_error,
    };
    let mut app = NetworkApp::new(client, SessionHistory::new("/"), StdinPrompt, options);

    let _ = runtime::block_on(app.navigate(start));
    if let Some(primer) = primer {
        match runtime::block_on(primer) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "could not fetch a CSRF token"),
            Err(e) => warn!(error = %e, "CSRF request task failed"),
        }
    }
    show(&app, args.html);

    run(&mut app, args.html)
}

fn run(app: &mut App, html: bool) -> anyhow::Result<()> {
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => return Ok(()),
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Show => {}
            command => {
                if !runtime::block_on(execute(app, command)) {
                    continue;
                }
            }
        }
        show(app, html);
    }
}

/// Returns false when there is nothing new to show.
async fn execute<A, H, P>(app: &mut NetworkApp<A, H, P>, command: Command) -> bool
where
    A: NetworkApi,
    H: History,
    P: Prompt,
{
    // Failures are logged (and alerted when enabled) by the app itself.
    match command {
        Command::Feed(page) => {
            let _ = app.navigate(Route::feed(page)).await;
        }
        Command::Following(page) => {
            let _ = app.navigate(Route::following(page)).await;
        }
        Command::Profile { username, page } => match Route::profile(username, page) {
            Ok(route) => {
                let _ = app.navigate(route).await;
            }
            Err(e) => {
                println!("{e}");
                return false;
            }
        },
        Command::Next => return click_or_say(app, "page-next", "no next page").await,
        Command::Prev => return click_or_say(app, "page-prev", "no previous page").await,
        Command::Back => {
            if let Ok(false) = app.back().await {
                println!("nothing to go back to");
                return false;
            }
        }
        Command::Forward => {
            if let Ok(false) = app.forward().await {
                println!("nothing to go forward to");
                return false;
            }
        }
        Command::Like(post_id) => {
            let _ = app.toggle_like(post_id).await;
        }
        Command::Edit(post_id) => {
            let _ = app.edit_post(post_id).await;
        }
        Command::Follow(username) => {
            let _ = app.toggle_follow(&username).await;
        }
        Command::Post(text) => {
            app.set_draft(&text);
            let _ = app.submit_post().await;
        }
        Command::Open(path) => match Route::from_path(&path) {
            Ok(route) => {
                let _ = app.navigate(route).await;
            }
            Err(e) => {
                println!("{e}");
                return false;
            }
        },
        Command::Click(key) => return click_or_say(app, &key, "nothing to click there").await,
        Command::Show | Command::Help | Command::Quit => {}
    }
    true
}

async fn click_or_say<A, H, P>(app: &mut NetworkApp<A, H, P>, key: &str, missing: &str) -> bool
where
    A: NetworkApi,
    H: History,
    P: Prompt,
{
    let fired = app.click(key).await || app.fire(key, "submit").await;
    if !fired {
        println!("{missing}");
    }
    fired
}

fn show(app: &App, html: bool) {
    let document = app.document();
    if html {
        println!("{}", render_to_html(&document));
    } else {
        println!("{}", render_to_text(&document));
    }
}
