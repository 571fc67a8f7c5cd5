// SPDX-License-Identifier: MPL-2.0

//! Command-line flags and the commands understood by the interactive loop.

use clap::Parser;
use network_client::Prompt;
use network_client::state::AppSettings;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Terminal client for a Network server.
#[derive(Parser, Debug)]
#[command(name = "network-client", version, about = "Browse and post to a Network server")]
pub struct Args {
    /// Server base URL (default from settings, else http://127.0.0.1:8000).
    #[arg(long)]
    pub server: Option<String>,

    /// Value of the server's session cookie, copied from a logged-in browser.
    #[arg(long)]
    pub session: Option<String>,

    /// CSRF token to use instead of the one the server hands out.
    #[arg(long)]
    pub csrf: Option<String>,

    /// Print views as HTML instead of plain text.
    #[arg(long)]
    pub html: bool,

    /// Client path to open first, e.g. /profile/alice?page=2.
    #[arg(long, default_value = "/posts?page=1")]
    pub start: String,

    /// Write the effective settings back to the settings file.
    #[arg(long)]
    pub save_settings: bool,
}

impl Args {
    /// Flags win over the settings file.
    pub fn apply(&self, settings: &mut AppSettings) {
        if let Some(server) = &self.server {
            settings.server_url = server.clone();
        }
        if let Some(session) = &self.session {
            settings.session_cookie = Some(session.clone());
        }
        if let Some(csrf) = &self.csrf {
            settings.csrf_token = Some(csrf.clone());
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Feed(u32),
    Following(u32),
    Profile { username: String, page: u32 },
    Next,
    Prev,
    Back,
    Forward,
    Like(u64),
    Edit(u64),
    Follow(String),
    Post(String),
    Open(String),
    Click(String),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  feed [page]              all posts
  following [page]         posts from people you follow
  profile <user> [page]    a user's profile
  next | prev              page through the current view
  back | forward           move through history
  like <id>                like or unlike a post
  edit <id>                edit one of your posts
  follow <user>            follow or unfollow a user
  post <text>              publish a new post
  open <path>              open a path such as /profile/alice?page=2
  click <key>              activate a control by its key
  show                     print the current view
  help | quit";

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match word {
            "" => return Ok(None),
            "feed" | "posts" => Command::Feed(page_arg(args.next(), "feed [page]")?),
            "following" => Command::Following(page_arg(args.next(), "following [page]")?),
            "profile" => {
                const USAGE: &str = "profile <user> [page]";
                let username = args.next().ok_or(CommandError::Usage(USAGE))?;
                Command::Profile {
                    username: username.to_string(),
                    page: page_arg(args.next(), USAGE)?,
                }
            }
            "next" => Command::Next,
            "prev" | "previous" => Command::Prev,
            "back" => Command::Back,
            "forward" => Command::Forward,
            "like" => Command::Like(id_arg(args.next(), "like <id>")?),
            "edit" => Command::Edit(id_arg(args.next(), "edit <id>")?),
            "follow" | "unfollow" => Command::Follow(
                args.next()
                    .ok_or(CommandError::Usage("follow <user>"))?
                    .to_string(),
            ),
            "post" if !rest.is_empty() => Command::Post(rest.to_string()),
            "post" => return Err(CommandError::Usage("post <text>")),
            "open" => Command::Open(
                args.next()
                    .ok_or(CommandError::Usage("open <path>"))?
                    .to_string(),
            ),
            "click" => Command::Click(
                args.next()
                    .ok_or(CommandError::Usage("click <key>"))?
                    .to_string(),
            ),
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn page_arg(arg: Option<&str>, usage: &'static str) -> Result<u32, CommandError> {
    match arg {
        None => Ok(1),
        Some(raw) => match raw.parse::<u32>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(CommandError::Usage(usage)),
        },
    }
}

fn id_arg(arg: Option<&str>, usage: &'static str) -> Result<u64, CommandError> {
    arg.and_then(|raw| raw.parse().ok())
        .ok_or(CommandError::Usage(usage))
}

/// Reads one line from stdin. End of input cancels.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, message: &str, initial: &str) -> Option<String> {
        let mut stdout = io::stdout();
        let _ = writeln!(stdout, "{message}");
        let _ = writeln!(stdout, "  current: {initial}");
        let _ = write!(stdout, "  new> ");
        let _ = stdout.flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}
