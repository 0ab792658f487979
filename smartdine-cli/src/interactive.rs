//! Interactive prompt: one event loop over stdin and the in-flight search.

use anyhow::Result;
use smartdine_core::{ClientConfig, CompletedSearch, HttpClient, SearchSession};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::render;

const HELP: &str = "\
Type what you're craving and press enter to search.
  :surprise      let SmartDine pick
  :city NAME     switch city
  :cities        list cities
  :help          show this help
  :quit          exit";

type InFlight<'a> = Pin<Box<dyn Future<Output = CompletedSearch> + 'a>>;

/// A parsed line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Search(&'a str),
    Surprise,
    City(&'a str),
    Cities,
    Help,
    Quit,
    Unknown(&'a str),
    Empty,
}

fn parse(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Search(line);
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "surprise" | "s" => Command::Surprise,
        "city" | "c" if !arg.is_empty() => Command::City(arg),
        "cities" => Command::Cities,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line),
    }
}

/// Pick a city from the loaded list, matching case-insensitively. Any name
/// is accepted when no list is available.
fn resolve_city(session: &SearchSession, wanted: &str) -> Option<String> {
    if session.cities().is_empty() {
        return Some(wanted.to_string());
    }
    session
        .cities()
        .iter()
        .find(|c| c.eq_ignore_ascii_case(wanted))
        .cloned()
}

/// Wait for the in-flight search, or forever when there is none.
async fn next_completion(in_flight: &mut Option<InFlight<'_>>) -> CompletedSearch {
    match in_flight.as_mut() {
        Some(search) => search.await,
        None => std::future::pending().await,
    }
}

/// Run the prompt on the terminal.
pub async fn run(
    client: &dyn HttpClient,
    config: &ClientConfig,
    session: SearchSession,
) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    run_with(client, config, session, input, &mut out).await?;
    Ok(())
}

/// Drive the prompt from `input` until EOF or `:quit`, writing to `out`.
///
/// At EOF a search still loading is awaited so its result is shown.
pub async fn run_with<R, W>(
    client: &dyn HttpClient,
    config: &ClientConfig,
    mut session: SearchSession,
    input: R,
    out: &mut W,
) -> Result<SearchSession>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", render::header())?;
    writeln!(out, "{}", render::cities(&session))?;
    writeln!(out, "{}", render::results(&session))?;
    writeln!(out, "{}", HELP)?;

    let mut lines = input.lines();
    let mut in_flight: Option<InFlight<'_>> = None;

    loop {
        tokio::select! {
            completed = next_completion(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                if session.resolve(completed) {
                    writeln!(out, "{}", render::results(&session))?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if let Some(pending) = in_flight.take() {
                        session.resolve(pending.await);
                        writeln!(out, "{}", render::results(&session))?;
                    }
                    break;
                };

                let surprise = match parse(&line) {
                    Command::Empty => continue,
                    Command::Quit => break,
                    Command::Help => {
                        writeln!(out, "{}", HELP)?;
                        continue;
                    }
                    Command::Cities => {
                        writeln!(out, "{}", render::cities(&session))?;
                        continue;
                    }
                    Command::City(name) => {
                        match resolve_city(&session, name) {
                            Some(city) => {
                                session.select_city(city);
                                writeln!(out, "{}", render::cities(&session))?;
                            }
                            None => writeln!(out, "Unknown city: {}", name)?,
                        }
                        continue;
                    }
                    Command::Unknown(input) => {
                        writeln!(out, "Unknown command: {} (try :help)", input)?;
                        continue;
                    }
                    Command::Search(query) => {
                        session.set_query(query);
                        false
                    }
                    Command::Surprise => true,
                };

                if let Some(pending) = session.begin_search(surprise) {
                    writeln!(out, "{}", render::results(&session))?;
                    in_flight = Some(Box::pin(async move { pending.run(client, config).await }));
                }
            }
        }
    }

    out.flush()?;
    Ok(session)
}
