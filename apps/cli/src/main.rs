use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{App, ClientConfig, Screen, DEFAULT_SERVER_URL};
use futures::StreamExt;
use shared::domain::{Hero, HeroId};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "heroes", about = "Browse and edit the hero registry")]
struct Args {
    #[arg(long, global = true, default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Quiet period before a search term is sent.
    #[arg(long, global = true, default_value_t = 300)]
    debounce_ms: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Top heroes, as on the summary view.
    Summary,
    List,
    Show {
        id: i64,
    },
    Add {
        name: String,
    },
    Rename {
        id: i64,
        name: String,
    },
    Delete {
        id: i64,
    },
    /// Replays each argument as the search box contents, one keystroke apart.
    Search {
        #[arg(required = true)]
        keystrokes: Vec<String>,
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },
    /// Resolves a route path the way the navigation links do.
    Open {
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let app = App::connect(ClientConfig {
        server_url: args.server_url,
        search_debounce: Duration::from_millis(args.debounce_ms),
    })?;
    let outcome = run(&app, args.command).await;
    print_messages(&app);
    outcome
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Summary => show_screen(app.navigate("summary").await?),
        Command::List => show_screen(app.navigate("list").await?),
        Command::Show { id } => show_screen(app.navigate(&detail_path(id)).await?),
        Command::Open { path } => show_screen(app.navigate(&path).await?),
        Command::Add { name } => {
            let Screen::List(mut list) = app.navigate("list").await? else {
                bail!("list route is not wired to the list view");
            };
            match list.add(&name).await {
                Some(hero) => println!("added {}", format_hero(hero)),
                None => println!("nothing added"),
            }
        }
        Command::Rename { id, name } => {
            app.navigate("list").await?;
            let Screen::Detail(mut detail) = app.navigate(&detail_path(id)).await? else {
                bail!("detail route is not wired to the detail view");
            };
            if !detail.rename(name) {
                println!("no hero with id={id}");
                return Ok(());
            }
            match detail.save().await {
                Some(true) => println!("saved; back at {}", current_path(app)),
                _ => println!("save failed; back at {}", current_path(app)),
            }
        }
        Command::Delete { id } => {
            let Screen::List(mut list) = app.navigate("list").await? else {
                bail!("list route is not wired to the list view");
            };
            let Some(hero) = list.heroes().iter().find(|h| h.id == HeroId(id)).cloned() else {
                println!("no hero with id={id}");
                return Ok(());
            };
            let deleted = list.delete(&hero).await?;
            println!(
                "{} {}; {} heroes left",
                if deleted { "deleted" } else { "could not delete" },
                format_hero(&hero),
                list.heroes().len()
            );
        }
        Command::Search {
            keystrokes,
            interval_ms,
        } => {
            let search = app.search();
            for term in keystrokes {
                debug!(%term, "typing");
                search.search(term);
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
            }
            let mut results = search.into_results();
            while let Some(heroes) = results.next().await {
                println!("results:");
                print_heroes(&heroes);
            }
        }
    }
    Ok(())
}

fn show_screen(screen: Screen) {
    match screen {
        Screen::Summary(dashboard) => {
            println!("Top Heroes");
            print_heroes(dashboard.heroes());
        }
        Screen::List(list) => {
            println!("My Heroes");
            print_heroes(list.heroes());
        }
        Screen::Detail(detail) => match detail.hero() {
            Some(hero) => println!("{} Details\n  {}", hero.name.to_uppercase(), format_hero(hero)),
            None => println!("no hero loaded for id={}", detail.hero_id()),
        },
    }
}

fn detail_path(id: i64) -> String {
    format!("detail/{id}")
}

fn current_path(app: &App) -> String {
    app.location().path().unwrap_or_default()
}

fn format_hero(hero: &Hero) -> String {
    format!("{:>3}  {}", hero.id.0, hero.name)
}

fn print_heroes(heroes: &[Hero]) {
    if heroes.is_empty() {
        println!("  (none)");
    }
    for hero in heroes {
        println!("  {}", format_hero(hero));
    }
}

fn print_messages(app: &App) {
    let messages = app.messages().snapshot();
    if messages.is_empty() {
        return;
    }
    println!("\nMessages");
    for message in messages {
        println!("  {message}");
    }
}
