//! Habitual CLI - track daily habits and streaks from the terminal.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use habitual::date::{format_date, parse_user_day, today};
use habitual::streak::{aggregate_stats_with, windowed_completion};
use habitual::{App, Backend, Change, Config, HabitCard, HabitStore, Intent, ViewModel, is_user_error, open_backend};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("habitual")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("habitual.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn color_swatch(color: &str) -> ColoredString {
    match parse_hex(color) {
        Some((r, g, b)) => "●".truecolor(r, g, b),
        None => "●".normal(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn format_grid(card: &HabitCard) -> String {
    card.grid
        .iter()
        .map(|day| {
            if day.completed {
                day.label.on_green().black().to_string()
            } else {
                day.label.dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_card(card: &HabitCard) {
    println!(
        "{} {} {}",
        color_swatch(&card.color),
        format!("{}.", card.index + 1).cyan(),
        card.name.bold()
    );
    println!("    {}", card.description.dimmed());
    println!(
        "    {}   {} {} days",
        format_grid(card),
        "streak".dimmed(),
        card.current_streak.to_string().yellow()
    );
}

fn print_view(view: &ViewModel) {
    println!("{}", view.header.bold());
    if view.is_empty() {
        println!("{}", "No habits yet. Start tracking with `hb add <name>`.".dimmed());
        return;
    }
    for card in &view.cards {
        print_card(card);
    }
}

/// Convert a 1-based CLI number to a store index.
fn to_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| eyre::eyre!("habit numbers start at 1"))
}

fn run<B: Backend>(app: &mut App<B>, command: Command, config: &Config) -> Result<()> {
    let today = today();

    match command {
        Command::Add {
            name,
            description,
            color,
        } => {
            let update = app
                .dispatch_on(
                    Intent::Submit {
                        name: name.clone(),
                        description,
                        color,
                    },
                    today,
                )
                .context("Failed to create habit")?;

            if !update.changes.iter().any(Change::touches_store) {
                eyre::bail!("habit name cannot be empty");
            }
            println!("{} Created: {}", "✓".green(), name.trim());
        }

        Command::Edit {
            index,
            name,
            description,
            color,
        } => {
            let index = to_index(index)?;
            let existing = app
                .store()
                .get(index)
                .cloned()
                .ok_or_else(|| eyre::eyre!("no habit numbered {}", index + 1))?;

            app.dispatch_on(Intent::OpenEdit { index }, today)?;
            let update = app
                .dispatch_on(
                    Intent::Submit {
                        name: name.unwrap_or(existing.name),
                        description: description.unwrap_or(existing.description),
                        color,
                    },
                    today,
                )
                .context("Failed to update habit")?;

            if !update.changes.iter().any(Change::touches_store) {
                eyre::bail!("habit name cannot be empty");
            }

            println!("{} Updated habit {}", "✓".green(), index + 1);
        }

        Command::Delete { index } => {
            let index = to_index(index)?;
            let name = app.store().get(index).map(|h| h.name.clone()).unwrap_or_default();
            app.dispatch_on(Intent::Delete { index }, today)
                .context("Failed to delete habit")?;

            println!("{} Deleted: {}", "✓".green(), name);
        }

        Command::Toggle { index, day } => {
            let index = to_index(index)?;
            let date = parse_user_day(&day, today)
                .ok_or_else(|| eyre::eyre!("Invalid day \"{}\" (expected YYYY-MM-DD, YYYYMMDD, today or yesterday)", day))?;
            let day_key = format_date(date);

            let update = app
                .dispatch_on(
                    Intent::ToggleDate {
                        index,
                        day_key: day_key.clone(),
                    },
                    today,
                )
                .context("Failed to toggle day")?;

            let completed = app
                .store()
                .get(index)
                .map(|h| h.is_completed(&day_key))
                .unwrap_or(false);
            let mark = if completed { "✓".green() } else { "○".dimmed() };
            println!("{} {} {}", mark, day_key, if completed { "completed" } else { "cleared" });
            if let Some(card) = update.view.cards.get(index) {
                print_card(card);
            }
        }

        Command::List => {
            let update = app.dispatch_on(Intent::Refresh, today)?;
            print_view(&update.view);
        }

        Command::Show { index } => {
            let index = to_index(index)?;
            let habit = app
                .store()
                .get(index)
                .ok_or_else(|| eyre::eyre!("no habit numbered {}", index + 1))?;
            let view = app.render_on(today);
            let card = &view.cards[index];
            let window = windowed_completion(&habit.completed_dates, config.window_days, today);

            println!("{}: {}", "Name".bold(), habit.name);
            println!("{}: {}", "Description".bold(), card.description);
            println!("{}: {} {}", "Color".bold(), color_swatch(&habit.color), habit.color);
            println!("{}: {}", "Created".bold(), habit.created_at);
            println!("{}: {} days", "Current streak".bold(), card.current_streak);
            println!("{}: {} days", "Longest streak".bold(), card.longest_streak);
            println!(
                "{}: {}/{} ({:.1}%)",
                format!("Last {} days", config.window_days).bold(),
                window.completed_count,
                config.window_days,
                window.rate * 100.0
            );
            println!("{}: {}", "Recent".bold(), format_grid(card));
        }

        Command::Stats { window } => {
            let window_days = window.unwrap_or(config.window_days);
            let stats = aggregate_stats_with(app.store().habits(), window_days, today, &config.streak());

            if stats.habits.is_empty() {
                println!("{}", "No habits yet".dimmed());
                return Ok(());
            }

            println!(
                "{} Last {} days: {}/{} check-ins ({:.1}%)",
                "→".blue(),
                window_days,
                stats.actual,
                stats.possible,
                stats.rate * 100.0
            );
            for s in &stats.habits {
                println!(
                    "  {} {:>5.1}%  current {:>3}  best {:>3}  {}",
                    format!("{}.", s.index + 1).cyan(),
                    s.window.rate * 100.0,
                    s.current_streak,
                    s.longest_streak,
                    s.name
                );
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    let result = Config::load(cli.config.as_deref()).and_then(|mut config| {
        if let Some(dir) = &cli.dir {
            config = config.data_dir(dir);
        }
        let data_dir = config.resolve_data_dir();
        let backend = open_backend(config.backend, &data_dir).context("Failed to open storage")?;
        let mut app = App::new(HabitStore::open(backend), &config);
        run(&mut app, cli.command, &config)
    });

    if let Err(e) = result {
        if !is_user_error(&e) {
            log::error!("{:#}", e);
        }
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
