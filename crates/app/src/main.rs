use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use services::{
    PracticeService, SessionCompletion, SessionRunner, SessionStart, StatsService,
};
use shabda_core::model::{DeckId, GameSettings, SessionSummary};
use storage::decks::CsvDeckSource;
use storage::history::HistoryStore;
use storage::kv::KvStore;
use storage::progress::ProgressStore;
use storage::sqlite::SqliteKv;

//
// ─── CLI ───────────────────────────────────────────────────────────────────────
//

#[derive(Parser)]
#[command(name = "shabda")]
#[command(about = "Marathi vocabulary practice with spaced repetition")]
#[command(version)]
struct Cli {
    /// SQLite database URL or file path
    #[arg(long, global = true, env = "SHABDA_DB_URL", default_value = "sqlite://shabda.sqlite3")]
    db: String,

    /// Directory of <letter>.csv deck files
    #[arg(long, global = true, env = "SHABDA_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available decks
    Decks,

    /// Play a practice session for one deck
    Play {
        /// Deck letter, e.g. म
        deck: String,
    },

    /// Show lifetime stats and candy progress
    Stats,

    /// Show recent session results
    History {
        /// Maximum number of sessions to show
        #[arg(long, short, default_value_t = 10)]
        limit: usize,
    },

    /// Cash in the candy counter (resets it to zero)
    ResetCandy,

    /// Wipe all saved progress, history, and stars
    ClearData {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

//
// ─── ENTRY POINT ───────────────────────────────────────────────────────────────
//

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,sqlx=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Open + migrate SQLite at startup; the library crates stay pure.
    let db_url = normalize_sqlite_url(cli.db);
    prepare_sqlite_file(&db_url)?;
    let sqlite = SqliteKv::connect(&db_url).await?;
    sqlite.migrate().await?;
    let kv: Arc<dyn KvStore> = Arc::new(sqlite);

    let decks = CsvDeckSource::new(&cli.data_dir);
    let settings = GameSettings::default();

    match cli.command {
        Commands::Decks => {
            let available = decks.available_decks()?;
            if available.is_empty() {
                println!("No deck files found in {}", decks.dir().display());
                return Ok(());
            }
            for id in available {
                match decks.load_deck(&id) {
                    Ok(deck) => println!("{}  ({} words)", id, deck.len()),
                    Err(err) => println!("{id}  (unreadable: {err})"),
                }
            }
        }

        Commands::Play { deck } => {
            let deck = decks.load_deck(&DeckId::new(deck))?;
            let mut progress = ProgressStore::load(Arc::clone(&kv)).await?;
            let history = HistoryStore::new(Arc::clone(&kv));
            let service = PracticeService::with_defaults();
            let mut rng = rand::rng();

            match service.start_session(&deck, &progress, &mut rng)? {
                SessionStart::NothingToPractice => {
                    println!("Nothing to practice today. Come back tomorrow!");
                }
                SessionStart::Ready(mut runner) => {
                    play_session(&service, &mut runner, &mut progress, &history).await?;
                }
            }
        }

        Commands::Stats => {
            let progress = ProgressStore::load(Arc::clone(&kv)).await?;
            let history = HistoryStore::new(Arc::clone(&kv));
            let stats = StatsService::new(settings);

            let overview = stats.overview(&progress, &history).await?;
            println!("Total stars:    {}", overview.total_stars);
            println!("Sessions:       {}", overview.sessions_recorded);
            println!("Words tracked:  {}", overview.tracked_words);
            println!("Words mastered: {}", overview.mastered_words);
            println!(
                "Candy:          {} earned, {}/{} toward the next",
                overview.candy.candies_earned,
                overview.candy.stars_into_current,
                overview.candy.stars_per_candy,
            );
        }

        Commands::History { limit } => {
            let history = HistoryStore::new(Arc::clone(&kv));
            let stats = StatsService::new(settings);
            let recent = stats.recent_sessions(&history, limit).await?;
            if recent.is_empty() {
                println!("No sessions played yet.");
                return Ok(());
            }
            for summary in recent {
                print_history_line(&summary);
            }
        }

        Commands::ResetCandy => {
            let history = HistoryStore::new(Arc::clone(&kv));
            StatsService::new(settings).reset_candy(&history).await?;
            println!("Candy counter reset. Lifetime stars are untouched.");
        }

        Commands::ClearData { yes } => {
            if !yes {
                println!("This wipes all progress, history, and stars. Re-run with --yes.");
                return Ok(());
            }
            let mut progress = ProgressStore::load(Arc::clone(&kv)).await?;
            let history = HistoryStore::new(Arc::clone(&kv));
            StatsService::new(settings)
                .clear_all_data(&mut progress, &history)
                .await?;
            println!("All game data cleared.");
        }
    }

    Ok(())
}

//
// ─── SESSION LOOP ──────────────────────────────────────────────────────────────
//

async fn play_session(
    service: &PracticeService,
    runner: &mut SessionRunner,
    progress: &mut ProgressStore,
    history: &HistoryStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    while let Some(word) = runner.current_word().cloned() {
        let at = runner.progress();
        println!();
        match word.spelling() {
            Some(spelling) => {
                println!("[{}/{}] {} ({spelling})", at.position, at.total, word.word());
            }
            None => println!("[{}/{}] {}", at.position, at.total, word.word()),
        }
        prompt(&mut input, "Press Enter to reveal the meaning...")?;
        println!("  = {}", word.meaning());

        let answer = prompt(&mut input, "Did you know it? [y/n] ")?;
        let correct = answer.trim().eq_ignore_ascii_case("y");

        let report = service
            .answer_current(runner, progress, history, correct, &mut rng)
            .await?;
        println!("{}", if correct { "Correct!" } else { "It will come back later." });

        if let Some(reward) = report.reward {
            println!();
            println!(
                "{}  {} — {}",
                reward.emoji_display(),
                reward.message.marathi,
                reward.message.english,
            );
            prompt(&mut input, "Press Enter to continue...")?;
            if let Some(completion) = service.acknowledge_reward(runner, history).await? {
                print_completion(&completion);
                return Ok(());
            }
        }

        if let Some(completion) = report.completion {
            print_completion(&completion);
            return Ok(());
        }
    }

    Ok(())
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

fn print_completion(completion: &SessionCompletion) {
    let summary = &completion.summary;
    println!();
    println!("Session complete!");
    println!(
        "  {}  ({}% correct, best streak {})",
        "★".repeat(usize::from(summary.stars())),
        summary.accuracy(),
        summary.best_streak(),
    );
    println!(
        "  Stars: {} total, {} toward candy",
        completion.totals.total, completion.totals.candy,
    );
}

fn print_history_line(summary: &SessionSummary) {
    println!(
        "{}  deck {}  {}  {}% ({} right, {} wrong)",
        summary.completed_at().date_naive(),
        summary.deck_id(),
        "★".repeat(usize::from(summary.stars())),
        summary.accuracy(),
        summary.correct(),
        summary.incorrect(),
    );
}

//
// ─── SQLITE GLUE ───────────────────────────────────────────────────────────────
//

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid sqlite url"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty sqlite path").into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_play_command() {
        let cli = Cli::try_parse_from(["shabda", "play", "म"]).unwrap();
        match cli.command {
            Commands::Play { deck } => assert_eq!(deck, "म"),
            _ => panic!("expected play command"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["shabda", "stats", "--db", "sqlite::memory:"]).unwrap();
        assert_eq!(cli.db, "sqlite::memory:");
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn parse_history_limit() {
        let cli = Cli::try_parse_from(["shabda", "history", "--limit", "3"]).unwrap();
        match cli.command {
            Commands::History { limit } => assert_eq!(limit, 3),
            _ => panic!("expected history command"),
        }
    }

    #[test]
    fn clear_data_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["shabda", "clear-data"]).unwrap();
        assert!(matches!(cli.command, Commands::ClearData { yes: false }));
    }

    #[test]
    fn missing_subcommand_fails() {
        assert!(Cli::try_parse_from(["shabda"]).is_err());
    }

    #[test]
    fn memory_url_passes_through() {
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/x.sqlite3".into()),
            "sqlite:///tmp/x.sqlite3"
        );
    }

    #[test]
    fn bare_path_is_absolutized() {
        let url = normalize_sqlite_url("shabda.sqlite3".into());
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("shabda.sqlite3"));
    }
}
