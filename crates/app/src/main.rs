use std::fmt;
use std::io::{self, BufRead, Write as _};
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use prep_core::Clock;
use prep_core::model::{CardId, ThemeMode};
use services::{AppServices, DEFAULT_QUIZ_SIZE};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
    InvalidTheme { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTheme { raw } => write!(f, "invalid --theme value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- dashboard");
    eprintln!("  cargo run -p app -- quiz --chapter <n> [--count <n>]");
    eprintln!("  cargo run -p app -- review --chapter <n>");
    eprintln!("  cargo run -p app -- favorites");
    eprintln!("  cargo run -p app -- theme [--set light|dark]");
    eprintln!("  cargo run -p app -- reset");
    eprintln!();
    eprintln!("Common options:");
    eprintln!("  --db <sqlite_url>    (default sqlite:prep.sqlite3)");
    eprintln!("  --bank <path>        (default data/cpp_questions.json)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREP_DB_URL, PREP_BANK_PATH");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Dashboard,
    Quiz,
    Review,
    Favorites,
    Theme,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "dashboard" => Some(Self::Dashboard),
            "quiz" => Some(Self::Quiz),
            "review" => Some(Self::Review),
            "favorites" => Some(Self::Favorites),
            "theme" => Some(Self::Theme),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    bank_path: PathBuf,
    chapter: Option<u32>,
    count: usize,
    set_theme: Option<ThemeMode>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PREP_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://prep.sqlite3".into(), normalize_sqlite_url);
        let mut bank_path = std::env::var("PREP_BANK_PATH")
            .ok()
            .map_or_else(|| PathBuf::from("data/cpp_questions.json"), PathBuf::from);
        let mut chapter = None;
        let mut count = DEFAULT_QUIZ_SIZE;
        let mut set_theme = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--bank" => {
                    bank_path = PathBuf::from(require_value(args, "--bank")?);
                }
                "--chapter" => {
                    let value = require_value(args, "--chapter")?;
                    let parsed: u32 = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--chapter",
                        raw: value.clone(),
                    })?;
                    chapter = Some(parsed);
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    count = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--count",
                        raw: value.clone(),
                    })?;
                }
                "--set" => {
                    let value = require_value(args, "--set")?;
                    let mode = value
                        .parse::<ThemeMode>()
                        .map_err(|_| ArgsError::InvalidTheme { raw: value.clone() })?;
                    set_theme = Some(mode);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            bank_path,
            chapter,
            count,
            set_theme,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
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
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
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

/// Resolve a chapter number (as shown on the dashboard) to its index in the
/// progress model.
fn chapter_index(app: &AppServices, number: u32) -> Option<usize> {
    app.progress()
        .chapters()
        .iter()
        .position(|chapter| chapter.number() == number)
}

fn print_dashboard(app: &AppServices) {
    println!("CPP Exam Prep  (theme: {})", app.theme());

    let bank = app.bank();
    if bank.is_empty() {
        println!("question bank: unavailable (quizzes disabled)");
    } else {
        println!(
            "question bank: {} questions across {} domains",
            bank.len(),
            bank.questions_by_domain().len()
        );
    }

    println!();
    for chapter in app.progress().chapters() {
        println!(
            "{:>2}. {:<38} {:>5.1}%   {}/{} reviewed, {} mastered",
            chapter.number(),
            chapter.title(),
            chapter.progress_percentage(),
            chapter.reviewed_count(),
            chapter.total_count(),
            chapter.mastered_count(),
        );
    }

    let overall = app.progress().overall();
    println!();
    println!(
        "overall: {:.1}%  ({}/{} reviewed, {} mastered, {} favorites)",
        overall.percentage, overall.reviewed, overall.total_cards, overall.mastered, overall.favorites
    );
    if let Some(at) = overall.last_activity {
        println!("last activity: {at}");
    }
}

fn print_favorites(app: &AppServices) {
    let favorites = app.progress().favorites();
    if favorites.is_empty() {
        println!("no favorite cards yet");
        return;
    }
    for (chapter_number, card) in favorites {
        println!("[{}] {}\n    {}", chapter_number, card.question(), card.answer());
    }
}

fn run_quiz(app: &AppServices, chapter: u32, count: usize) -> io::Result<()> {
    let mut session = app.quiz().generate(app.bank(), chapter, count);
    let total = session.total_questions();
    if total == 0 {
        println!("no questions available for chapter {chapter}");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for index in 0..total {
        let (text, options) = {
            let question = &session.questions()[index];
            (question.text().to_owned(), question.options().to_vec())
        };

        println!("\n[{}/{}] {}", index + 1, total, text);
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", letter(i), option);
        }
        print!("answer> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let picked = line
            .trim()
            .to_ascii_lowercase()
            .bytes()
            .next()
            .and_then(|b| b.checked_sub(b'a'))
            .map(usize::from);

        match picked {
            Some(choice) if choice < options.len() => {
                // can only fail on a completed session, which this is not
                let _ = session.select_answer(index, choice);
            }
            _ => println!("(skipped)"),
        }
    }

    let score = session.complete();
    println!("\nscore: {score}/{total}");

    for question in session.questions().iter().filter(|q| !q.is_correct()) {
        println!(
            "\nmissed: {}\n  correct: {}) {}\n  {}",
            question.text(),
            letter(question.correct_index()),
            question.options()[question.correct_index()],
            question.explanation()
        );
    }

    Ok(())
}

async fn run_review(
    app: &mut AppServices,
    chapter: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(index) = chapter_index(app, chapter) else {
        println!("unknown chapter: {chapter}");
        return Ok(());
    };

    let card_ids: Vec<CardId> = app.progress().chapters()[index]
        .cards()
        .iter()
        .map(prep_core::model::Flashcard::id)
        .collect();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for id in card_ids {
        let Some((question, answer)) = app.progress().chapters()[index]
            .card(id)
            .map(|card| (card.question().to_owned(), card.answer().to_owned()))
        else {
            continue;
        };

        println!("\nQ: {question}");
        print!("(enter to reveal) ");
        io::stdout().flush()?;
        if lines.next().is_none() {
            break;
        }

        println!("A: {answer}");
        print!("[r]eviewed  [m]astered  [f]avorite  [s]kip > ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };

        match line?.trim().to_ascii_lowercase().chars().next() {
            Some('r') => app.progress_mut().mark_reviewed(index, id).await?,
            Some('m') => app.progress_mut().set_mastered(index, id, true).await?,
            Some('f') => {
                let favorite = app.progress_mut().toggle_favorite(index, id).await?;
                println!("favorite: {favorite}");
            }
            _ => {}
        }
    }

    println!(
        "\nchapter {} progress: {:.1}%",
        chapter,
        app.progress().progress_percentage(index)?
    );
    Ok(())
}

fn letter(index: usize) -> char {
    (b'a' + u8::try_from(index % 26).unwrap_or(0)) as char
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Dashboard,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Dashboard,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&args.db_url)?;
    let mut app =
        AppServices::new_sqlite(&args.db_url, &args.bank_path, Clock::default_clock()).await?;

    match cmd {
        Command::Dashboard => print_dashboard(&app),
        Command::Favorites => print_favorites(&app),
        Command::Quiz => {
            let Some(chapter) = args.chapter else {
                eprintln!("quiz requires --chapter <n>");
                print_usage();
                return Ok(());
            };
            run_quiz(&app, chapter, args.count)?;
        }
        Command::Review => {
            let Some(chapter) = args.chapter else {
                eprintln!("review requires --chapter <n>");
                print_usage();
                return Ok(());
            };
            run_review(&mut app, chapter).await?;
        }
        Command::Theme => match args.set_theme {
            Some(mode) => {
                app.set_theme(mode).await;
                println!("theme set to {mode}");
            }
            None => println!("theme: {}", app.theme()),
        },
        Command::Reset => {
            app.progress_mut().reset_progress().await;
            println!("progress reset");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
