//! questions CLI - command-line front end for the Q&A forum database

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use questions_db::config::{self, QuestionsConfig};
use questions_db::query::{QueryEngine, Ranking};
use questions_db::ui::{self, Icons};
use questions_db::{Database, Error, Question, QuestionFollower, QuestionLike, Reply, User};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "questions")]
#[command(version)]
#[command(about = "Question and answer forum backed by a single SQLite file")]
#[command(long_about = r#"
Manage users, questions, threaded replies, follows and likes stored in one
SQLite database file.

Example usage:
  questions init
  questions user add Ada Lovelace
  questions question ask --author 1 "Q1" "How do engines compute?"
  questions reply --question 1 --author 1 "By cards."
  questions top liked -n 3
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides questions.toml)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the forum tables in the database
    Init {
        /// Also write questions.toml pointing at the database
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing questions.toml
        #[arg(long)]
        force: bool,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Manage questions
    Question {
        #[command(subcommand)]
        action: QuestionCommand,
    },

    /// Reply to a question or to another reply
    Reply {
        /// Question being answered
        #[arg(short, long)]
        question: i64,

        /// Author user id
        #[arg(short, long)]
        author: i64,

        /// Reply being answered, for nested replies
        #[arg(short, long)]
        parent: Option<i64>,

        body: String,
    },

    /// Follow a question
    Follow { question: i64, user: i64 },

    /// Like a question
    Like { question: i64, user: i64 },

    /// Show the most followed or most liked questions
    Top {
        #[arg(value_enum)]
        by: TopBy,

        /// Number of questions to show
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },

    /// Show row counts per table
    Stats,
}

#[derive(Subcommand)]
enum UserCommand {
    /// Register a user
    Add { fname: String, lname: String },
    /// Show a user with their questions, replies and karma
    Show { id: i64 },
    /// List all users
    List,
}

#[derive(Subcommand)]
enum QuestionCommand {
    /// Ask a question
    Ask {
        /// Author user id
        #[arg(short, long)]
        author: i64,
        title: String,
        body: String,
    },
    /// Show a question with its likes, followers and reply thread
    Show { id: i64 },
    /// List all questions
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum TopBy {
    Followed,
    Liked,
}

impl From<TopBy> for Ranking {
    fn from(by: TopBy) -> Self {
        match by {
            TopBy::Followed => Ranking::Followers,
            TopBy::Liked => Ranking::Likes,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        ui::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?;
    let database = config::resolve_database_path(cli.database.as_deref(), file_config.as_ref());
    let json = cli.json;

    match cli.command {
        Commands::Init { write_config, force } => {
            config::ensure_db_dir(&database)?;
            let db = Database::open(&database)?;
            db.initialize_schema()?;

            if write_config {
                let path = cli.config.unwrap_or_else(config::default_config_path);
                let contents = QuestionsConfig {
                    database: Some(database.display().to_string()),
                };
                config::write_config(&path, &contents, force)?;
                tracing::info!("Wrote config to {}", path.display());
            }

            if json {
                emit(&serde_json::json!({ "database": database }))?;
            } else {
                ui::success(&format!("Database ready at {}", database.display()));
            }
        }

        Commands::User { action } => {
            let db = open(&database)?;
            run_user(&db, action, json)?;
        }

        Commands::Question { action } => {
            let db = open(&database)?;
            run_question(&db, action, json)?;
        }

        Commands::Reply { question, author, parent, body } => {
            let db = open(&database)?;
            require_question(&db, question)?;
            require_user(&db, author)?;

            let mut reply = match parent {
                Some(parent_id) => {
                    let parent = Reply::find_by_id(&db, parent_id)?.ok_or(Error::NotFound {
                        entity: "Reply",
                        id: parent_id,
                    })?;
                    if parent.question_id != question {
                        anyhow::bail!(
                            "reply {} belongs to question {}, not {}",
                            parent_id,
                            parent.question_id,
                            question
                        );
                    }
                    Reply::reply_to(&parent, author, body)
                }
                None => Reply::new(question, None, author, body),
            };
            reply.save(&db)?;

            if json {
                emit(&reply)?;
            } else {
                ui::success(&format!("Reply #{} posted", reply.id().unwrap_or_default()));
            }
        }

        Commands::Follow { question, user } => {
            let db = open(&database)?;
            require_question(&db, question)?;
            let follower = require_user(&db, user)?;
            if QuestionFollower::followers_for_question_id(&db, question)?.contains(&follower) {
                ui::warn(&format!("User {} already follows question {}", user, question));
            }
            let link = QuestionFollower::new(question, user);
            link.insert(&db)?;

            if json {
                emit(&link)?;
            } else {
                ui::success(&format!("User {} follows question {}", user, question));
            }
        }

        Commands::Like { question, user } => {
            let db = open(&database)?;
            require_question(&db, question)?;
            let liker = require_user(&db, user)?;
            if QuestionLike::likers_for_question_id(&db, question)?.contains(&liker) {
                ui::warn(&format!("User {} already likes question {}", user, question));
            }
            let link = QuestionLike::new(user, question);
            link.insert(&db)?;

            if json {
                emit(&link)?;
            } else {
                ui::success(&format!("User {} likes question {}", user, question));
            }
        }

        Commands::Top { by, limit } => {
            let db = open(&database)?;
            let ranking = Ranking::from(by);
            let ranked = QueryEngine::new(&db).ranked(ranking, limit)?;

            if json {
                emit(&ranked)?;
            } else if ranked.is_empty() {
                println!("∅ No {} recorded yet.", ranking.as_str());
            } else {
                ui::header(Icons::STAR, &format!("Top {} by {}", limit, ranking.as_str()));
                println!("{}", ui::ranked_table(&ranked));
            }
        }

        Commands::Stats => {
            let db = open(&database)?;
            let stats = db.stats()?;

            if json {
                emit(&stats)?;
            } else {
                ui::header(Icons::STATS, &format!("Forum statistics ({})", database.display()));
                println!("{}", ui::stats_table(&stats));
            }
        }
    }

    Ok(())
}

fn run_user(db: &Database, action: UserCommand, json: bool) -> anyhow::Result<()> {
    match action {
        UserCommand::Add { fname, lname } => {
            let mut user = User::new(fname, lname);
            user.save(db)?;

            if json {
                emit(&user)?;
            } else {
                ui::success(&format!(
                    "Registered {} as user #{}",
                    user.full_name(),
                    user.id().unwrap_or_default()
                ));
            }
        }

        UserCommand::Show { id } => {
            let user = require_user(db, id)?;
            let questions = user.authored_questions(db)?;
            let replies = user.authored_replies(db)?;
            let followed = user.followed_questions(db)?;
            let liked = user.liked_questions(db)?;
            let karma = user.average_karma(db)?;

            if json {
                emit(&serde_json::json!({
                    "user": user,
                    "questions": questions,
                    "replies": replies,
                    "followed": followed,
                    "liked": liked,
                    "average_karma": karma,
                }))?;
                return Ok(());
            }

            ui::header(Icons::PERSON, &format!("{} (#{})", user.full_name(), id));
            ui::info("Average karma", &format!("{:.2}", karma));
            ui::info("Replies written", &replies.len().to_string());

            for (title, list) in [
                ("Asked", &questions),
                ("Following", &followed),
                ("Liked", &liked),
            ] {
                ui::section(title);
                if list.is_empty() {
                    println!("  ∅");
                } else {
                    println!("{}", ui::question_table(list));
                }
            }
        }

        UserCommand::List => {
            let users = User::all(db)?;
            if json {
                emit(&users)?;
            } else if users.is_empty() {
                println!("∅ No users yet.");
            } else {
                println!("{}", ui::user_table(&users));
            }
        }
    }

    Ok(())
}

fn run_question(db: &Database, action: QuestionCommand, json: bool) -> anyhow::Result<()> {
    match action {
        QuestionCommand::Ask { author, title, body } => {
            require_user(db, author)?;
            let mut question = Question::new(title, body, author);
            question.save(db)?;

            if json {
                emit(&question)?;
            } else {
                ui::success(&format!("Question #{} asked", question.id().unwrap_or_default()));
            }
        }

        QuestionCommand::Show { id } => {
            let question = require_question(db, id)?;
            let author = question.author(db)?;
            let likes = question.num_likes(db)?;
            let followers = question.followers(db)?;
            let thread = question.reply_thread(db)?;

            if json {
                emit(&serde_json::json!({
                    "question": question,
                    "author": author,
                    "likes": likes,
                    "followers": followers,
                    "thread": thread,
                }))?;
                return Ok(());
            }

            ui::header(Icons::QUESTION, &format!("#{} {}", id, question.title));
            println!("{}", question.body);
            println!();
            let author_name = author
                .as_ref()
                .map(User::full_name)
                .unwrap_or_else(|| format!("unknown user {}", question.author_id));
            ui::info("Asked by", &author_name);
            println!(
                "{} {}  {} {}",
                Icons::HEART,
                likes,
                Icons::EYE,
                followers.len().style(ui::theme().dim.clone())
            );

            ui::section("Replies");
            if thread.is_empty() {
                println!("  ∅ No replies yet.");
            }
            for entry in &thread {
                let name = entry
                    .reply
                    .author(db)?
                    .map(|u| u.full_name())
                    .unwrap_or_else(|| format!("user {}", entry.reply.author_id));
                ui::thread_line(entry, &name);
            }
        }

        QuestionCommand::List => {
            let questions = Question::all(db)?;
            if json {
                emit(&questions)?;
            } else if questions.is_empty() {
                println!("∅ No questions yet.");
            } else {
                println!("{}", ui::question_table(&questions));
            }
        }
    }

    Ok(())
}

fn open(path: &Path) -> anyhow::Result<Database> {
    Database::open_existing(path)
        .with_context(|| format!("cannot open {}; run `questions init` first", path.display()))
}

fn require_user(db: &Database, id: i64) -> anyhow::Result<User> {
    Ok(User::find_by_id(db, id)?.ok_or(Error::NotFound { entity: "User", id })?)
}

fn require_question(db: &Database, id: i64) -> anyhow::Result<Question> {
    Ok(Question::find_by_id(db, id)?.ok_or(Error::NotFound { entity: "Question", id })?)
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
