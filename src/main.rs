use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use exambank::catalog::loader::fetch_course;
use exambank::catalog::{CatalogSource, DirectorySource, Semester};
use exambank::output;
use exambank::search::{search_courses, search_exams};
use exambank::session::{CoursePage, Location, PageLoad};
use exambank::utils::{AppConfig, get_config_path, get_log_path, logging};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser)]
#[command(name = "exambank")]
#[command(about = "Browse and search a bank of past exams")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog directory (holding db/ and exam/)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog (interactive TUI mode)
    Browse {
        /// Start from this location, e.g. "?course=gif-1001#12"
        #[arg(short, long)]
        location: Option<String>,

        /// Initial query
        #[arg(short, long)]
        query: Option<String>,
    },
    /// List courses matching a query
    Courses {
        /// Search text (code or name)
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// List the exams of a course
    Exams {
        /// Course code, e.g. gif-1001
        course: String,

        /// Search text (year, title or author)
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,

        /// Only exams of this year
        #[arg(short, long)]
        year: Option<i32>,

        /// Only exams of this semester (H/W, E/S, A/F)
        #[arg(short, long, value_parser = parse_semester)]
        semester: Option<Semester>,
    },
    /// Resolve a location the way a page load does
    Show {
        /// Location such as "?course=gif-1001#12"
        location: String,
    },
    /// Show the configuration file and effective settings
    Config,
}

fn parse_semester(s: &str) -> Result<Semester, String> {
    Semester::from_letter(s).ok_or_else(|| format!("unknown semester '{}', expected H, E or A", s))
}

fn joined(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let root = config.effective_catalog_root(cli.db.as_deref());
    let color = !cli.no_color;

    match cli.command {
        Some(Commands::Courses { query }) => {
            logging::init_stderr(cli.verbose);
            list_courses(root, joined(&query).as_deref(), color)?;
        }
        Some(Commands::Exams {
            course,
            query,
            year,
            semester,
        }) => {
            logging::init_stderr(cli.verbose);
            list_exams(root, &course, joined(&query).as_deref(), year, semester, color)?;
        }
        Some(Commands::Show { location }) => {
            logging::init_stderr(cli.verbose);
            show(root, &location, color)?;
        }
        Some(Commands::Config) => {
            logging::init_stderr(cli.verbose);
            show_config(&config, root)?;
        }
        Some(Commands::Browse { location, query }) => {
            browse(root, &config, location, query, cli.verbose)?;
        }
        None => {
            browse(root, &config, None, None, cli.verbose)?;
        }
    }

    Ok(())
}

#[cfg(feature = "interactive")]
fn browse(
    root: PathBuf,
    config: &AppConfig,
    location: Option<String>,
    query: Option<String>,
    verbose: bool,
) -> Result<()> {
    logging::init_file(&get_log_path()?, verbose)?;

    let location = location
        .as_deref()
        .map(Location::parse)
        .unwrap_or_default();
    debug!(root = %root.display(), %location, "starting browser");

    exambank::tui::run(root, location, query, config.debounce())
}

#[cfg(not(feature = "interactive"))]
fn browse(
    _root: PathBuf,
    _config: &AppConfig,
    _location: Option<String>,
    _query: Option<String>,
    _verbose: bool,
) -> Result<()> {
    anyhow::bail!("built without the interactive feature; use the courses, exams or show commands")
}

fn list_courses(root: PathBuf, query: Option<&str>, color: bool) -> Result<()> {
    let source = DirectorySource::new(root);
    let catalog = source
        .fetch_catalog()
        .with_context(|| format!("Failed to load catalog from {}", source.root().display()))?;

    let courses = search_courses(&catalog, query);
    output::print_courses(&courses, color)?;
    Ok(())
}

fn list_exams(
    root: PathBuf,
    code: &str,
    query: Option<&str>,
    year: Option<i32>,
    semester: Option<Semester>,
    color: bool,
) -> Result<()> {
    let source = DirectorySource::new(root);
    let fallback_name = catalog_name(&source, code);
    let list = source
        .fetch_course(code, fallback_name.as_deref())
        .with_context(|| format!("Failed to load course {}", code))?;

    let exams: Vec<_> = search_exams(&list.exams, query)
        .into_iter()
        .filter(|e| year.is_none_or(|y| e.year == y))
        .filter(|e| semester.is_none_or(|s| e.semester == s))
        .collect();

    output::print_exams(code, &list.name, &exams, None, color)?;
    Ok(())
}

/// Name of `code` in the root catalog, if the catalog can be read
fn catalog_name(source: &DirectorySource, code: &str) -> Option<String> {
    match source.fetch_catalog() {
        Ok(catalog) => catalog.course_name(code).map(str::to_string),
        Err(e) => {
            debug!(error = %e, "catalog unavailable for course name");
            None
        }
    }
}

fn show(root: PathBuf, input: &str, color: bool) -> Result<()> {
    let location = Location::parse(input);
    let mut page = match CoursePage::open(location) {
        Ok(page) => page,
        Err(redirect) => {
            output::print_redirect("no course in location", color)?;
            debug!(location = %redirect.target(), "redirected");
            return Ok(());
        }
    };

    let directory = DirectorySource::new(root);
    let fallback_name = catalog_name(&directory, page.code());
    let source: Arc<dyn CatalogSource> = Arc::new(directory);
    let result = fetch_course(&source, page.code(), fallback_name).wait();

    match page.resolve(result)? {
        PageLoad::Ready { .. } => {
            let expanded = page.expanded();
            output::print_exams(
                page.code(),
                page.name().unwrap_or_default(),
                page.results(),
                expanded.as_ref().map(|(id, rows)| (*id, rows.as_slice())),
                color,
            )?;
            println!("{}", page.location());
        }
        PageLoad::Redirect(_) => {
            let reason = format!("course {} not found", page.code());
            output::print_redirect(&reason, color)?;
        }
    }
    Ok(())
}

fn show_config(config: &AppConfig, root: PathBuf) -> Result<()> {
    let path = get_config_path()?;
    println!("Config file:  {}", path.display());
    if !path.exists() {
        println!("              (not found, using defaults)");
    }
    println!("Catalog root: {}", root.display());
    println!("Debounce:     {} ms", config.debounce().as_millis());
    if let Ok(log) = get_log_path() {
        println!("Log file:     {}", log.display());
    }
    Ok(())
}
