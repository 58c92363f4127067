mod db;
mod document;
mod parser;
mod record;
mod sync;
mod text;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

/// Caller-side cap; the parsing pipeline itself never looks at file sizes.
const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "resume_import", about = "Heuristic resume parser with a job-listing tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and schema
    Init,
    /// Parse a single file and print the record without saving it
    Parse {
        /// Resume file (.txt, .pdf, .docx)
        file: PathBuf,
        /// Declared content type, overriding extension detection
        #[arg(short = 't', long)]
        content_type: Option<String>,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse files or directories of files and save the records
    Import {
        /// Files or directories to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Max files to import (default: all found)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Imported resumes overview table
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show one imported resume in full
    Show {
        id: i64,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show import statistics
    Stats,
    /// Track job listings and sync them with a remote endpoint
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Add a job listing
    Add {
        title: String,
        company: String,
        #[arg(short = 'l', long)]
        location: Option<String>,
        #[arg(short = 'u', long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List tracked job listings
    List,
    /// Update fields of a job listing
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a job listing
    Delete { id: i64 },
    /// Push unsynced listings to the remote endpoint, or pull with --pull
    Sync {
        /// Remote base URL (default: RESUME_API_URL)
        #[arg(long)]
        endpoint: Option<String>,
        /// Pull remote listings into the local table instead of pushing
        #[arg(long)]
        pull: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            println!("Database ready.");
            Ok(())
        }
        Commands::Parse {
            file,
            content_type,
            json,
        } => {
            let parsed = parse_file(&file, content_type.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed.record)?);
            } else {
                println!(
                    "{}: {} chars ({})\n",
                    file.display(),
                    parsed.chars,
                    parsed.kind.label()
                );
                print_record(&parsed.record);
            }
            Ok(())
        }
        Commands::Import { paths, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let files = collect_files(&paths, limit)?;
            if files.is_empty() {
                let accepted: Vec<String> = document::SUPPORTED_EXTENSIONS
                    .iter()
                    .map(|(ext, _)| format!(".{ext}"))
                    .collect();
                println!("No supported files found ({}).", accepted.join(", "));
                return Ok(());
            }
            println!("Importing {} files...", files.len());
            let counts = import_files(&conn, &files)?;
            counts.print();
            Ok(())
        }
        Commands::List { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_resume_list(&conn, limit)?;
            if rows.is_empty() {
                println!("No resumes imported yet. Run 'import' first.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<24} | {:<28} | {:>6} | {:>5} | {:<10}",
                "#", "Name", "Email", "Skills", "Roles", "Imported"
            );
            println!("{}", "-".repeat(92));
            for r in &rows {
                println!(
                    "{:>4} | {:<24} | {:<28} | {:>6} | {:>5} | {:<10}",
                    r.id,
                    truncate(&r.name, 24),
                    truncate(&r.email, 28),
                    r.skill_count,
                    r.experience_count,
                    short_date(&r.created_at)
                );
            }
            println!("\n{} resumes | 'show <id>' for details", rows.len());
            Ok(())
        }
        Commands::Show { id, json } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let Some(stored) = db::fetch_resume(&conn, id)? else {
                println!("No resume with id {}.", id);
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&stored.record)?);
            } else {
                println!(
                    "Resume #{} | {} ({}) imported {}\n",
                    stored.id,
                    stored.file_name,
                    stored.content_type,
                    short_date(&stored.imported_at)
                );
                print_record(&stored.record);
            }
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Imports:    {}", s.imports);
            println!("Resumes:    {}", s.resumes);
            println!("Experience: {}", s.experience);
            println!("Education:  {}", s.education);
            println!("Skills:     {}", s.distinct_skills);
            println!("Projects:   {}", s.projects);
            println!("Jobs:       {}", s.jobs);
            Ok(())
        }
        Commands::Job { command } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            match command {
                JobCommands::Add {
                    title,
                    company,
                    location,
                    url,
                    notes,
                } => {
                    let id = db::insert_job(
                        &conn,
                        &db::NewJob {
                            title,
                            company,
                            location,
                            url,
                            notes,
                        },
                    )?;
                    println!("Added job listing #{}.", id);
                    Ok(())
                }
                JobCommands::List => {
                    let jobs = db::fetch_jobs(&conn)?;
                    if jobs.is_empty() {
                        println!("No job listings yet. Add one with 'job add'.");
                        return Ok(());
                    }

                    println!(
                        "{:>4} | {:<28} | {:<20} | {:<16} | {:<6} | {:<10} | {:<10}",
                        "#", "Title", "Company", "Location", "Synced", "Added", "Updated"
                    );
                    println!("{}", "-".repeat(112));
                    for j in &jobs {
                        println!(
                            "{:>4} | {:<28} | {:<20} | {:<16} | {:<6} | {:<10} | {:<10}",
                            j.id,
                            truncate(&j.title, 28),
                            truncate(&j.company, 20),
                            truncate(j.location.as_deref().unwrap_or("-"), 16),
                            if j.synced { "yes" } else { "no" },
                            short_date(&j.created_at),
                            short_date(&j.updated_at)
                        );
                    }
                    println!("\n{} job listings", jobs.len());
                    Ok(())
                }
                JobCommands::Update {
                    id,
                    title,
                    company,
                    location,
                    url,
                    notes,
                } => {
                    let n = db::update_job(
                        &conn,
                        id,
                        &db::JobUpdate {
                            title,
                            company,
                            location,
                            url,
                            notes,
                        },
                    )?;
                    if n == 0 {
                        println!("Nothing updated. Check the id and pass at least one field.");
                    } else {
                        println!("Updated job listing #{}.", id);
                    }
                    Ok(())
                }
                JobCommands::Delete { id } => {
                    let n = db::delete_job(&conn, id)?;
                    if n == 0 {
                        println!("No job listing with id {}.", id);
                    } else {
                        println!("Deleted job listing #{}.", id);
                    }
                    Ok(())
                }
                JobCommands::Sync { endpoint, pull } => {
                    let base = sync::resolve_endpoint(endpoint)?;
                    if pull {
                        let pulled = sync::pull_jobs(&base).await?;
                        let incoming: Vec<db::NewJob> =
                            pulled.into_iter().map(db::NewJob::from).collect();
                        let (inserted, updated) = db::upsert_pulled_jobs(&conn, &incoming)?;
                        println!(
                            "Pulled {} listings ({} new, {} updated).",
                            inserted + updated,
                            inserted,
                            updated
                        );
                    } else {
                        let unsynced = db::fetch_unsynced_jobs(&conn)?;
                        if unsynced.is_empty() {
                            println!("All job listings are already synced.");
                            return Ok(());
                        }
                        let sent = sync::push_jobs(&base, &unsynced).await?;
                        let ids: Vec<i64> = unsynced.iter().map(|j| j.id).collect();
                        db::mark_jobs_synced(&conn, &ids)?;
                        println!("Pushed {} listings to {}.", sent, base);
                    }
                    Ok(())
                }
            }
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct ParsedFile {
    kind: document::DocumentKind,
    chars: usize,
    record: record::ResumeRecord,
}

/// Reads one file and runs the whole pipeline: detect, extract text,
/// run the field extractors. Extraction failures surface here; a resume
/// that merely matches nothing comes back as an empty record.
fn parse_file(path: &Path, declared: Option<&str>) -> anyhow::Result<ParsedFile> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    if meta.len() > MAX_FILE_BYTES {
        anyhow::bail!(
            "{} is {} bytes, over the {} MB import limit",
            path.display(),
            meta.len(),
            MAX_FILE_BYTES / 1024 / 1024
        );
    }

    let kind = document::detect(path, declared)?;
    let buffer = std::fs::read(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let plain = document::extract_text(&buffer, kind)?;
    let text = text::ExtractedText::new(plain);
    let record = parser::parse(&text);

    Ok(ParsedFile {
        kind,
        chars: text.char_len(),
        record,
    })
}

fn collect_files(paths: &[PathBuf], limit: Option<usize>) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file()
                    && document::DocumentKind::from_path(entry.path()).is_some()
                {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    if let Some(n) = limit {
        files.truncate(n);
    }
    Ok(files)
}

struct ImportCounts {
    imported: usize,
    experience: usize,
    skills: usize,
    errors: usize,
}

impl ImportCounts {
    fn print(&self) {
        println!(
            "Imported {} resumes ({} experience entries, {} skill mentions, {} errors).",
            self.imported, self.experience, self.skills, self.errors,
        );
    }
}

fn import_files(conn: &rusqlite::Connection, files: &[PathBuf]) -> anyhow::Result<ImportCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut counts = ImportCounts {
        imported: 0,
        experience: 0,
        skills: 0,
        errors: 0,
    };

    for chunk in files.chunks(64) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| (path, parse_file(path, None)))
            .collect();

        for (path, result) in results {
            match result {
                Ok(parsed) => {
                    let meta = db::ImportMeta {
                        file_name: path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| path.display().to_string()),
                        content_type: parsed.kind.label().to_string(),
                        char_count: parsed.chars,
                    };
                    counts.experience += parsed.record.experience.len();
                    counts.skills += parsed.record.skills.len();
                    db::save_import(conn, &meta, &parsed.record)?;
                    counts.imported += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    counts.errors += 1;
                }
            }
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn print_record(record: &record::ResumeRecord) {
    if record.is_empty() {
        println!("Nothing recognized in this resume.");
        return;
    }

    let personal = &record.personal;
    if !personal.is_empty() {
        println!("--- Personal ---");
        let line = |label: &str, value: &Option<String>| {
            if let Some(v) = value {
                println!("  {:<9} {}", label, v);
            }
        };
        line("Name:", &personal.name);
        line("Email:", &personal.email);
        line("Phone:", &personal.phone);
        line("Location:", &personal.location);
        line("LinkedIn:", &personal.linkedin);
        line("GitHub:", &personal.github);
        if let Some(s) = &personal.summary {
            println!("  Summary:  {}", truncate(s, 100));
        }
    }

    if !record.experience.is_empty() {
        println!("\n--- Experience ---");
        for e in &record.experience {
            println!(
                "  {} at {} ({})",
                e.title,
                e.company,
                e.duration.as_deref().unwrap_or("-")
            );
            if let Some(d) = &e.description {
                println!("    {}", truncate(d, 90));
            }
        }
    }

    if !record.education.is_empty() {
        println!("\n--- Education ---");
        for d in &record.education {
            let year = d.year.as_deref().unwrap_or("-");
            match &d.gpa {
                Some(gpa) => println!("  {}, {} ({}, GPA {})", d.degree, d.institution, year, gpa),
                None => println!("  {}, {} ({})", d.degree, d.institution, year),
            }
        }
    }

    if !record.skills.is_empty() {
        println!("\n--- Skills ---");
        let skills: Vec<&str> = record.skills.iter().map(|s| s.as_str()).collect();
        println!("  {}", skills.join(", "));
    }

    if !record.projects.is_empty() {
        println!("\n--- Projects ---");
        for p in &record.projects {
            println!("  {}: {}", p.name, truncate(&p.description, 80));
            if let Some(t) = &p.technologies {
                println!("    Technologies: {}", t);
            }
            if let Some(l) = &p.link {
                println!("    Link: {}", l);
            }
        }
    }
}

fn short_date(ts: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
