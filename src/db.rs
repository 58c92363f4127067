use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::record::{EducationEntry, ExperienceEntry, ProjectEntry, ResumeRecord};

const DB_PATH: &str = "data/resumes.sqlite";

pub fn connect() -> Result<Connection> {
    if let Some(dir) = Path::new(DB_PATH).parent() {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS imports (
            id           INTEGER PRIMARY KEY,
            file_name    TEXT NOT NULL,
            content_type TEXT NOT NULL,
            char_count   INTEGER NOT NULL,
            imported_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS resumes (
            id         INTEGER PRIMARY KEY,
            import_id  INTEGER NOT NULL REFERENCES imports(id),
            name       TEXT,
            email      TEXT,
            phone      TEXT,
            location   TEXT,
            summary    TEXT,
            linkedin   TEXT,
            github     TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_resumes_email ON resumes(email);

        CREATE TABLE IF NOT EXISTS resume_experience (
            id          INTEGER PRIMARY KEY,
            resume_id   INTEGER NOT NULL REFERENCES resumes(id),
            position    INTEGER NOT NULL,
            title       TEXT NOT NULL,
            company     TEXT NOT NULL,
            duration    TEXT,
            description TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_experience_resume ON resume_experience(resume_id);

        CREATE TABLE IF NOT EXISTS resume_education (
            id          INTEGER PRIMARY KEY,
            resume_id   INTEGER NOT NULL REFERENCES resumes(id),
            position    INTEGER NOT NULL,
            degree      TEXT NOT NULL,
            institution TEXT NOT NULL,
            year        TEXT,
            gpa         TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_education_resume ON resume_education(resume_id);

        CREATE TABLE IF NOT EXISTS resume_skills (
            resume_id INTEGER NOT NULL REFERENCES resumes(id),
            skill     TEXT NOT NULL,
            UNIQUE(resume_id, skill)
        );
        CREATE INDEX IF NOT EXISTS idx_skills_skill ON resume_skills(skill);

        CREATE TABLE IF NOT EXISTS resume_projects (
            id           INTEGER PRIMARY KEY,
            resume_id    INTEGER NOT NULL REFERENCES resumes(id),
            position     INTEGER NOT NULL,
            name         TEXT NOT NULL,
            description  TEXT NOT NULL,
            technologies TEXT,
            link         TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_projects_resume ON resume_projects(resume_id);

        CREATE TABLE IF NOT EXISTS job_listings (
            id         INTEGER PRIMARY KEY,
            title      TEXT NOT NULL,
            company    TEXT NOT NULL,
            location   TEXT,
            url        TEXT,
            notes      TEXT,
            synced     BOOLEAN NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_job_listings_synced ON job_listings(synced);
        ",
    )?;
    Ok(())
}

// ── Imports ──

pub struct ImportMeta {
    pub file_name: String,
    pub content_type: String,
    pub char_count: usize,
}

/// Saves one parsed resume and its import provenance in a single
/// transaction. Returns the new resume id.
pub fn save_import(conn: &Connection, meta: &ImportMeta, record: &ResumeRecord) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let resume_id;
    {
        tx.execute(
            "INSERT INTO imports (file_name, content_type, char_count) VALUES (?1, ?2, ?3)",
            rusqlite::params![meta.file_name, meta.content_type, meta.char_count as i64],
        )?;
        let import_id = tx.last_insert_rowid();

        let p = &record.personal;
        tx.execute(
            "INSERT INTO resumes (import_id, name, email, phone, location, summary, linkedin, github)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                import_id, p.name, p.email, p.phone, p.location, p.summary, p.linkedin, p.github,
            ],
        )?;
        resume_id = tx.last_insert_rowid();

        let mut e_stmt = tx.prepare(
            "INSERT INTO resume_experience (resume_id, position, title, company, duration, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (i, e) in record.experience.iter().enumerate() {
            e_stmt.execute(rusqlite::params![
                resume_id, i as i64, e.title, e.company, e.duration, e.description,
            ])?;
        }

        let mut d_stmt = tx.prepare(
            "INSERT INTO resume_education (resume_id, position, degree, institution, year, gpa)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (i, d) in record.education.iter().enumerate() {
            d_stmt.execute(rusqlite::params![
                resume_id, i as i64, d.degree, d.institution, d.year, d.gpa,
            ])?;
        }

        let mut s_stmt = tx.prepare(
            "INSERT OR IGNORE INTO resume_skills (resume_id, skill) VALUES (?1, ?2)",
        )?;
        for skill in &record.skills {
            s_stmt.execute(rusqlite::params![resume_id, skill])?;
        }

        let mut pr_stmt = tx.prepare(
            "INSERT INTO resume_projects (resume_id, position, name, description, technologies, link)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (i, pr) in record.projects.iter().enumerate() {
            pr_stmt.execute(rusqlite::params![
                resume_id, i as i64, pr.name, pr.description, pr.technologies, pr.link,
            ])?;
        }
    }
    tx.commit()?;
    Ok(resume_id)
}

// ── Resumes ──

pub struct ResumeSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub skill_count: i64,
    pub experience_count: i64,
    pub created_at: String,
}

pub fn fetch_resume_list(conn: &Connection, limit: usize) -> Result<Vec<ResumeSummary>> {
    let sql = format!(
        "SELECT r.id, COALESCE(r.name,''), COALESCE(r.email,''),
                (SELECT COUNT(*) FROM resume_skills s WHERE s.resume_id = r.id),
                (SELECT COUNT(*) FROM resume_experience e WHERE e.resume_id = r.id),
                r.created_at
         FROM resumes r
         ORDER BY r.id DESC
         LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ResumeSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                skill_count: row.get(3)?,
                experience_count: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct StoredResume {
    pub id: i64,
    pub file_name: String,
    pub content_type: String,
    pub imported_at: String,
    pub record: ResumeRecord,
}

pub fn fetch_resume(conn: &Connection, id: i64) -> Result<Option<StoredResume>> {
    let head = conn
        .query_row(
            "SELECT r.id, i.file_name, i.content_type, i.imported_at,
                    r.name, r.email, r.phone, r.location, r.summary, r.linkedin, r.github
             FROM resumes r JOIN imports i ON i.id = r.import_id
             WHERE r.id = ?1",
            rusqlite::params![id],
            |row| {
                let mut stored = StoredResume {
                    id: row.get(0)?,
                    file_name: row.get(1)?,
                    content_type: row.get(2)?,
                    imported_at: row.get(3)?,
                    record: ResumeRecord::default(),
                };
                stored.record.personal.name = row.get(4)?;
                stored.record.personal.email = row.get(5)?;
                stored.record.personal.phone = row.get(6)?;
                stored.record.personal.location = row.get(7)?;
                stored.record.personal.summary = row.get(8)?;
                stored.record.personal.linkedin = row.get(9)?;
                stored.record.personal.github = row.get(10)?;
                Ok(stored)
            },
        )
        .optional()?;
    let Some(mut stored) = head else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT title, company, duration, description
         FROM resume_experience WHERE resume_id = ?1 ORDER BY position",
    )?;
    stored.record.experience = stmt
        .query_map(rusqlite::params![id], |row| {
            Ok(ExperienceEntry {
                title: row.get(0)?,
                company: row.get(1)?,
                duration: row.get(2)?,
                description: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT degree, institution, year, gpa
         FROM resume_education WHERE resume_id = ?1 ORDER BY position",
    )?;
    stored.record.education = stmt
        .query_map(rusqlite::params![id], |row| {
            Ok(EducationEntry {
                degree: row.get(0)?,
                institution: row.get(1)?,
                year: row.get(2)?,
                gpa: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt =
        conn.prepare("SELECT skill FROM resume_skills WHERE resume_id = ?1 ORDER BY skill")?;
    stored.record.skills = stmt
        .query_map(rusqlite::params![id], |row| row.get(0))?
        .collect::<Result<BTreeSet<String>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT name, description, technologies, link
         FROM resume_projects WHERE resume_id = ?1 ORDER BY position",
    )?;
    stored.record.projects = stmt
        .query_map(rusqlite::params![id], |row| {
            Ok(ProjectEntry {
                name: row.get(0)?,
                description: row.get(1)?,
                technologies: row.get(2)?,
                link: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(stored))
}

// ── Job listings ──

pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

pub struct JobListing {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub synced: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Default)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

pub fn insert_job(conn: &Connection, job: &NewJob) -> Result<i64> {
    conn.execute(
        "INSERT INTO job_listings (title, company, location, url, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![job.title, job.company, job.location, job.url, job.notes],
    )?;
    Ok(conn.last_insert_rowid())
}

fn map_job(row: &rusqlite::Row) -> rusqlite::Result<JobListing> {
    Ok(JobListing {
        id: row.get(0)?,
        title: row.get(1)?,
        company: row.get(2)?,
        location: row.get(3)?,
        url: row.get(4)?,
        notes: row.get(5)?,
        synced: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn fetch_jobs(conn: &Connection) -> Result<Vec<JobListing>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, company, location, url, notes, synced, created_at, updated_at
         FROM job_listings ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| map_job(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn fetch_unsynced_jobs(conn: &Connection) -> Result<Vec<JobListing>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, company, location, url, notes, synced, created_at, updated_at
         FROM job_listings WHERE synced = 0 ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| map_job(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Applies the set fields of the update. An edited listing goes back to
/// unsynced so the next push picks it up. Returns the affected row count
/// (0 when the id does not exist or nothing was set).
pub fn update_job(conn: &Connection, id: i64, update: &JobUpdate) -> Result<usize> {
    let mut sets = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(t) = &update.title {
        sets.push(format!("title = ?{}", params.len() + 1));
        params.push(Box::new(t.clone()));
    }
    if let Some(c) = &update.company {
        sets.push(format!("company = ?{}", params.len() + 1));
        params.push(Box::new(c.clone()));
    }
    if let Some(l) = &update.location {
        sets.push(format!("location = ?{}", params.len() + 1));
        params.push(Box::new(l.clone()));
    }
    if let Some(u) = &update.url {
        sets.push(format!("url = ?{}", params.len() + 1));
        params.push(Box::new(u.clone()));
    }
    if let Some(n) = &update.notes {
        sets.push(format!("notes = ?{}", params.len() + 1));
        params.push(Box::new(n.clone()));
    }
    if sets.is_empty() {
        return Ok(0);
    }
    sets.push("synced = 0".to_string());
    sets.push("updated_at = datetime('now')".to_string());

    let sql = format!(
        "UPDATE job_listings SET {} WHERE id = ?{}",
        sets.join(", "),
        params.len() + 1
    );
    params.push(Box::new(id));
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    Ok(conn.execute(&sql, param_refs.as_slice())?)
}

pub fn delete_job(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM job_listings WHERE id = ?1",
        rusqlite::params![id],
    )?)
}

pub fn mark_jobs_synced(conn: &Connection, ids: &[i64]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "UPDATE job_listings SET synced = 1, updated_at = datetime('now') WHERE id = ?1",
        )?;
        for id in ids {
            count += stmt.execute(rusqlite::params![id])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

/// Merges listings pulled from the remote by (title, company). Returns
/// (inserted, updated) counts.
pub fn upsert_pulled_jobs(conn: &Connection, jobs: &[NewJob]) -> Result<(usize, usize)> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;
    let mut updated = 0;
    {
        let mut find =
            tx.prepare("SELECT id FROM job_listings WHERE title = ?1 AND company = ?2")?;
        let mut update = tx.prepare(
            "UPDATE job_listings SET location = ?1, url = ?2, notes = ?3, synced = 1,
             updated_at = datetime('now') WHERE id = ?4",
        )?;
        let mut insert = tx.prepare(
            "INSERT INTO job_listings (title, company, location, url, notes, synced)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
        )?;
        for job in jobs {
            let existing: Option<i64> = find
                .query_row(rusqlite::params![job.title, job.company], |r| r.get(0))
                .optional()?;
            match existing {
                Some(id) => {
                    update.execute(rusqlite::params![job.location, job.url, job.notes, id])?;
                    updated += 1;
                }
                None => {
                    insert.execute(rusqlite::params![
                        job.title,
                        job.company,
                        job.location,
                        job.url,
                        job.notes
                    ])?;
                    inserted += 1;
                }
            }
        }
    }
    tx.commit()?;
    Ok((inserted, updated))
}

// ── Stats ──

pub struct Stats {
    pub imports: usize,
    pub resumes: usize,
    pub experience: usize,
    pub education: usize,
    pub distinct_skills: usize,
    pub projects: usize,
    pub jobs: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let count = |sql: &str| -> Result<usize> { Ok(conn.query_row(sql, [], |r| r.get(0))?) };
    Ok(Stats {
        imports: count("SELECT COUNT(*) FROM imports")?,
        resumes: count("SELECT COUNT(*) FROM resumes")?,
        experience: count("SELECT COUNT(*) FROM resume_experience")?,
        education: count("SELECT COUNT(*) FROM resume_education")?,
        distinct_skills: count("SELECT COUNT(DISTINCT skill) FROM resume_skills")?,
        projects: count("SELECT COUNT(*) FROM resume_projects")?,
        jobs: count("SELECT COUNT(*) FROM job_listings")?,
    })
}

// ── Tests ──
