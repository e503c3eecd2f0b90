//! JSON persistence for the directory. The whole file is rewritten on every
//! save; a missing file is seeded with the example catalogue.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::directory::Directory;
use crate::models::{Admin, Loan, Publication, PublicationKind, Reader, DEFAULT_BORROW_LIMIT};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-lending";
/// Data file name stored inside the application data directory.
const DATA_FILE_NAME: &str = "library.json";
/// Name given to the directory built from the data file.
pub const LIBRARY_NAME: &str = "Library Lending Desk";

#[derive(Debug, Default, Serialize, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    readers: Vec<ReaderRecord>,
    #[serde(default)]
    publications: Vec<PublicationRecord>,
    /// Admins beyond the built-in super admin.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    admins: Vec<AdminRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReaderRecord {
    name: String,
    reader_id: String,
    #[serde(default)]
    password: String,
    #[serde(default = "default_borrow_limit")]
    max_borrow_limit: usize,
}

fn default_borrow_limit() -> usize {
    DEFAULT_BORROW_LIMIT
}

#[derive(Debug, Serialize, Deserialize)]
struct AdminRecord {
    name: String,
    admin_id: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum PublicationRecord {
    Book {
        title: String,
        author: String,
        isbn: String,
        category: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        borrower_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        due_date: Option<DateTime<Local>>,
    },
    Magazine {
        title: String,
        issue: String,
        publisher: String,
        #[serde(default)]
        is_latest: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        borrower_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        due_date: Option<DateTime<Local>>,
    },
}

impl PublicationRecord {
    fn from_publication(publication: &Publication) -> Self {
        let title = publication.title().to_string();
        let borrower_id = publication.borrower().map(str::to_string);
        let due_date = publication.due_date();
        match publication.kind() {
            PublicationKind::Book {
                author,
                isbn,
                category,
            } => PublicationRecord::Book {
                title,
                author: author.clone(),
                isbn: isbn.clone(),
                category: category.clone(),
                borrower_id,
                due_date,
            },
            PublicationKind::Magazine {
                issue,
                publisher,
                is_latest,
            } => PublicationRecord::Magazine {
                title,
                issue: issue.clone(),
                publisher: publisher.clone(),
                is_latest: *is_latest,
                borrower_id,
                due_date,
            },
        }
    }

    /// Split into the bare publication and its persisted loan, if any.
    fn into_parts(self) -> (Publication, Option<(String, DateTime<Local>)>) {
        let (publication, borrower_id, due_date) = match self {
            PublicationRecord::Book {
                title,
                author,
                isbn,
                category,
                borrower_id,
                due_date,
            } => (
                Publication::book(title, author, isbn, category),
                borrower_id,
                due_date,
            ),
            PublicationRecord::Magazine {
                title,
                issue,
                publisher,
                is_latest,
                borrower_id,
                due_date,
            } => {
                let mut magazine = Publication::magazine(title, issue, publisher);
                if is_latest {
                    magazine.mark_as_latest();
                }
                (magazine, borrower_id, due_date)
            }
        };
        (publication, borrower_id.zip(due_date))
    }
}

/// File-backed store for a [`Directory`].
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.library-lending/library.json`.
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DATA_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the directory, or seed and save the example catalogue when the
    /// file does not exist yet.
    pub fn load_or_seed(&self) -> Result<Directory> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no data file, seeding example catalogue");
            let directory = seed_directory()?;
            self.save(&directory)?;
            return Ok(directory);
        }
        self.load()
    }

    pub fn load(&self) -> Result<Directory> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let file: LibraryFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        let directory = build_directory(file)?;
        info!(
            path = %self.path.display(),
            publications = directory.publications().len(),
            readers = directory.readers().len(),
            "library data loaded"
        );
        Ok(directory)
    }

    pub fn save(&self, directory: &Directory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("failed to create data directory")?;
            }
        }
        let json = serde_json::to_string_pretty(&snapshot(directory))
            .context("failed to encode library data")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), "library data saved");
        Ok(())
    }
}

fn snapshot(directory: &Directory) -> LibraryFile {
    LibraryFile {
        readers: directory
            .readers()
            .iter()
            .map(|r| ReaderRecord {
                name: r.name().to_string(),
                reader_id: r.reader_id().to_string(),
                password: r.password().to_string(),
                max_borrow_limit: r.max_borrow_limit(),
            })
            .collect(),
        publications: directory
            .publications()
            .iter()
            .map(PublicationRecord::from_publication)
            .collect(),
        admins: directory
            .admins()
            .iter()
            .filter(|a| !directory.is_super_admin(a))
            .map(|a| AdminRecord {
                name: a.name().to_string(),
                admin_id: a.admin_id().to_string(),
                password: a.password().to_string(),
            })
            .collect(),
    }
}

fn build_directory(file: LibraryFile) -> Result<Directory> {
    let mut directory = Directory::new(LIBRARY_NAME);
    let admin = directory.super_admin();

    for record in file.admins {
        directory
            .add_admin(&admin, Admin::new(record.name, record.admin_id, record.password))
            .context("invalid admin in data file")?;
    }
    for record in file.readers {
        let reader = Reader::new(record.name, record.reader_id, record.password)
            .with_limit(record.max_borrow_limit);
        directory
            .enroll_reader(reader)
            .context("invalid reader in data file")?;
    }

    let mut loans = Vec::new();
    for record in file.publications {
        let (publication, loan) = record.into_parts();
        let title = publication.title().to_string();
        directory
            .add_publication(&admin, publication)
            .context("invalid publication in data file")?;
        if let Some(loan) = loan {
            loans.push((title, loan));
        }
    }

    for (title, (borrower_id, due)) in loans {
        let Some(reader) = directory.find_reader(&borrower_id) else {
            warn!(title, borrower = borrower_id, "dropping loan for unknown reader");
            continue;
        };
        if reader.remaining_quota() == 0 {
            warn!(
                title,
                borrower = borrower_id,
                limit = reader.max_borrow_limit(),
                "dropping loan beyond the reader's borrow limit"
            );
            continue;
        }
        let loan = Loan {
            borrower_id,
            borrower_name: reader.name().to_string(),
            due,
        };
        if !directory.restore_loan(&title, loan) {
            warn!(title, "dropping loan that could not be restored");
        }
    }

    Ok(directory)
}

/// Example catalogue written on first start.
pub fn seed_directory() -> Result<Directory> {
    let mut directory = Directory::new(LIBRARY_NAME);
    let admin = directory.super_admin();

    let mut magazine = Publication::magazine("Computer Science", "2023-10", "Science Press");
    magazine.mark_as_latest();

    let seed = [
        Publication::book(
            "Python Crash Course",
            "Eric Matthes",
            "9787115428028",
            "Programming",
        ),
        Publication::book(
            "Design Patterns",
            "Liu Xi",
            "9787111075752",
            "Software Engineering",
        ),
        Publication::book(
            "Data Structures and Algorithms",
            "Author A",
            "111111",
            "Computer Science",
        ),
        magazine,
    ];
    for publication in seed {
        let title = publication.title().to_string();
        directory
            .add_publication(&admin, publication)
            .with_context(|| format!("failed to seed \"{title}\""))?;
    }
    Ok(directory)
}
