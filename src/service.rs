//! Application state shared by the front ends: the directory plus the store it
//! is flushed to after every successful change.

use anyhow::{anyhow, Context, Result};

use crate::directory::Directory;
use crate::models::{Admin, Publication, Reader};
use crate::store::JsonStore;

pub struct LendingService {
    directory: Directory,
    store: JsonStore,
}

impl LendingService {
    /// Load (or seed) the directory behind `store`.
    pub fn open(store: JsonStore) -> Result<Self> {
        let directory = store.load_or_seed()?;
        Ok(Self { directory, store })
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn login_admin(&self, admin_id: &str, password: &str) -> Result<Admin> {
        self.directory
            .authenticate_admin(admin_id, password)
            .ok_or_else(|| anyhow!("Admin ID or password is incorrect."))
    }

    pub fn login_reader(&self, reader_id: &str, password: &str) -> Result<Reader> {
        self.directory
            .authenticate_reader(reader_id, password)
            .ok_or_else(|| anyhow!("Reader ID or password is incorrect."))
    }

    /// Self-service registration from the login screen.
    pub fn register(&mut self, reader: Reader) -> Result<String> {
        let message = format!("Welcome, {}! You can now log in.", reader.name());
        self.directory.enroll_reader(reader)?;
        self.persist()?;
        Ok(message)
    }

    pub fn borrow(&mut self, reader_id: &str, title: &str, days: Option<i64>) -> Result<String> {
        let message = self.directory.lend(reader_id, title, days)?;
        self.persist()?;
        Ok(message)
    }

    pub fn return_item(&mut self, reader_id: &str, title: &str) -> Result<String> {
        let message = self.directory.take_back(reader_id, title)?;
        self.persist()?;
        Ok(message)
    }

    pub fn add_publication(&mut self, admin: &Admin, publication: Publication) -> Result<String> {
        let message = format!("Added \"{}\".", publication.title());
        self.directory.add_publication(admin, publication)?;
        self.persist()?;
        Ok(message)
    }

    pub fn remove_publication(&mut self, admin: &Admin, title: &str) -> Result<String> {
        self.directory.remove_publication(admin, title)?;
        self.persist()?;
        Ok(format!("Removed \"{title}\"."))
    }

    pub fn add_reader(&mut self, admin: &Admin, reader: Reader) -> Result<String> {
        let message = format!("Registered reader {} ({}).", reader.name(), reader.reader_id());
        self.directory.add_reader(admin, reader)?;
        self.persist()?;
        Ok(message)
    }

    pub fn add_admin(&mut self, admin: &Admin, new_admin: Admin) -> Result<String> {
        let message = format!("Added admin {} ({}).", new_admin.name(), new_admin.admin_id());
        self.directory.add_admin(admin, new_admin)?;
        self.persist()?;
        Ok(message)
    }

    pub fn set_magazine_latest(&mut self, admin: &Admin, title: &str, latest: bool) -> Result<String> {
        self.directory.set_magazine_latest(admin, title, latest)?;
        self.persist()?;
        if latest {
            Ok(format!("\"{title}\" is now the latest issue."))
        } else {
            Ok(format!("\"{title}\" moved to the archive."))
        }
    }

    fn persist(&self) -> Result<()> {
        self.store
            .save(&self.directory)
            .context("change applied but could not be saved")
    }
}
