use chrono::Local;

use crate::directory::{Directory, OverdueLoan};
use crate::models::{Admin, Publication, Reader};

/// Cursor over a list whose contents get replaced on every refresh.
#[derive(Default)]
pub(crate) struct Selection {
    pub(crate) selected: usize,
}

impl Selection {
    pub(crate) fn move_by(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, max) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum ReaderPane {
    Available,
    Loans,
}

/// Everything the logged-in reader sees.
pub(crate) struct ReaderDashboard {
    pub(crate) reader: Reader,
    pub(crate) available: Vec<Publication>,
    pub(crate) loans: Vec<Publication>,
    pub(crate) pane: ReaderPane,
    pub(crate) available_selection: Selection,
    pub(crate) loans_selection: Selection,
}

impl ReaderDashboard {
    pub(crate) fn new(reader: Reader, directory: &Directory) -> Self {
        let mut dashboard = Self {
            reader,
            available: Vec::new(),
            loans: Vec::new(),
            pane: ReaderPane::Available,
            available_selection: Selection::default(),
            loans_selection: Selection::default(),
        };
        dashboard.refresh(directory);
        dashboard
    }

    /// Pull fresh snapshots after a change.
    pub(crate) fn refresh(&mut self, directory: &Directory) {
        if let Some(reader) = directory.find_reader(self.reader.reader_id()) {
            self.reader = reader;
        }
        self.available = directory.list_available();
        self.loans = directory.loans_of(self.reader.reader_id());
        self.available_selection.ensure_in_bounds(self.available.len());
        self.loans_selection.ensure_in_bounds(self.loans.len());
    }

    pub(crate) fn toggle_pane(&mut self) {
        self.pane = match self.pane {
            ReaderPane::Available => ReaderPane::Loans,
            ReaderPane::Loans => ReaderPane::Available,
        };
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        match self.pane {
            ReaderPane::Available => self
                .available_selection
                .move_by(offset, self.available.len()),
            ReaderPane::Loans => self.loans_selection.move_by(offset, self.loans.len()),
        }
    }

    pub(crate) fn select_first(&mut self) {
        match self.pane {
            ReaderPane::Available => self.available_selection.select_first(),
            ReaderPane::Loans => self.loans_selection.select_first(),
        }
    }

    pub(crate) fn select_last(&mut self) {
        match self.pane {
            ReaderPane::Available => self.available_selection.select_last(self.available.len()),
            ReaderPane::Loans => self.loans_selection.select_last(self.loans.len()),
        }
    }

    pub(crate) fn current_available(&self) -> Option<&Publication> {
        self.available.get(self.available_selection.selected)
    }

    pub(crate) fn current_loan(&self) -> Option<&Publication> {
        self.loans.get(self.loans_selection.selected)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum AdminTab {
    Publications,
    Readers,
    Overdue,
}

impl AdminTab {
    pub(crate) fn next(self) -> Self {
        match self {
            AdminTab::Publications => AdminTab::Readers,
            AdminTab::Readers => AdminTab::Overdue,
            AdminTab::Overdue => AdminTab::Publications,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            AdminTab::Publications => AdminTab::Overdue,
            AdminTab::Readers => AdminTab::Publications,
            AdminTab::Overdue => AdminTab::Readers,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            AdminTab::Publications => "Publications",
            AdminTab::Readers => "Readers",
            AdminTab::Overdue => "Overdue",
        }
    }
}

/// Everything the logged-in admin sees.
pub(crate) struct AdminDashboard {
    pub(crate) admin: Admin,
    pub(crate) is_super_admin: bool,
    pub(crate) tab: AdminTab,
    pub(crate) publications: Vec<Publication>,
    pub(crate) readers: Vec<Reader>,
    pub(crate) overdue: Vec<OverdueLoan>,
    pub(crate) selection: Selection,
}

impl AdminDashboard {
    pub(crate) fn new(admin: Admin, directory: &Directory) -> Self {
        let mut dashboard = Self {
            is_super_admin: directory.is_super_admin(&admin),
            admin,
            tab: AdminTab::Publications,
            publications: Vec::new(),
            readers: Vec::new(),
            overdue: Vec::new(),
            selection: Selection::default(),
        };
        dashboard.refresh(directory);
        dashboard
    }

    pub(crate) fn refresh(&mut self, directory: &Directory) {
        self.publications = directory.publications();
        self.readers = directory.readers();
        self.overdue = directory.list_overdue(Local::now());
        self.selection.ensure_in_bounds(self.len());
    }

    pub(crate) fn len(&self) -> usize {
        match self.tab {
            AdminTab::Publications => self.publications.len(),
            AdminTab::Readers => self.readers.len(),
            AdminTab::Overdue => self.overdue.len(),
        }
    }

    pub(crate) fn switch_tab(&mut self, forward: bool) {
        self.tab = if forward {
            self.tab.next()
        } else {
            self.tab.previous()
        };
        self.selection.select_first();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.len();
        self.selection.move_by(offset, len);
    }

    pub(crate) fn select_last(&mut self) {
        let len = self.len();
        self.selection.select_last(len);
    }

    pub(crate) fn current_publication(&self) -> Option<&Publication> {
        if self.tab != AdminTab::Publications {
            return None;
        }
        self.publications.get(self.selection.selected)
    }
}
