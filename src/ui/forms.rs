use anyhow::{anyhow, bail, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Admin, Publication, Reader, DEFAULT_BORROW_LIMIT};

/// What a form submits to once validated.
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum FormKind {
    AdminLogin,
    ReaderLogin,
    Register,
    Borrow { title: String },
    AddBook,
    AddMagazine,
    AddReader,
    AddAdmin,
}

impl FormKind {
    pub(crate) fn title(&self) -> String {
        match self {
            FormKind::AdminLogin => "Admin Login".to_string(),
            FormKind::ReaderLogin => "Reader Login".to_string(),
            FormKind::Register => "Register as Reader".to_string(),
            FormKind::Borrow { title } => format!("Borrow \"{title}\""),
            FormKind::AddBook => "Add Book".to_string(),
            FormKind::AddMagazine => "Add Magazine".to_string(),
            FormKind::AddReader => "Register Reader".to_string(),
            FormKind::AddAdmin => "Add Admin".to_string(),
        }
    }
}

/// How keystrokes are accepted and how the value is shown.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum FieldInput {
    Text,
    Secret,
    Digits,
    /// Toggled with space, shown as a checkbox.
    Flag,
}

#[derive(Clone)]
pub(crate) struct FormField {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) input: FieldInput,
    pub(crate) required: bool,
    pub(crate) checked: bool,
}

impl FormField {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            input: FieldInput::Text,
            required: true,
            checked: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            input: FieldInput::Secret,
            ..Self::text(label)
        }
    }

    fn digits(label: &'static str) -> Self {
        Self {
            input: FieldInput::Digits,
            required: false,
            ..Self::text(label)
        }
    }

    fn flag(label: &'static str) -> Self {
        Self {
            input: FieldInput::Flag,
            required: false,
            ..Self::text(label)
        }
    }
}

/// State of a modal input form.
#[derive(Clone)]
pub(crate) struct Form {
    pub(crate) kind: FormKind,
    pub(crate) fields: Vec<FormField>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl Form {
    pub(crate) fn new(kind: FormKind) -> Self {
        let fields = match &kind {
            FormKind::AdminLogin => vec![FormField::text("Admin ID"), FormField::secret("Password")],
            FormKind::ReaderLogin => {
                vec![FormField::text("Reader ID"), FormField::secret("Password")]
            }
            FormKind::Register => vec![
                FormField::text("Name"),
                FormField::text("Reader ID"),
                FormField::secret("Password"),
                FormField::secret("Confirm"),
            ],
            FormKind::Borrow { .. } => vec![FormField::digits("Days")],
            FormKind::AddBook => vec![
                FormField::text("Title"),
                FormField::text("Author"),
                FormField::text("ISBN"),
                FormField::text("Category"),
            ],
            FormKind::AddMagazine => vec![
                FormField::text("Title"),
                FormField::text("Issue"),
                FormField::text("Publisher"),
                FormField::flag("Latest"),
            ],
            FormKind::AddReader => vec![
                FormField::text("Name"),
                FormField::text("Reader ID"),
                FormField::secret("Password"),
                FormField::digits("Limit"),
            ],
            FormKind::AddAdmin => vec![
                FormField::text("Name"),
                FormField::text("Admin ID"),
                FormField::secret("Password"),
            ],
        };
        Self {
            kind,
            fields,
            active: 0,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = (self.active + 1) % self.fields.len();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = (self.active + self.fields.len() - 1) % self.fields.len();
    }

    /// Append a character to the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let Some(field) = self.fields.get_mut(self.active) else {
            return false;
        };
        match field.input {
            FieldInput::Flag => {
                if ch == ' ' {
                    field.checked = !field.checked;
                    true
                } else {
                    false
                }
            }
            FieldInput::Digits => {
                if ch.is_ascii_digit() {
                    field.value.push(ch);
                    true
                } else {
                    false
                }
            }
            FieldInput::Text | FieldInput::Secret => {
                if !ch.is_control() {
                    field.value.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.pop();
        }
    }

    /// Trimmed value of field `index`, failing when a required field is blank.
    fn value(&self, index: usize) -> Result<String> {
        let field = self
            .fields
            .get(index)
            .ok_or_else(|| anyhow!("Form has no field {index}."))?;
        let value = match field.input {
            FieldInput::Secret => field.value.clone(),
            _ => field.value.trim().to_string(),
        };
        if field.required && value.is_empty() {
            bail!("{} is required.", field.label);
        }
        Ok(value)
    }

    fn checked(&self, index: usize) -> bool {
        self.fields.get(index).map(|f| f.checked).unwrap_or(false)
    }

    /// Optional positive number; blank means "use the default".
    fn number(&self, index: usize) -> Result<Option<i64>> {
        let raw = self.value(index)?;
        if raw.is_empty() {
            return Ok(None);
        }
        let label = self.fields[index].label;
        let number = raw
            .parse::<i64>()
            .with_context(|| format!("{label} must be a whole number."))?;
        Ok(Some(number))
    }

    pub(crate) fn parse_credentials(&self) -> Result<(String, String)> {
        Ok((self.value(0)?, self.value(1)?))
    }

    pub(crate) fn parse_registration(&self) -> Result<Reader> {
        let name = self.value(0)?;
        let reader_id = self.value(1)?;
        let password = self.value(2)?;
        if password != self.value(3)? {
            bail!("The passwords do not match.");
        }
        Ok(Reader::new(name, reader_id, password))
    }

    /// `None` keeps the publication's own loan period.
    pub(crate) fn parse_days(&self) -> Result<Option<i64>> {
        self.number(0)
    }

    pub(crate) fn parse_book(&self) -> Result<Publication> {
        Ok(Publication::book(
            self.value(0)?,
            self.value(1)?,
            self.value(2)?,
            self.value(3)?,
        ))
    }

    pub(crate) fn parse_magazine(&self) -> Result<Publication> {
        let mut magazine = Publication::magazine(self.value(0)?, self.value(1)?, self.value(2)?);
        if self.checked(3) {
            magazine.mark_as_latest();
        }
        Ok(magazine)
    }

    pub(crate) fn parse_reader(&self) -> Result<Reader> {
        let reader = Reader::new(self.value(0)?, self.value(1)?, self.value(2)?);
        let limit = match self.number(3)? {
            Some(limit) if limit <= 0 => bail!("Limit must be at least 1."),
            Some(limit) => usize::try_from(limit).context("Limit is too large.")?,
            None => DEFAULT_BORROW_LIMIT,
        };
        Ok(reader.with_limit(limit))
    }

    pub(crate) fn parse_admin(&self) -> Result<Admin> {
        Ok(Admin::new(self.value(0)?, self.value(1)?, self.value(2)?))
    }

    /// Render one line per field, highlighting the focused one.
    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let is_active = index == self.active;
                let display = match field.input {
                    FieldInput::Flag => {
                        if field.checked {
                            "[x]".to_string()
                        } else {
                            "[ ]".to_string()
                        }
                    }
                    FieldInput::Secret => "*".repeat(field.value.chars().count()),
                    _ if field.value.is_empty() && field.required => "<required>".to_string(),
                    _ if field.value.is_empty() => "<default>".to_string(),
                    _ => field.value.clone(),
                };
                let style = if is_active {
                    Style::default().fg(Color::Yellow)
                } else if field.value.is_empty() && field.input != FieldInput::Flag {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::raw(format!("{}: ", field.label)),
                    Span::styled(display, style),
                ])
            })
            .collect()
    }

    /// Cursor column offset for the active field, relative to the form body.
    pub(crate) fn cursor_offset(&self) -> (u16, u16) {
        let Some(field) = self.fields.get(self.active) else {
            return (0, 0);
        };
        let prefix = field.label.chars().count() + 2;
        let value_len = match field.input {
            FieldInput::Flag => 1,
            _ => field.value.chars().count(),
        };
        ((prefix + value_len) as u16, self.active as u16)
    }
}

/// Pending removal awaiting Y/N.
#[derive(Clone)]
pub(crate) struct ConfirmRemove {
    pub(crate) title: String,
    pub(crate) on_loan_to: Option<String>,
}

impl ConfirmRemove {
    pub(crate) fn from(publication: &Publication) -> Self {
        Self {
            title: publication.title().to_string(),
            on_loan_to: publication.loan().map(|loan| loan.borrower_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut Form, values: &[&str]) {
        for (index, value) in values.iter().enumerate() {
            form.active = index;
            for ch in value.chars() {
                form.push_char(ch);
            }
        }
    }

    #[test]
    fn registration_requires_matching_passwords() {
        let mut form = Form::new(FormKind::Register);
        fill(&mut form, &["Alice", "r1", "pw", "other"]);
        assert!(form.parse_registration().is_err());

        let mut form = Form::new(FormKind::Register);
        fill(&mut form, &["Alice", "r1", "pw", "pw"]);
        let reader = form.parse_registration().unwrap();
        assert_eq!(reader.reader_id(), "r1");
    }

    #[test]
    fn blank_required_field_names_label() {
        let mut form = Form::new(FormKind::AddBook);
        fill(&mut form, &["Title", "", "ISBN", "Cat"]);
        let err = form.parse_book().unwrap_err();
        assert_eq!(err.to_string(), "Author is required.");
    }

    #[test]
    fn digit_fields_reject_letters() {
        let mut form = Form::new(FormKind::Borrow {
            title: "T".into(),
        });
        assert!(!form.push_char('x'));
        assert_eq!(form.parse_days().unwrap(), None);
        assert!(form.push_char('1'));
        assert!(form.push_char('0'));
        assert_eq!(form.parse_days().unwrap(), Some(10));
    }

    #[test]
    fn magazine_flag_toggles_with_space() {
        let mut form = Form::new(FormKind::AddMagazine);
        fill(&mut form, &["M", "7", "P"]);
        form.active = 3;
        form.push_char(' ');
        let magazine = form.parse_magazine().unwrap();
        assert_eq!(magazine.max_loan_days(), 7);
    }

    #[test]
    fn reader_limit_defaults_and_validates() {
        let mut form = Form::new(FormKind::AddReader);
        fill(&mut form, &["Bob", "r2", "pw"]);
        assert_eq!(form.parse_reader().unwrap().max_borrow_limit(), DEFAULT_BORROW_LIMIT);

        fill(&mut form, &["", "", "", "0"]);
        assert!(form.parse_reader().is_err());
    }

    #[test]
    fn focus_wraps_around() {
        let mut form = Form::new(FormKind::AdminLogin);
        form.previous_field();
        assert_eq!(form.active, 1);
        form.next_field();
        assert_eq!(form.active, 0);
    }
}
