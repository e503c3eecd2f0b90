//! Scripted walkthrough printed to stdout. It runs entirely in memory and
//! never touches the data file.

use anyhow::Result;

use crate::directory::Directory;
use crate::error::LendingError;
use crate::models::{Admin, Publication, Reader};

fn section(title: &str) {
    println!();
    println!("{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

fn show(result: Result<String, LendingError>) {
    match result {
        Ok(text) => println!("  OK: {text}"),
        Err(err) => println!("  FAILED: {err}"),
    }
}

pub fn run() -> Result<()> {
    section("1. Setting up the library");
    let mut library = Directory::new("Peking University Library");
    let super_admin = library.super_admin();
    println!("Created library: {}", library.name());
    println!("Super admin created automatically: {}", super_admin.name());

    section("2. Encapsulation");
    let mut alice = Reader::new("Alice", "2021001", "alice");
    println!(
        "Reader {} ({}) only sees a copy of the loan list: {:?}",
        alice.name(),
        alice.reader_id(),
        alice.borrowed_items()
    );
    let first = Publication::book(
        "Python Crash Course",
        "Eric Matthes",
        "9787115428028",
        "Programming",
    );
    println!("{}", super_admin.add_publication(&mut library, first));

    section("3. Polymorphism");
    let mut magazine = Publication::magazine("Computer Science", "2023-10", "Science Press");
    magazine.mark_as_latest();
    let design_patterns = Publication::book(
        "Design Patterns",
        "Liu Xi",
        "9787111075752",
        "Software Engineering",
    );
    println!("{}", super_admin.add_publication(&mut library, design_patterns));
    println!("{}", super_admin.add_publication(&mut library, magazine));
    for publication in library.publications() {
        println!("  {}", publication.describe());
        println!("    max loan period: {} days", publication.max_loan_days());
    }

    section("4. Message passing");
    println!("{} borrows:", alice.name());
    show(alice.request_borrow(&mut library, "Python Crash Course", Some(10)));
    show(alice.request_borrow(&mut library, "Design Patterns", None));

    let mut bob = Reader::new("Bob", "2021002", "bob");
    println!("{} asks for a book that is already out:", bob.name());
    show(bob.request_borrow(&mut library, "Python Crash Course", None));
    println!("{} borrows the magazine:", bob.name());
    show(bob.request_borrow(&mut library, "Computer Science", None));

    println!("{} tests the borrow limit:", alice.name());
    println!("  remaining quota: {}", alice.remaining_quota());
    let algorithms = Publication::book(
        "Data Structures and Algorithms",
        "Author A",
        "111111",
        "Computer Science",
    );
    println!("  {}", super_admin.add_publication(&mut library, algorithms));
    show(alice.request_borrow(&mut library, "Data Structures and Algorithms", None));
    println!("  remaining quota: {}", alice.remaining_quota());
    let systems = Publication::book("Operating Systems", "Author B", "222222", "Computer Science");
    println!("  {}", super_admin.add_publication(&mut library, systems));
    show(alice.request_borrow(&mut library, "Operating Systems", None));

    section("5. Loan status");
    for title in alice.borrowed_items() {
        let due = library
            .find_publication(&title)
            .and_then(|p| p.due_date())
            .map(|due| due.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "not on loan".to_string());
        println!("  {title} - due {due}");
    }

    section("6. Returning");
    show(alice.request_return(&mut library, "Python Crash Course"));
    println!("{} now holds: {:?}", alice.name(), alice.borrowed_items());
    println!("Available in the library:");
    for publication in library.list_available() {
        println!("  {}", publication.title());
    }

    section("7. Permissions");
    let deputy = Admin::new("Ms. Zhang", "admin002", "zhang");
    let secret = Publication::book("Martial Arts Manual", "Anonymous", "000300", "Fantasy");
    println!("An admin who was never registered tries to add a book:");
    println!("  {}", deputy.add_publication(&mut library, secret.clone()));

    section("8. Super admin adds a new admin");
    println!("  {}", super_admin.register_admin(&mut library, deputy.clone()));
    println!("The new admin cannot add admins in turn:");
    println!(
        "  {}",
        deputy.register_admin(&mut library, Admin::new("Mr. Li", "admin003", "li"))
    );

    section("9. The new admin adds a book");
    println!("  {}", deputy.add_publication(&mut library, secret));
    println!("Final catalogue:");
    for publication in library.publications() {
        println!("  {}", publication.describe());
    }

    Ok(())
}
