use chrono::NaiveDate;
use clap::Subcommand;
use wellnest_core::storage::Database;
use wellnest_core::trackers::{JournalTracker, MoodLevel};

use super::{print_chart, print_json, today};

#[derive(Subcommand)]
pub enum JournalAction {
    /// Write an entry
    Add {
        content: String,
        /// Mood from 1 (very low) to 5 (great)
        #[arg(long, default_value_t = 3)]
        mood: u8,
        /// Tag the entry; repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List entries, optionally only those with a tag
    List {
        #[arg(long)]
        tag: Option<String>,
    },
    /// Delete an entry by id
    Delete {
        id: String,
    },
    /// Mood level per entry
    Chart,
}

pub fn run(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let journal = JournalTracker::new(&db);

    match action {
        JournalAction::Add {
            content,
            mood,
            tags,
            date,
        } => {
            let entry = journal.add(
                date.unwrap_or_else(today),
                MoodLevel::new(mood)?,
                &content,
                &tags,
            )?;
            print_json(&entry)?;
        }
        JournalAction::List { tag } => {
            let entries = match tag {
                Some(tag) => journal.with_tag(&tag)?,
                None => journal.entries()?,
            };
            print_json(&entries)?;
        }
        JournalAction::Delete { id } => {
            journal.delete(&id)?;
            println!("deleted {id}");
        }
        JournalAction::Chart => {
            print_chart("Journal mood", &journal.mood_chart()?);
        }
    }
    Ok(())
}
