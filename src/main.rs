mod error;
mod habit;
mod store;

use chrono::Local;
use error::HabitError;
use habit::HabitStore;
use std::io::{self, Write};
use store::Storage;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let storage = Storage::open()?;
    let mut store = storage.load();

    // First-launch seeding, then roll the done flags over if the calendar
    // day changed since the last run.
    let today = Local::now().date_naive();
    store.ensure_defaults(today);
    store.reset_daily(today);
    storage.save(&store)?;

    loop {
        println!();
        println!("1. View habits");
        println!("2. Add habit");
        println!("3. Mark habit as done");
        println!("4. Unmark habit");
        println!("5. Delete habit");
        println!("6. Quit");

        let Some(choice) = prompt("Choose an option: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => view(&store),
            "2" => {
                let Some(name) = prompt("Habit name: ")? else { break };
                mutate(&storage, &mut store, |s| s.add(&name))?;
            }
            "3" => {
                let Some(name) = prompt("Habit to mark as done: ")? else { break };
                let today = Local::now().date_naive();
                mutate(&storage, &mut store, |s| s.mark_done(&name, today))?;
            }
            "4" => {
                let Some(name) = prompt("Habit to unmark: ")? else { break };
                mutate(&storage, &mut store, |s| s.unmark(&name))?;
            }
            "5" => {
                let Some(name) = prompt("Habit to delete: ")? else { break };
                mutate(&storage, &mut store, |s| s.delete(&name))?;
            }
            "6" => break,
            other => println!("Unknown option '{other}'"),
        }
    }

    storage.save(&store)?;
    println!("Progress saved, see you tomorrow");
    Ok(())
}

fn view(store: &HabitStore) {
    if store.is_empty() {
        println!("No habits yet.");
        return;
    }
    for (name, record) in store.iter() {
        let mark = if record.done { "✅" } else { "❌" };
        println!("{mark} {name} (streak: {})", record.streak);
    }
}

/// Runs one engine operation and persists on success. Engine errors are
/// the user's notification, not failures; save errors propagate.
fn mutate(
    storage: &Storage,
    store: &mut HabitStore,
    op: impl FnOnce(&mut HabitStore) -> Result<(), HabitError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match op(store) {
        Ok(()) => storage.save(store)?,
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
