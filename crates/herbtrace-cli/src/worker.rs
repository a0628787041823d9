//! Background worker owning the herb database.
//!
//! The UI loop never awaits the object store directly: it sends a
//! [`Command`] and later applies the matching [`Outcome`]. Commands run one
//! at a time in arrival order.

use tokio::sync::mpsc;
use tracing::{debug, info};

use herbtrace_core::{Error, HerbBatch, HerbDatabase, HerbForm, HerbRecord, ObjectStore};

/// Work requested by the UI.
#[derive(Debug)]
pub enum Command {
    SubmitHerb {
        form: HerbForm,
        farmer_id: String,
        farmer_name: String,
    },
    LookupBatch(String),
    LoadCollections(String),
    LoadAllBatches,
}

/// Result of a [`Command`], sent back to the UI.
#[derive(Debug)]
pub enum Outcome {
    Submitted(Result<String, Error>),
    LookedUp {
        batch_id: String,
        result: Result<Option<HerbBatch>, Error>,
    },
    Collections(Vec<HerbRecord>),
    Batches(Result<Vec<HerbRecord>, Error>),
}

/// Execute a single command against `db`.
pub async fn execute<S: ObjectStore>(db: &HerbDatabase<S>, command: Command) -> Outcome {
    match command {
        Command::SubmitHerb {
            form,
            farmer_id,
            farmer_name,
        } => Outcome::Submitted(db.add_herb(form, &farmer_id, &farmer_name).await),
        Command::LookupBatch(batch_id) => {
            let result = db.get_herb(&batch_id).await;
            Outcome::LookedUp { batch_id, result }
        }
        Command::LoadCollections(farmer_id) => {
            Outcome::Collections(db.farmer_collections(&farmer_id).await)
        }
        Command::LoadAllBatches => Outcome::Batches(db.list_batches().await),
    }
}

/// Serve commands until either channel closes.
pub async fn run<S: ObjectStore>(
    db: HerbDatabase<S>,
    mut commands: mpsc::Receiver<Command>,
    outcomes: mpsc::Sender<Outcome>,
) {
    info!("Worker started");
    while let Some(command) = commands.recv().await {
        debug!(?command, "Executing command");
        let outcome = execute(&db, command).await;
        if outcomes.send(outcome).await.is_err() {
            break;
        }
    }
    info!("Worker stopped");
}
