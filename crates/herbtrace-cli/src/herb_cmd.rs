//! Headless subcommands: add, lookup, collections, list, login.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use anyhow::Context;
use serde_json::Value;

use herbtrace_core::{
    HerbDatabase, HerbForm, Location, ObjectStore, UserType, authenticate_user,
};

use crate::herb_fmt::{write_batch_detail, write_profile, write_record_table};

/// Herb subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum HerbAction {
    /// Record a harvested herb batch.
    Add {
        /// Herb name (e.g., "Ashwagandha").
        #[arg(long)]
        name: String,
        /// Quantity in kilograms.
        #[arg(long)]
        quantity: String,
        /// Latitude of the collection site.
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        /// Longitude of the collection site.
        #[arg(long, allow_hyphen_values = true)]
        lng: String,
        /// Free-form address of the collection site.
        #[arg(long, default_value = "")]
        address: String,
        /// Photo URL.
        #[arg(long)]
        photo: Option<String>,
        /// Quality grade (defaults to "Standard").
        #[arg(long)]
        grade: Option<String>,
        /// Processing step; repeat for several.
        #[arg(long = "processing")]
        processing: Vec<String>,
        /// Test result; repeat for several.
        #[arg(long = "testing")]
        testing: Vec<String>,
        /// Mark the batch as organic certified.
        #[arg(long)]
        organic: bool,
        /// Submitting farmer's id.
        #[arg(long, default_value = "")]
        farmer_id: String,
        /// Submitting farmer's display name.
        #[arg(long, default_value = "")]
        farmer_name: String,
    },
    /// Look up a batch by id.
    Lookup {
        /// Batch id (e.g., "HERBLOYW3V28ABCDE").
        batch_id: String,
    },
    /// List a farmer's batches.
    Collections {
        /// Farmer id (e.g., "FARMER_JANEDOE").
        farmer_id: String,
    },
    /// List every batch in the first listing page.
    List,
    /// Show the profile the login stub synthesises.
    Login {
        email: String,
        password: String,
        /// Role: farmer, customer, admin.
        #[arg(short, long, default_value = "customer")]
        role: UserType,
    },
}

/// Execute a herb subcommand, writing to stdout.
pub async fn run<S: ObjectStore>(db: &HerbDatabase<S>, action: HerbAction) -> anyhow::Result<()> {
    run_with_writer(db, action, &mut io::stdout()).await
}

/// Execute a herb subcommand, writing to `out`.
pub async fn run_with_writer<S: ObjectStore>(
    db: &HerbDatabase<S>,
    action: HerbAction,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        HerbAction::Add {
            name,
            quantity,
            lat,
            lng,
            address,
            photo,
            grade,
            processing,
            testing,
            organic,
            farmer_id,
            farmer_name,
        } => {
            let location = Location::parse(&lat, &lng, &address).map_err(anyhow::Error::msg)?;
            let form = HerbForm {
                herb_name: Some(name),
                quantity: Some(quantity),
                location: Some(location),
                photo,
                processing: processing.into_iter().map(Value::String).collect(),
                testing: testing.into_iter().map(Value::String).collect(),
                organic_certified: organic,
                quality_grade: grade,
            };
            let batch_id = db.add_herb(form, &farmer_id, &farmer_name).await?;
            writeln!(out, "Recorded batch {batch_id}")?;
        }
        HerbAction::Lookup { batch_id } => {
            let herb = db
                .get_herb(&batch_id)
                .await
                .with_context(|| format!("looking up {batch_id}"))?;
            match herb {
                Some(herb) => write_batch_detail(out, &herb)?,
                None => writeln!(out, "Herb batch {batch_id} not found.")?,
            }
        }
        HerbAction::Collections { farmer_id } => {
            let records = db.farmer_collections(&farmer_id).await;
            if records.is_empty() {
                writeln!(out, "No collections found for {farmer_id}.")?;
            } else {
                write_record_table(out, &records)?;
            }
        }
        HerbAction::List => {
            let records = db.list_batches().await?;
            if records.is_empty() {
                writeln!(out, "No herb batches found.")?;
            } else {
                write_record_table(out, &records)?;
            }
        }
        HerbAction::Login {
            email,
            password,
            role,
        } => match authenticate_user(&email, &password, role) {
            Some(user) => write_profile(out, &user)?,
            None => anyhow::bail!("Please enter both email and password"),
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use herbtrace_core::MemoryStore;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        action: HerbAction,
    }

    fn parse(args: &[&str]) -> HerbAction {
        TestCli::try_parse_from(std::iter::once("herbtrace").chain(args.iter().copied()))
            .unwrap()
            .action
    }

    async fn run_to_string(db: &HerbDatabase<MemoryStore>, args: &[&str]) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run_with_writer(db, parse(args), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn add_then_lookup() {
        let db = HerbDatabase::new(MemoryStore::new());
        let added = run_to_string(
            &db,
            &[
                "add", "--name", "Brahmi", "--quantity", "3", "--lat", "-8.5", "--lng", "115.2",
                "--processing", "Washed", "--processing", "Dried", "--organic",
            ],
        )
        .await
        .unwrap();
        let batch_id = added.trim().strip_prefix("Recorded batch ").unwrap().to_string();

        let detail = run_to_string(&db, &["lookup", &batch_id]).await.unwrap();
        assert!(detail.contains("Brahmi"));
        assert!(detail.contains("Unknown Farmer (FARMER001)"));
        assert!(detail.contains("Washed; Dried"));
        assert!(detail.contains("Organic:  yes"));
    }

    #[tokio::test]
    async fn add_rejects_bad_quantity() {
        let db = HerbDatabase::new(MemoryStore::new());
        let err = run_to_string(
            &db,
            &["add", "--name", "Neem", "--quantity", "0", "--lat", "1", "--lng", "2"],
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("Database operation failed"));
        assert!(db.store().is_empty().await);
    }

    #[tokio::test]
    async fn lookup_miss_and_empty_listings() {
        let db = HerbDatabase::new(MemoryStore::new());
        let miss = run_to_string(&db, &["lookup", "HERBNOPE12345"]).await.unwrap();
        assert_eq!(miss, "Herb batch HERBNOPE12345 not found.\n");
        let none = run_to_string(&db, &["list"]).await.unwrap();
        assert_eq!(none, "No herb batches found.\n");
        let mine = run_to_string(&db, &["collections", "F1"]).await.unwrap();
        assert_eq!(mine, "No collections found for F1.\n");
    }

    #[tokio::test]
    async fn collections_table_counts_rows() {
        let db = HerbDatabase::new(MemoryStore::new());
        for name in ["Tulsi", "Neem"] {
            run_to_string(
                &db,
                &[
                    "add", "--name", name, "--quantity", "1", "--lat", "1", "--lng", "2",
                    "--farmer-id", "F1", "--farmer-name", "One",
                ],
            )
            .await
            .unwrap();
        }
        let table = run_to_string(&db, &["collections", "F1"]).await.unwrap();
        assert!(table.starts_with("BATCH"));
        assert!(table.ends_with("2 batch(es)\n"));
    }

    #[tokio::test]
    async fn login_prints_profile() {
        let db = HerbDatabase::new(MemoryStore::new());
        let text = run_to_string(&db, &["login", "asha@shop.in", "pw", "--role", "customer"])
            .await
            .unwrap();
        assert!(text.contains("CUSTOMER_ASHA"));
        assert!(text.contains("Asha's Address"));

        assert!(run_to_string(&db, &["login", "asha@shop.in", ""]).await.is_err());
    }
}
