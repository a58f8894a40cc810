//! # Seed Subcommand
//!
//! Fills the `receivers` table with sample data. Each round inserts five
//! receivers, one per PIX key type, with a random name, email, bank account
//! and status.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use rand::seq::SliceRandom;
use rand::Rng;

use pix_api::config::AppConfig;
use pix_api::db::receivers::PgReceiverRepository;
use pix_api::repository::ReceiverRepository;
use pix_state::{DraftUpdate, Receiver, ReceiverError};

const BANKS: &[&str] = &["Bradesco", "Itau", "Caixa", "Nubank", "Inter"];
const OFFICES: &[&str] = &["0001", "0002", "0003", "0004", "0005"];
const ACCOUNT_NUMBERS: &[&str] = &["123456", "654321", "987654", "456789", "321654"];
const NAMES: &[&str] = &[
    "John Doe",
    "Jane Doe",
    "John Smith",
    "Jane Smith",
    "John Johnson",
    "Jane Johnson",
];
const EMAILS: &[&str] = &[
    "johndoe@email.com",
    "janedoe@email.com",
    "janesmith@email.com",
    "johnjohnson@email.com",
];

const CPF: &str = "12345678901";
const CNPJ: &str = "41299131000107";

/// (document, key value, key type) for each receiver in a round.
const ROUND: &[(&str, &str, &str)] = &[
    (CPF, CPF, "cpf"),
    (CPF, "test@email.com", "email"),
    (CNPJ, "+5511999999999", "phone"),
    (CNPJ, "7c7a2ba0-3fda-4f76-8c44-df1f8c1289ba", "random"),
    (CNPJ, CNPJ, "cnpj"),
];

/// Arguments for the seed subcommand.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Number of rounds of five receivers to insert.
    #[arg(long, default_value_t = 15)]
    pub count: u32,

    /// Delete every existing receiver first.
    #[arg(long)]
    pub reset: bool,
}

fn pick<'a, R: Rng>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

/// Build `rounds` rounds of sample receivers.
pub fn sample_receivers<R: Rng>(
    rng: &mut R,
    rounds: u32,
    now: DateTime<Utc>,
) -> Result<Vec<Receiver>, ReceiverError> {
    let mut receivers = Vec::with_capacity(rounds as usize * ROUND.len());
    for _ in 0..rounds {
        for (document, key_value, key_type) in ROUND {
            let mut receiver = Receiver::new_at(
                document,
                key_value,
                key_type,
                pick(rng, NAMES),
                pick(rng, EMAILS),
                now,
            )?;
            let banking = DraftUpdate {
                bank: Some(pick(rng, BANKS).to_string()),
                office: Some(pick(rng, OFFICES).to_string()),
                account_number: Some(pick(rng, ACCOUNT_NUMBERS).to_string()),
                ..Default::default()
            };
            receiver.update_draft_at(&banking, now)?;
            if rng.gen_bool(0.5) {
                receiver.promote_at(now);
            }
            receivers.push(receiver);
        }
    }
    Ok(receivers)
}

/// Run the seed subcommand against `DATABASE_URL`.
pub async fn run_seed(args: &SeedArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to seed receivers")?;
    let pool = pix_api::db::connect(url, config.db_max_connections)
        .await
        .context("failed to connect to the database")?;
    let repository = PgReceiverRepository::new(pool);

    if args.reset {
        let removed = repository.delete_all().await?;
        tracing::info!(removed, "existing receivers deleted");
    }

    let receivers = sample_receivers(&mut rand::thread_rng(), args.count, Utc::now())?;
    for receiver in &receivers {
        repository.create(receiver).await?;
        tracing::info!(
            receiver_id = %receiver.id(),
            name = receiver.name(),
            pix_key = %receiver.pix_key(),
            status = %receiver.status(),
            "receiver seeded"
        );
    }

    let total = repository.count().await?;
    println!("Inserted {} receivers. Total of receivers: {total}", receivers.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pix_core::PixKeyType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn each_round_covers_every_key_type() {
        let mut rng = StdRng::seed_from_u64(7);
        let receivers = sample_receivers(&mut rng, 1, now()).unwrap();
        let types: Vec<PixKeyType> = receivers.iter().map(|r| r.pix_key().key_type()).collect();
        assert_eq!(
            types,
            vec![
                PixKeyType::Cpf,
                PixKeyType::Email,
                PixKeyType::Phone,
                PixKeyType::Random,
                PixKeyType::Cnpj,
            ]
        );
    }

    #[test]
    fn samples_carry_banking_details() {
        let mut rng = StdRng::seed_from_u64(42);
        let receivers = sample_receivers(&mut rng, 3, now()).unwrap();
        assert_eq!(receivers.len(), 15);
        for receiver in &receivers {
            let account = receiver.bank_account();
            assert!(BANKS.contains(&account.bank.as_str()));
            assert!(OFFICES.contains(&account.office.as_str()));
            assert!(ACCOUNT_NUMBERS.contains(&account.account_number.as_str()));
            assert!(receiver.email().is_some());
            assert!(receiver.validate().is_ok());
        }
    }

    #[test]
    fn zero_rounds_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_receivers(&mut rng, 0, now()).unwrap().is_empty());
    }
}
