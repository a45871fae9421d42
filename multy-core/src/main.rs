//! Multy Core diagnostic tool
//!
//! Derives the first receiving account of every enabled chain and prints its
//! path and address (or public key, for chains with registered account names).
//! The mnemonic is read from `MULTY_MNEMONIC`; without it a new one is
//! generated and printed once.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use multy_core::{Error, OsEntropy, Wallet, WalletConfig};

const ENV_MNEMONIC: &str = "MULTY_MNEMONIC";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("multy-core {}", multy_core::VERSION);

    let config = WalletConfig::from_env().context("loading configuration")?;

    let wallet = match std::env::var(ENV_MNEMONIC) {
        Ok(mnemonic) => Wallet::from_mnemonic("default", config, &mnemonic).context("importing mnemonic")?,
        Err(_) => {
            let wallet = Wallet::generate("default", config, &mut OsEntropy).context("generating mnemonic")?;
            println!("mnemonic: {}", wallet.mnemonic());
            wallet
        }
    };

    for blockchain in &wallet.config().chains {
        let account = wallet
            .account(*blockchain, 0, 0, None)
            .with_context(|| format!("deriving {} account", blockchain))?;
        let path = account.path().map(ToString::to_string).unwrap_or_default();

        match account.address() {
            Ok(address) => println!("{:<10} {:<20} {}", blockchain, path, address),
            Err(Error::AddressUnavailable(_)) => {
                println!("{:<10} {:<20} {}", blockchain, path, account.public_key())
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
