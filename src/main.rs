use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hexseal::{CipherSuite, KdfParams, Sealer};
use tracing_subscriber::EnvFilter;

mod auth;

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 memory cost in KiB (default: 65536)
    #[arg(long = "argon-mem")]
    mem_cost_kib: Option<u32>,

    /// Argon2 time cost / iterations (default: 3)
    #[arg(long = "argon-time")]
    time_cost: Option<u32>,

    /// Argon2 parallelism (default: 1)
    #[arg(long = "argon-parallelism")]
    parallelism: Option<u32>,
}

impl Argon2Args {
    fn to_kdf_params(&self) -> Result<KdfParams> {
        let default = KdfParams::default();

        let params = KdfParams::new(
            self.mem_cost_kib.unwrap_or(default.mem_cost_kib()),
            self.time_cost.unwrap_or(default.time_cost()),
            self.parallelism.unwrap_or(default.parallelism()),
        )?;
        Ok(params)
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum CipherArg {
    #[default]
    #[value(name = "xchacha20-poly1305")]
    XChaCha20Poly1305,
    #[value(name = "aes-256-gcm")]
    Aes256Gcm,
}

impl From<CipherArg> for CipherSuite {
    fn from(arg: CipherArg) -> Self {
        match arg {
            CipherArg::XChaCha20Poly1305 => CipherSuite::XChaCha20Poly1305,
            CipherArg::Aes256Gcm => CipherSuite::Aes256Gcm,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "hexseal")]
#[command(version, about = "Seal and open passphrase-protected secrets as hex.")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seals hex-encoded cleartext and prints the container as hex
    #[command(arg_required_else_help = true)]
    Seal {
        cleartext_hex: String,

        #[command(flatten)]
        argon2: Argon2Args,

        /// Authenticated cipher
        #[arg(long, value_enum, default_value_t = CipherArg::default())]
        cipher: CipherArg,
    },

    /// Opens a hex-encoded container and prints the cleartext as hex
    #[command(arg_required_else_help = true)]
    Open { ciphertext_hex: String },

    /// Shows the non-secret header fields of a container
    #[command(arg_required_else_help = true)]
    Inspect {
        ciphertext_hex: String,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the result only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Seal {
            cleartext_hex,
            argon2,
            cipher,
        } => {
            let sealer = Sealer::new(argon2.to_kdf_params()?, cipher.into());
            let cleartext = zeroize::Zeroizing::new(
                hex::decode(cleartext_hex.trim()).context("cleartext is not valid hex")?,
            );
            let passphrase = auth::read_passphrase()?;
            let container = sealer
                .seal(&passphrase, &cleartext)
                .context("failed to seal secret")?;
            println!("{}", hex::encode(container));
        }
        Commands::Open { ciphertext_hex } => {
            let container =
                hex::decode(ciphertext_hex.trim()).context("container is not valid hex")?;
            let passphrase = auth::read_passphrase()?;
            let cleartext =
                hexseal::open(&passphrase, &container).context("failed to open container")?;
            println!("{}", hex::encode(cleartext.as_slice()));
        }
        Commands::Inspect {
            ciphertext_hex,
            json,
        } => {
            let container =
                hex::decode(ciphertext_hex.trim()).context("container is not valid hex")?;
            let info = hexseal::inspect(&container)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{info}");
            }
        }
    }

    Ok(())
}
