//! Offline DRAM address translation CLI.
//!
//! This binary replays captured fabric snapshots to translate normalized
//! memory-controller addresses without live hardware access:
//! 1. **translate:** Translate an explicit (socket, die, channel, address)
//!    report.
//! 2. **record:** Decode a raw error record (instance-ID word, system-wide
//!    die index) and translate it.

use std::fs;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zen_atl::{ErrorRecord, NormAddr, Translator};
use zen_atl_cli::FabricSnapshot;

#[derive(Parser, Debug)]
#[command(
    name = "zen-atl",
    author,
    version,
    about = "Normalized-to-system DRAM address translation against a fabric snapshot",
    long_about = "Translate normalized memory-controller addresses to system physical addresses \
                  using a previously captured fabric snapshot (JSON).\n\nExamples:\n  \
                  zen-atl translate -s snapshot.json --socket 0 --die 0 --channel 1 --addr 0x12345000\n  \
                  zen-atl record -s snapshot.json --socket 0 --die-index 2 --instance-id 0x9600000 --addr 0x12345000"
)]
struct Cli {
    /// Path to the fabric snapshot JSON file.
    #[arg(short, long, global = true, default_value = "snapshot.json")]
    snapshot: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an explicit (socket, die, channel, address) report.
    Translate {
        /// Socket the reporting controller sits in.
        #[arg(long)]
        socket: u8,

        /// Die within the socket.
        #[arg(long)]
        die: u8,

        /// Channel instance within the node.
        #[arg(long)]
        channel: u8,

        /// Normalized address (decimal or 0x-prefixed hex).
        #[arg(long, value_parser = parse_u64)]
        addr: u64,
    },

    /// Decode a raw error record and translate its address.
    Record {
        /// Socket the reporting controller sits in.
        #[arg(long)]
        socket: u8,

        /// System-wide die index of the reporting controller.
        #[arg(long)]
        die_index: u16,

        /// Vendor instance-identifier word (decimal or 0x-prefixed hex).
        #[arg(long, value_parser = parse_u64)]
        instance_id: u64,

        /// Normalized address (decimal or 0x-prefixed hex).
        #[arg(long, value_parser = parse_u64)]
        addr: u64,
    },
}

/// Parses a decimal or 0x-prefixed hexadecimal 64-bit value.
fn parse_u64(arg: &str) -> Result<u64, String> {
    let parsed = if let Some(hex) = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        arg.parse()
    };

    parsed.map_err(|err| format!("invalid 64-bit value {arg:?}: {err}"))
}

fn load_snapshot(path: &str) -> FabricSnapshot {
    let json = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("error: cannot read snapshot {path:?}: {err}");
        process::exit(1);
    });

    FabricSnapshot::from_json(&json).unwrap_or_else(|err| {
        eprintln!("error: malformed snapshot {path:?}: {err}");
        process::exit(1);
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let snapshot = load_snapshot(&cli.snapshot);
    let translator = Translator::new(&snapshot.config, &snapshot);

    let result = match cli.command {
        Commands::Translate {
            socket,
            die,
            channel,
            addr,
        } => translator.translate(socket, die, channel, NormAddr::new(addr)),

        Commands::Record {
            socket,
            die_index,
            instance_id,
            addr,
        } => translator.translate_record(&ErrorRecord {
            socket_id: socket,
            die_index,
            instance_id,
            normalized_addr: addr,
        }),
    };

    match result {
        Ok(sys_addr) => println!("{sys_addr}"),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}
