use clap::Parser;
use exact64::{Padding, decode, encode};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "exact64")]
#[command(version)]
#[command(about = "Encode and decode RFC 4648 base64", long_about = None)]
struct Cli {
    /// File to encode/decode (if not provided, reads from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Decode instead of encode
    #[arg(short, long)]
    decode: bool,

    /// Omit trailing '=' padding when encoding
    #[arg(long)]
    no_pad: bool,

    /// Print which bulk engine this machine selected and exit
    #[arg(long)]
    engine: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.engine {
        println!("{:?}", exact64::Engine::active());
        return Ok(());
    }

    let input = match &cli.file {
        Some(path) => fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    if cli.decode {
        // Encoded input from shells usually carries a trailing newline
        let trimmed = input
            .strip_suffix(b"\n")
            .map(|s| s.strip_suffix(b"\r").unwrap_or(s))
            .unwrap_or(&input);
        io::stdout().write_all(&decode(trimmed))?;
    } else {
        let padding = if cli.no_pad {
            Padding::Unpadded
        } else {
            Padding::Padded
        };
        println!("{}", encode(&input, padding));
    }

    Ok(())
}
