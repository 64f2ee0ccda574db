//! attrbind - inspect and exercise attribute value codecs from the shell.

use anyhow::{Context, Result};
use attrbind_core::{AttributeValues, CodecResolver, TypeDescriptor, Value};
use attrbind_mapper::config::{LogConfig, LogFormat};
use attrbind_mapper::logging;
use clap::{Parser, Subcommand};

/// attrbind - directory attribute codec tool
#[derive(Parser, Debug)]
#[command(name = "attrbind")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log filter directive (e.g. "warn", "attrbind_core=debug")
    #[arg(long, env = "ATTRBIND_LOG", default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, env = "ATTRBIND_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a type signature and print its codec
    Resolve {
        /// Type signature, e.g. "List<i32>"
        signature: String,
    },

    /// Decode raw attribute values and print the value as JSON
    Decode {
        signature: String,
        /// Raw attribute values
        values: Vec<String>,
        /// Treat values as hex-encoded binary
        #[arg(long)]
        binary_hex: bool,
    },

    /// Encode a JSON value and print one raw value per line
    Encode {
        signature: String,
        /// Value as JSON, e.g. '{"List":[{"Int":1}]}'
        value: String,
        /// Print binary values as hex
        #[arg(long)]
        binary_hex: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LogConfig {
        filter: cli.log_level,
        format: cli.log_format,
    })?;

    let resolver = CodecResolver::new();
    match cli.command {
        Commands::Resolve { signature } => {
            let descriptor = TypeDescriptor::parse(&signature)?;
            let codec = resolver.resolve(&descriptor)?;
            let form = if codec.prefers_binary() { "binary" } else { "text" };
            println!("{descriptor} => {codec} (target {}, {form})", codec.target_type());
        }
        Commands::Decode {
            signature,
            values,
            binary_hex,
        } => {
            let codec = resolver.resolve_str(&signature)?;
            let raw = if binary_hex {
                let bytes = values
                    .iter()
                    .map(hex::decode)
                    .collect::<Result<Vec<_>, _>>()
                    .context("invalid hex value")?;
                AttributeValues::Binary(bytes)
            } else {
                AttributeValues::Text(values)
            };
            let value = codec.decode(&raw)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Encode {
            signature,
            value,
            binary_hex,
        } => {
            let codec = resolver.resolve_str(&signature)?;
            let value: Value =
                serde_json::from_str(&value).context("value is not a JSON-encoded Value")?;
            match codec.encode(&value, binary_hex)? {
                AttributeValues::Text(values) => values.iter().for_each(|v| println!("{v}")),
                AttributeValues::Binary(values) => {
                    values.iter().for_each(|v| println!("{}", hex::encode(v)));
                }
            }
        }
    }
    Ok(())
}
