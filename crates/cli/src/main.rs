use anyhow::Context;
use attr_uuid_core::{resolve_config_path, BindingConfig, MemoryStore, Model, UuidCodec};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable consulted when `--config` is not given.
const CONFIG_ENV_VAR: &str = "ATTR_UUID_CONFIG";

#[derive(Parser)]
#[command(name = "attr-uuid")]
#[command(about = "Binary UUID conversions and field binding inspection")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a hex digest to the formatted form
    Format {
        /// 32 hex characters
        hex: String,
    },
    /// Convert a formatted UUID to its hex digest
    Hex {
        /// 8-4-4-4-12 hyphenated UUID
        formatted: String,
    },
    /// Generate new random UUIDs
    Generate {
        /// Number of UUIDs to generate
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// List the operations produced by a binding configuration
    Bindings {
        /// YAML configuration file (defaults to $ATTR_UUID_CONFIG, then ./attr_uuid.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("attr_uuid=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Format { hex }) => println!("{}", hex_to_formatted(&hex)?),
        Some(Commands::Hex { formatted }) => println!("{}", formatted_to_hex(&formatted)?),
        Some(Commands::Generate { count }) => {
            for line in generate(count) {
                println!("{}", line);
            }
        }
        Some(Commands::Bindings { config }) => {
            let config = config.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
            let path = resolve_config_path(config)?;
            let config = BindingConfig::load(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            for line in describe_bindings(&config)? {
                println!("{}", line);
            }
        }
        None => {
            println!("Use 'attr-uuid --help' for commands");
        }
    }

    Ok(())
}

fn hex_to_formatted(hex: &str) -> anyhow::Result<String> {
    Ok(UuidCodec::parse_hex(hex.trim())?.formatted())
}

fn formatted_to_hex(formatted: &str) -> anyhow::Result<String> {
    Ok(UuidCodec::parse_formatted(formatted.trim())?.hex())
}

/// One line per UUID: formatted form, then hex digest.
fn generate(count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let uuid = UuidCodec::generate();
            format!("{} {}", uuid.formatted(), uuid.hex())
        })
        .collect()
}

/// Lists, per record type, the operations its bindings produce when backed by a store.
fn describe_bindings(config: &BindingConfig) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();

    for configured in config.build()? {
        lines.push(format!("{}:", configured.record_type.name()));

        for binding in configured.record_type.bindings() {
            lines.push(format!(
                "  {} -> field '{}'{}",
                binding.attribute(),
                binding.column(),
                if binding.autofill_enabled() {
                    " (autofill)"
                } else {
                    ""
                }
            ));
        }
        for skipped in &configured.skipped {
            lines.push(format!("  skipped {}: {}", skipped.attribute, skipped.reason));
        }

        let model = Model::new(configured.record_type, MemoryStore::new());
        for name in model.operation_names() {
            lines.push(format!("    {}", name));
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(
            hex_to_formatted("faea220ae94e442c9ca05b39753e3549").unwrap(),
            "faea220a-e94e-442c-9ca0-5b39753e3549"
        );
        assert_eq!(
            formatted_to_hex(" FAEA220A-E94E-442C-9CA0-5B39753E3549\n").unwrap(),
            "faea220ae94e442c9ca05b39753e3549"
        );
        assert!(hex_to_formatted("invalid").is_err());
        assert!(formatted_to_hex("faea220ae94e442c9ca05b39753e3549").is_err());
    }

    #[test]
    fn test_generate_lines() {
        let lines = generate(3);

        assert_eq!(lines.len(), 3);
        for line in lines {
            let (formatted, hex) = line.split_once(' ').unwrap();
            assert_eq!(formatted_to_hex(formatted).unwrap(), hex);
        }
    }

    #[test]
    fn test_describe_bindings() {
        let config = BindingConfig::from_yaml_str(
            r#"
record_types:
  - name: dummy
    bindings:
      - attribute: uuid
        column_name: x_uuid
        autofill: true
      - attribute: 1
"#,
        )
        .unwrap();

        let lines = describe_bindings(&config).unwrap();

        assert_eq!(lines[0], "dummy:");
        assert_eq!(lines[1], "  uuid -> field 'x_uuid' (autofill)");
        assert_eq!(lines[2], "  skipped 1: attribute name is not textual");
        assert!(lines.contains(&"    find_all_by_hex_uuid".to_string()));
        assert!(lines.contains(&"    formatted_uuid=".to_string()));
        assert_eq!(lines.len(), 3 + 8);
    }
}
