use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geocoder_core::{Config, GeocodeError, GeocodeRequest, OutputFormat};
use inquire::{Password, PasswordDisplayMode, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geocoder", version, about = "Geocoding CLI")]
pub struct Cli {
    /// API key to use instead of the configured one.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and default region.
    Configure,

    /// Geocode an address and print the raw provider response.
    Geocode {
        address: String,

        /// Region bias, e.g. "us" or "uk".
        #[arg(long)]
        region: Option<String>,

        /// Output format requested from the provider ("json" or "xml").
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Print the coordinates of every match, one `lat,lng` per line.
    LatLng { address: String },

    /// Check whether the provider knows an address.
    Validate {
        address: String,

        #[arg(long)]
        region: Option<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Geocode { address, region, format } => {
                let client = config.client(self.api_key)?;

                let mut request = GeocodeRequest::new(address).with_output_format(format);
                if let Some(region) = region.or(config.default_region) {
                    request = request.with_region(region);
                }

                let response = match client.geocode(&request) {
                    Ok(response) => response,
                    Err(err) => {
                        println!("{}", undecoded_body(&request.output_format, err)?);
                        return Ok(());
                    }
                };

                eprintln!("status: {}", response.status());
                if let Some(message) = response.error_message() {
                    eprintln!("error: {message}");
                }
                println!("{}", response.into_raw());
            }
            Command::LatLng { address } => {
                let client = config.client(self.api_key)?;

                match client.lat_lng(&address).context("Geocoding failed")? {
                    Some(coords) => {
                        for c in coords {
                            println!("{},{}", c.lat, c.lng);
                        }
                    }
                    None => println!("No results for '{address}'"),
                }
            }
            Command::Validate { address, region } => {
                let client = config.client(self.api_key)?;

                let region = region.or(config.default_region).unwrap_or_default();
                let valid =
                    client.is_address_valid(&address, &region).context("Geocoding failed")?;

                println!("{}", if valid { "valid" } else { "invalid" });
            }
        }

        Ok(())
    }
}

/// Only JSON bodies are decoded, so an xml reply arrives as a decode error
/// carrying the body. Anything else is a real failure.
fn undecoded_body(format: &str, err: GeocodeError) -> Result<String> {
    let is_xml = format == OutputFormat::Xml.as_str();
    if let Some(raw) = err.raw_body().filter(|_| is_xml) {
        return Ok(raw.to_string());
    }

    Err(err).context("Geocoding failed")
}

fn configure(config: &mut Config) -> Result<()> {
    let api_key = Password::new("API key (leave empty for unauthenticated requests):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let region = Text::new("Default region (optional):")
        .with_initial_value(config.default_region.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read default region")?;

    config.set_api_key(api_key.trim().to_string());
    config.set_default_region(region.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
