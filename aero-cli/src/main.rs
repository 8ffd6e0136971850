use std::path::PathBuf;

use aero_protocol::{CoordinateTransform, ReferencePoint};
use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_num::maybe_hex;
use log::LevelFilter;

mod decode;
mod encode_gps;
mod reader;
mod replay_nmea;

#[derive(Parser)]
#[command(name = "Aero CLI")]
#[command(bin_name = "aero-cli")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Decode(DecodeArgs),
    EncodeGps(EncodeGPSArgs),
    Nmea(NmeaArgs),
    Offset(OffsetArgs),
}

fn link_parser(s: &str) -> Result<u16, String> {
    maybe_hex(s)
}

#[derive(clap::Args)]
#[command(about = "Decode every frame in a binary capture")]
pub struct DecodeArgs {
    capture: PathBuf,
}

#[derive(clap::Args)]
#[command(about = "Write one framed GPS message")]
pub struct EncodeGPSArgs {
    /// sender << 8 | recipient, e.g. 0x0301
    #[arg(long, value_parser=link_parser)]
    link: u16,
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
    #[arg(long, allow_negative_numbers = true)]
    alt: f64,
    /// cm/s
    #[arg(long, default_value_t = 0)]
    speed: u16,
    #[arg(long, default_value_t = 0)]
    satellites: u8,
    out: PathBuf,
}

#[derive(clap::Args)]
#[command(about = "Replay an NMEA log through the NEO-6 driver")]
pub struct NmeaArgs {
    log: PathBuf,
    #[arg(long, default_value_t = 9600)]
    baud_rate: u32,
    #[arg(long, default_value_t = 1000)]
    poll_time_ms: u16,
    /// Bytes handed to the driver per poll
    #[arg(long, default_value_t = 1)]
    chunk_len: usize,
}

#[derive(clap::Args)]
#[command(about = "Local offset of a position from a reference point")]
struct OffsetArgs {
    #[arg(long, allow_negative_numbers = true)]
    ref_lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    ref_lon: f64,
    #[arg(long, allow_negative_numbers = true)]
    ref_alt: f64,
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
    #[arg(long, allow_negative_numbers = true)]
    alt: f64,
}

fn main() -> Result<()> {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let args = Cli::parse();

    match args.command {
        Commands::Decode(args) => decode::decode(args)?,
        Commands::EncodeGps(args) => encode_gps::encode_gps(args)?,
        Commands::Nmea(args) => replay_nmea::replay_nmea(args)?,
        Commands::Offset(args) => {
            let transform = CoordinateTransform::with_reference(ReferencePoint {
                latitude: args.ref_lat,
                longitude: args.ref_lon,
                altitude: args.ref_alt,
            });
            let offset = transform.compute_offset(args.lat, args.lon, args.alt);
            println!("x {:.3} m, y {:.3} m, z {:.3} m", offset.x, offset.y, offset.z);
        }
    }
    Ok(())
}
