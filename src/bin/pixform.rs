//! pixform CLI - run the pixel transforms on JSON data.
//!
//! Grids are JSON arrays of rows, colour images are rows of `[r, g, b]`
//! triples, and run-length data is an array of `[symbol, count]` pairs.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use pixform_rs::dwt::{self, OddEdgePolicy, WaveletParameters};
use pixform_rs::{PixelGrid, Pyramid, SubbandKind, Subbands, color, dct, rle, scan};

/// Reversible pixel transforms: colour conversion, scan, RLE, DCT and DWT
#[derive(Parser)]
#[command(name = "pixform")]
#[command(version)]
#[command(about = "Reversible pixel transforms for compression experiments", long_about = None)]
#[command(after_help = "EXAMPLES:
    pixform rgb-to-yuv 255 0 0
    pixform serpentine -i image_rgb.json -o scan.json
    pixform unscan -i scan.json -w 640 -H 480
    pixform rle-encode -i payload.bin --bytes
    pixform dct -i block.json
    pixform dct -i coeffs.json --inverse
    pixform dwt -i gray.json --levels 3 --odd-edge reject
    pixform idwt -i pyramid.json

Input is read from stdin when -i is omitted; output goes to stdout when -o is omitted.
Set RUST_LOG=debug to trace transform shapes and odd-edge truncation.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one RGB sample to YUV
    RgbToYuv { r: f64, g: f64, b: f64 },

    /// Convert one YUV sample to RGB
    YuvToRgb {
        y: f64,
        #[arg(allow_negative_numbers = true)]
        u: f64,
        #[arg(allow_negative_numbers = true)]
        v: f64,
    },

    /// Convert an RGB image (rows of [r, g, b]) to 8-bit grayscale
    #[command(visible_alias = "g")]
    Gray {
        #[command(flatten)]
        io: Io,
    },

    /// Serpentine scan of an RGB image into a list of triples
    #[command(visible_alias = "s")]
    Serpentine {
        #[command(flatten)]
        io: Io,
    },

    /// Rebuild an RGB image from a serpentine list of triples
    Unscan {
        #[command(flatten)]
        io: Io,

        /// Image width in pixels
        #[arg(short, long)]
        width: usize,

        /// Image height in pixels
        #[arg(short = 'H', long)]
        height: usize,
    },

    /// Run-length encode a JSON array of symbols (or raw bytes)
    RleEncode {
        #[command(flatten)]
        io: Io,

        /// Treat the input as raw bytes instead of JSON
        #[arg(long)]
        bytes: bool,
    },

    /// Expand [symbol, count] pairs back into the symbol sequence
    RleDecode {
        #[command(flatten)]
        io: Io,
    },

    /// Orthonormal 2D DCT of a grid
    Dct {
        #[command(flatten)]
        io: Io,

        /// Apply the inverse (type III) transform
        #[arg(long)]
        inverse: bool,
    },

    /// Haar subband decomposition of a grid
    Dwt {
        #[command(flatten)]
        io: Io,

        /// Number of decomposition levels
        #[arg(short, long, default_value = "1")]
        levels: u32,

        /// Handling of an odd last row or column
        #[arg(long, default_value = "truncate", value_enum)]
        odd_edge: OddEdge,

        /// Emit a single band (0=LL, 1=LH, 2=HL, 3=HH) of a one-level split
        #[arg(short, long)]
        band: Option<u8>,
    },

    /// Reconstruct a grid from a decomposition written by `dwt`
    Idwt {
        #[command(flatten)]
        io: Io,
    },

    /// List the available transforms
    #[command(visible_alias = "l")]
    List,
}

#[derive(clap::Args)]
struct Io {
    /// Input file path (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum OddEdge {
    /// Drop an odd last row/column (lossy)
    Truncate,
    /// Fail on odd dimensions
    Reject,
}

impl From<OddEdge> for OddEdgePolicy {
    fn from(value: OddEdge) -> Self {
        match value {
            OddEdge::Truncate => OddEdgePolicy::Truncate,
            OddEdge::Reject => OddEdgePolicy::Reject,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::RgbToYuv { r, g, b } => {
            let (y, u, v) = color::rgb_to_yuv(r, g, b);
            print_json(&json!({ "y": y, "u": u, "v": v }))
        }
        Commands::YuvToRgb { y, u, v } => {
            let (r, g, b) = color::yuv_to_rgb(y, u, v);
            print_json(&json!({ "r": r, "g": g, "b": b }))
        }
        Commands::Gray { io } => gray(&io),
        Commands::Serpentine { io } => serpentine(&io),
        Commands::Unscan { io, width, height } => unscan(&io, width, height),
        Commands::RleEncode { io, bytes } => rle_encode(&io, bytes),
        Commands::RleDecode { io } => rle_decode(&io),
        Commands::Dct { io, inverse } => block_transform(&io, inverse),
        Commands::Dwt {
            io,
            levels,
            odd_edge,
            band,
        } => subband_transform(&io, levels, odd_edge.into(), band),
        Commands::Idwt { io } => subband_inverse(&io),
        Commands::List => list_transforms(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn gray(io: &Io) -> Result<(), Box<dyn std::error::Error>> {
    let pixels: PixelGrid<[u8; 3]> = read_json(io)?;
    write_json(io, &color::luma(&pixels))
}

fn serpentine(io: &Io) -> Result<(), Box<dyn std::error::Error>> {
    let pixels: PixelGrid<[u8; 3]> = read_json(io)?;
    write_json(io, &scan::serpentine(&pixels))
}

fn unscan(io: &Io, width: usize, height: usize) -> Result<(), Box<dyn std::error::Error>> {
    let sequence: Vec<[u8; 3]> = read_json(io)?;
    write_json(io, &scan::unscan(&sequence, width, height)?)
}

fn rle_encode(io: &Io, bytes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if bytes {
        let data = read_input(io)?;
        return write_json(io, &rle::encode(&data));
    }
    let symbols: Vec<Value> = read_json(io)?;
    write_json(io, &rle::encode(&symbols))
}

fn rle_decode(io: &Io) -> Result<(), Box<dyn std::error::Error>> {
    let runs: rle::RunLengthSequence<Value> = read_json(io)?;
    write_json(io, &rle::decode(&runs)?)
}

fn block_transform(io: &Io, inverse: bool) -> Result<(), Box<dyn std::error::Error>> {
    let block: PixelGrid = read_json(io)?;
    let output = if inverse {
        dct::inverse_2d(&block)?
    } else {
        dct::forward_2d(&block)?
    };
    write_json(io, &output)
}

fn subband_transform(
    io: &Io,
    levels: u32,
    odd_edge: OddEdgePolicy,
    band: Option<u8>,
) -> Result<(), Box<dyn std::error::Error>> {
    let grid: PixelGrid = read_json(io)?;

    if let Some(index) = band {
        if levels != 1 {
            return Err("--band selects from a one-level decomposition".into());
        }
        let kind = SubbandKind::try_from(index).map_err(|_| format!("invalid band index {}", index))?;
        let bands = dwt::forward_2d(&grid, odd_edge)?;
        return write_json(io, bands.band(kind));
    }

    if levels == 1 {
        let bands = dwt::forward_2d(&grid, odd_edge)?;
        let (width, height) = bands.output_size();
        if (width, height) != (grid.width(), grid.height()) {
            eprintln!(
                "note: {}x{} input truncated to {}x{}",
                grid.width(),
                grid.height(),
                width,
                height
            );
        }
        return write_json(io, &bands);
    }

    let params = WaveletParameters { levels, odd_edge };
    write_json(io, &dwt::decompose(&grid, &params)?)
}

fn subband_inverse(io: &Io) -> Result<(), Box<dyn std::error::Error>> {
    let value: Value = read_json(io)?;
    let output = if value.get("approximation").is_some() {
        serde_json::from_value::<Pyramid>(value)?.reconstruct()?
    } else {
        serde_json::from_value::<Subbands>(value)?.reconstruct()?
    };
    write_json(io, &output)
}

fn list_transforms() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available Transforms:");
    println!();
    println!("  Colour (rgb-to-yuv, yuv-to-rgb, gray)");
    println!("    BT.601 analog YUV, no offsets or clamping");
    println!();
    println!("  Serpentine scan (serpentine, unscan)");
    println!("    Anti-diagonal zig-zag linearization and its inverse");
    println!();
    println!("  Run-length coding (rle-encode, rle-decode)");
    println!("    Maximal (symbol, count) runs, lossless");
    println!();
    println!("  DCT (dct)");
    println!("    Separable orthonormal DCT-II / DCT-III, any rectangular block");
    println!();
    println!("  DWT (dwt, idwt)");
    println!("    Haar lowpass/highpass subbands, multi-level; odd edges truncated or rejected");
    println!();
    Ok(())
}

// Internal helpers

fn read_input(io: &Io) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match &io.input {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut data = Vec::new();
            std::io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

fn read_json<T: DeserializeOwned>(io: &Io) -> Result<T, Box<dyn std::error::Error>> {
    let data = read_input(io)?;
    Ok(serde_json::from_slice(&data)?)
}

fn write_json<T: Serialize + ?Sized>(io: &Io, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    match &io.output {
        Some(path) => write_file(path, value),
        None => print_json(value),
    }
}

fn write_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = fs::File::create(path)?;
    serde_json::to_writer(&mut file, value)?;
    writeln!(file)?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}
