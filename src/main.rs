use clap::{Parser, Subcommand};
use crossbeam_channel::bounded;
use secplus_sdr::device::FileDevice;
use secplus_sdr::logging::init_logging;
use secplus_sdr::render::TraceRenderer;
use secplus_sdr::{EnvelopeDetector, PipelineConfig, pipeline, secplus};
use std::fs::File;
use std::io::{self, Read, Write};

#[derive(Parser)]
#[command(author, version, about = "Security+ rolling-code SDR pipeline", long_about = None)]
struct Cli {
    /// JSON pipeline configuration; defaults to the Security+ reference
    /// parameters.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a (rolling, fixed) pair to 40 ternary digits.
    Encode {
        #[arg(long)]
        rolling: u64,
        #[arg(long, default_value_t = 0)]
        fixed: u64,
    },
    /// Decode a 40-digit ternary string back to (rolling, fixed).
    Decode { digits: String },
    /// Decode packets from a raw IQ capture ('-' for stdin).
    Listen {
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Synthesize the OOK transmit waveform to a file ('-' for stdout).
    Transmit {
        #[arg(long)]
        rolling: u64,
        #[arg(long, default_value_t = 0)]
        fixed: u64,
        #[arg(short, long)]
        output: Option<String>,
        /// Enable the device amplifier stage.
        #[arg(long, default_value_t = false)]
        amplify: bool,
    },
}

fn load_config(path: Option<&str>) -> io::Result<PipelineConfig> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            serde_json::from_reader(file).map_err(io::Error::other)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn read_input(path: Option<&str>) -> io::Result<Vec<u8>> {
    let mut src: Box<dyn Read> = match path {
        Some("-") | None => Box::new(io::stdin()),
        Some(path) => Box::new(File::open(path)?),
    };
    let mut data = Vec::new();
    src.read_to_end(&mut data)?;
    Ok(data)
}

fn main() -> io::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Encode { rolling, fixed } => {
            let digits = secplus::encode(rolling, fixed).map_err(io::Error::other)?;
            let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
            println!("{text}");
        }
        Commands::Decode { digits } => {
            let parsed: Vec<u8> = digits
                .trim()
                .chars()
                .map(|c| {
                    c.to_digit(3)
                        .map(|d| d as u8)
                        .ok_or_else(|| io::Error::other(format!("bad digit '{c}'")))
                })
                .collect::<io::Result<_>>()?;
            let (rolling, fixed) = secplus::decode(&parsed).map_err(io::Error::other)?;
            println!("rolling={rolling} fixed={fixed}");
        }
        Commands::Listen { input } => {
            let capture = read_input(input.as_deref())?;
            let mut device = FileDevice::from_capture(capture);
            let detector =
                EnvelopeDetector::new(config.clone()).with_renderer(Box::new(TraceRenderer));

            let (stop_tx, stop_rx) = bounded(1);
            ctrlc::set_handler(move || {
                let _ = stop_tx.try_send(());
            })
            .map_err(io::Error::other)?;

            let packets = pipeline::run_receive(&mut device, &config, detector, Some(stop_rx))
                .map_err(io::Error::other)?;
            if packets.is_empty() {
                eprintln!("no packets detected");
            } else {
                println!("{}", packets.join(" "));
            }
        }
        Commands::Transmit {
            rolling,
            fixed,
            output,
            amplify,
        } => {
            let mut device = FileDevice::from_capture(Vec::new());
            if let Err(err) = pipeline::run_transmit(&mut device, &config, rolling, fixed, amplify)
            {
                // Single human-readable notice for encode/transmit failures.
                eprintln!("transmission failed: {err}");
                std::process::exit(1);
            }

            let bytes: Vec<u8> = device.transmitted().iter().map(|&s| s as u8).collect();
            let mut dst: Box<dyn Write> = match output.as_deref() {
                Some("-") | None => Box::new(io::stdout()),
                Some(path) => Box::new(File::create(path)?),
            };
            dst.write_all(&bytes)?;
        }
    }

    Ok(())
}
