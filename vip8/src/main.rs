use std::path::PathBuf;
use std::process;

use clap::Parser;

mod keymap;
mod run;
mod sound;

/// Chip-8 interpreter
#[derive(Parser, Debug)]
#[command(name = "vip8")]
#[command(about = "A Chip-8 interpreter", long_about = None)]
struct Args {
    /// Path to the Chip-8 ROM file
    #[arg(short, long)]
    rom: PathBuf,

    /// Window size multiplier for each of the 64x32 pixels
    #[arg(short, long, default_value = "10")]
    scale: u32,

    /// Take over the whole screen instead of opening a window
    #[arg(long)]
    fullscreen: bool,

    /// CPU cycles executed per 60Hz frame
    #[arg(short, long, default_value = "10")]
    cycles: u32,

    /// Suspend on the wait-for-key instruction instead of skipping it
    #[arg(long)]
    wait_key: bool,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    if let Err(e) = run::run(&args) {
        log::error!("{e}");
        process::exit(1);
    }
}
