use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::ProgressBar;

use display_core::api::Partition;
use display_core::reboot;
use display_core::upload::{run_upload, UploadKind, UploadOutcome};

mod client;
mod logging;
mod term;

use client::DeviceClient;
use term::TermUi;

#[derive(Parser)]
#[command(name = "displayctl")]
#[command(about = "Management console client for the LED display", long_about = None)]
struct Cli {
    /// Device host name or IP address
    host: String,

    /// HTTP port
    #[arg(short, long, default_value = "80")]
    port: u16,

    /// Verbose request logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a firmware image over the air
    UploadOta {
        /// Firmware image file
        file: PathBuf,
    },
    /// Upload an animation asset
    UploadAnimation {
        /// Animation file (GIF)
        file: PathBuf,
        /// Name to store the animation under (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List animations stored on the device
    Animations,
    /// Select the animation to play
    SetAnimation { name: String },
    /// Delete an animation from the device
    DeleteAnimation { name: String },
    /// Switch the LED output on or off
    Leds { state: SwitchState },
    /// Freeze or resume LED frame updates
    Freeze { state: SwitchState },
    /// Activate a firmware partition
    Activate { partition: PartitionArg },
    /// Reboot the device
    Reboot,
}

#[derive(Clone, Copy, ValueEnum)]
enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    fn is_on(self) -> bool {
        matches!(self, SwitchState::On)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PartitionArg {
    Booted,
    Standby,
}

impl From<PartitionArg> for Partition {
    fn from(arg: PartitionArg) -> Self {
        match arg {
            PartitionArg::Booted => Partition::Booted,
            PartitionArg::Standby => Partition::Standby,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = DeviceClient::new(&cli.host, cli.port).and_then(|client| run(client, cli.command));
    if let Err(e) = result {
        eprintln!("{} {e:#}", "❌".red());
        std::process::exit(1);
    }
}

fn run(mut client: DeviceClient, command: Commands) -> Result<()> {
    match command {
        Commands::UploadOta { file } => {
            upload(&mut client, &file, UploadKind::Firmware)?;
            println!("Device will boot the new image after activation and reboot");
        }
        Commands::UploadAnimation { file, name } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("animation file has no name")?,
            };
            upload(&mut client, &file, UploadKind::Animation { filename: name })?;
            // the web console reloads the page here; print fresh state instead
            print_animations(&client)?;
        }
        Commands::Animations => print_animations(&client)?,
        Commands::SetAnimation { name } => {
            client.set_animation(&name)?;
            println!("{} Now playing {}", "▶".green(), name.bold());
        }
        Commands::DeleteAnimation { name } => {
            client.delete_animation(&name)?;
            println!("Deleted {}", name.bold());
        }
        Commands::Leds { state } => {
            client.set_enable_leds(state.is_on())?;
            println!("LED output {}", if state.is_on() { "on".green() } else { "off".yellow() });
        }
        Commands::Freeze { state } => {
            // the device flag is "update disable", so freeze on = disable 1
            client.set_led_update_disable(state.is_on())?;
            println!(
                "LED updates {}",
                if state.is_on() { "frozen".yellow() } else { "running".green() }
            );
        }
        Commands::Activate { partition } => {
            let partition = Partition::from(partition);
            client.activate_partition(partition)?;
            println!("Activated {:?} partition", partition);
        }
        Commands::Reboot => reboot_device(&client),
    }
    Ok(())
}

fn upload(client: &mut DeviceClient, file: &Path, kind: UploadKind) -> Result<()> {
    let payload = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    println!(
        "📤 Uploading {} ({} bytes, {} hex-encoded)",
        file.display(),
        payload.len(),
        payload.len() * 2
    );

    let mut ui = TermUi::new();
    match run_upload(client, &mut ui, kind, Some(&payload)) {
        UploadOutcome::Completed => Ok(()),
        UploadOutcome::Failed => bail!("upload failed"),
        UploadOutcome::NoFile => Ok(()),
    }
}

fn print_animations(client: &DeviceClient) -> Result<()> {
    let list = client.animations()?;
    if list.animations.is_empty() {
        println!("No animations stored");
        return Ok(());
    }
    for animation in &list.animations {
        if animation.active {
            println!("{} {}", "▶".green(), animation.name.bold());
        } else {
            println!("  {}", animation.name);
        }
    }
    Ok(())
}

fn reboot_device(client: &DeviceClient) {
    println!("🔄 Rebooting device...");

    // Synthetic progress, a timer rather than a measurement: the device
    // cannot report its own reboot.
    let bar = ProgressBar::new(100);
    reboot::run_reboot(
        || client.reboot(),
        |tick| {
            bar.set_position(tick as u64);
            if tick < 100 {
                thread::sleep(reboot::TICK_INTERVAL);
            }
        },
        || bar.finish_and_clear(),
        || {
            println!("{} Device should be back up", "✅".green());
            // the reload: re-read device state, which may lag the bar
            if let Err(e) = print_animations(client) {
                println!("{} Device not reachable yet: {e:#}", "⚠".yellow());
            }
        },
    );
}
