use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use camemu_core::command::{self, CameraCommand};
use camemu_core::gimbal::{SimGimbal, StaticAircraft};
use camemu_core::registry::{CommandReply, PayloadCamera};
use camemu_core::service::spawn_polling_loop;
use camemu_core::{doctor, CameraEmulator, EmulatorConfig};

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

#[derive(Debug, Parser)]
#[command(name = "camemu", version, about = "Payload camera emulator")]
struct Cli {
    /// TOML config; built-in defaults when omitted
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the config.
    Doctor,
    /// Run the emulator, reading commands from stdin until Ctrl-C.
    Run,
    /// Run a command sequence, then print the final status.
    Exec {
        /// Delay after each command
        #[arg(long, default_value_t = 200)]
        settle_ms: u64,
        /// e.g. "shoot-mode burst" "shoot start"
        #[arg(required = true)]
        commands: Vec<String>,
    },
}

#[derive(Debug, Default, serde::Deserialize)]
struct Config {
    #[serde(flatten)]
    emulator: EmulatorConfig,
    #[serde(default)]
    status: StatusCfg,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct StatusCfg {
    /// 0 disables periodic status lines
    interval_ms: u64,
}

impl Default for StatusCfg {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let Some(path) = path else { return Ok(Config::default()); };
    let s = std::fs::read_to_string(path).with_context(|| format!("read config {}", path))?;
    toml::from_str(&s).context("parse config toml")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Doctor => {
            doctor::check_config(&cfg.emulator)?;
            info!("doctor: OK");
        }
        Command::Run => run(&cfg).await?,
        Command::Exec { settle_ms, commands } => exec(&cfg, settle_ms, &commands).await?,
    }
    Ok(())
}

struct Payload {
    emu: Arc<CameraEmulator>,
    camera: PayloadCamera,
    shutdown: watch::Sender<bool>,
    loop_handle: tokio::task::JoinHandle<()>,
}

fn start_payload(cfg: &Config) -> Result<Payload> {
    doctor::check_config(&cfg.emulator).context("config check")?;

    let emu = Arc::new(CameraEmulator::new(
        &cfg.emulator,
        Arc::new(StaticAircraft(cfg.emulator.aircraft.adapter)),
        Arc::new(SimGimbal::new("payload")),
        Arc::new(SimGimbal::new("xport")),
    ));

    let mut camera = PayloadCamera::new();
    camera.register_common_handler(emu.clone());
    camera.register_exposure_metering_handler(emu.clone());
    camera.register_focus_handler(emu.clone());
    camera.register_digital_zoom_handler(emu.clone());
    camera.register_optical_zoom_handler(emu.clone());
    camera.register_tap_zoom_handler(emu.clone());

    let (shutdown, rx) = watch::channel(false);
    let loop_handle = spawn_polling_loop(emu.clone(), rx);
    info!("camera emulator started");

    Ok(Payload { emu, camera, shutdown, loop_handle })
}

impl Payload {
    fn handle_line(&self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match line {
            "help" => println!("{}", command::HELP),
            "status" => self.print_status(),
            _ => match command::parse(line) {
                Ok(cmd) => self.run_command(cmd),
                Err(e) => warn!("bad command: {:#}", e),
            },
        }
    }

    fn run_command(&self, cmd: CameraCommand) {
        match self.camera.dispatch(cmd) {
            Ok(CommandReply::Done) => println!("ok"),
            Ok(reply) => println!("{:?}", reply),
            Err(e) => warn!("command {:?} failed: {}", cmd, e),
        }
    }

    fn print_status(&self) {
        match self.emu.snapshot() {
            Ok(ev) => match serde_json::to_string(&ev) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("status encode failed: {}", e),
            },
            Err(e) => warn!("status snapshot failed: {}", e),
        }
    }

    async fn stop(self) -> Result<()> {
        let _ = self.shutdown.send(true);
        self.loop_handle.await.context("join polling loop")?;
        info!("camera emulator stopped");
        Ok(())
    }
}

async fn run(cfg: &Config) -> Result<()> {
    let payload = start_payload(cfg)?;
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let report_every = Duration::from_millis(cfg.status.interval_ms.max(1));
    let mut report = tokio::time::interval(report_every);
    let reporting = cfg.status.interval_ms > 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("ctrl-c received");
                break;
            }
            line = lines.next_line() => {
                match line.context("read stdin")? {
                    Some(line) => payload.handle_line(&line),
                    None => {
                        // stdin closed; keep emulating until ctrl-c
                        tokio::signal::ctrl_c().await.context("wait for ctrl-c")?;
                        break;
                    }
                }
            }
            _ = report.tick(), if reporting => payload.print_status(),
        }
    }

    payload.stop().await
}

async fn exec(cfg: &Config, settle_ms: u64, commands: &[String]) -> Result<()> {
    let cmds = commands
        .iter()
        .map(|c| command::parse(c).with_context(|| format!("command {:?}", c)))
        .collect::<Result<Vec<_>>>()?;

    let payload = start_payload(cfg)?;
    for cmd in cmds {
        payload.run_command(cmd);
        tokio::time::sleep(Duration::from_millis(settle_ms)).await;
    }
    payload.print_status();
    payload.stop().await
}
