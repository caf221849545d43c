use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use tka::app::{App, LogBusyIndicator};
use tka::config;
use tka::context::{AppPaths, SOCKET_PATH};
use tka::events::AppEvent;
use tka::sys::runtime;

#[derive(Parser, Debug)]
#[command(name = "tka", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Data directory holding the current sequence and the dictionary
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Unix socket for line commands
    #[arg(short = 's', long, default_value = SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Send one command line to a running instance (e.g. `swap`, `select 2`)
    Send { line: Vec<String> },
    /// List the dictionary with the level of every word
    Dictionary,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(Commands::Send { line }) = &cli.command {
        return send_command(&cli.socket, &line.join(" "));
    }

    let settings = config::load_or_default();
    let paths = AppPaths::resolve(&settings, cli.data_dir.clone())?.with_socket(&cli.socket);
    let mut app = App::new(paths.clone(), settings);

    if let Some(Commands::Dictionary) = cli.command {
        for entry in app.all_sequences() {
            println!("{}\t{}\t{}", entry.word, entry.level, entry.thumbnails.len());
        }
        return Ok(());
    }

    app.set_busy_indicator(Box::new(LogBusyIndicator));
    let _notices = app
        .signals
        .notices
        .subscribe(|notice| eprintln!("{}: {}", notice.title, notice.message));

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx.clone(), &paths);

    log::info!("Serving {} on {}", paths.data_root.display(), paths.socket.display());
    while let Ok(event) = rx.recv_blocking() {
        if matches!(event, AppEvent::Quit) {
            break;
        }
        app.handle(event);
    }
    Ok(())
}

fn send_command(socket: &Path, cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to tka at {}: {}. Is tka running?",
            socket.display(),
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    stream.shutdown(std::net::Shutdown::Write)?;

    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply)?;
    if let Some(error) = reply.trim().strip_prefix("error: ") {
        anyhow::bail!("{}", error);
    }
    Ok(())
}
