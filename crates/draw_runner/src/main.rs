use std::io::Read;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use draw_commands::{DrawingTarget, RasterCanvas};
use draw_runner::config::{Mode, RunnerArgs, RunnerConfig};
use draw_runner::llm_client::{LlmClient, OllamaClient};
use draw_runner::remote::RemoteCanvas;
use draw_runner::session::{DrawSession, RunnerError};
use log::info;

#[derive(Debug, Parser)]
#[command(name = "draw_runner", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Interactive loop: plain-language requests or literal commands.
    Repl {
        #[command(flatten)]
        args: RunnerArgs,
    },
    /// One request to the model; prints the outcome as JSON.
    Prompt {
        #[arg(long)]
        text: String,
        #[command(flatten)]
        args: RunnerArgs,
    },
    /// Dispatch the commands already present in a file (or `-` for stdin).
    Run {
        #[arg(long, default_value = "-")]
        input: String,
        #[command(flatten)]
        args: RunnerArgs,
    },
    /// Drawing service backed by a raster canvas.
    Serve {
        #[arg(long, default_value_t = 8000)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "EXPORT_DIR", default_value = ".")]
        export_dir: PathBuf,
        #[command(flatten)]
        args: RunnerArgs,
    },
}

enum Action {
    Repl,
    Prompt(String),
    Run(String),
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let code = match cli.cmd {
        Cmd::Repl { args } => start(args.into(), Action::Repl),
        Cmd::Prompt { text, args } => start(args.into(), Action::Prompt(text)),
        Cmd::Run { input, args } => match read_input(&input) {
            Ok(text) => start(args.into(), Action::Run(text)),
            Err(e) => {
                eprintln!("failed to read {input}: {e}");
                2
            }
        },
        Cmd::Serve {
            port,
            host,
            export_dir,
            args,
        } => serve(&host, port, export_dir, args.into()),
    };
    std::process::exit(code);
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
    }
}

fn start(cfg: RunnerConfig, action: Action) -> i32 {
    let llm = match OllamaClient::new(&cfg.ollama_url, &cfg.model, cfg.llm_timeout) {
        Ok(c) => LlmClient::Ollama(c),
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    let result = match cfg.mode {
        Mode::Local => RasterCanvas::new(cfg.canvas.clone())
            .map_err(RunnerError::from)
            .and_then(|canvas| drive(DrawSession::new(llm, canvas, cfg), action)),
        Mode::Remote => RemoteCanvas::new(&cfg.draw_url, cfg.draw_timeout)
            .map_err(RunnerError::from)
            .and_then(|remote| drive(DrawSession::new(llm, remote, cfg), action)),
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

fn drive<T: DrawingTarget>(mut session: DrawSession<T>, action: Action) -> Result<(), RunnerError> {
    match action {
        Action::Repl => {
            if let Err(e) = session.check_connections() {
                let cfg = session.config();
                eprintln!("{e}");
                eprintln!("make sure the model server is running at {}", cfg.ollama_url);
                if cfg.mode == Mode::Remote {
                    eprintln!("and the drawing service is running at {}", cfg.draw_url);
                }
                return Err(e);
            }
            let stdin = std::io::stdin();
            draw_runner::repl::run_interactive(&mut session, stdin.lock(), std::io::stdout())?;
        }
        Action::Prompt(text) => {
            session.check_connections()?;
            let outcome = session.process_prompt(&text)?;
            println!("{}", to_json(&outcome));
        }
        Action::Run(text) => {
            let summary = session.process_text(&text);
            println!("{}", to_json(&summary));
        }
    }
    if let Some(outcome) = session.finish()? {
        info!("[main] exported {outcome:?}");
    }
    Ok(())
}

fn to_json<S: serde::Serialize>(value: &S) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

fn serve(host: &str, port: u16, export_dir: PathBuf, cfg: RunnerConfig) -> i32 {
    let ip: IpAddr = host
        .parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
    let addr = SocketAddr::new(ip, port);
    let canvas = match RasterCanvas::new(cfg.canvas) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("runtime error: {e}");
            return 1;
        }
    };
    let state = draw_runner::server::AppState::new(canvas, export_dir);
    match rt.block_on(draw_runner::server::serve(addr, state)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("server error: {e}");
            1
        }
    }
}
