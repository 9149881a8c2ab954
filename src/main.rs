mod engine;
mod logging;
mod model;
mod report;
mod store;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

use crate::engine::{SessionParams, TestSession, thresholds};
use crate::model::{LastCorrect, Response, TestKind};
use crate::report::json::{render_result_json, render_score_json};
use crate::report::text::{render_channels, render_prompt, render_result_text};
use crate::report::channel_summaries;
use crate::store::{JsonLinesSink, JsonStore, ResultSink, StepConfigProvider};

const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "salir"];

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = parse_args(std::env::args_os())?;
    logging::init_logging(config.verbosity);

    match config.mode {
        Mode::Interactive(session) => {
            let mut test = start_session(&session)?;
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            let drive = drive_interactive(&mut test, stdin.lock(), &mut stdout)
                .map_err(|e| e.to_string())?;
            conclude(test, drive, &session, &mut stdout)
        }
        Mode::Replay(session, responses) => {
            let mut test = start_session(&session)?;
            let drive = drive_script(&mut test, &responses);
            conclude(test, drive, &session, &mut std::io::stdout())
        }
        Mode::Score(score) => run_score(&score, &mut std::io::stdout()),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "optopad-runner",
    version,
    about = "Runs and scores the Optopad Color adaptive staircase test."
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a test interactively, one response per line on stdin.
    Run(SessionArgs),
    /// Run a test from a scripted response list.
    Replay {
        #[command(flatten)]
        session: SessionArgs,
        /// Comma separated responses (up, down, left, right, none).
        #[arg(long, value_delimiter = ',', required = true)]
        responses: Vec<String>,
    },
    /// Compute thresholds for given last-correct steps without running a test.
    Score {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        device: String,
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=10))]
        p: u8,
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=10))]
        d: u8,
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=10))]
        t: u8,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
struct SessionArgs {
    /// Test configuration export (.json or .json.gz).
    #[arg(long)]
    store: PathBuf,
    #[arg(long)]
    device: String,
    #[arg(long)]
    patient: String,
    #[arg(long, default_value = "optopad_color")]
    test: String,
    /// JSON-lines file the finished result is appended to.
    #[arg(long, default_value = "results.jsonl")]
    results: PathBuf,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone)]
struct RunConfig {
    verbosity: u8,
    mode: Mode,
}

#[derive(Debug, Clone)]
enum Mode {
    Interactive(SessionConfig),
    Replay(SessionConfig, Vec<Response>),
    Score(ScoreConfig),
}

#[derive(Debug, Clone)]
struct SessionConfig {
    store: PathBuf,
    params: SessionParams,
    results: PathBuf,
    json: bool,
}

#[derive(Debug, Clone)]
struct ScoreConfig {
    store: PathBuf,
    device_id: String,
    last_correct: LastCorrect,
    json: bool,
}

fn parse_args<I, T>(args: I) -> Result<RunConfig, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    let mode = match cli.command {
        Command::Run(session) => Mode::Interactive(session_config(session)?),
        Command::Replay { session, responses } => {
            let parsed = responses
                .iter()
                .filter(|r| !r.trim().is_empty())
                .map(|r| r.parse::<Response>().map_err(|e| e.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            Mode::Replay(session_config(session)?, parsed)
        }
        Command::Score {
            store,
            device,
            p,
            d,
            t,
            json,
        } => Mode::Score(ScoreConfig {
            store,
            device_id: device,
            last_correct: [p, d, t],
            json,
        }),
    };
    Ok(RunConfig {
        verbosity: cli.verbose,
        mode,
    })
}

fn session_config(args: SessionArgs) -> Result<SessionConfig, String> {
    let test_kind = TestKind::parse(&args.test).ok_or_else(|| {
        format!(
            "invalid --test {:?} (use rejilla_amsler|agudeza_visual|optopad_color|optopad_csf)",
            args.test
        )
    })?;
    Ok(SessionConfig {
        store: args.store,
        params: SessionParams {
            patient_id: args.patient,
            device_id: args.device,
            test_kind,
        },
        results: args.results,
        json: args.json,
    })
}

fn start_session(config: &SessionConfig) -> Result<TestSession, String> {
    let store = JsonStore::load(&config.store).map_err(|e| e.to_string())?;
    TestSession::start(&config.params, &store).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drive {
    Finished,
    Abandoned,
}

fn drive_interactive<R: BufRead, W: Write>(
    session: &mut TestSession,
    input: R,
    out: &mut W,
) -> std::io::Result<Drive> {
    let mut lines = input.lines();
    while let Some(view) = session.view() {
        debug!(order = view.order, "presenting step");
        writeln!(out, "{}", render_prompt(&view))?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(Drive::Abandoned);
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&trimmed.to_lowercase().as_str()) {
            return Ok(Drive::Abandoned);
        }
        let response = match trimmed.parse::<Response>() {
            Ok(r) => r,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };
        match session.respond(response) {
            Ok(turn) => debug!(outcome = ?turn.outcome, "response recorded"),
            Err(err) => writeln!(out, "{err}")?,
        }
    }
    Ok(Drive::Finished)
}

fn drive_script(session: &mut TestSession, responses: &[Response]) -> Drive {
    for (i, response) in responses.iter().enumerate() {
        match session.respond(*response) {
            Ok(turn) if turn.finished => {
                let leftover = responses.len() - i - 1;
                if leftover > 0 {
                    warn!(leftover, "test finished before the end of the script");
                }
                return Drive::Finished;
            }
            Ok(turn) => debug!(outcome = ?turn.outcome, "scripted response recorded"),
            Err(err) => {
                warn!(error = %err, "scripted response rejected");
            }
        }
    }
    if session.is_finished() {
        Drive::Finished
    } else {
        warn!(
            responses = responses.len(),
            "script ended before the test finished"
        );
        Drive::Abandoned
    }
}

fn conclude<W: Write>(
    mut session: TestSession,
    drive: Drive,
    config: &SessionConfig,
    out: &mut W,
) -> Result<(), String> {
    if drive == Drive::Abandoned {
        let abandoned = session.abandon();
        debug!(last_correct = ?abandoned.last_correct, "progress discarded");
        writeln!(
            out,
            "Test for patient {} exited without saving after {} responses.",
            abandoned.patient_id, abandoned.responses
        )
        .map_err(|e| e.to_string())?;
        return Ok(());
    }

    let mut sink = JsonLinesSink::new(&config.results);
    let saved = save_result(&mut session, &mut sink);
    let record = session
        .result()
        .ok_or_else(|| "finished session has no result".to_string())?;
    let rendered = if config.json {
        render_result_json(record, session.is_saved()).map_err(|e| e.to_string())?
    } else {
        render_result_text(record, session.is_saved())
    };
    writeln!(out, "{rendered}").map_err(|e| e.to_string())?;
    saved
}

fn save_result<S: ResultSink>(session: &mut TestSession, sink: &mut S) -> Result<(), String> {
    let status = session.save(sink).map_err(|e| e.to_string())?;
    info!(
        ?status,
        config_id = session.config_id(),
        responses = session.responses(),
        "save completed"
    );
    Ok(())
}

fn run_score<W: Write>(config: &ScoreConfig, out: &mut W) -> Result<(), String> {
    let store = JsonStore::load(&config.store).map_err(|e| e.to_string())?;
    let step_config = store
        .load_steps(&config.device_id, TestKind::OptopadColor)
        .map_err(|e| e.to_string())?;
    let values = thresholds(&step_config.steps, config.last_correct);
    let rendered = if config.json {
        render_score_json(&step_config.config_id, config.last_correct, values)
            .map_err(|e| e.to_string())?
    } else {
        format!(
            "Configuration: {}\n{}",
            step_config.config_id,
            render_channels(&channel_summaries(config.last_correct, values))
        )
    };
    writeln!(out, "{rendered}").map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
