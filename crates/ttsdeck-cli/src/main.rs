//! Terminal front end - the composition root.
//!
//! This is the only place where the speech adapter is wired into the
//! panel. The interactive loop `select!`s between prompt input and
//! adapter lifecycle messages and applies both to the session
//! serially, so no two transitions ever race.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use ttsdeck_core::{
    SessionEvent, SpeechParams, SpeechSynthesizerPort, StatusLevel, VoiceCatalogPort,
};
use ttsdeck_gui::{ControlFlags, PanelDeps, SessionOps, sample_text};
use ttsdeck_speech::{EngineError, ProcessSynthesizer, SpeechEngine};

use crate::commands::{ReplCommand, parse};

/// Convert text to speech from your terminal.
#[derive(Debug, Parser)]
#[command(name = "ttsdeck", version, about)]
struct Cli {
    /// Explicit speech engine binary (default: probe PATH for
    /// espeak-ng, espeak, say).
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Initial rate multiplier.
    #[arg(long, default_value_t = 1.0)]
    rate: f32,

    /// Initial pitch multiplier.
    #[arg(long, default_value_t = 1.0)]
    pitch: f32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let engine = match cli.engine {
        Some(bin) => {
            tracing::info!(bin = %bin.display(), "Using explicit speech engine");
            Ok(SpeechEngine::from_path(bin))
        }
        None => SpeechEngine::discover(),
    };

    // A host without a speech engine gets no interactive controls,
    // just the capability-unavailable report.
    let engine = match engine {
        Ok(engine) => engine,
        Err(e @ EngineError::NotFound) => {
            render_status(&format!("Text-to-speech is not available: {e}"), StatusLevel::Error);
            render_flags(ControlFlags::disabled());
            return Ok(());
        }
    };

    let (synth, mut lifecycle) = ProcessSynthesizer::new(engine);
    let synth = Arc::new(synth);
    let (deps, mut events) = PanelDeps::initialize(
        Some(Arc::clone(&synth) as Arc<dyn SpeechSynthesizerPort>),
        synth as Arc<dyn VoiceCatalogPort>,
    )?;
    let ops = SessionOps::new(&deps);

    ops.refresh_voices().await;
    let mut params = SpeechParams::new(cli.rate, cli.pitch);

    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match parse(&line) {
                    None => {}
                    Some(Err(e)) => println!("{e}"),
                    Some(Ok(ReplCommand::Quit)) => break,
                    Some(Ok(command)) => dispatch(&ops, command, &mut params).await,
                }
            }
            Some(event) = lifecycle.recv() => {
                ops.apply_utterance_event(&event).await;
            }
            Some(event) = events.recv() => {
                render(&event);
            }
        }
    }

    // Kill any engine process still speaking.
    ops.stop().await;
    Ok(())
}

async fn dispatch(ops: &SessionOps<'_>, command: ReplCommand, params: &mut SpeechParams) {
    match command {
        ReplCommand::Speak(text) => {
            ops.input_changed(&text).await;
            // Validation feedback arrives through the status events.
            let _ = ops.speak(&text, *params).await;
        }
        ReplCommand::Pause => {
            ops.pause().await;
        }
        ReplCommand::Resume => {
            ops.resume().await;
        }
        ReplCommand::Stop => {
            ops.stop().await;
        }
        ReplCommand::Voices => {
            ops.refresh_voices().await;
        }
        ReplCommand::Voice(index) => {
            ops.select_voice(index).await;
            match index {
                Some(i) => println!("voice #{} selected", i + 1),
                None => println!("using the default voice"),
            }
        }
        ReplCommand::Rate(rate) => {
            *params = SpeechParams::new(rate, params.pitch);
            println!("rate {:.2}x", params.rate);
        }
        ReplCommand::Pitch(pitch) => {
            *params = SpeechParams::new(params.rate, pitch);
            println!("pitch {:.2}x", params.pitch);
        }
        ReplCommand::Count(text) => {
            ops.input_changed(&text).await;
        }
        ReplCommand::Sample(index) => match sample_text(index) {
            Some(text) => {
                ops.input_changed(text).await;
                let _ = ops.speak(text, *params).await;
            }
            None => println!("no such sample (1-4)"),
        },
        ReplCommand::Help => print_help(),
        // Quit is handled by the caller.
        ReplCommand::Quit => {}
    }
}

fn render(event: &SessionEvent) {
    match event {
        SessionEvent::StateChanged { previous, current } => {
            println!("state: {previous:?} -> {current:?}");
            render_flags(ControlFlags::for_state(*current));
        }
        SessionEvent::Status { text, level } => render_status(text, *level),
        SessionEvent::VoicesChanged { voices } => {
            if voices.is_empty() {
                println!("no voices enumerated yet");
            } else {
                for (i, voice) in voices.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, voice.label());
                }
            }
        }
        SessionEvent::CharCount { count, tier } => {
            println!("chars: {count} ({tier:?})");
        }
    }
}

fn render_status(text: &str, level: StatusLevel) {
    let tag = match level {
        StatusLevel::Neutral => "info",
        StatusLevel::Speaking => "speaking",
        StatusLevel::Paused => "paused",
        StatusLevel::Success => "success",
        StatusLevel::Error => "error",
    };
    println!("[{tag}] {text}");
}

fn render_flags(flags: ControlFlags) {
    let mark = |enabled: bool, name: &str| if enabled { name.to_string() } else { format!("({name})") };
    println!(
        "controls: {} {} {} {}",
        mark(flags.can_speak, "speak"),
        mark(flags.can_pause, "pause"),
        mark(flags.can_resume, "resume"),
        mark(flags.can_stop, "stop"),
    );
}

fn print_help() {
    println!("commands:");
    println!("  speak <text>       convert text to speech (alias: s)");
    println!("  pause | resume     suspend / continue playback (aliases: p, r)");
    println!("  stop               cancel playback");
    println!("  voices             list available voices");
    println!("  voice <n|default>  choose a voice");
    println!("  rate <x>           rate multiplier, 0.5-2.0");
    println!("  pitch <x>          pitch multiplier, 0.5-2.0");
    println!("  sample <1-4>       speak a canned sample text");
    println!("  count <text>       character-count feedback for text");
    println!("  quit               leave (alias: q)");
}
