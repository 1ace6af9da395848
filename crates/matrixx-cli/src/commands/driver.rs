//! Real-time host loop for interactive sessions.
//!
//! Reads commands from stdin and sleeps until the controller's next
//! wake-up, whichever comes first. Each turn feeds the real elapsed time
//! into `SessionController::advance` and prints the drained events.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use matrixx_core::format::format_file_size;
use matrixx_core::{Event, FileCandidate, Lane, Role, Route, SessionController};
use tokio::io::{AsyncBufReadExt, BufReader};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const HELP: &str = "\
commands:
  <text>            send a message (chat) or answer and submit (interview)
  /tool <id>        switch tool: general, resume, interview, cover-letter, portfolio
  /open <id>        open a recent chat
  /new              start a new chat
  /attach <path>    stage a local file
  /detach <id>      remove a staged file
  /interview        go to interview practice
  /chat             go back to chat
  /draft <text>     set the interview answer without submitting
  /next /prev       move between questions
  /goto <n>         jump to question n (1-based)
  /end              end the interview
  /voice /record    toggle voice mode and recording
  /advance <ms>     fast-forward virtual time
  /status           show current state
  /quit             exit";

enum Flow {
    Continue,
    Quit,
}

/// Run `ctl` until the user quits or stdin closes.
pub fn run_interactive(ctl: SessionController, json: bool) -> CliResult<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    rt.block_on(drive(ctl, json))
}

async fn drive(mut ctl: SessionController, json: bool) -> CliResult<()> {
    let mut printer = Printer::new(json);
    let mut clock = RealClock::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !json {
        println!("type /help for commands");
    }
    printer.flush(&mut ctl)?;

    loop {
        let wait = ctl.until_next_wakeup().map(Duration::from_millis);
        tokio::select! {
            line = lines.next_line() => {
                clock.catch_up(&mut ctl);
                let Some(line) = line? else { break };
                match handle_line(&mut ctl, line.trim()) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            _ = sleep_for(wait) => clock.catch_up(&mut ctl),
        }
        printer.flush(&mut ctl)?;
    }

    ctl.shutdown();
    printer.flush(&mut ctl)?;
    Ok(())
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}

/// Converts wall-clock time into whole-millisecond advances without drift.
struct RealClock {
    last: Instant,
}

impl RealClock {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    fn catch_up(&mut self, ctl: &mut SessionController) {
        let elapsed = self.last.elapsed().as_millis() as u64;
        if elapsed == 0 {
            return;
        }
        self.last += Duration::from_millis(elapsed);
        let fired = ctl.advance(elapsed);
        tracing::trace!(elapsed_ms = elapsed, fired, "caught up");
    }
}

fn handle_line(ctl: &mut SessionController, line: &str) -> CliResult<Flow> {
    let (command, arg) = match line.strip_prefix('/') {
        Some(rest) => {
            let (cmd, arg) = rest.split_once(' ').unwrap_or((rest, ""));
            (Some(cmd), arg.trim())
        }
        None => (None, line),
    };

    match (command, ctl.route()) {
        (None, _) if line.is_empty() => {}
        (None, Route::Chat) => {
            if !ctl.send_message(line) {
                eprintln!("nothing to send");
            }
        }
        (None, Route::Interview) => {
            ctl.set_answer(line);
            ctl.submit_answer();
        }
        (Some("quit" | "exit"), _) => return Ok(Flow::Quit),
        (Some("help"), _) => println!("{HELP}"),
        (Some("advance"), _) => {
            let ms: u64 = arg.parse().map_err(|_| format!("not a duration: {arg}"))?;
            ctl.advance(ms);
        }
        (Some("status"), _) => print_status(ctl),
        (Some("chat"), _) => {
            ctl.navigate(Route::Chat);
        }
        (Some("interview"), _) => {
            ctl.navigate(Route::Interview);
        }
        (Some("tool"), _) => {
            ctl.select_tool(arg.parse()?);
        }
        (Some("open"), _) => {
            ctl.select_chat(arg);
        }
        (Some("new"), _) => {
            ctl.new_chat();
        }
        (Some("attach"), _) => {
            let candidate = file_candidate(Path::new(arg))?;
            let name = candidate.name.clone();
            if ctl.upload_files(vec![candidate]).is_empty() {
                eprintln!("{name} not staged (over the size limit, or not on the chat screen)");
            }
        }
        (Some("detach"), _) => {
            if !ctl.remove_attachment(arg) {
                eprintln!("no staged file {arg}");
            }
        }
        (Some("draft"), _) => ctl.set_answer(arg),
        (Some("next"), _) => {
            ctl.next_question();
        }
        (Some("prev"), _) => {
            ctl.previous_question();
        }
        (Some("goto"), _) => {
            let n: usize = arg.parse().map_err(|_| format!("not a question number: {arg}"))?;
            if n == 0 || !ctl.select_question(n - 1) {
                eprintln!("no question {n}");
            }
        }
        (Some("end"), _) => {
            ctl.end_interview();
        }
        (Some("voice"), _) => {
            ctl.toggle_voice_mode();
        }
        (Some("record"), _) => {
            ctl.toggle_recording();
        }
        (Some(other), _) => eprintln!("unknown command /{other}, try /help"),
    }
    Ok(Flow::Continue)
}

fn file_candidate(path: &Path) -> CliResult<FileCandidate> {
    let meta = std::fs::metadata(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("not a file: {}", path.display()))?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    };
    Ok(FileCandidate::new(name, mime, meta.len()))
}

fn print_status(ctl: &SessionController) {
    println!("route: {}", ctl.route());
    match ctl.interview() {
        Some(iv) => {
            println!(
                "question {}/{}  {}  {:.0}%  answered {}",
                iv.index() + 1,
                iv.question_count(),
                iv.time_display(),
                iv.progress_pct(),
                iv.answered_count()
            );
            if iv.voice_mode() {
                println!("voice mode{}", if iv.is_recording() { ", recording" } else { "" });
            }
        }
        None => {
            let chat = ctl.chat();
            println!(
                "tool: {}  messages: {}  pending replies: {}",
                chat.tool(),
                chat.messages().len(),
                chat.pending_replies()
            );
            for a in chat.pending_attachments() {
                println!("  staged {} ({}) id={}", a.name, format_file_size(a.size_bytes), a.id);
            }
        }
    }
}

/// Renders drained events, as JSON lines or as a typewriter transcript.
struct Printer {
    json: bool,
    /// Bytes of each lane's reveal already written to the terminal.
    typed: [usize; 2],
}

impl Printer {
    fn new(json: bool) -> Self {
        Self { json, typed: [0; 2] }
    }

    fn flush(&mut self, ctl: &mut SessionController) -> CliResult<()> {
        for event in ctl.drain_events() {
            if self.json {
                println!("{}", serde_json::to_string(&event)?);
            } else {
                self.render(ctl, &event);
            }
        }
        std::io::stdout().flush()?;
        Ok(())
    }

    fn render(&mut self, ctl: &SessionController, event: &Event) {
        match event {
            Event::ToolSelected { tool, .. } => println!("── {} ──", tool.label()),
            Event::ChatLoaded { .. } => {
                for m in ctl.chat().messages() {
                    println!("{}: {}", speaker(m.role()), m.content());
                }
            }
            Event::ChatCleared { .. } => println!("── new chat ──"),
            Event::MessageAppended {
                role: Role::System,
                revealing: true,
                ..
            } => print!("{}: ", speaker(Role::System)),
            Event::RevealAdvanced { lane, revealed, .. } => {
                let typed = &mut self.typed[lane_slot(*lane)];
                if let Some(rest) = revealed.get(*typed..) {
                    print!("{rest}");
                }
                *typed = revealed.len();
            }
            Event::RevealCompleted { lane, .. } | Event::RevealSuperseded { lane, .. } => {
                self.typed[lane_slot(*lane)] = 0;
                println!();
            }
            Event::AttachmentStaged {
                name, size_bytes, ..
            } => println!("staged {name} ({})", format_file_size(*size_bytes)),
            Event::QuestionChanged {
                index,
                time_limit_secs,
                ..
            } => {
                let total = ctl.interview().map(|iv| iv.question_count()).unwrap_or(0);
                println!(
                    "\nQuestion {}/{}  ({}s)",
                    index + 1,
                    total,
                    time_limit_secs
                );
                self.typed[lane_slot(Lane::Question)] = 0;
            }
            Event::CountdownTicked {
                remaining_secs,
                display,
                ..
            } if *remaining_secs % 30 == 0 || *remaining_secs <= 10 => {
                println!("[{display}]")
            }
            Event::CountdownExpired { .. } => println!("time is up"),
            Event::InterviewCompleted {
                answered, total, ..
            } => println!("interview complete: {answered}/{total} answered"),
            Event::InterviewEnded { .. } => println!("interview ended"),
            Event::Navigated { to, .. } => println!("→ {to}"),
            _ => {}
        }
    }
}

fn lane_slot(lane: Lane) -> usize {
    match lane {
        Lane::Transcript => 0,
        Lane::Question => 1,
    }
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::System => "matrixx",
    }
}
