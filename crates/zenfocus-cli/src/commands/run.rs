use std::str::FromStr;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use zenfocus_core::{Config, Event, FocusTimer, FocusView, TimerMode, TokioScheduler};

#[derive(Args)]
pub struct RunArgs {
    /// Mode to begin in (focus, short-break, long-break)
    #[arg(long, default_value = "focus")]
    pub mode: TimerMode,
    /// What you are focusing on
    #[arg(long)]
    pub goal: Option<String>,
    /// Start the countdown immediately
    #[arg(long)]
    pub autostart: bool,
    /// Print events as JSON lines instead of status text
    #[arg(long)]
    pub json: bool,
}

/// A line typed during a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Start,
    Pause,
    Toggle,
    Reset,
    Mode(TimerMode),
    Goal(String),
    Status,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "" | "toggle" | "t" => Ok(SessionCommand::Toggle),
            "start" | "s" => Ok(SessionCommand::Start),
            "pause" | "p" => Ok(SessionCommand::Pause),
            "reset" | "r" => Ok(SessionCommand::Reset),
            "mode" | "m" => rest
                .parse::<TimerMode>()
                .map(SessionCommand::Mode)
                .map_err(|e| e.to_string()),
            "goal" | "g" => {
                if rest.is_empty() {
                    Err("goal needs some text".into())
                } else {
                    Ok(SessionCommand::Goal(rest.to_string()))
                }
            }
            "status" | "st" => Ok(SessionCommand::Status),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

const HELP: &str = "commands: start | pause | toggle (enter) | reset | mode <focus|short-break|long-break> | goal <text> | status | quit";

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(args))
}

async fn session(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let (scheduler, mut ticks) = TokioScheduler::new();
    let goal = args.goal.unwrap_or_else(|| config.focus.default_goal.clone());
    let timer = FocusTimer::new(config.timer_settings(), scheduler).with_goal(goal);
    let mut view = FocusView::new(timer);
    let out = Output { json: args.json };

    if args.mode != TimerMode::Focus {
        view.switch_mode(args.mode);
    }
    if args.autostart {
        if let Some(event) = view.toggle() {
            out.event(&view, &event);
        }
    }
    out.status(&view);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => apply(&mut view, &out, command),
                    Err(message) => eprintln!("{message}"),
                }
            }
            Some(handle) = ticks.recv() => {
                match view.tick(handle) {
                    Some(event) => {
                        out.event(&view, &event);
                        out.status(&view);
                    }
                    None if view.is_running() => out.status(&view),
                    None => {}
                }
            }
        }
    }

    tracing::debug!(
        completed_sessions = view.timer().completed_sessions(),
        "session ended"
    );
    Ok(())
}

fn apply(view: &mut FocusView<TokioScheduler>, out: &Output, command: SessionCommand) {
    let event = match command {
        SessionCommand::Start => view.timer_mut().start(),
        SessionCommand::Pause => view.timer_mut().pause(),
        SessionCommand::Toggle => view.toggle(),
        SessionCommand::Reset => Some(view.reset()),
        SessionCommand::Mode(mode) => Some(view.switch_mode(mode)),
        SessionCommand::Goal(goal) => Some(view.edit_goal(goal)),
        SessionCommand::Status => {
            out.status(view);
            return;
        }
        SessionCommand::Help => {
            println!("{HELP}");
            return;
        }
        SessionCommand::Quit => return,
    };
    match event {
        Some(event) => {
            out.event(view, &event);
            out.status(view);
        }
        None => out.status(view),
    }
}

struct Output {
    json: bool,
}

impl Output {
    fn status(&self, view: &FocusView<TokioScheduler>) {
        if self.json {
            match serde_json::to_string(&view.snapshot()) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("error: {e}"),
            }
        } else {
            let marker = if view.is_running() { "\u{25b6}" } else { "\u{23f8}" };
            println!("{marker} {}", view.status_line());
        }
    }

    fn event(&self, view: &FocusView<TokioScheduler>, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("error: {e}"),
            }
            return;
        }
        if let Event::SessionCompleted {
            mode,
            completed_sessions,
            next_mode,
            ..
        } = event
        {
            println!(
                "{}",
                completion_notice(*mode, *completed_sessions, view.focused_minutes(), *next_mode)
            );
        }
    }
}

fn completion_notice(
    finished: TimerMode,
    completed_sessions: u32,
    focused_minutes: u64,
    next: TimerMode,
) -> String {
    let hint = if next.is_break() {
        "step away from the screen"
    } else {
        "back to it"
    };
    format!(
        "{} finished ({} sessions, {} min focused). Up next: {}, {}",
        finished.label(),
        completed_sessions,
        focused_minutes,
        next.label(),
        hint
    )
}
