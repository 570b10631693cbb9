mod display;

use std::collections::{HashMap, HashSet};
use std::io::{stdout, BufWriter, Write};
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use arena_brawler::compute::{init_state, init_state_with, reset, tick};
use arena_brawler::config::{load_tuning, Tuning, Variant};
use arena_brawler::entities::{GameState, GameStatus, Stage};
use arena_brawler::input::{Action, InputState};
use arena_brawler::snapshot::RenderSnapshot;

/// Simulation step.  Physics constants are tuned for small steps.
const STEP: f32 = 1.0 / 60.0;
const FRAME: Duration = Duration::from_millis(16);
/// Upper bound on catch-up steps after a stall.
const MAX_STEPS_PER_FRAME: u32 = 5;

// ── Held-key input model ──────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈130 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn bindings(action: Action) -> &'static [KeyCode] {
    match action {
        Action::MoveLeft => &[KeyCode::Char('a'), KeyCode::Left],
        Action::MoveRight => &[KeyCode::Char('d'), KeyCode::Right],
        Action::MoveUp => &[KeyCode::Char('w'), KeyCode::Up],
        Action::MoveDown => &[KeyCode::Char('s'), KeyCode::Down],
        Action::Jump => &[KeyCode::Char('w'), KeyCode::Up],
        Action::Melee => &[KeyCode::Char('j')],
        Action::Ray => &[KeyCode::Char('k')],
        Action::Cone => &[KeyCode::Char('l')],
        Action::Block => &[KeyCode::Char('b')],
        Action::ToggleFlight => &[KeyCode::Char('f')],
        Action::Dash => &[KeyCode::Char(' ')],
    }
}

const ACTIONS: [Action; 11] = [
    Action::MoveLeft,
    Action::MoveRight,
    Action::MoveUp,
    Action::MoveDown,
    Action::Jump,
    Action::Melee,
    Action::Ray,
    Action::Cone,
    Action::Block,
    Action::ToggleFlight,
    Action::Dash,
];

/// Build this frame's snapshot: held keys from the hold window, edges from
/// the presses that arrived since the last frame.
fn snapshot_input(key_frame: &HashMap<KeyCode, u64>, fresh: &HashSet<KeyCode>, frame: u64) -> InputState {
    let mut input = InputState::new();
    for action in ACTIONS {
        let keys = bindings(action);
        if keys.iter().any(|k| fresh.contains(k)) {
            input.press(action);
        } else if keys.iter().any(|k| is_held(key_frame, k, frame)) {
            input.hold(action);
        }
    }
    input
}

/// Letters arrive upper-case with Shift or Caps Lock; bind on lower case.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Variant),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "▓  ARENA  BRAWLER  ▓";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select stage:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Street", Color::Green,  "Ledges, gravity, jump and fight"),
        ("2", "Arena ", Color::Yellow, "Closed box, start airborne"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("  {}", desc)))?;
    }

    let controls: &[&str] = &[
        "A D : Move    W : Jump / Up    S : Down",
        "J : Punch combo    K : Ray    L : Cone push",
        "B : Block    F : Toggle flight    SPACE : Dash",
    ];
    for (i, line) in controls.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 3 + i as u16))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*line))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Variant::Platformer)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Variant::Arena)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            // Event thread is gone; nothing more will arrive.
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Keys still "fresh" (within
/// `HOLD_WINDOW` frames) count as held; keys whose press arrived this frame
/// also count as pressed.  Terminals with keyboard enhancement report
/// releases and drop keys immediately; classic terminals let them expire.
///
/// The simulation runs at a fixed `STEP`, as many steps as real time calls
/// for.  Press edges are delivered to the first step that runs after them.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut accumulator: f32 = 0.0;
    let mut last = Instant::now();
    // Presses not yet seen by a simulation step.
    let mut fresh: HashSet<KeyCode> = HashSet::new();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            let code = normalize(code);
            match kind {
                KeyEventKind::Press => {
                    if !is_held(&key_frame, &code, frame) {
                        fresh.insert(code);
                    }
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') if state.status == GameStatus::GameOver => {
                            *state = reset(state);
                            accumulator = 0.0;
                        }
                        KeyCode::Char('m') if state.status == GameStatus::GameOver => {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Fixed-step simulation ─────────────────────────────────────────────
        let now = Instant::now();
        accumulator += now.duration_since(last).as_secs_f32();
        last = now;

        let mut input = snapshot_input(&key_frame, &fresh, frame);
        let mut steps = 0;
        while accumulator >= STEP && steps < MAX_STEPS_PER_FRAME {
            *state = tick(state, &input, STEP, &mut rng);
            input.clear_pressed();
            accumulator -= STEP;
            steps += 1;
        }
        if steps > 0 {
            fresh.clear();
        }
        if steps == MAX_STEPS_PER_FRAME {
            accumulator = 0.0;
        }

        display::render(out, &RenderSnapshot::capture(state))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Log to a file in the temp dir (the terminal is in raw alternate-screen
/// mode).  Nothing is set up unless `RUST_LOG` is present.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let path = std::env::temp_dir().join("arena_brawler.log");
    match std::fs::File::create(&path) {
        Ok(file) => {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("arena_brawler: cannot open {}: {}", path.display(), e),
    }
}

/// `--tuning <file.ron>` overrides the built-in tables for both variants.
fn tuning_override() -> Result<Option<Tuning>, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(None),
        [flag, path] if flag == "--tuning" => load_tuning(path)
            .map(Some)
            .map_err(|e| format!("{}: {}", path, e)),
        [flag] if flag == "--tuning" => Err("--tuning needs a file path".to_string()),
        [other, ..] => Err(format!("unknown argument {}", other)),
    }
}

fn main() -> std::io::Result<()> {
    init_logging();

    let tuning = match tuning_override() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("arena_brawler: {}", e);
            std::process::exit(2);
        }
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx, tuning);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    tuning: Option<Tuning>,
) -> std::io::Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start(variant) => {
                log::info!("starting {:?}", variant);
                let mut state = match &tuning {
                    Some(t) => init_state_with(
                        variant,
                        Rc::new(t.clone()),
                        Rc::new(Stage::for_variant(variant)),
                    ),
                    None => init_state(variant),
                };
                if game_loop(out, &mut state, rx)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
