use crate::reports;
use clap::Args;
use fastrand::Rng;
use ledgerforge::api::Trainer;
use ledgerforge::catalog::Catalog;
use ledgerforge::config::Config;
use ledgerforge::engine::validator::{self, Verdict};
use ledgerforge::engine::{PlacementOutcome, Session, TimerEvent};
use ledgerforge::error::{LedgerError, LfResult};
use ledgerforge::report::{Reporter, SubmissionStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    #[command(flatten)]
    pub config: Config,

    /// Level number (1-based)
    #[arg(short, long)]
    pub level: usize,

    #[arg(short, long, default_value = "Autoplay")]
    pub name: String,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Chance that the simulated learner drags a wrong label
    #[arg(long, default_value_t = 0.15)]
    pub mistake_rate: f64,

    /// Virtual time between learner actions
    #[arg(long, default_value_t = 700)]
    pub step_ms: u64,

    #[arg(long, default_value_t = 5_000)]
    pub max_steps: usize,
}

pub fn run(args: PlayArgs, catalog: Catalog, config: Config) -> LfResult<()> {
    if args.level == 0 || args.level > catalog.len() {
        return Err(LedgerError::Catalog(format!(
            "level must be between 1 and {}",
            catalog.len()
        )));
    }

    let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut rng = Rng::with_seed(seed);
    let reporter = Arc::new(Reporter::new(config.report.clone())?);
    let mut trainer = Trainer::new(catalog, config, &args.name)?.with_seed(seed);

    let step = Duration::from_millis(args.step_ms);
    let mut clock = Duration::ZERO;
    let title = {
        let session = trainer.start_level(args.level - 1, clock)?;
        session.plan().title.clone()
    };
    println!("\n🎮 Playing level {}: {} (seed {})", args.level, title, seed);

    let mut completion = None;
    for _ in 0..args.max_steps {
        clock += step;
        let polled = trainer.poll(clock);
        for event in &polled.events {
            print_event(clock, event);
        }
        if polled.completion.is_some() {
            completion = polled.completion;
            break;
        }

        let Some(session) = trainer.session_mut() else {
            break;
        };
        if session.question_ready() {
            session.next_question(clock);
            println!("[{:>6}ms] ➡️  next question", clock.as_millis());
            continue;
        }

        match pick_move(session, &mut rng, args.mistake_rate) {
            Some((slot, token)) => {
                let outcome = session.attempt_place(&slot, &token, clock);
                print_outcome(clock, &slot, &outcome);
            }
            None if session.has_pending_timers() => {}
            None => {
                warn!("No playable move left; stopping");
                break;
            }
        }
    }

    let Some(token) = completion else {
        println!("⚠️  Level not completed within {} steps", args.max_steps);
        if let Some(session) = trainer.session() {
            reports::print_session_summary(&title, &session.view(), None, None);
        }
        return Ok(());
    };

    let elapsed = token.elapsed_secs;
    let status = if reporter.is_enabled() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let learner = trainer.learner().to_string();
        let receipt = runtime.block_on(async {
            reporter
                .dispatch(learner, token)
                .await
                .map_err(|e| LedgerError::Transport(e.to_string()))
        })?;
        trainer.record_submission(receipt);
        receipt.status
    } else {
        SubmissionStatus::NotAttempted
    };

    if let Some(session) = trainer.session() {
        reports::print_session_summary(&title, &session.view(), Some(elapsed), Some(status));
    }
    Ok(())
}

/// Chooses the simulated learner's next drag: (slot id, token id).
fn pick_move(session: &Session, rng: &mut Rng, mistake_rate: f64) -> Option<(String, String)> {
    let mut open = session.open_slots();
    rng.shuffle(&mut open);
    let pool = session.pool();

    for slot in open {
        if rng.f64() < mistake_rate {
            if let Some(t) = pool.iter().find(|t| !slot.accepts(&t.label)) {
                return Some((slot.id.clone(), t.id.clone()));
            }
        }
        let fitting = pool.iter().find(|t| {
            validator::judge(&session.plan().slots, session.placements(), slot, &t.label)
                == Verdict::Accept
        });
        if let Some(t) = fitting {
            return Some((slot.id.clone(), t.id.clone()));
        }
    }
    None
}

fn print_outcome(clock: Duration, slot: &str, outcome: &PlacementOutcome) {
    let ms = clock.as_millis();
    match outcome {
        PlacementOutcome::Accepted {
            label,
            points,
            excess: false,
        } => println!("[{:>6}ms] ✅ {} -> {} (+{})", ms, label, slot, points),
        PlacementOutcome::Accepted {
            label, excess: true, ..
        } => println!("[{:>6}ms] ♻️  {} -> {} (excess, +0)", ms, label, slot),
        PlacementOutcome::Rejected { reason, clones } => {
            println!("[{:>6}ms] ❌ {} rejected: {} (+{} clones)", ms, slot, reason, clones)
        }
        PlacementOutcome::Ignored(reason) => println!("[{:>6}ms] ·  {} ignored: {}", ms, slot, reason),
    }
}

fn print_event(clock: Duration, event: &TimerEvent) {
    let ms = clock.as_millis();
    match event {
        TimerEvent::WrongReverted { slot } => println!("[{:>6}ms]    {} back to neutral", ms, slot),
        TimerEvent::ExcessCleared { slot } => println!("[{:>6}ms]    {} cleared (excess)", ms, slot),
        TimerEvent::SettleStarted => println!("[{:>6}ms] ⏳ settling", ms),
        TimerEvent::Completed => println!("[{:>6}ms] 🏆 level complete", ms),
    }
}
