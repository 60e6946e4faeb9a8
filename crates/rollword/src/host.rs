#![forbid(unsafe_code)]

//! Mount one widget on a terminal line and run it to completion.
//!
//! The host resolves a [`RunPlan`] from settings and flags, mounts a
//! [`RollingWord`] rendering into a [`TerminalSurface`], and drives it with
//! an [`EventLoop`]. After each settle it pauses, then rolls again until the
//! requested number of rolls has settled or shutdown is requested.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rollword_core::{
    ConfigResolver, DeclaredOptions, EmptyWordsPolicy, ListRegistry, OptionName, ResolverDefaults,
};
use rollword_runtime::{Clock, EventLoop, LoopExit, RollingWord, StartOutcome};

use crate::error::Result;
use crate::terminal::TerminalSurface;

/// Everything needed to run the widget.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub options: DeclaredOptions,
    pub inline: Vec<String>,
    pub lists: ListRegistry,
    pub defaults: ResolverDefaults,
    pub policy: EmptyWordsPolicy,
    /// Number of rolls to settle before exiting.
    pub rolls: u32,
    /// Pause between a settle and the next roll.
    pub pause: Duration,
    /// Fixed RNG seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            options: DeclaredOptions::new(),
            inline: Vec::new(),
            lists: ListRegistry::new(),
            defaults: ResolverDefaults::default(),
            policy: EmptyWordsPolicy::default(),
            rolls: 1,
            pause: Duration::from_millis(500),
            seed: None,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Settled words, in order.
    pub settled: Vec<String>,
    pub exit: LoopExit,
    /// Whether the widget stayed blank for lack of words.
    pub deferred: bool,
}

/// Run `plan` on `event_loop`, rendering into `out`.
pub fn execute<C, W>(plan: &RunPlan, event_loop: &mut EventLoop<C>, out: W) -> Result<RunReport>
where
    C: Clock,
    W: Write,
{
    let rng = match plan.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let mut widget = RollingWord::new(TerminalSurface::new(out))
        .with_rng(rng)
        .lists(Arc::new(plan.lists.clone()))
        .resolver(ConfigResolver::with_defaults(plan.defaults.clone()))
        .empty_words(plan.policy)
        .inline_words(&plan.inline);
    for name in OptionName::ALL {
        widget.set_option(name, plan.options.get(name).map(str::to_string));
    }

    let mut report = RunReport {
        settled: Vec::new(),
        exit: LoopExit::Idle,
        deferred: false,
    };

    let mut outcome = widget.on_mount(event_loop.now())?;
    report.deferred = outcome == StartOutcome::Deferred;
    while outcome == StartOutcome::Started {
        report.exit = event_loop.run_until_idle(&mut [&mut widget]);
        if report.exit == LoopExit::Shutdown {
            break;
        }
        report.settled.push(widget.surface().current().to_string());
        if report.settled.len() >= plan.rolls as usize {
            break;
        }
        if event_loop.pause(plan.pause) {
            widget.on_unmount();
            report.exit = LoopExit::Shutdown;
            break;
        }
        outcome = widget.roll(event_loop.now())?;
    }

    let mut surface = widget.into_surface();
    surface.finish()?;
    tracing::debug!(
        settled = report.settled.len(),
        exit = ?report.exit,
        renders = surface.renders(),
        "host finished"
    );
    Ok(report)
}
