//! Timed on/off sequences driving the simulated lamp.
//!
//! A pattern is a fixed list of steps that repeats until its worker is
//! stopped. The stop request is observed at every step, so a running
//! pattern ends no later than the step currently in flight.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::worker::StopSignal;

const STROBE_PERIOD: Duration = Duration::from_millis(100);
const DOT: Duration = Duration::from_millis(200);
const DASH: Duration = Duration::from_millis(600);
const SYMBOL_GAP: Duration = Duration::from_millis(200);
const LETTER_GAP: Duration = Duration::from_millis(400);
const WORD_GAP: Duration = Duration::from_millis(1500);

/// Anything the blink engine can switch on and off.
#[async_trait]
pub trait Lamp: Send + Sync {
    async fn set_lit(&self, lit: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPattern {
    Strobe,
    Sos,
}

impl BlinkPattern {
    pub fn name(&self) -> &'static str {
        match self {
            BlinkPattern::Strobe => "strobe",
            BlinkPattern::Sos => "sos",
        }
    }

    /// One cycle of the pattern.
    pub fn steps(&self) -> Vec<BlinkStep> {
        match self {
            BlinkPattern::Strobe => vec![BlinkStep::lit(STROBE_PERIOD), BlinkStep::dark(STROBE_PERIOD)],
            BlinkPattern::Sos => {
                let mut steps = Vec::with_capacity(21);
                morse_letter(&mut steps, DOT);
                steps.push(BlinkStep::dark(LETTER_GAP));
                morse_letter(&mut steps, DASH);
                steps.push(BlinkStep::dark(LETTER_GAP));
                morse_letter(&mut steps, DOT);
                steps.push(BlinkStep::dark(WORD_GAP));
                steps
            }
        }
    }

    pub fn cycle_duration(&self) -> Duration {
        self.steps().iter().map(|s| s.duration).sum()
    }

    pub fn lit_duration(&self) -> Duration {
        self.steps()
            .iter()
            .filter(|s| s.lit)
            .map(|s| s.duration)
            .sum()
    }
}

fn morse_letter(steps: &mut Vec<BlinkStep>, symbol: Duration) {
    for _ in 0..3 {
        steps.push(BlinkStep::lit(symbol));
        steps.push(BlinkStep::dark(SYMBOL_GAP));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkStep {
    /// Lamp output for the duration of the step. Pure pauses are dark.
    pub lit: bool,
    pub duration: Duration,
}

impl BlinkStep {
    fn lit(duration: Duration) -> Self {
        Self {
            lit: true,
            duration,
        }
    }

    fn dark(duration: Duration) -> Self {
        Self {
            lit: false,
            duration,
        }
    }
}

/// Repeats `pattern` on `lamp` until `stop` fires.
pub async fn run_pattern<L: Lamp + ?Sized>(pattern: BlinkPattern, lamp: &L, stop: &mut StopSignal) {
    let steps = pattern.steps();
    let mut cycles = 0u64;
    let mut lit = None;
    'outer: loop {
        for step in &steps {
            if lit != Some(step.lit) {
                lamp.set_lit(step.lit).await;
                lit = Some(step.lit);
            }
            if !stop.wait(step.duration).await {
                break 'outer;
            }
        }
        cycles += 1;
        debug!("{} pattern completed cycle {}", pattern.name(), cycles);
    }
    debug!("{} pattern stopped after {} cycles", pattern.name(), cycles);
}
