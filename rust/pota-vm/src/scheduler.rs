//! Cooperative round-robin scheduler.
//!
//! The [`Interpreter`] owns the program grid and every live pointer. Each
//! round visits the live pointers in creation order:
//!
//! - **free-running**: a pointer keeps stepping until it dies or its next
//!   action would be a `#` retry, then the round moves on;
//! - **paced**: every pointer takes exactly one step and the round is
//!   followed by a sleep or by waiting for a cue from the console.
//!
//! Pointers spawned during a round join at the start of the next one.
//! Dead pointers leave the live set at the end of their turn. The run
//! finishes when no pointers are left.

use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, Instant};

use pota_core::{Direction, Grid, Position, Stack, Value};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument, trace};

use crate::console::Console;
use crate::debug::{DebugCallback, DebugFilter, Observer};
use crate::pointer::{Pointer, PointerId, StepContext, StepOutcome};
use crate::VmError;

/// How rounds are paced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    #[default]
    FreeRunning,
    /// One step per pointer per round, rounds at least this far apart.
    Interval(Duration),
    /// One step per pointer per round, each round started by a console cue.
    Manual,
}

impl Pacing {
    fn is_paced(self) -> bool {
        !matches!(self, Pacing::FreeRunning)
    }
}

/// How a run ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every pointer terminated.
    Finished,
    /// Interactive input was interrupted.
    Interrupted,
}

pub struct Interpreter {
    grid: Grid,
    pointers: BTreeMap<PointerId, Pointer>,
    spawned: Vec<Pointer>,
    next_id: u64,
    pacing: Pacing,
    observer: Observer,
    rng: StdRng,
    rounds: u64,
}

impl Interpreter {
    /// Launch one pointer at the origin heading right, with `initial_stack`
    /// pushed bottom to top.
    pub fn new<I, V>(grid: Grid, initial_stack: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let stack: Stack = initial_stack.into_iter().map(Into::into).collect();
        let origin = Pointer::new(
            PointerId::new(0),
            stack,
            Position::default(),
            Direction::Right,
            &grid,
        );
        let mut pointers = BTreeMap::new();
        pointers.insert(origin.id(), origin);
        Self {
            grid,
            pointers,
            spawned: Vec::new(),
            next_id: 1,
            pacing: Pacing::default(),
            observer: Observer::default(),
            rng: StdRng::from_entropy(),
            rounds: 0,
        }
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(Grid::parse(source), Vec::<Value>::new())
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_debug_filter(mut self, filter: DebugFilter) -> Self {
        self.observer.filter = filter;
        self
    }

    pub fn with_debug_callback(mut self, callback: DebugCallback) -> Self {
        self.observer.callback = callback;
        self
    }

    /// Make the random mirror deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pointer(&self, id: u64) -> Option<&Pointer> {
        let id = PointerId::new(id);
        self.pointers
            .get(&id)
            .or_else(|| self.spawned.iter().find(|p| p.id() == id))
    }

    /// Identifiers of the live set, excluding pointers not yet admitted.
    pub fn live_ids(&self) -> Vec<u64> {
        self.pointers.keys().map(|id| id.as_u64()).collect()
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn is_finished(&self) -> bool {
        self.pointers.is_empty() && self.spawned.is_empty()
    }

    /// Run until every pointer has terminated, a fault occurs, or input is
    /// interrupted.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<RunOutcome, VmError> {
        while !self.is_finished() {
            let started = Instant::now();
            match self.step_round(console) {
                Ok(()) => {}
                Err(VmError::Interrupted) => {
                    debug!(round = self.rounds, "run interrupted");
                    return Ok(RunOutcome::Interrupted);
                }
                Err(err) => {
                    debug!(round = self.rounds, error = %err, "run aborted");
                    return Err(err);
                }
            }
            if !self.is_finished() {
                self.pace(started, console)?;
            }
        }
        Ok(RunOutcome::Finished)
    }

    /// Admit last round's spawns, then give every live pointer its turn.
    #[instrument(level = "trace", skip_all, fields(round = self.rounds))]
    pub fn step_round(&mut self, console: &mut dyn Console) -> Result<(), VmError> {
        self.admit_spawned();
        self.rounds += 1;
        let ids: Vec<PointerId> = self.pointers.keys().copied().collect();
        for id in ids {
            let Some(mut pointer) = self.pointers.remove(&id) else {
                continue;
            };
            let result = self.take_turn(&mut pointer, console);
            if pointer.is_alive() {
                self.pointers.insert(id, pointer);
            } else {
                debug!(pointer = %id, "pointer terminated");
            }
            result?;
        }
        Ok(())
    }

    fn take_turn(&mut self, pointer: &mut Pointer, console: &mut dyn Console) -> Result<(), VmError> {
        let paced = self.pacing.is_paced();
        let mut ctx = StepContext {
            grid: &mut self.grid,
            others: &mut self.pointers,
            spawned: &mut self.spawned,
            next_id: &mut self.next_id,
            console,
            rng: &mut self.rng,
            observer: &mut self.observer,
        };
        if paced {
            pointer.step(&mut ctx)?;
            return Ok(());
        }
        let mut steps = 0u64;
        while pointer.step(&mut ctx)? == StepOutcome::Runnable {
            steps += 1;
        }
        trace!(pointer = %pointer.id(), steps, "turn finished");
        Ok(())
    }

    fn admit_spawned(&mut self) {
        for pointer in self.spawned.drain(..) {
            debug!(pointer = %pointer.id(), "pointer admitted");
            self.pointers.insert(pointer.id(), pointer);
        }
    }

    fn pace(&mut self, started: Instant, console: &mut dyn Console) -> Result<(), VmError> {
        match self.pacing {
            Pacing::FreeRunning => {}
            Pacing::Interval(tick) => {
                let elapsed = started.elapsed();
                if elapsed < tick {
                    thread::sleep(tick - elapsed);
                }
            }
            Pacing::Manual => console.wait_for_cue()?,
        }
        Ok(())
    }
}
