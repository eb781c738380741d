//! Navigation Simulator
//!
//! Drives a [`SceneHost`] through seeded random navigation and checks the
//! reconciled scene list after every step.
//!
//! Key invariants checked:
//! - Scene keys are unique and scenes are sorted by index, then key
//! - Every route of the current state has exactly one fresh scene
//! - Routes that just left the state are kept as stale scenes
//! - Scenes whose fields did not change keep their handle

use crate::error::SimError;
use crate::host::SceneHost;
use nav_route::{BasicRoute, NavigationState, Route, RouteKey};
use nav_scenes::{are_scenes_shallow_equal, compare_scenes, SceneList};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Navigation steps to run
    pub steps: u64,
    /// Deepest stack the simulator builds
    pub max_depth: usize,
    /// Retire stale scenes every N steps (0 = only when the action says so)
    pub retire_every: u64,
    /// Stop at the first violation
    pub stop_on_first_violation: bool,
}

impl SimulatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// With step count
    #[inline]
    #[must_use]
    pub fn with_steps(mut self, steps: u64) -> Self {
        self.steps = steps;
        self
    }

    /// With maximum stack depth
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            steps: 1000,
            max_depth: 12,
            retire_every: 0,
            stop_on_first_violation: true,
        }
    }
}

/// Navigation actions the simulator picks from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NavAction {
    /// Push a brand new route
    Push,
    /// Pop the top route
    Pop,
    /// Bring back a route that left the stack earlier
    Restore,
    /// Activate a random route without changing the stack
    Jump,
    /// Replace a random route with a new one
    Replace,
    /// Replace the whole stack with one or two routes
    Reset,
    /// Re-deliver the current state instance
    Redeliver,
    /// Finish exit transitions and retire stale scenes
    CompleteTransition,
}

/// A violation detected during simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Violation {
    /// Two scenes share a key
    DuplicateSceneKey {
        /// Step number
        step: u64,
        /// Repeated key
        key: String,
    },
    /// Scenes out of order
    OutOfOrder {
        /// Step number
        step: u64,
        /// Earlier scene key
        first: String,
        /// Later scene key
        second: String,
    },
    /// Route of the current state without exactly one fresh scene
    MissingFreshScene {
        /// Step number
        step: u64,
        /// Route key
        route: String,
    },
    /// Route that left the state has no stale scene
    MissingStaleScene {
        /// Step number
        step: u64,
        /// Route key
        route: String,
    },
    /// An unchanged scene was rebuilt instead of reused
    IdentityLost {
        /// Step number
        step: u64,
        /// Scene key
        key: String,
    },
    /// Reconciliation or a state transition failed
    StepFailed {
        /// Step number
        step: u64,
        /// Action attempted
        action: NavAction,
        /// Error message
        error: String,
    },
}

/// Statistics for simulation
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulatorStats {
    /// Steps executed
    pub steps_run: u64,
    /// Push actions
    pub pushes: u64,
    /// Pop actions
    pub pops: u64,
    /// Restore actions
    pub restores: u64,
    /// Jump actions
    pub jumps: u64,
    /// Replace actions
    pub replaces: u64,
    /// Reset actions
    pub resets: u64,
    /// Same-state redeliveries
    pub redeliveries: u64,
    /// Stale scenes retired
    pub retirements: u64,
    /// Scenes that entered
    pub scenes_entered: u64,
    /// Scenes that went stale
    pub scenes_exited: u64,
    /// Stale scenes brought back
    pub scenes_revived: u64,
    /// Scene handles carried over
    pub scenes_reused: u64,
    /// Longest scene list seen
    pub max_scene_count: usize,
}

/// Final report from simulator
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorReport {
    /// Configuration the run used
    pub config: SimulatorConfig,
    /// Counters
    pub stats: SimulatorStats,
    /// Violations in detection order
    pub violations: Vec<Violation>,
}

impl SimulatorReport {
    /// Check if simulation passed all criteria
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Generate text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Scene Reconciliation Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Steps Run: {}\n", self.stats.steps_run));
        report.push_str(&format!(
            "Actions: {} push, {} pop, {} restore, {} jump, {} replace, {} reset, {} redeliver\n",
            self.stats.pushes,
            self.stats.pops,
            self.stats.restores,
            self.stats.jumps,
            self.stats.replaces,
            self.stats.resets,
            self.stats.redeliveries
        ));
        report.push_str(&format!("Retirements: {}\n", self.stats.retirements));
        report.push_str(&format!("Scenes Entered: {}\n", self.stats.scenes_entered));
        report.push_str(&format!("Scenes Exited: {}\n", self.stats.scenes_exited));
        report.push_str(&format!("Scenes Revived: {}\n", self.stats.scenes_revived));
        report.push_str(&format!("Scenes Reused: {}\n", self.stats.scenes_reused));
        report.push_str(&format!("Max Scene Count: {}\n", self.stats.max_scene_count));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {:?}\n", i + 1, v));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Random navigation over a host, with route bookkeeping for restores
struct Navigator {
    rng: StdRng,
    next_id: u64,
    departed: Vec<Arc<BasicRoute>>,
}

impl Navigator {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
            departed: Vec::new(),
        }
    }

    fn new_route(&mut self) -> Arc<BasicRoute> {
        let key = format!("r{}", self.next_id);
        self.next_id += 1;
        Arc::new(BasicRoute::new(key, "Screen"))
    }

    fn pick_action(&mut self, state: &NavigationState, max_depth: usize) -> NavAction {
        let roll = self.rng.gen_range(0..100u32);
        match roll {
            0..=29 if state.len() < max_depth => NavAction::Push,
            0..=49 if state.len() > 1 => NavAction::Pop,
            50..=59 if !self.departed.is_empty() && state.len() < max_depth => NavAction::Restore,
            60..=69 => NavAction::Jump,
            70..=79 => NavAction::Replace,
            80..=84 => NavAction::Reset,
            85..=89 => NavAction::Redeliver,
            90..=99 => NavAction::CompleteTransition,
            _ => NavAction::Jump,
        }
    }

    /// Next state for `action`; `None` for actions that keep the state instance
    fn apply(
        &mut self,
        action: NavAction,
        state: &NavigationState,
    ) -> Result<Option<NavigationState>, SimError> {
        let next = match action {
            NavAction::Push => state.push(self.new_route())?,
            NavAction::Pop => {
                if let Some(top) = state.routes().last() {
                    self.departed.push(Arc::clone(top));
                }
                state.pop()
            }
            NavAction::Restore => {
                let slot = self.rng.gen_range(0..self.departed.len());
                let route = self.departed.swap_remove(slot);
                if state.contains_key(route.key()) {
                    state.clone()
                } else {
                    state.push(route)?
                }
            }
            NavAction::Jump => {
                let index = self.rng.gen_range(0..state.len().max(1));
                state.jump_to_index(index)?
            }
            NavAction::Replace => {
                let index = self.rng.gen_range(0..state.len().max(1));
                self.departed.push(Arc::clone(&state.routes()[index]));
                let route = self.new_route();
                state.replace_at_index(index, route)?
            }
            NavAction::Reset => {
                self.departed.extend(state.routes().iter().cloned());
                let count = self.rng.gen_range(1..=2);
                let routes = (0..count).map(|_| self.new_route()).collect();
                NavigationState::reset(routes, None)?
            }
            NavAction::Redeliver | NavAction::CompleteTransition => return Ok(None),
        };
        Ok(Some(next))
    }
}

/// Run the navigation simulator
#[must_use]
pub fn run_simulator(config: SimulatorConfig) -> SimulatorReport {
    let mut navigator = Navigator::new(config.seed);
    let mut stats = SimulatorStats::default();
    let mut violations = Vec::new();

    let initial = NavigationState::from_routes(vec![navigator.new_route()]);
    let mut host = match SceneHost::new(initial) {
        Ok(host) => host,
        Err(e) => {
            violations.push(Violation::StepFailed {
                step: 0,
                action: NavAction::Push,
                error: e.to_string(),
            });
            return SimulatorReport {
                config,
                stats,
                violations,
            };
        }
    };

    tracing::info!("Simulating {} steps with seed {}", config.steps, config.seed);

    for step in 1..=config.steps {
        let action = navigator.pick_action(host.state(), config.max_depth);
        stats.steps_run += 1;

        let outcome = run_step(&mut navigator, &mut host, action, &mut stats);
        let step_violations = match outcome {
            Ok(Some((previous, prev_state))) => check_invariants(step, &host, &previous, &prev_state),
            Ok(None) => Vec::new(),
            Err(e) => vec![Violation::StepFailed {
                step,
                action,
                error: e.to_string(),
            }],
        };

        if config.retire_every > 0 && step % config.retire_every == 0 {
            stats.retirements += host.complete_transition() as u64;
        }
        stats.max_scene_count = stats.max_scene_count.max(host.scenes().len());

        if !step_violations.is_empty() {
            tracing::warn!("Step {} ({:?}) violated {} invariants", step, action, step_violations.len());
            violations.extend(step_violations);
            if config.stop_on_first_violation {
                break;
            }
        }
    }

    tracing::info!(
        "Simulation finished: {} steps, {} violations",
        stats.steps_run,
        violations.len()
    );

    SimulatorReport {
        config,
        stats,
        violations,
    }
}

type StepSnapshot = (SceneList<BasicRoute>, Arc<NavigationState>);

/// Apply one action; returns the pre-step scenes and state when the host navigated
fn run_step(
    navigator: &mut Navigator,
    host: &mut SceneHost<BasicRoute>,
    action: NavAction,
    stats: &mut SimulatorStats,
) -> Result<Option<StepSnapshot>, SimError> {
    let counter = match action {
        NavAction::Push => &mut stats.pushes,
        NavAction::Pop => &mut stats.pops,
        NavAction::Restore => &mut stats.restores,
        NavAction::Jump => &mut stats.jumps,
        NavAction::Replace => &mut stats.replaces,
        NavAction::Reset => &mut stats.resets,
        NavAction::Redeliver => &mut stats.redeliveries,
        NavAction::CompleteTransition => {
            stats.retirements += host.complete_transition() as u64;
            return Ok(None);
        }
    };
    *counter += 1;

    let previous = host.scenes().clone();
    let prev_state = Arc::clone(host.state());

    let next: Arc<NavigationState> = match navigator.apply(action, &prev_state)? {
        Some(next) => Arc::new(next),
        None => Arc::clone(&prev_state),
    };

    let summary = host.navigate(next)?;
    stats.scenes_entered += summary.entering as u64;
    stats.scenes_exited += summary.exiting as u64;
    stats.scenes_revived += summary.revived as u64;
    stats.scenes_reused += summary.reused as u64;

    Ok(Some((previous, prev_state)))
}

fn check_invariants(
    step: u64,
    host: &SceneHost<BasicRoute>,
    previous: &SceneList<BasicRoute>,
    prev_state: &NavigationState,
) -> Vec<Violation> {
    let scenes = host.scenes();
    let state = host.state();
    let mut violations = Vec::new();

    let mut seen = HashSet::new();
    for scene in scenes {
        if !seen.insert(scene.key()) {
            violations.push(Violation::DuplicateSceneKey {
                step,
                key: scene.key().to_string(),
            });
        }
    }

    for pair in scenes.windows(2) {
        if compare_scenes(&pair[0], &pair[1]) != Ordering::Less {
            violations.push(Violation::OutOfOrder {
                step,
                first: pair[0].key().to_string(),
                second: pair[1].key().to_string(),
            });
        }
    }

    for (index, route) in state.routes().iter().enumerate() {
        let fresh = scenes
            .iter()
            .filter(|s| !s.is_stale() && s.index() == index && Arc::ptr_eq(s.route(), route))
            .count();
        if fresh != 1 {
            violations.push(Violation::MissingFreshScene {
                step,
                route: route.key().to_string(),
            });
        }
    }

    let current: HashSet<&RouteKey> = state.route_keys().collect();
    for route in prev_state.routes() {
        if current.contains(route.key()) {
            continue;
        }
        let kept = scenes
            .iter()
            .any(|s| s.is_stale() && Arc::ptr_eq(s.route(), route));
        if !kept {
            violations.push(Violation::MissingStaleScene {
                step,
                route: route.key().to_string(),
            });
        }
    }

    let before: HashMap<_, _> = previous.iter().map(|s| (s.key(), s)).collect();
    for scene in scenes {
        if let Some(prev) = before.get(scene.key()) {
            if are_scenes_shallow_equal(prev, scene) && !Arc::ptr_eq(*prev, scene) {
                violations.push(Violation::IdentityLost {
                    step,
                    key: scene.key().to_string(),
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_passes() {
        let report = run_simulator(SimulatorConfig::new().with_steps(500));
        assert!(report.passed(), "{}", report.generate_text());
        assert_eq!(report.stats.steps_run, 500);
    }

    #[test]
    fn same_seed_same_stats() {
        let config = SimulatorConfig::new().with_seed(7).with_steps(200);
        let one = run_simulator(config.clone());
        let two = run_simulator(config);
        assert_eq!(one.stats.pushes, two.stats.pushes);
        assert_eq!(one.stats.scenes_reused, two.stats.scenes_reused);
        assert_eq!(one.stats.max_scene_count, two.stats.max_scene_count);
    }

    #[test]
    fn shallow_stacks_pass() {
        let mut config = SimulatorConfig::new().with_steps(300).with_max_depth(3);
        config.retire_every = 1;
        let report = run_simulator(config);
        assert!(report.passed());
        assert!(report.stats.pushes > 0);
        assert!(report.stats.max_scene_count <= 3);
    }

    #[test]
    fn periodic_retirement_keeps_lists_short() {
        let mut config = SimulatorConfig::new().with_steps(300).with_max_depth(4);
        config.retire_every = 1;
        let report = run_simulator(config);
        assert!(report.passed());
        assert!(report.stats.max_scene_count <= 4);
    }

    #[test]
    fn report_text_names_result() {
        let report = run_simulator(SimulatorConfig::new().with_steps(10));
        let text = report.generate_text();
        assert!(text.contains("Seed: 42"));
        assert!(text.contains("PASS"));
    }
}
