//! The brain: interpreter state for the command language.
//!
//! Holds the variable environment and three output queues: error messages,
//! status text, and [`MechCommand`]s for the actuator. The caller feeds it
//! one line at a time and drains the queues between lines.

pub mod command;
pub mod error;
pub mod mech;
pub mod translate;

pub use command::Command;
pub use error::BrainError;
pub use mech::MechCommand;
pub use translate::translate;

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::{debug, info, trace, warn};

use crate::config::BrainConfig;
use crate::lang::{parse_line, Expr, Identifier};

pub const HELP_TEXT: &str = "help
 -> list available commands
let name = expr
 -> save an expression
move (name|number)
 -> move a certain distance
rotate (name|number)
 -> rotate by a certain angle";

/// Default bound on nested variable evaluation.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 64;

/// Largest accepted evaluation depth. Deeper settings are clamped.
pub const MAX_EVAL_DEPTH_LIMIT: usize = 512;

/// Default number of dispatches one top-level statement may perform.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// A statement was abandoned after its error was reported.
struct Halted;

/// Interpreter state for one session.
#[derive(Debug)]
pub struct Brain {
    /// Bindings hold unevaluated trees; they are resolved at each use.
    variables: HashMap<Identifier, Rc<Expr>>,
    quit: bool,
    errors: VecDeque<BrainError>,
    status: VecDeque<String>,
    commands: VecDeque<MechCommand>,
    max_eval_depth: usize,
    max_steps: usize,
    /// Dispatches performed by the current top-level statement.
    steps: usize,
    /// Variables whose bound statements are being run, outermost first.
    expanding: Vec<Identifier>,
}

impl Brain {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_EVAL_DEPTH, DEFAULT_MAX_STEPS)
    }

    pub fn with_config(config: &BrainConfig) -> Self {
        Self::with_limits(config.max_eval_depth, config.max_steps)
    }

    pub fn with_max_depth(max_eval_depth: usize) -> Self {
        Self::with_limits(max_eval_depth, DEFAULT_MAX_STEPS)
    }

    /// Depth is clamped to `1..=MAX_EVAL_DEPTH_LIMIT`, steps to at least 1.
    pub fn with_limits(max_eval_depth: usize, max_steps: usize) -> Self {
        let clamped = max_eval_depth.clamp(1, MAX_EVAL_DEPTH_LIMIT);
        if clamped != max_eval_depth {
            warn!(requested = max_eval_depth, used = clamped, "evaluation depth clamped");
        }
        Self {
            variables: HashMap::new(),
            quit: false,
            errors: VecDeque::new(),
            status: VecDeque::new(),
            commands: VecDeque::new(),
            max_eval_depth: clamped,
            max_steps: max_steps.max(1),
            steps: 0,
            expanding: Vec::new(),
        }
    }

    /// Parse, translate, and run one input line.
    pub fn process_line(&mut self, line: &str) {
        debug!(line = line.trim_end(), "processing line");
        if let Some(tree) = parse_line(line) {
            self.process_tree(&tree);
        }
    }

    /// Run every statement of an already-parsed tree, in program order.
    pub fn process_tree(&mut self, tree: &Expr) {
        for command in translate(tree) {
            self.process_command(command);
        }
    }

    /// Dispatch a single top-level statement with a fresh step budget.
    pub fn process_command(&mut self, command: Command<'_>) {
        self.steps = 0;
        if self.dispatch(command, 0).is_err() {
            debug!(command = command.name(), "statement halted");
        }
        self.expanding.clear();
    }

    /// Evaluate an expression to an integer.
    ///
    /// Only literals and variables bound (eventually) to literals have a
    /// value. On failure the reason is pushed to the error queue and `None`
    /// is returned.
    pub fn eval_expr(&mut self, expr: &Expr) -> Option<i64> {
        self.eval_at(expr, 0, &mut Vec::new())
    }

    fn run_tree(&mut self, tree: &Expr, depth: usize) -> Result<(), Halted> {
        for command in translate(tree) {
            self.dispatch(command, depth)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command<'_>, depth: usize) -> Result<(), Halted> {
        trace!(command = command.name(), depth, "dispatch");
        self.steps += 1;
        if self.steps > self.max_steps {
            warn!(limit = self.max_steps, "step limit exceeded");
            self.report(BrainError::StepLimit {
                limit: self.max_steps,
            });
            return Err(Halted);
        }

        match command {
            Command::SyntaxError(err) => self.report(BrainError::Syntax(err.clone())),
            Command::Unrecognized(_) => self.report(BrainError::Unrecognized),
            Command::Quit => {
                info!("quit requested");
                self.quit = true;
            }
            Command::Stop => {
                if !self.commands.is_empty() {
                    info!(discarded = self.commands.len(), "stop preempts queued commands");
                }
                self.commands.clear();
                self.commands.push_back(MechCommand::Stop);
            }
            Command::Let(name, value) => {
                self.variables.insert(name.clone(), Rc::clone(value));
            }
            Command::Eval(name) => return self.expand(name, depth),
            Command::Help => self.status.push_back(HELP_TEXT.to_string()),
            Command::Echo(name) => {
                if let Some(bound) = self.lookup(name) {
                    self.status.push_back(bound.to_string());
                }
            }
            Command::Rotate(angle) => {
                if let Some(angle) = self.eval_at(angle, depth, &mut Vec::new()) {
                    self.commands.push_back(MechCommand::Rotate(angle));
                }
            }
            Command::Move(distance) => {
                if let Some(distance) = self.eval_at(distance, depth, &mut Vec::new()) {
                    self.commands.push_back(MechCommand::Move(distance));
                }
            }
            Command::Buy(commodity, count) => {
                if let Some(count) = self.eval_at(count, depth, &mut Vec::new()) {
                    self.commands.push_back(MechCommand::Buy {
                        commodity: commodity.clone(),
                        count,
                    });
                }
            }
            Command::Sell(commodity, count) => {
                if let Some(count) = self.eval_at(count, depth, &mut Vec::new()) {
                    self.commands.push_back(MechCommand::Sell {
                        commodity: commodity.clone(),
                        count,
                    });
                }
            }
            Command::Inventory => self.commands.push_back(MechCommand::Inventory),
            Command::MarketPrices => self.commands.push_back(MechCommand::MarketPrices),
            Command::CityPrices => self.commands.push_back(MechCommand::CityPrices),
        }
        Ok(())
    }

    /// Run the statements bound to `name`. A variable that is reached again
    /// while its own statements are running halts the whole statement.
    fn expand(&mut self, name: &Identifier, depth: usize) -> Result<(), Halted> {
        let Some(bound) = self.lookup(name) else {
            return Ok(());
        };
        if self.expanding.contains(name) {
            self.cycle(name);
            return Err(Halted);
        }
        if depth >= self.max_eval_depth {
            self.depth_exceeded(name);
            return Err(Halted);
        }

        self.expanding.push(name.clone());
        let result = self.run_tree(&bound, depth + 1);
        self.expanding.pop();
        result
    }

    /// `seen` holds the variables already followed by this evaluation.
    fn eval_at(&mut self, expr: &Expr, depth: usize, seen: &mut Vec<Identifier>) -> Option<i64> {
        match expr {
            Expr::Int(n) => Some(*n),
            Expr::Ident(name) => {
                if seen.contains(name) {
                    self.cycle(name);
                    return None;
                }
                let bound = self.lookup(name)?;
                if depth >= self.max_eval_depth {
                    self.depth_exceeded(name);
                    return None;
                }
                seen.push(name.clone());
                self.eval_at(&bound, depth + 1, seen)
            }
            other => {
                self.report(BrainError::NotALiteral(other.to_string()));
                None
            }
        }
    }

    /// Fetch a binding, reporting an unknown variable.
    fn lookup(&mut self, name: &Identifier) -> Option<Rc<Expr>> {
        let bound = self.variables.get(name).cloned();
        if bound.is_none() {
            self.report(BrainError::UnknownVariable(name.clone()));
        }
        bound
    }

    fn depth_exceeded(&mut self, name: &Identifier) {
        warn!(variable = %name, limit = self.max_eval_depth, "evaluation depth exceeded");
        self.report(BrainError::DepthExceeded {
            name: name.clone(),
            limit: self.max_eval_depth,
        });
    }

    fn cycle(&mut self, name: &Identifier) {
        warn!(variable = %name, "self-referencing variable");
        self.report(BrainError::Cycle(name.clone()));
    }

    fn report(&mut self, err: BrainError) {
        debug!(%err, "statement failed");
        self.errors.push_back(err);
    }

    // --- Session state ---

    /// Whether a `quit` has been processed. The caller stops reading lines.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// The unevaluated tree bound to `name`, if any.
    pub fn variable(&self, name: &str) -> Option<&Expr> {
        self.variables.get(name).map(|tree| tree.as_ref())
    }

    pub fn max_eval_depth(&self) -> usize {
        self.max_eval_depth
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    // --- Output queues ---

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn next_error(&mut self) -> Option<BrainError> {
        self.errors.pop_front()
    }

    pub fn peek_error(&self) -> Option<&BrainError> {
        self.errors.front()
    }

    pub fn drain_errors(&mut self) -> impl Iterator<Item = BrainError> + '_ {
        self.errors.drain(..)
    }

    pub fn has_status(&self) -> bool {
        !self.status.is_empty()
    }

    pub fn next_status(&mut self) -> Option<String> {
        self.status.pop_front()
    }

    pub fn peek_status(&self) -> Option<&str> {
        self.status.front().map(String::as_str)
    }

    pub fn drain_status(&mut self) -> impl Iterator<Item = String> + '_ {
        self.status.drain(..)
    }

    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn next_command(&mut self) -> Option<MechCommand> {
        self.commands.pop_front()
    }

    pub fn peek_command(&self) -> Option<&MechCommand> {
        self.commands.front()
    }

    pub fn drain_commands(&mut self) -> impl Iterator<Item = MechCommand> + '_ {
        self.commands.drain(..)
    }
}

impl Default for Brain {
    fn default() -> Self {
        Self::new()
    }
}
