//! Editor state management.
//!
//! [`EditorState`] is the single owner of everything the editor shows: the
//! city set, the viewport, the undo history, the current tour and the derived
//! distance matrix. All mutations go through its methods, which keep the
//! following rules in one place:
//!
//! - a snapshot is recorded before every city-set mutation,
//! - any city-set change (edit, undo, redo) clears the tour, rebuilds the
//!   matrix and bumps the generation counter,
//! - every visible change requests a redraw.

use std::collections::VecDeque;

use log::{debug, info};

use super::input::{Cursor, InputEvent, Key, KeyCommand, Modifiers, PointerState};
use super::operations::EditorHistory;
use super::selection::{hit_test, world_tolerance};
use crate::config::{EditorConfig, StaleTourPolicy};
use crate::matrix::DistanceMatrix;
use crate::model::{City, CitySet, Point, Tour};
use crate::solver::{SolveRequest, TourUpdate};
use crate::viewport::Viewport;

#[derive(Debug, Clone)]
pub struct EditorState {
    config: EditorConfig,
    cities: CitySet,
    viewport: Viewport,
    history: EditorHistory,
    tour: Option<Tour>,
    matrix: DistanceMatrix,
    pointer: PointerState,
    cursor: Cursor,
    /// Bumped on every city-set change.
    generation: u64,
    /// Generation of the last request handed to the solver.
    last_solve: Option<u64>,
    /// Generations of requests sent on the open link and not yet answered,
    /// oldest first. The solver answers each request once, in order.
    in_flight: VecDeque<u64>,
    needs_redraw: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            viewport: Viewport::new(config.scale_bounds),
            history: EditorHistory::new(config.history_depth),
            config,
            cities: CitySet::new(),
            tour: None,
            matrix: DistanceMatrix::default(),
            pointer: PointerState::Idle,
            cursor: Cursor::Crosshair,
            generation: 0,
            last_solve: None,
            in_flight: VecDeque::new(),
            // First frame
            needs_redraw: true,
        }
    }

    /// Start with an existing city set. The initial set is not undoable.
    pub fn with_cities(config: EditorConfig, cities: CitySet) -> Self {
        let mut state = Self::new(config);
        state.matrix = DistanceMatrix::build(&cities);
        state.cities = cities;
        state
    }

    // ── accessors ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn cities(&self) -> &CitySet {
        &self.cities
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.tour.as_ref()
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    pub fn history(&self) -> &EditorHistory {
        &self.history
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── redraw bookkeeping ──────────────────────────────────────────────────

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Return and clear the pending redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // ────────────────────────────────────────────────────────────────────────
    // City set
    // ────────────────────────────────────────────────────────────────────────

    /// Index of the city under a world point, using the screen-space hit
    /// tolerance at the current zoom.
    pub fn hit_test(&self, world: Point) -> Option<usize> {
        let radius = world_tolerance(self.config.hit_tolerance, self.viewport.scale());
        hit_test(&self.cities, world, radius)
    }

    /// Add a city at a world point and return its index.
    pub fn add_city(&mut self, world: Point) -> usize {
        self.history.record(self.cities.clone());
        let index = self.cities.push(City::at(world));
        debug!("added city {} at ({:.2}, {:.2})", index + 1, world.x, world.y);
        self.commit_change();
        index
    }

    /// Remove the city at `index`. Out-of-range indices change nothing.
    pub fn remove_city(&mut self, index: usize) -> Option<City> {
        if index >= self.cities.len() {
            return None;
        }
        self.history.record(self.cities.clone());
        let removed = self.cities.remove(index);
        debug!("removed city {}", index + 1);
        self.commit_change();
        removed
    }

    /// Remove the city under a world point, if any.
    pub fn remove_near(&mut self, world: Point) -> bool {
        match self.hit_test(world) {
            Some(index) => self.remove_city(index).is_some(),
            None => false,
        }
    }

    /// Replace the whole city set as one undoable edit.
    pub fn replace_cities(&mut self, cities: CitySet) {
        self.history.record(std::mem::replace(&mut self.cities, cities));
        info!("loaded {} cities", self.cities.len());
        self.commit_change();
    }

    pub fn undo(&mut self) -> bool {
        if self.history.undo(&mut self.cities) {
            self.commit_change();
            true
        } else {
            debug!("nothing to undo");
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.history.redo(&mut self.cities) {
            self.commit_change();
            true
        } else {
            debug!("nothing to redo");
            false
        }
    }

    fn commit_change(&mut self) {
        self.tour = None;
        self.generation += 1;
        self.matrix = DistanceMatrix::build(&self.cities);
        self.needs_redraw = true;
    }

    // ────────────────────────────────────────────────────────────────────────
    // Viewport
    // ────────────────────────────────────────────────────────────────────────

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx != 0.0 || dy != 0.0 {
            self.viewport.pan(dx, dy);
            self.needs_redraw = true;
        }
    }

    /// Zoom anchored at a screen point. Returns true if the scale changed.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) -> bool {
        let changed = self.viewport.zoom_at(screen, factor);
        if changed {
            self.needs_redraw = true;
        }
        changed
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.needs_redraw = true;
    }

    // ────────────────────────────────────────────────────────────────────────
    // Input
    // ────────────────────────────────────────────────────────────────────────

    /// Apply one input event. Returns the key command it triggered, if any;
    /// commands the state cannot carry out alone (solving) are left to the
    /// caller.
    pub fn handle(&mut self, event: InputEvent) -> Option<KeyCommand> {
        match event {
            InputEvent::PointerDown { at } => self.pointer_down(at),
            InputEvent::PointerMove { at } => self.pointer_move(at),
            InputEvent::PointerUp { at } => self.pointer_up(at),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Wheel { at, delta_y } => self.wheel(at, delta_y),
            InputEvent::Key { key, modifiers } => return self.key(key, modifiers),
        }
        None
    }

    pub fn pointer_down(&mut self, at: Point) {
        self.pointer = PointerState::PointerDown { anchor: at, last: at };
    }

    pub fn pointer_move(&mut self, at: Point) {
        match self.pointer {
            PointerState::Idle => self.hover(at),
            PointerState::PointerDown { anchor, .. } => {
                let moved = at - anchor;
                if moved.length() > self.config.drag_threshold {
                    self.pan_by(moved.x, moved.y);
                    self.pointer = PointerState::Dragging { last: at };
                    self.cursor = Cursor::Grabbing;
                } else {
                    self.pointer = PointerState::PointerDown { anchor, last: at };
                }
            }
            PointerState::Dragging { last } => {
                let delta = at - last;
                self.pan_by(delta.x, delta.y);
                self.pointer = PointerState::Dragging { last: at };
            }
        }
    }

    pub fn pointer_up(&mut self, at: Point) {
        match std::mem::take(&mut self.pointer) {
            PointerState::Idle => {}
            PointerState::PointerDown { anchor, .. } => {
                let moved = at - anchor;
                if moved.length() > self.config.drag_threshold {
                    // Released far away without intermediate moves: still a pan.
                    self.pan_by(moved.x, moved.y);
                } else {
                    self.click(at);
                }
            }
            PointerState::Dragging { last } => {
                let delta = at - last;
                self.pan_by(delta.x, delta.y);
            }
        }
        self.hover(at);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = PointerState::Idle;
        self.cursor = Cursor::Crosshair;
    }

    pub fn wheel(&mut self, at: Point, delta_y: f64) {
        let factor = self.config.wheel_factor(delta_y);
        self.zoom_at(at, factor);
    }

    /// Handle a key press, returning the bound command.
    pub fn key(&mut self, key: Key, modifiers: Modifiers) -> Option<KeyCommand> {
        let command = KeyCommand::from_key(key, modifiers)?;
        match command {
            KeyCommand::Undo => {
                self.undo();
            }
            KeyCommand::Redo => {
                self.redo();
            }
            KeyCommand::ResetView => self.reset_view(),
            KeyCommand::Cancel => self.pointer_leave(),
            KeyCommand::Solve => {}
        }
        Some(command)
    }

    fn click(&mut self, screen: Point) {
        let world = self.viewport.to_world(screen);
        match self.hit_test(world) {
            Some(index) => {
                self.remove_city(index);
            }
            None => {
                self.add_city(world);
            }
        }
    }

    fn hover(&mut self, screen: Point) {
        let world = self.viewport.to_world(screen);
        self.cursor = if self.hit_test(world).is_some() {
            Cursor::Pointer
        } else {
            Cursor::Crosshair
        };
    }

    // ────────────────────────────────────────────────────────────────────────
    // Solver
    // ────────────────────────────────────────────────────────────────────────

    /// Build a solve request for the current city set. Returns `None` for an
    /// empty set.
    pub fn solve_request(&self) -> Option<SolveRequest> {
        if self.cities.is_empty() {
            debug!("no cities, not requesting a solve");
            return None;
        }
        Some(SolveRequest::new(self.matrix.clone(), self.config.solver_params))
    }

    /// Note that a request built from `generation` reached the solver link.
    /// `awaiting_reply` is true when it went out on an open connection, so its
    /// answer is the next one to arrive after those already in flight.
    pub fn record_solve(&mut self, generation: u64, awaiting_reply: bool) {
        self.last_solve = Some(generation);
        if awaiting_reply {
            self.in_flight.push_back(generation);
        }
    }

    /// Requests sent on a connection that went away are never answered.
    pub fn forget_in_flight(&mut self) {
        if !self.in_flight.is_empty() {
            debug!("forgetting {} unanswered solve request(s)", self.in_flight.len());
            self.in_flight.clear();
        }
    }

    /// Number of sent requests still waiting for their tour.
    pub fn pending_solves(&self) -> usize {
        self.in_flight.len()
    }

    /// Install a tour from the solver. Returns false if it was discarded as
    /// stale.
    ///
    /// The tour answers the oldest request in flight; without one it is taken
    /// to answer the last request sent.
    pub fn apply_tour(&mut self, update: TourUpdate) -> bool {
        let requested = self.in_flight.pop_front().or(self.last_solve);
        if self.config.stale_tours == StaleTourPolicy::Discard {
            if let Some(requested) = requested.filter(|&g| g != self.generation) {
                info!(
                    "discarding '{}' tour for an older city set (generation {requested}, now {})",
                    update.kind, self.generation
                );
                return false;
            }
        }
        if !update.tour.fits(self.cities.len()) {
            debug!(
                "tour references cities beyond the current {}; those legs are not drawn",
                self.cities.len()
            );
        }
        self.tour = Some(update.tour);
        self.needs_redraw = true;
        true
    }
}
