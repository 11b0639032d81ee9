//! Glue between the editor state and a solver link.
//!
//! The session is driven from the UI thread: input events are applied as they
//! arrive, and [`EditorSession::tick`] drains whatever the solver sent since
//! the last tick. Both run on the same thread, so the state is never touched
//! concurrently.

use log::{debug, info, warn};

use super::input::{InputEvent, KeyCommand};
use super::state::EditorState;
use crate::solver::{LinkStatus, SolverEvent, SolverLink};

pub struct EditorSession<L: SolverLink> {
    state: EditorState,
    link: L,
    /// Status of the link as of the last tick.
    status: LinkStatus,
}

impl<L: SolverLink> EditorSession<L> {
    pub fn new(state: EditorState, link: L) -> Self {
        let status = link.status();
        Self {
            state,
            link,
            status,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn into_parts(self) -> (EditorState, L) {
        (self.state, self.link)
    }

    /// Apply an input event; a solve key sends the current matrix.
    pub fn handle(&mut self, event: InputEvent) -> Option<KeyCommand> {
        let command = self.state.handle(event);
        if command == Some(KeyCommand::Solve) {
            self.request_solve();
        }
        command
    }

    /// Send the current matrix to the solver. Returns true if a request was
    /// handed to the link.
    pub fn request_solve(&mut self) -> bool {
        let Some(request) = self.state.solve_request() else {
            return false;
        };
        let generation = self.state.generation();
        let size = request.data.size();
        match self.link.submit(request) {
            Ok(()) => {
                info!("requested a tour for {size} cities");
                let open = self.link.status() == LinkStatus::Open;
                self.state.record_solve(generation, open);
                true
            }
            Err(e) => {
                warn!("could not submit solve request: {e}");
                false
            }
        }
    }

    /// Drain pending solver events. Returns how many were processed.
    pub fn tick(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.link.poll_event() {
            processed += 1;
            match event {
                SolverEvent::Tour(update) => {
                    self.state.apply_tour(update);
                }
                SolverEvent::Status(status) => {
                    if status != LinkStatus::Open {
                        self.state.forget_in_flight();
                    }
                    if status != self.status {
                        debug!("solver link {}", status.label());
                        self.status = status;
                        // The status bar shows the link state.
                        self.state.request_redraw();
                    }
                }
            }
        }
        processed
    }
}
