//! Application state and event handling.

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, info};
use xiangqi_board::Coord;

use super::input::{Action, action_for};
use crate::context::GameContext;
use crate::driver::{ClientEvent, Driver};
use crate::lifecycle::Announcement;

/// Main application state.
#[derive(Debug)]
pub struct App {
    context: GameContext,
    driver: Driver,
    cursor: Coord,
    popup: Option<Announcement>,
    should_quit: bool,
}

impl App {
    /// Creates the application and starts the initial state fetch.
    pub fn new(driver: Driver) -> Self {
        let mut context = GameContext::new();
        driver.submit(context.fetch_state());
        Self {
            context,
            driver,
            cursor: Coord::new(9, 4).unwrap_or_default(),
            popup: None,
            should_quit: false,
        }
    }

    /// The game context.
    pub fn context(&self) -> &GameContext {
        &self.context
    }

    /// The game context, for layout.
    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.context
    }

    /// Keyboard cursor position.
    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Announcement currently on screen.
    pub fn popup(&self) -> Option<&Announcement> {
        self.popup.as_ref()
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handles a message from the driver.
    pub fn handle_client_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Completed(completion) => {
                if let Some(announcement) = self.context.complete(completion) {
                    self.driver.announce_later(announcement);
                }
            }
            ClientEvent::Announce(announcement) => {
                if self.context.announcement_current() {
                    info!(message = %announcement.message(), "Showing announcement");
                    self.popup = Some(announcement);
                } else {
                    debug!("Dropping announcement for a game that was reset");
                }
            }
        }
    }

    /// Handles a terminal input event.
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.popup.take().is_some() {
            debug!("Announcement dismissed");
            return;
        }
        match action_for(key, self.cursor) {
            Action::Quit => {
                info!("User quit");
                self.should_quit = true;
            }
            Action::Reset => self.driver.submit(self.context.reset()),
            Action::Click => self.click(self.cursor),
            Action::Cursor(coord) => self.cursor = coord,
            Action::None => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.popup.take().is_some() {
            return;
        }
        if let Some(coord) = self.context.grid().hit_test(mouse.column, mouse.row) {
            self.cursor = coord;
            self.click(coord);
        }
    }

    fn click(&mut self, coord: Coord) {
        if let Some(dispatch) = self.context.click(coord) {
            self.driver.submit(dispatch);
        }
    }
}
