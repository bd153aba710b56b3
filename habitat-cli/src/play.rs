//! Interactive game loop reading commands line by line.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use anyhow::Result;
use habitat_core::names::validate_player_name;
use habitat_core::{Animal, GameObserver, GameState, HistoryError, Pos, Session};
use tracing::debug;

const HELP: &str = "\
commands:
  select <bear|fish|fox|none>   choose the animal to place
  place <x> <y>                 place the selected animal
  preview <x> <y>               show the score breakdown without placing
  undo | redo                   step through placement history
  name <player name>            rename the player
  show                          print the grid and status
  help                          this text
  quit                          leave the game";

/// Queues turn and game-over notices until the loop prints them.
#[derive(Clone, Default)]
pub struct Announcer {
    messages: Rc<RefCell<Vec<String>>>,
}

impl Announcer {
    fn drain(&self) -> Vec<String> {
        self.messages.borrow_mut().drain(..).collect()
    }
}

impl GameObserver for Announcer {
    fn on_turn_advanced(&mut self, turn: u32, score_limit: u32) {
        self.messages
            .borrow_mut()
            .push(format!("Turn {turn}! Next limit: {score_limit}"));
    }

    fn on_game_over(&mut self, state: &GameState) {
        self.messages.borrow_mut().push(game_over_line(state));
    }
}

fn game_over_line(state: &GameState) -> String {
    format!(
        "Game over, {}: {} points in {} turns",
        state.player_name(),
        state.score(),
        state.turn()
    )
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Select(Option<Animal>),
    Place(Pos),
    Preview(Pos),
    Undo,
    Redo,
    Name(String),
    Show,
    Help,
    Quit,
}

fn parse_pos<'a>(mut args: impl Iterator<Item = &'a str>) -> Result<Pos, String> {
    let mut coord = || -> Result<usize, String> {
        let raw = args.next().ok_or("expected <x> <y>")?;
        raw.parse().map_err(|_| format!("not a coordinate: {raw}"))
    };
    let x = coord()?;
    let y = coord()?;
    Ok(Pos::new(x, y))
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "select" | "s" => match words.next() {
            None | Some("none") => Command::Select(None),
            Some(name) => Command::Select(Some(name.parse().map_err(|e| format!("{e}"))?)),
        },
        "place" | "p" => Command::Place(parse_pos(words)?),
        "preview" | "v" => Command::Preview(parse_pos(words)?),
        "undo" | "u" => Command::Undo,
        "redo" | "r" => Command::Redo,
        "name" => {
            let rest: Vec<&str> = words.collect();
            Command::Name(rest.join(" "))
        }
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(Some(command))
}

/// Name length bounds applied by the `name` command.
#[derive(Debug, Clone, Copy)]
pub struct NameBounds {
    pub min: usize,
    pub max: usize,
}

pub struct Game<'a, W: Write> {
    session: &'a mut Session,
    announcer: Announcer,
    bounds: NameBounds,
    out: W,
}

impl<'a, W: Write> Game<'a, W> {
    /// Attach to a session with a started game.
    pub fn new(session: &'a mut Session, bounds: NameBounds, out: W) -> Self {
        let announcer = Announcer::default();
        session.set_observer(Box::new(announcer.clone()));
        Self {
            session,
            announcer,
            bounds,
            out,
        }
    }

    fn show(&mut self) -> Result<()> {
        if let Some(state) = self.session.state() {
            writeln!(self.out, "{}", crate::render::game(state))?;
        }
        Ok(())
    }

    /// Run until `quit`, end of input, or game over.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        self.show()?;
        if let Some(state) = self.session.state().filter(|s| s.is_game_over()) {
            writeln!(self.out, "{}", game_over_line(state))?;
            self.out.flush()?;
            return Ok(());
        }
        writeln!(self.out, "type 'help' for commands")?;

        for line in input.lines() {
            let line = line?;
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    writeln!(self.out, "{message}")?;
                    continue;
                }
            };
            debug!(?command, "command");
            if command == Command::Quit {
                break;
            }
            self.apply(command)?;
            for message in self.announcer.drain() {
                writeln!(self.out, "{message}")?;
            }
            if self.session.is_game_over() {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Select(animal) => {
                if !self.session.select_animal(animal)? {
                    writeln!(self.out, "no {} left", animal.map_or("animal", Animal::name))?;
                }
                self.show()?;
            }
            Command::Place(pos) => match self.session.place(pos) {
                Ok(outcome) => {
                    writeln!(self.out, "{} at {pos}: +{}", outcome.animal, outcome.score_delta)?;
                    self.show()?;
                }
                Err(err) => writeln!(self.out, "{err}")?,
            },
            Command::Preview(pos) => match self.session.preview(pos) {
                Some(contributions) => {
                    writeln!(self.out, "{}", crate::render::contributions(&contributions))?
                }
                None => writeln!(self.out, "cannot place there")?,
            },
            Command::Undo => match self.session.undo() {
                Ok(()) => self.show()?,
                Err(err @ HistoryError::NothingToUndo) => writeln!(self.out, "{err}")?,
                Err(err) => return Err(err.into()),
            },
            Command::Redo => match self.session.redo() {
                Ok(_) => self.show()?,
                Err(err @ HistoryError::NothingToRedo) => writeln!(self.out, "{err}")?,
                Err(err) => return Err(err.into()),
            },
            Command::Name(name) => {
                match validate_player_name(&name, self.bounds.min, self.bounds.max) {
                    Ok(()) => {
                        self.session.set_player_name(&name)?;
                        self.show()?;
                    }
                    Err(err) => writeln!(self.out, "{err}")?,
                }
            }
            Command::Show => self.show()?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => {}
        }
        Ok(())
    }
}
