//! Line-based input console.
//!
//! Each input line becomes one command. Edge words (`hand`, `point`, `force`,
//! `grab`, `drop`, `cast`, `reload`) may be combined on one line and are
//! delivered as key-down edges in a single frame; an empty line advances one
//! idle frame.
use anyhow::{Context, Result, bail};
use glam::Vec3;
use tokio::io::{AsyncBufReadExt, BufReader};

use hunt_core::{EntityId, InputEdges, PlayerInput, Pose, Ray, TickInput};
use hunt_runtime::RuntimeHandle;

use crate::config::CliConfig;
use crate::presentation;

const EYE_HEIGHT: f32 = 1.6;
/// Eye sits slightly in front of the head collider.
const EYE_FORWARD: f32 = 0.5;

pub const HELP: &str = "\
commands:
  hand | point | force | grab | drop | cast | reload   key-down edges, combinable
  aim <x> <y> <z>      look at a world point
  move <x> <z>         walk to a spot
  wait <ms>            advance the clock without input
  cure <id>            restore a frog
  recharge <id>        refill a wand
  status               show the local player
  help | quit";

/// One parsed console line.
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    Frame(InputEdges),
    Aim(Vec3),
    Move(Vec3),
    Wait(u64),
    Cure(EntityId),
    Recharge(EntityId),
    Status,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<Line> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Line::Frame(InputEdges::empty()));
    };
    let rest: Vec<&str> = words.collect();

    let parsed = match head {
        "aim" => Line::Aim(vec3(&rest)?),
        "move" => match rest.as_slice() {
            [x, z] => Line::Move(Vec3::new(number(x)?, 0.0, number(z)?)),
            _ => bail!("usage: move <x> <z>"),
        },
        "wait" => Line::Wait(single(&rest, "wait <ms>")?),
        "cure" => Line::Cure(EntityId(single(&rest, "cure <id>")?)),
        "recharge" => Line::Recharge(EntityId(single(&rest, "recharge <id>")?)),
        "status" => Line::Status,
        "help" | "?" => Line::Help,
        "quit" | "exit" => Line::Quit,
        _ => {
            let mut edges = InputEdges::empty();
            for word in std::iter::once(head).chain(rest) {
                edges |= edge(word)?;
            }
            Line::Frame(edges)
        }
    };
    Ok(parsed)
}

fn edge(word: &str) -> Result<InputEdges> {
    Ok(match word {
        "hand" => InputEdges::TOGGLE_HAND,
        "point" => InputEdges::POINT,
        "force" => InputEdges::FORCE_POINT,
        "grab" => InputEdges::INTERACT,
        "drop" => InputEdges::DROP,
        "cast" => InputEdges::CAST,
        "reload" => InputEdges::RELOAD,
        other => bail!("unknown command '{other}' (try 'help')"),
    })
}

fn number(word: &str) -> Result<f32> {
    word.parse()
        .with_context(|| format!("'{word}' is not a number"))
}

fn vec3(words: &[&str]) -> Result<Vec3> {
    match words {
        [x, y, z] => Ok(Vec3::new(number(x)?, number(y)?, number(z)?)),
        _ => bail!("usage: aim <x> <y> <z>"),
    }
}

fn single<T>(words: &[&str], usage: &str) -> Result<T>
where
    T: std::str::FromStr,
{
    match words {
        [value] => value
            .parse()
            .ok()
            .with_context(|| format!("usage: {usage}")),
        _ => bail!("usage: {usage}"),
    }
}

/// Where the console player stands and looks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pilot {
    pub player: EntityId,
    pub feet: Vec3,
    pub look_at: Vec3,
}

impl Pilot {
    fn forward(&self) -> Vec3 {
        let flat = (self.look_at - self.feet) * Vec3::new(1.0, 0.0, 1.0);
        flat.try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    fn eye(&self) -> Vec3 {
        self.feet + Vec3::Y * EYE_HEIGHT + self.forward() * EYE_FORWARD
    }

    pub fn input(&self, edges: InputEdges) -> PlayerInput {
        let eye = self.eye();
        PlayerInput::idle(
            self.player,
            Ray::new(eye, self.look_at - eye),
            Pose::new(self.feet, self.forward()),
        )
        .with_edges(edges)
    }
}

/// Reads stdin until EOF or `quit`, driving the runtime one line at a time.
pub async fn run(handle: RuntimeHandle, config: &CliConfig) -> Result<()> {
    let mut pilot = Pilot {
        player: config.player,
        feet: Vec3::ZERO,
        look_at: config.rival_position + Vec3::Y * EYE_HEIGHT,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    while let Some(line) = lines.next_line().await? {
        let parsed = match parse(&line) {
            Ok(parsed) => parsed,
            Err(err) => {
                println!("! {err}");
                continue;
            }
        };

        match parsed {
            Line::Frame(edges) => {
                let outcome = handle.tick(tick(config, pilot, edges)).await?;
                presentation::print_rejections(&outcome.rejections);
            }
            Line::Aim(point) => pilot.look_at = point,
            Line::Move(feet) => {
                pilot.look_at += feet - pilot.feet;
                pilot.feet = feet;
                let outcome = handle.tick(tick(config, pilot, InputEdges::empty())).await?;
                presentation::print_rejections(&outcome.rejections);
            }
            Line::Wait(ms) => {
                handle.advance(ms).await?;
            }
            Line::Cure(player) => match handle.cure(player).await {
                Ok(outcome) => println!("cure {player}: {outcome}"),
                Err(err) => println!("! {err}"),
            },
            Line::Recharge(wand) => match handle.recharge(wand).await {
                Ok(true) => println!("recharged {wand}"),
                Ok(false) => println!("{wand} is already full"),
                Err(err) => println!("! {err}"),
            },
            Line::Status => {
                let state = handle.query_state().await?;
                for line in presentation::status_lines(&state, pilot.player) {
                    println!("{line}");
                }
            }
            Line::Help => println!("{HELP}"),
            Line::Quit => break,
        }
    }
    Ok(())
}

fn tick(config: &CliConfig, pilot: Pilot, edges: InputEdges) -> TickInput {
    TickInput {
        dt_ms: config.frame_ms,
        players: vec![pilot.input(edges)],
        collisions: Vec::new(),
    }
}
