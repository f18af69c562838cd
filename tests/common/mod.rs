//! Shared test utilities and fixtures
//!
//! A synthetic world that answers the same text commands a real server does.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use subhop_config::{Settings, SubhopConfig};
use subhop_rcon::{CommandChannel, RconError};
use subhop_types::{ChunkCoord, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Air,
    Solid,
    Hazard,
}

/// In-memory world keyed by block position.
pub struct SyntheticWorld {
    terrain: Box<dyn Fn(Position) -> Block + Send>,
    /// Chunks answering "not loaded" until force-loaded.
    pub unloaded: HashSet<ChunkCoord>,
    /// When set, `forceload add` is acknowledged but the chunk never loads.
    pub stubborn: bool,
    pub forced: HashSet<ChunkCoord>,
    pub add_requests: HashMap<ChunkCoord, u32>,
    pub subject: Option<(String, String)>,
    pub teleports: Vec<Position>,
    /// Subject logs off between the lookup and the teleport.
    pub departs_before_tp: bool,
    pub log: Vec<String>,
    pub fail_all: bool,
}

impl SyntheticWorld {
    pub fn new(terrain: impl Fn(Position) -> Block + Send + 'static) -> Self {
        Self {
            terrain: Box::new(terrain),
            unloaded: HashSet::new(),
            stubborn: false,
            forced: HashSet::new(),
            add_requests: HashMap::new(),
            subject: None,
            teleports: Vec::new(),
            departs_before_tp: false,
            log: Vec::new(),
            fail_all: false,
        }
    }

    /// Solid below `surface`, air from `surface` up.
    pub fn flat(surface: i32) -> Self {
        Self::new(move |p| if p.y < surface { Block::Solid } else { Block::Air })
    }

    pub fn with_subject(mut self, name: &str, pos: &str) -> Self {
        self.subject = Some((name.to_string(), pos.to_string()));
        self
    }

    /// Candidate positions probed by the first predicate (floor check, y - 1).
    pub fn probed_columns(&self) -> Vec<Position> {
        self.log
            .iter()
            .filter(|c| c.starts_with("execute positioned") && c.contains("unless block ~ ~ ~ minecraft:air"))
            .map(|c| {
                let p = parse_xyz(c, 2);
                p.with_y(p.y + 1)
            })
            .collect()
    }

    pub fn total_add_requests(&self) -> u32 {
        self.add_requests.values().sum()
    }

    fn predicate(&self, command: &str) -> String {
        let target = parse_xyz(command, 2);
        let chunk = target.chunk();
        if self.unloaded.contains(&chunk) && !(self.forced.contains(&chunk) && !self.stubborn) {
            return "That position is not loaded".to_string();
        }

        let parts: Vec<&str> = command.split_whitespace().collect();
        let polarity = parts[5];
        let tag = parts[10];
        let block = (self.terrain)(target);
        let matches = match tag {
            "minecraft:air" => block == Block::Air,
            t if t.starts_with('#') => block == Block::Hazard,
            _ => false,
        };
        if (polarity == "if") == matches {
            "Test passed".to_string()
        } else {
            "Test failed".to_string()
        }
    }

    fn forceload(&mut self, command: &str) -> String {
        let parts: Vec<i32> = command
            .split_whitespace()
            .skip(2)
            .map(|s| s.parse().unwrap())
            .collect();
        let chunk = Position::new(parts[0], 0, parts[1]).chunk();
        if command.starts_with("forceload query") {
            if self.forced.contains(&chunk) {
                format!("Chunk at {chunk} is marked for force loading")
            } else {
                format!("Chunk at {chunk} is not marked for force loading")
            }
        } else {
            self.forced.insert(chunk);
            *self.add_requests.entry(chunk).or_default() += 1;
            format!("Marked chunk {chunk} to be force loaded")
        }
    }
}

fn parse_xyz(command: &str, skip: usize) -> Position {
    let nums: Vec<i32> = command
        .split_whitespace()
        .skip(skip)
        .take(3)
        .map(|s| s.parse().unwrap())
        .collect();
    Position::new(nums[0], nums[1], nums[2])
}

impl CommandChannel for SyntheticWorld {
    async fn send(&mut self, command: &str) -> Result<String, RconError> {
        self.log.push(command.to_string());
        if self.fail_all {
            return Err(RconError::Closed);
        }
        if command.starts_with("execute positioned") {
            return Ok(self.predicate(command));
        }
        if command.starts_with("forceload") {
            return Ok(self.forceload(command));
        }
        if let Some(name) = command
            .strip_prefix("data get entity ")
            .and_then(|rest| rest.strip_suffix(" Pos"))
        {
            return Ok(match &self.subject {
                Some((subject, pos)) if subject == name => {
                    format!("{subject} has the following entity data: {pos}")
                }
                _ => "No entity was found".to_string(),
            });
        }
        if let Some(rest) = command.strip_prefix("tp ") {
            if self.departs_before_tp {
                return Ok("No entity was found".to_string());
            }
            let target = parse_xyz(rest, 1);
            self.teleports.push(target);
            return Ok(format!("Teleported {} to {target}", rest.split(' ').next().unwrap_or("")));
        }
        Ok(format!("Unknown or incomplete command: {command}"))
    }
}

/// Default settings with no teleport delay and the given subject.
pub fn settings_for(subject: &str) -> Settings {
    let toml = format!("[search]\nsubject = \"{subject}\"\nteleport_delay_secs = 0\n");
    Settings::from_config(SubhopConfig::parse(&toml).unwrap()).unwrap()
}
