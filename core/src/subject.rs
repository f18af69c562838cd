//! Subject position lookup and teleport commands.

use subhop_rcon::{CommandChannel, RconError};
use subhop_types::{Position, SubjectName, WORLD_BORDER};

const NO_ENTITY_MARKER: &str = "No entity was found";

/// Vanilla clamps entity heights to this magnitude.
const MAX_ENTITY_HEIGHT: i32 = 20_000_000;

/// Parse the reply to `data get entity <name> Pos`.
///
/// The reply ends with a bracketed triple such as `[-12.5d, 64.0d, 3.2d]`.
/// Components are floored to the containing block. Returns `None` for the
/// no-entity reply, for coordinates beyond the world border, or any other
/// shape; a partial triple is never accepted.
#[must_use]
pub fn parse_entity_position(response: &str) -> Option<Position> {
    if response.contains(NO_ENTITY_MARKER) {
        return None;
    }
    let start = response.rfind('[')?;
    let end = start + response[start..].find(']')?;
    let mut parts = response[start + 1..end].split(',');

    let x = parse_component(parts.next()?, WORLD_BORDER)?;
    let y = parse_component(parts.next()?, MAX_ENTITY_HEIGHT)?;
    let z = parse_component(parts.next()?, WORLD_BORDER)?;
    if parts.next().is_some() {
        return None;
    }
    Some(Position::new(x, y, z))
}

fn parse_component(raw: &str, limit: i32) -> Option<i32> {
    let trimmed = raw.trim();
    let numeric = trimmed
        .strip_suffix(['d', 'D', 'f', 'F'])
        .unwrap_or(trimmed);
    let value: f64 = numeric.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let floored = value.floor();
    if floored.abs() > f64::from(limit) {
        return None;
    }
    Some(floored as i32)
}

/// Ask the server where `subject` is.
///
/// `Ok(None)` when the entity is absent or the reply is malformed; `Err` only
/// for transport failures.
pub async fn lookup_position<C: CommandChannel>(
    channel: &mut C,
    subject: &SubjectName,
) -> Result<Option<Position>, RconError> {
    let response = channel
        .send(&format!("data get entity {subject} Pos"))
        .await?;
    let position = parse_entity_position(&response);
    if position.is_none() {
        tracing::warn!(subject = %subject, response = %response, "Subject position unavailable");
    }
    Ok(position)
}

/// Move `subject` to `position`.
///
/// `Ok(false)` when the server reports the subject is gone; `Err` only for
/// transport failures.
pub async fn teleport<C: CommandChannel>(
    channel: &mut C,
    subject: &SubjectName,
    position: Position,
) -> Result<bool, RconError> {
    let response = channel.send(&format!("tp {subject} {position}")).await?;
    tracing::debug!(subject = %subject, response = %response, "Teleport reply");
    if response.contains(NO_ENTITY_MARKER) {
        tracing::warn!(subject = %subject, "Subject left before teleport");
        return Ok(false);
    }
    tracing::info!(subject = %subject, x = position.x, y = position.y, z = position.z, "Teleported");
    Ok(true)
}
