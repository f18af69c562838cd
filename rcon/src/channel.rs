use std::future::Future;

use crate::{RconError, RconSession};

/// Anything that can carry one textual command and return the textual reply.
///
/// Implemented by [`RconSession`] for the real server; tests implement it
/// over an in-memory world.
pub trait CommandChannel {
    fn send(&mut self, command: &str) -> impl Future<Output = Result<String, RconError>> + Send;
}

impl CommandChannel for RconSession {
    fn send(&mut self, command: &str) -> impl Future<Output = Result<String, RconError>> + Send {
        self.execute(command)
    }
}

impl<T: CommandChannel> CommandChannel for &mut T {
    fn send(&mut self, command: &str) -> impl Future<Output = Result<String, RconError>> + Send {
        (**self).send(command)
    }
}
