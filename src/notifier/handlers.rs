// SPDX-License-Identifier: GPL-3.0-only
use crate::notifier::traits::NotificationHandler;

/// Prints one line per change to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleHandler;

impl ConsoleHandler {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationHandler for ConsoleHandler {
    fn on_create(&self, name: &str) {
        println!("{name} added.");
    }

    fn on_delete(&self, name: &str) {
        println!("{name} deleted.");
    }
}

/// Adapts a pair of closures to [`NotificationHandler`]
pub struct CallbackHandler<C, D> {
    on_create: C,
    on_delete: D,
}

impl<C, D> CallbackHandler<C, D>
where
    C: Fn(&str) + Send + Sync,
    D: Fn(&str) + Send + Sync,
{
    pub fn new(on_create: C, on_delete: D) -> Self {
        Self { on_create, on_delete }
    }
}

impl<C, D> NotificationHandler for CallbackHandler<C, D>
where
    C: Fn(&str) + Send + Sync,
    D: Fn(&str) + Send + Sync,
{
    fn on_create(&self, name: &str) {
        (self.on_create)(name)
    }

    fn on_delete(&self, name: &str) {
        (self.on_delete)(name)
    }
}
