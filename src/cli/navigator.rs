//! Terminal rendition of identity-provider redirects.

use super::output::Output;
use crate::auth::Navigator;
use parking_lot::Mutex;

/// Prints redirect targets for the user to open, remembering the last one.
#[derive(Debug)]
pub struct TerminalNavigator {
    output: Output,
    last: Mutex<Option<String>>,
}

impl TerminalNavigator {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            last: Mutex::new(None),
        }
    }

    /// Most recent redirect target, if any.
    pub fn last(&self) -> Option<String> {
        self.last.lock().clone()
    }
}

impl Navigator for TerminalNavigator {
    fn redirect(&self, url: &str) {
        self.output.redirect(url);
        *self.last.lock() = Some(url.to_string());
    }
}
