//! Single shared instance without global state.
//!
//! `CompositionRoot` builds the one `PrintSpooler` lazily and hands out
//! `Rc` clones; every consumer receives the spooler as a dependency.
//!
//! # Invariants
//! - One composition root constructs at most one spooler.
//! - `instances_created()` counts constructions, not handles.

use log::debug;
use once_cell::unsync::OnceCell;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct PrintSpooler {
    printed: RefCell<Vec<String>>,
}

impl PrintSpooler {
    pub fn print_details(&self, message: &str) {
        debug!("event=spooler_print module=singleton status=ok chars={}", message.len());
        self.printed.borrow_mut().push(message.to_string());
    }

    pub fn printed(&self) -> Vec<String> {
        self.printed.borrow().clone()
    }
}

#[derive(Debug, Default)]
pub struct CompositionRoot {
    spooler: OnceCell<Rc<PrintSpooler>>,
    created: Cell<usize>,
}

impl CompositionRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spooler(&self) -> Rc<PrintSpooler> {
        Rc::clone(self.spooler.get_or_init(|| {
            self.created.set(self.created.get() + 1);
            Rc::new(PrintSpooler::default())
        }))
    }

    pub fn instances_created(&self) -> usize {
        self.created.get()
    }
}

/// Consumer that receives the spooler instead of looking it up.
pub struct ReportPrinter {
    spooler: Rc<PrintSpooler>,
    source: String,
}

impl ReportPrinter {
    pub fn new(spooler: Rc<PrintSpooler>, source: impl Into<String>) -> Self {
        Self {
            spooler,
            source: source.into(),
        }
    }

    pub fn print(&self) {
        self.spooler.print_details(&format!("From {}", self.source));
    }
}
