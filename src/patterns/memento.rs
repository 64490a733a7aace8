use std::cell::RefCell;
use std::io::{self, Write};

use chrono::{DateTime, Local};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::config::RunnerConfig;
use crate::SharedPtr;

/// A frozen copy of the originator's state.
#[derive(Debug, Clone)]
pub struct Memento {
    state: String,
    date: DateTime<Local>,
}

impl Memento {
    fn new(state: String) -> Self {
        Memento {
            state,
            date: Local::now(),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn date(&self) -> DateTime<Local> {
        self.date
    }

    pub fn name(&self) -> String {
        let preview: String = self.state.chars().take(9).collect();
        format!("{} / ({preview}...)", self.date.format("%Y-%m-%d %H:%M:%S"))
    }
}

pub struct Originator {
    state: RefCell<String>,
}

impl Originator {
    pub fn new(state: impl Into<String>) -> SharedPtr<Originator> {
        SharedPtr::new(Originator {
            state: RefCell::new(state.into()),
        })
    }

    pub fn state(&self) -> String {
        self.state.borrow().clone()
    }

    /// Replaces the state with 30 random alphanumeric characters.
    pub fn do_something<R: Rng>(&self, rng: &mut R) -> String {
        let next: String = rng
            .sample_iter(&Alphanumeric)
            .take(30)
            .map(char::from)
            .collect();
        *self.state.borrow_mut() = next.clone();
        next
    }

    pub fn save(&self) -> SharedPtr<Memento> {
        SharedPtr::new(Memento::new(self.state()))
    }

    pub fn restore(&self, memento: &Memento) {
        *self.state.borrow_mut() = memento.state.clone();
    }
}

/// Owns the history of snapshots; the originator is shared with the client.
pub struct Caretaker {
    mementos: RefCell<Vec<SharedPtr<Memento>>>,
    originator: SharedPtr<Originator>,
}

impl Caretaker {
    pub fn new(originator: &SharedPtr<Originator>) -> SharedPtr<Caretaker> {
        SharedPtr::new(Caretaker {
            mementos: RefCell::new(Vec::new()),
            originator: originator.clone(),
        })
    }

    pub fn backup(&self) {
        let memento = self.originator.save();
        self.mementos.borrow_mut().push(memento);
    }

    /// Restores the newest snapshot and hands it back, or `None` when the
    /// history is empty.
    pub fn undo(&self) -> Option<SharedPtr<Memento>> {
        let memento = self.mementos.borrow_mut().pop()?;
        self.originator.restore(&memento);
        Some(memento)
    }

    pub fn history(&self) -> Vec<String> {
        self.mementos.borrow().iter().map(|memento| memento.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.mementos.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mementos.borrow().is_empty()
    }
}

pub fn run(out: &mut dyn Write, config: &RunnerConfig) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let originator = Originator::new("Super-duper-super-super.");
    writeln!(out, "Originator: My initial state is: {}", originator.state())?;
    let caretaker = Caretaker::new(&originator);

    for _ in 0..config.memento.snapshots {
        writeln!(out, "\nCaretaker: Saving Originator's state...")?;
        caretaker.backup();
        writeln!(out, "Originator: I'm doing something important.")?;
        let state = originator.do_something(&mut rng);
        writeln!(out, "Originator: and my state has changed to: {state}")?;
    }

    writeln!(out, "\nCaretaker: Here's the list of mementos:")?;
    for name in caretaker.history() {
        writeln!(out, "{name}")?;
    }

    writeln!(out, "\nClient: Now, let's rollback!\n")?;
    if let Some(memento) = caretaker.undo() {
        writeln!(out, "Caretaker: Restoring state to: {}", memento.name())?;
        writeln!(out, "Originator: My state has changed to: {}", originator.state())?;
    }

    writeln!(out, "\nClient: Once more!\n")?;
    match caretaker.undo() {
        Some(memento) => {
            writeln!(out, "Caretaker: Restoring state to: {}", memento.name())?;
            writeln!(out, "Originator: My state has changed to: {}", originator.state())
        }
        None => writeln!(out, "Caretaker: Nothing left to restore."),
    }
}
