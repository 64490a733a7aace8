use std::cell::RefCell;
use std::io::{self, Write};

use log::debug;

use crate::config::RunnerConfig;
use crate::SharedPtr;

pub struct Observer {
    number: usize,
    last_message: RefCell<Option<String>>,
}

impl Observer {
    pub fn new(number: usize) -> SharedPtr<Observer> {
        SharedPtr::new(Observer {
            number,
            last_message: RefCell::new(None),
        })
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn last_message(&self) -> Option<String> {
        self.last_message.borrow().clone()
    }

    fn update(&self, message: &str) {
        *self.last_message.borrow_mut() = Some(message.to_string());
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        debug!("Goodbye, I was the Observer \"{}\".", self.number);
    }
}

/// Keeps its observers in attach order. Observers do not point back at the
/// subject, so the ownership graph has no cycles.
#[derive(Default)]
pub struct Subject {
    observers: RefCell<Vec<SharedPtr<Observer>>>,
    message: RefCell<String>,
}

impl Subject {
    pub fn new() -> SharedPtr<Subject> {
        SharedPtr::new(Subject::default())
    }

    pub fn attach(&self, observer: &SharedPtr<Observer>) {
        self.observers.borrow_mut().push(observer.clone());
    }

    /// Drops every entry sharing `observer`'s control block.
    pub fn detach(&self, observer: &SharedPtr<Observer>) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|attached| attached != observer);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn notify(&self, out: &mut dyn Write) -> io::Result<()> {
        let observers = self.observers.borrow();
        writeln!(out, "There are {} observers in the list.", observers.len())?;

        let message = self.message.borrow();
        for observer in observers.iter() {
            observer.update(&message);
            writeln!(
                out,
                "Observer \"{}\": a new message is available --> {}",
                observer.number, message
            )?;
        }
        Ok(())
    }

    pub fn create_message(&self, message: &str, out: &mut dyn Write) -> io::Result<()> {
        *self.message.borrow_mut() = message.to_string();
        self.notify(out)
    }
}

fn remove_from(
    subject: &Subject,
    observer: &SharedPtr<Observer>,
    out: &mut dyn Write,
) -> io::Result<()> {
    if subject.detach(observer) {
        writeln!(out, "Observer \"{}\" removed from the list.", observer.number)?;
    }
    Ok(())
}

fn join(subject: &Subject, number: usize, out: &mut dyn Write) -> io::Result<SharedPtr<Observer>> {
    let observer = Observer::new(number);
    subject.attach(&observer);
    writeln!(out, "Hi, I'm the Observer \"{number}\".")?;
    Ok(observer)
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let subject = Subject::new();

    let observer1 = join(&subject, 1, out)?;
    let observer2 = join(&subject, 2, out)?;
    let observer3 = join(&subject, 3, out)?;

    subject.create_message("Hello World! :D", out)?;
    remove_from(&subject, &observer3, out)?;

    subject.create_message("The weather is hot today! :p", out)?;
    let observer4 = join(&subject, 4, out)?;

    remove_from(&subject, &observer2, out)?;
    let observer5 = join(&subject, 5, out)?;

    subject.create_message("My new car is great! ;)", out)?;
    remove_from(&subject, &observer5, out)?;
    remove_from(&subject, &observer4, out)?;
    remove_from(&subject, &observer1, out)?;

    writeln!(
        out,
        "Observer \"{}\" last heard: {}",
        observer3.number(),
        observer3.last_message().unwrap_or_default()
    )
}
