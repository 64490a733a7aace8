//! Components that only talk to each other through a mediator.
//!
//! The mediator owns its components and each component holds the mediator,
//! so the two form an ownership cycle. [`ComponentMediator::dismiss`] clears
//! the components' links and must be called to let everything go.

use std::cell::RefCell;
use std::io::{self, Write};

use log::debug;

use crate::config::RunnerConfig;
use crate::SharedPtr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    A,
    B,
    C,
    D,
}

pub trait Mediator {
    fn notify(&self, event: Event, out: &mut dyn Write) -> io::Result<()>;
}

/// Storage for the mediator link every component carries.
#[derive(Default)]
pub struct MediatorLink {
    mediator: RefCell<SharedPtr<dyn Mediator>>,
}

impl MediatorLink {
    pub fn set(&self, mediator: SharedPtr<dyn Mediator>) {
        *self.mediator.borrow_mut() = mediator;
    }

    pub fn clear(&self) {
        SharedPtr::reset(&mut *self.mediator.borrow_mut());
    }

    pub fn is_linked(&self) -> bool {
        SharedPtr::is_owning(&*self.mediator.borrow())
    }

    fn notify(&self, event: Event, out: &mut dyn Write) -> io::Result<()> {
        // Cloned out so the mediator may relink components while handling.
        let mediator = self.mediator.borrow().clone();
        match SharedPtr::get(&mediator) {
            Some(mediator) => mediator.notify(event, out),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct Component1 {
    link: MediatorLink,
}

impl Component1 {
    pub fn new() -> SharedPtr<Component1> {
        SharedPtr::new(Component1::default())
    }

    pub fn link(&self) -> &MediatorLink {
        &self.link
    }

    pub fn do_a(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Component 1 does A.")?;
        self.link.notify(Event::A, out)
    }

    pub fn do_b(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Component 1 does B.")?;
        self.link.notify(Event::B, out)
    }
}

#[derive(Default)]
pub struct Component2 {
    link: MediatorLink,
}

impl Component2 {
    pub fn new() -> SharedPtr<Component2> {
        SharedPtr::new(Component2::default())
    }

    pub fn link(&self) -> &MediatorLink {
        &self.link
    }

    pub fn do_c(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Component 2 does C.")?;
        self.link.notify(Event::C, out)
    }

    pub fn do_d(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Component 2 does D.")?;
        self.link.notify(Event::D, out)
    }
}

pub struct ComponentMediator {
    component1: SharedPtr<Component1>,
    component2: SharedPtr<Component2>,
}

impl ComponentMediator {
    /// Takes shares of both components and links them back to the mediator.
    pub fn new(
        component1: &SharedPtr<Component1>,
        component2: &SharedPtr<Component2>,
    ) -> SharedPtr<ComponentMediator> {
        let mediator = SharedPtr::new(ComponentMediator {
            component1: component1.clone(),
            component2: component2.clone(),
        });
        let shared = SharedPtr::upcast::<dyn Mediator>(&mediator, |m| m);
        component1.link().set(shared.clone());
        component2.link().set(shared);
        mediator
    }

    /// Unlinks both components, breaking the ownership cycle.
    pub fn dismiss(&self) {
        debug!("dismissing mediator");
        self.component1.link().clear();
        self.component2.link().clear();
    }
}

impl Mediator for ComponentMediator {
    fn notify(&self, event: Event, out: &mut dyn Write) -> io::Result<()> {
        match event {
            Event::A => {
                writeln!(out, "Mediator reacts on A and triggers following operations:")?;
                self.component2.do_c(out)
            }
            Event::D => {
                writeln!(out, "Mediator reacts on D and triggers following operations:")?;
                self.component1.do_b(out)?;
                self.component2.do_c(out)
            }
            Event::B | Event::C => Ok(()),
        }
    }
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let c1 = Component1::new();
    let c2 = Component2::new();
    let mediator = ComponentMediator::new(&c1, &c2);

    writeln!(out, "Client triggers operation A.")?;
    c1.do_a(out)?;
    writeln!(out, "\nClient triggers operation D.")?;
    c2.do_d(out)?;

    mediator.dismiss();
    writeln!(
        out,
        "\nMediator dismissed, {} owner(s) left.",
        SharedPtr::use_count(&mediator)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(action: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        action(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_event_a_triggers_c() {
        let c1 = Component1::new();
        let c2 = Component2::new();
        let mediator = ComponentMediator::new(&c1, &c2);

        let text = transcript(|out| c1.do_a(out));
        assert_eq!(
            text,
            "Component 1 does A.\n\
             Mediator reacts on A and triggers following operations:\n\
             Component 2 does C.\n"
        );
        mediator.dismiss();
    }

    #[test]
    fn test_event_d_triggers_b_and_c() {
        let c1 = Component1::new();
        let c2 = Component2::new();
        let mediator = ComponentMediator::new(&c1, &c2);

        let text = transcript(|out| c2.do_d(out));
        assert_eq!(
            text,
            "Component 2 does D.\n\
             Mediator reacts on D and triggers following operations:\n\
             Component 1 does B.\n\
             Component 2 does C.\n"
        );
        mediator.dismiss();
    }

    #[test]
    fn test_unlinked_component_works_alone() {
        let c1 = Component1::new();
        assert!(!c1.link().is_linked());
        assert_eq!(transcript(|out| c1.do_a(out)), "Component 1 does A.\n");
    }

    #[test]
    fn test_dismiss_breaks_cycle() {
        let c1 = Component1::new();
        let c2 = Component2::new();
        let mediator = ComponentMediator::new(&c1, &c2);

        assert_eq!(SharedPtr::use_count(&mediator), 3);
        assert_eq!(SharedPtr::use_count(&c1), 2);
        assert!(c2.link().is_linked());

        mediator.dismiss();
        assert_eq!(SharedPtr::use_count(&mediator), 1);
        assert!(!c1.link().is_linked());

        drop(mediator);
        assert_eq!(SharedPtr::use_count(&c1), 1);
        assert_eq!(SharedPtr::use_count(&c2), 1);
    }

    #[test]
    fn test_demo_transcript() {
        let text = transcript(|out| run(out, &RunnerConfig::default()));

        assert!(text.starts_with("Client triggers operation A.\nComponent 1 does A.\n"));
        assert!(text.contains("Mediator reacts on D"));
        assert!(text.ends_with("Mediator dismissed, 1 owner(s) left.\n"));
    }
}
