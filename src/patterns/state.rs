//! A context whose behaviour is delegated to its current state.
//!
//! States never hold their context. A handler returns the state to switch
//! to, and the context applies the transition, so there is no ownership
//! cycle between the two.

use std::cell::RefCell;
use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

pub type Transition = Option<SharedPtr<dyn State>>;

pub trait State {
    fn handle1(&self, out: &mut dyn Write) -> io::Result<Transition>;
    fn handle2(&self, out: &mut dyn Write) -> io::Result<Transition>;
}

pub fn state<S: State + 'static>(state: S) -> SharedPtr<dyn State> {
    SharedPtr::upcast::<dyn State>(&SharedPtr::new(state), |s| s)
}

pub struct StateA;

impl State for StateA {
    fn handle1(&self, out: &mut dyn Write) -> io::Result<Transition> {
        writeln!(out, "ConcreteStateA handles request1.")?;
        writeln!(out, "ConcreteStateA wants to change the state of the context.")?;
        Ok(Some(state(StateB)))
    }

    fn handle2(&self, out: &mut dyn Write) -> io::Result<Transition> {
        writeln!(out, "ConcreteStateA handles request2.")?;
        Ok(None)
    }
}

pub struct StateB;

impl State for StateB {
    fn handle1(&self, out: &mut dyn Write) -> io::Result<Transition> {
        writeln!(out, "ConcreteStateB handles request1.")?;
        Ok(None)
    }

    fn handle2(&self, out: &mut dyn Write) -> io::Result<Transition> {
        writeln!(out, "ConcreteStateB handles request2.")?;
        writeln!(out, "ConcreteStateB wants to change the state of the context.")?;
        Ok(Some(state(StateA)))
    }
}

pub struct Context {
    state: RefCell<SharedPtr<dyn State>>,
}

impl Context {
    pub fn new(initial: SharedPtr<dyn State>, out: &mut dyn Write) -> io::Result<Self> {
        let context = Context {
            state: RefCell::new(SharedPtr::empty()),
        };
        context.transition_to(initial, out)?;
        Ok(context)
    }

    pub fn state(&self) -> SharedPtr<dyn State> {
        self.state.borrow().clone()
    }

    /// Short name of the current state's concrete type.
    pub fn state_name(&self) -> &'static str {
        let full = SharedPtr::type_name(&*self.state.borrow()).unwrap_or("<none>");
        full.rsplit("::").next().unwrap_or(full)
    }

    pub fn transition_to(
        &self,
        state: SharedPtr<dyn State>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        *self.state.borrow_mut() = state;
        writeln!(out, "Context: Transition to {}.", self.state_name())
    }

    pub fn request1(&self, out: &mut dyn Write) -> io::Result<()> {
        // The current state stays alive through its own handle while it runs.
        let current = self.state();
        if let Some(next) = current.handle1(out)? {
            self.transition_to(next, out)?;
        }
        Ok(())
    }

    pub fn request2(&self, out: &mut dyn Write) -> io::Result<()> {
        let current = self.state();
        if let Some(next) = current.handle2(out)? {
            self.transition_to(next, out)?;
        }
        Ok(())
    }
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let context = SharedPtr::new(Context::new(state(StateA), out)?);
    context.request1(out)?;
    context.request2(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_transition() {
        let mut out = Vec::new();
        let context = Context::new(state(StateB), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Context: Transition to StateB.\n");
        assert_eq!(context.state_name(), "StateB");
    }

    #[test]
    fn test_requests_switch_states() {
        let context = Context::new(state(StateA), &mut io::sink()).unwrap();

        context.request2(&mut io::sink()).unwrap();
        assert_eq!(context.state_name(), "StateA");
        context.request1(&mut io::sink()).unwrap();
        assert_eq!(context.state_name(), "StateB");
        context.request1(&mut io::sink()).unwrap();
        assert_eq!(context.state_name(), "StateB");
        context.request2(&mut io::sink()).unwrap();
        assert_eq!(context.state_name(), "StateA");
    }

    #[test]
    fn test_transition_releases_old_state() {
        let first = state(StateA);
        let context = Context::new(first.clone(), &mut io::sink()).unwrap();
        assert_eq!(SharedPtr::use_count(&first), 2);

        context.request1(&mut io::sink()).unwrap();
        assert_eq!(SharedPtr::use_count(&first), 1);
        assert!(SharedPtr::is::<StateB>(&context.state()));
    }

    #[test]
    fn test_demo_transcript() {
        let mut out = Vec::new();
        run(&mut out, &RunnerConfig::default()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Context: Transition to StateA.\n\
             ConcreteStateA handles request1.\n\
             ConcreteStateA wants to change the state of the context.\n\
             Context: Transition to StateB.\n\
             ConcreteStateB handles request2.\n\
             ConcreteStateB wants to change the state of the context.\n\
             Context: Transition to StateA.\n"
        );
    }
}
