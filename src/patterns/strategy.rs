use std::io::{self, Write};

use itertools::Itertools;

use crate::config::RunnerConfig;
use crate::SharedPtr;

pub trait Strategy {
    fn do_algorithm(&self, data: &[&str]) -> String;
}

/// Sorts every character of the joined input in ascending order.
pub struct Ascending;

impl Strategy for Ascending {
    fn do_algorithm(&self, data: &[&str]) -> String {
        data.concat().chars().sorted().collect()
    }
}

pub struct Descending;

impl Strategy for Descending {
    fn do_algorithm(&self, data: &[&str]) -> String {
        data.concat().chars().sorted_by(|a, b| b.cmp(a)).collect()
    }
}

pub fn strategy<S: Strategy + 'static>(strategy: S) -> SharedPtr<dyn Strategy> {
    SharedPtr::upcast::<dyn Strategy>(&SharedPtr::new(strategy), |s| s)
}

const DATA: [&str; 5] = ["a", "e", "c", "b", "d"];

/// Holds its strategy through a shared handle that may be empty.
#[derive(Default)]
pub struct Context {
    strategy: SharedPtr<dyn Strategy>,
}

impl Context {
    pub fn new(strategy: SharedPtr<dyn Strategy>) -> Self {
        Context { strategy }
    }

    pub fn set_strategy(&mut self, strategy: SharedPtr<dyn Strategy>) {
        self.strategy = strategy;
    }

    /// Result of the current strategy over the sample data, `None` when no
    /// strategy is set.
    pub fn sort(&self) -> Option<String> {
        SharedPtr::get(&self.strategy).map(|strategy| strategy.do_algorithm(&DATA))
    }

    pub fn do_some_business_logic(&self, out: &mut dyn Write) -> io::Result<()> {
        match self.sort() {
            Some(result) => {
                writeln!(
                    out,
                    "Context: Sorting data using the strategy (not sure how it'll do it)"
                )?;
                writeln!(out, "{result}")
            }
            None => writeln!(out, "Context: Strategy is not set."),
        }
    }
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let mut context = Context::new(strategy(Ascending));
    writeln!(out, "Client: Strategy is set to normal sorting.")?;
    context.do_some_business_logic(out)?;

    writeln!(out, "\nClient: Strategy is set to reverse sorting.")?;
    context.set_strategy(strategy(Descending));
    context.do_some_business_logic(out)?;

    writeln!(out, "\nClient: Strategy is cleared.")?;
    context.set_strategy(SharedPtr::empty());
    context.do_some_business_logic(out)
}
