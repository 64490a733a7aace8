//! Design-pattern demos built on [`SharedPtr`](crate::SharedPtr).
//!
//! Every demo writes its transcript to the writer it is given, so the runner
//! can send it to stdout and the tests can inspect it.

use std::io::{self, Write};

use crate::config::RunnerConfig;

pub mod abstract_factory;
pub mod adapter;
pub mod bridge;
pub mod builder;
pub mod chain;
pub mod command;
pub mod composite;
pub mod decorator;
pub mod facade;
pub mod flyweight;
pub mod iterator;
pub mod mediator;
pub mod memento;
pub mod observer;
pub mod prototype;
pub mod proxy;
pub mod singleton;
pub mod state;
pub mod strategy;
pub mod visitor;

pub type DemoFn = fn(&mut dyn Write, &RunnerConfig) -> io::Result<()>;

#[derive(Clone, Copy)]
pub struct Demo {
    pub name: &'static str,
    pub summary: &'static str,
    pub run: DemoFn,
}

pub const DEMOS: &[Demo] = &[
    Demo {
        name: "abstract_factory",
        summary: "families of products that always fit together",
        run: abstract_factory::run,
    },
    Demo {
        name: "adapter",
        summary: "a shared adaptee behind the client interface",
        run: adapter::run,
    },
    Demo {
        name: "bridge",
        summary: "abstractions sharing a platform implementation",
        run: bridge::run,
    },
    Demo {
        name: "builder",
        summary: "a director driving a shared builder",
        run: builder::run,
    },
    Demo {
        name: "chain",
        summary: "requests passed along a chain of shared handlers",
        run: chain::run,
    },
    Demo {
        name: "command",
        summary: "commands hooked into an invoker",
        run: command::run,
    },
    Demo {
        name: "composite",
        summary: "a tree of shared leaf and branch nodes",
        run: composite::run,
    },
    Demo {
        name: "decorator",
        summary: "decorators wrapping shared components",
        run: decorator::run,
    },
    Demo {
        name: "facade",
        summary: "one entry point over shared subsystems",
        run: facade::run,
    },
    Demo {
        name: "flyweight",
        summary: "car models shared between many registrations",
        run: flyweight::run,
    },
    Demo {
        name: "iterator",
        summary: "cursors sharing ownership of their container",
        run: iterator::run,
    },
    Demo {
        name: "mediator",
        summary: "components coordinated through a mediator",
        run: mediator::run,
    },
    Demo {
        name: "memento",
        summary: "snapshot history with undo",
        run: memento::run,
    },
    Demo {
        name: "observer",
        summary: "a subject notifying an ordered list of observers",
        run: observer::run,
    },
    Demo {
        name: "prototype",
        summary: "new objects cloned from registered prototypes",
        run: prototype::run,
    },
    Demo {
        name: "proxy",
        summary: "a proxy guarding a real subject, eager or lazy",
        run: proxy::run,
    },
    Demo {
        name: "singleton",
        summary: "threads racing for a once-initialised instance",
        run: singleton::run,
    },
    Demo {
        name: "state",
        summary: "a context switching between state objects",
        run: state::run,
    },
    Demo {
        name: "strategy",
        summary: "a context with a swappable sorting strategy",
        run: strategy::run,
    },
    Demo {
        name: "visitor",
        summary: "visitors dispatching on downcast components",
        run: visitor::run,
    },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    DEMOS.iter().map(|demo| demo.name)
}
