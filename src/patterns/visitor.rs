//! Visitors over components held as `SharedPtr<dyn Component>`.
//!
//! A component only reports which kind it is; the concrete handle the
//! visitor needs is recovered with a checked downcast, so a component that
//! misreports its kind surfaces as a [`CastError`] instead of a bad cast.

use std::cell::Cell;
use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::error::CastError;
use crate::SharedPtr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    A,
    B,
}

pub trait Component {
    fn kind(&self) -> ComponentKind;
}

#[derive(Debug, Default)]
pub struct ComponentA;

impl ComponentA {
    pub fn exclusive_method_of_a(&self) -> &'static str {
        "A"
    }
}

impl Component for ComponentA {
    fn kind(&self) -> ComponentKind {
        ComponentKind::A
    }
}

#[derive(Debug, Default)]
pub struct ComponentB;

impl ComponentB {
    pub fn special_method_of_b(&self) -> &'static str {
        "B"
    }
}

impl Component for ComponentB {
    fn kind(&self) -> ComponentKind {
        ComponentKind::B
    }
}

pub trait Visitor {
    fn visit_a(&self, element: &SharedPtr<ComponentA>) -> String;
    fn visit_b(&self, element: &SharedPtr<ComponentB>) -> String;
}

pub struct LabelVisitor {
    label: &'static str,
}

impl LabelVisitor {
    pub fn new(label: &'static str) -> Self {
        LabelVisitor { label }
    }
}

impl Visitor for LabelVisitor {
    fn visit_a(&self, element: &SharedPtr<ComponentA>) -> String {
        format!("{} + {}", element.exclusive_method_of_a(), self.label)
    }

    fn visit_b(&self, element: &SharedPtr<ComponentB>) -> String {
        format!("{} + {}", element.special_method_of_b(), self.label)
    }
}

/// Tallies visits per kind.
#[derive(Default)]
pub struct CountingVisitor {
    pub a: Cell<usize>,
    pub b: Cell<usize>,
}

impl Visitor for CountingVisitor {
    fn visit_a(&self, _element: &SharedPtr<ComponentA>) -> String {
        self.a.set(self.a.get() + 1);
        format!("A visits: {}", self.a.get())
    }

    fn visit_b(&self, _element: &SharedPtr<ComponentB>) -> String {
        self.b.set(self.b.get() + 1);
        format!("B visits: {}", self.b.get())
    }
}

pub fn component<C: Component + 'static>(value: C) -> SharedPtr<dyn Component> {
    SharedPtr::upcast::<dyn Component>(&SharedPtr::new(value), |c| c)
}

pub fn accept(
    component: &SharedPtr<dyn Component>,
    visitor: &dyn Visitor,
) -> Result<String, CastError> {
    match component.kind() {
        ComponentKind::A => {
            SharedPtr::downcast::<ComponentA>(component).map(|a| visitor.visit_a(&a))
        }
        ComponentKind::B => {
            SharedPtr::downcast::<ComponentB>(component).map(|b| visitor.visit_b(&b))
        }
    }
}

fn client_code(
    out: &mut dyn Write,
    components: &[SharedPtr<dyn Component>],
    visitor: &dyn Visitor,
) -> io::Result<()> {
    for component in components {
        match accept(component, visitor) {
            Ok(line) => writeln!(out, "{line}")?,
            Err(err) => writeln!(out, "skipped: {err}")?,
        }
    }
    Ok(())
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let components = vec![component(ComponentA), component(ComponentB)];

    writeln!(out, "The client code works with all visitors via the base Visitor interface:")?;
    client_code(out, &components, &LabelVisitor::new("ConcreteVisitor1"))?;

    writeln!(out, "\nIt allows the same client code to work with different types of visitors:")?;
    client_code(out, &components, &LabelVisitor::new("ConcreteVisitor2"))?;

    let counter = CountingVisitor::default();
    writeln!(out, "\nA stateful visitor can accumulate across the structure:")?;
    client_code(out, &components, &counter)?;
    client_code(out, &components, &counter)
}
