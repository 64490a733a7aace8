use std::cell::Cell;
use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrototypeKind {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    name: String,
    field: Cell<f32>,
    concrete_field: f32,
}

impl Prototype {
    pub fn new(name: &str, concrete_field: f32) -> Self {
        Prototype {
            name: name.to_string(),
            field: Cell::new(0.0),
            concrete_field,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self) -> f32 {
        self.field.get()
    }

    pub fn concrete_field(&self) -> f32 {
        self.concrete_field
    }

    pub fn method(&self, value: f32) -> String {
        self.field.set(value);
        format!("Call Method from {} with field : {value}", self.name)
    }

    /// A new, independently owned copy. Copying the handle would only add an
    /// owner to this same prototype.
    pub fn clone_into_handle(&self) -> SharedPtr<Prototype> {
        SharedPtr::new(self.clone())
    }
}

pub struct PrototypeFactory {
    first: SharedPtr<Prototype>,
    second: SharedPtr<Prototype>,
}

impl Default for PrototypeFactory {
    fn default() -> Self {
        PrototypeFactory {
            first: SharedPtr::new(Prototype::new("PROTOTYPE_1", 50.0)),
            second: SharedPtr::new(Prototype::new("PROTOTYPE_2", 60.0)),
        }
    }
}

impl PrototypeFactory {
    pub fn prototype(&self, kind: PrototypeKind) -> &SharedPtr<Prototype> {
        match kind {
            PrototypeKind::First => &self.first,
            PrototypeKind::Second => &self.second,
        }
    }

    pub fn create(&self, kind: PrototypeKind) -> SharedPtr<Prototype> {
        self.prototype(kind).clone_into_handle()
    }
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let factory = SharedPtr::new(PrototypeFactory::default());

    writeln!(out, "Let's create a Prototype 1")?;
    let mut prototype = factory.create(PrototypeKind::First);
    writeln!(out, "{}", prototype.method(90.0))?;

    writeln!(out, "\nLet's create a Prototype 2")?;
    prototype = factory.create(PrototypeKind::Second);
    writeln!(out, "{}", prototype.method(10.0))?;

    writeln!(
        out,
        "\nThe registered {} still has field {}.",
        factory.prototype(PrototypeKind::Second).name(),
        factory.prototype(PrototypeKind::Second).field()
    )
}
