use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

/// The interface client code understands.
pub trait Target {
    fn request(&self) -> String {
        "Target: The default target's behavior.".to_string()
    }
}

pub struct DefaultTarget;

impl Target for DefaultTarget {}

/// Useful behaviour behind an interface the client cannot use directly.
#[derive(Debug, Default)]
pub struct Adaptee;

impl Adaptee {
    pub fn specific_request(&self) -> String {
        ".eetpadA eht fo roivaheb laicepS".to_string()
    }
}

/// Exposes a shared [`Adaptee`] through [`Target`].
pub struct Adapter {
    adaptee: SharedPtr<Adaptee>,
}

impl Adapter {
    pub fn new(adaptee: &SharedPtr<Adaptee>) -> Self {
        Adapter {
            adaptee: adaptee.clone(),
        }
    }
}

impl Target for Adapter {
    fn request(&self) -> String {
        let translated: String = self.adaptee.specific_request().chars().rev().collect();
        format!("Adapter: (TRANSLATED) {translated}")
    }
}

pub fn target<T: Target + 'static>(target: T) -> SharedPtr<dyn Target> {
    SharedPtr::upcast::<dyn Target>(&SharedPtr::new(target), |t| t)
}

fn client_code(out: &mut dyn Write, target: &SharedPtr<dyn Target>) -> io::Result<()> {
    writeln!(out, "{}", target.request())
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    writeln!(out, "Client: I can work just fine with the Target objects:")?;
    client_code(out, &target(DefaultTarget))?;

    let adaptee = SharedPtr::new(Adaptee);
    writeln!(
        out,
        "\nClient: The Adaptee class has a weird interface. See, I don't understand it:"
    )?;
    writeln!(out, "Adaptee: {}", adaptee.specific_request())?;

    writeln!(out, "\nClient: But I can work with it via the Adapter:")?;
    client_code(out, &target(Adapter::new(&adaptee)))
}
