use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

/// The platform side of the bridge.
pub trait Implementation {
    fn operation_implementation(&self) -> String;
}

pub struct PlatformA;

impl Implementation for PlatformA {
    fn operation_implementation(&self) -> String {
        "ConcreteImplementationA: Here's the result on the platform A.".to_string()
    }
}

pub struct PlatformB;

impl Implementation for PlatformB {
    fn operation_implementation(&self) -> String {
        "ConcreteImplementationB: Here's the result on the platform B.".to_string()
    }
}

pub trait Abstraction {
    fn operation(&self) -> String;
}

pub struct BasicAbstraction {
    implementation: SharedPtr<dyn Implementation>,
}

impl BasicAbstraction {
    pub fn new(implementation: &SharedPtr<dyn Implementation>) -> Self {
        BasicAbstraction {
            implementation: implementation.clone(),
        }
    }
}

impl Abstraction for BasicAbstraction {
    fn operation(&self) -> String {
        format!(
            "Abstraction: Base operation with:\n{}",
            self.implementation.operation_implementation()
        )
    }
}

pub struct ExtendedAbstraction {
    implementation: SharedPtr<dyn Implementation>,
}

impl ExtendedAbstraction {
    pub fn new(implementation: &SharedPtr<dyn Implementation>) -> Self {
        ExtendedAbstraction {
            implementation: implementation.clone(),
        }
    }
}

impl Abstraction for ExtendedAbstraction {
    fn operation(&self) -> String {
        format!(
            "ExtendedAbstraction: Extended operation with:\n{}",
            self.implementation.operation_implementation()
        )
    }
}

pub fn platform<I: Implementation + 'static>(implementation: I) -> SharedPtr<dyn Implementation> {
    SharedPtr::upcast::<dyn Implementation>(&SharedPtr::new(implementation), |i| i)
}

pub fn abstraction<A: Abstraction + 'static>(abstraction: A) -> SharedPtr<dyn Abstraction> {
    SharedPtr::upcast::<dyn Abstraction>(&SharedPtr::new(abstraction), |a| a)
}

fn client_code(out: &mut dyn Write, abstraction: &SharedPtr<dyn Abstraction>) -> io::Result<()> {
    writeln!(out, "{}", abstraction.operation())
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let mut implementation = platform(PlatformA);
    let mut current = abstraction(BasicAbstraction::new(&implementation));
    client_code(out, &current)?;

    writeln!(out)?;
    implementation = platform(PlatformB);
    current = abstraction(ExtendedAbstraction::new(&implementation));
    client_code(out, &current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_abstraction_with_any_platform() {
        let a = platform(PlatformA);
        let b = platform(PlatformB);

        assert!(BasicAbstraction::new(&b)
            .operation()
            .ends_with("on the platform B."));
        assert!(ExtendedAbstraction::new(&a)
            .operation()
            .starts_with("ExtendedAbstraction: Extended operation with:\nConcreteImplementationA"));
    }

    #[test]
    fn test_abstractions_share_implementation() {
        let implementation = platform(PlatformA);
        let basic = BasicAbstraction::new(&implementation);
        let extended = ExtendedAbstraction::new(&implementation);

        assert_eq!(SharedPtr::use_count(&implementation), 3);
        drop(basic);
        assert_eq!(SharedPtr::use_count(&implementation), 2);
        drop(extended);
        assert_eq!(SharedPtr::use_count(&implementation), 1);
    }

    #[test]
    fn test_abstraction_outlives_client_handle() {
        let implementation = platform(PlatformB);
        let current = abstraction(BasicAbstraction::new(&implementation));
        drop(implementation);

        assert!(current.operation().contains("platform B"));
    }

    #[test]
    fn test_demo_transcript() {
        let mut out = Vec::new();
        run(&mut out, &RunnerConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Abstraction: Base operation with:\n\
             ConcreteImplementationA: Here's the result on the platform A.\n\
             \n\
             ExtendedAbstraction: Extended operation with:\n\
             ConcreteImplementationB: Here's the result on the platform B.\n"
        );
    }
}
