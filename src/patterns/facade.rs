use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

#[derive(Debug, Default)]
pub struct Subsystem1;

impl Subsystem1 {
    pub fn operation1(&self) -> &'static str {
        "Subsystem1: Ready!"
    }

    pub fn operation_n(&self) -> &'static str {
        "Subsystem1: Go!"
    }
}

#[derive(Debug, Default)]
pub struct Subsystem2;

impl Subsystem2 {
    pub fn operation1(&self) -> &'static str {
        "Subsystem2: Get ready!"
    }

    pub fn operation_z(&self) -> &'static str {
        "Subsystem2: Fire!"
    }
}

/// One entry point over both subsystems. Empty handles passed to
/// [`Facade::new`] are replaced with fresh subsystems.
pub struct Facade {
    subsystem1: SharedPtr<Subsystem1>,
    subsystem2: SharedPtr<Subsystem2>,
}

impl Facade {
    pub fn new(subsystem1: SharedPtr<Subsystem1>, subsystem2: SharedPtr<Subsystem2>) -> Self {
        Facade {
            subsystem1: or_fresh(subsystem1),
            subsystem2: or_fresh(subsystem2),
        }
    }

    pub fn operation(&self) -> String {
        [
            "Facade initializes subsystems:",
            self.subsystem1.operation1(),
            self.subsystem2.operation1(),
            "Facade orders subsystems to perform the action:",
            self.subsystem1.operation_n(),
            self.subsystem2.operation_z(),
        ]
        .join("\n")
    }
}

fn or_fresh<T: Default + 'static>(handle: SharedPtr<T>) -> SharedPtr<T> {
    if SharedPtr::is_empty(&handle) {
        SharedPtr::new(T::default())
    } else {
        handle
    }
}

fn client_code(out: &mut dyn Write, facade: &SharedPtr<Facade>) -> io::Result<()> {
    writeln!(out, "{}", facade.operation())
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let subsystem1 = SharedPtr::new(Subsystem1);
    let subsystem2 = SharedPtr::new(Subsystem2);
    let facade = SharedPtr::new(Facade::new(subsystem1, subsystem2));
    client_code(out, &facade)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_order() {
        let facade = Facade::new(SharedPtr::new(Subsystem1), SharedPtr::new(Subsystem2));
        let lines: Vec<String> = facade.operation().lines().map(str::to_string).collect();

        assert_eq!(
            lines,
            [
                "Facade initializes subsystems:",
                "Subsystem1: Ready!",
                "Subsystem2: Get ready!",
                "Facade orders subsystems to perform the action:",
                "Subsystem1: Go!",
                "Subsystem2: Fire!",
            ]
        );
    }

    #[test]
    fn test_empty_handles_are_filled() {
        let facade = Facade::new(SharedPtr::empty(), SharedPtr::empty());
        assert!(SharedPtr::is_owning(&facade.subsystem1));
        assert!(SharedPtr::is_owning(&facade.subsystem2));
        assert!(facade.operation().ends_with("Subsystem2: Fire!"));
    }

    #[test]
    fn test_facade_shares_given_subsystem() {
        let subsystem1 = SharedPtr::new(Subsystem1);
        let facade = Facade::new(subsystem1.clone(), SharedPtr::empty());
        assert!(facade.subsystem1 == subsystem1);
        assert_eq!(SharedPtr::use_count(&subsystem1), 2);
    }

    #[test]
    fn test_demo_transcript() {
        let mut out = Vec::new();
        run(&mut out, &RunnerConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Facade initializes subsystems:\nSubsystem1: Ready!\n"));
        assert!(text.ends_with("Subsystem2: Fire!\n"));
    }
}
