use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

pub trait Component {
    fn operation(&self) -> String;
}

#[derive(Debug, Default)]
pub struct ConcreteComponent;

impl Component for ConcreteComponent {
    fn operation(&self) -> String {
        "ConcreteComponent".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapping {
    A,
    B,
}

/// Wraps another component and decorates its result. Several decorators
/// may share the same wrapped component.
pub struct Decorator {
    wrapping: Wrapping,
    component: SharedPtr<dyn Component>,
}

impl Decorator {
    pub fn wrap(
        wrapping: Wrapping,
        component: &SharedPtr<dyn Component>,
    ) -> SharedPtr<dyn Component> {
        let decorator = SharedPtr::new(Decorator {
            wrapping,
            component: component.clone(),
        });
        SharedPtr::upcast::<dyn Component>(&decorator, |d| d)
    }
}

impl Component for Decorator {
    fn operation(&self) -> String {
        let name = match self.wrapping {
            Wrapping::A => "ConcreteDecoratorA",
            Wrapping::B => "ConcreteDecoratorB",
        };
        format!("{name}({})", self.component.operation())
    }
}

fn client_code(out: &mut dyn Write, component: &SharedPtr<dyn Component>) -> io::Result<()> {
    writeln!(out, "RESULT: {}", component.operation())
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let simple = SharedPtr::upcast::<dyn Component>(&SharedPtr::new(ConcreteComponent), |c| c);
    writeln!(out, "Client: I've got a simple component:")?;
    client_code(out, &simple)?;

    let decorator1 = Decorator::wrap(Wrapping::A, &simple);
    let decorator2 = Decorator::wrap(Wrapping::B, &decorator1);
    writeln!(out, "\nClient: Now I've got a decorated component:")?;
    client_code(out, &decorator2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple() -> SharedPtr<dyn Component> {
        SharedPtr::upcast::<dyn Component>(&SharedPtr::new(ConcreteComponent), |c| c)
    }

    #[test]
    fn test_nested_decoration() {
        let decorated = Decorator::wrap(Wrapping::B, &Decorator::wrap(Wrapping::A, &simple()));
        assert_eq!(
            decorated.operation(),
            "ConcreteDecoratorB(ConcreteDecoratorA(ConcreteComponent))"
        );
    }

    #[test]
    fn test_decorators_share_component() {
        let component = simple();
        let first = Decorator::wrap(Wrapping::A, &component);
        let second = Decorator::wrap(Wrapping::B, &component);

        assert_eq!(SharedPtr::use_count(&component), 3);
        assert_eq!(first.operation(), "ConcreteDecoratorA(ConcreteComponent)");
        assert_eq!(second.operation(), "ConcreteDecoratorB(ConcreteComponent)");

        drop(first);
        assert_eq!(SharedPtr::use_count(&component), 2);
    }

    #[test]
    fn test_outer_decorator_keeps_chain_alive() {
        let component = simple();
        let outer = Decorator::wrap(Wrapping::B, &Decorator::wrap(Wrapping::A, &component));
        assert!(SharedPtr::is::<Decorator>(&outer));
        drop(component);

        assert_eq!(
            outer.operation(),
            "ConcreteDecoratorB(ConcreteDecoratorA(ConcreteComponent))"
        );
    }

    #[test]
    fn test_demo_transcript() {
        let mut out = Vec::new();
        run(&mut out, &RunnerConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("RESULT: ConcreteComponent\n"));
        assert!(text.contains("RESULT: ConcreteDecoratorB(ConcreteDecoratorA(ConcreteComponent))"));
    }
}
