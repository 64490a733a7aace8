use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

pub trait ProductA {
    fn useful_function_a(&self) -> String;
}

pub trait ProductB {
    fn useful_function_b(&self) -> String;
    fn another_useful_function_b(&self, collaborator: &dyn ProductA) -> String;
}

pub trait AbstractFactory {
    fn create_product_a(&self) -> SharedPtr<dyn ProductA>;
    fn create_product_b(&self) -> SharedPtr<dyn ProductB>;
}

/// Which product family a concrete product or factory belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    First,
    Second,
}

impl Family {
    fn suffix(self) -> u8 {
        match self {
            Family::First => 1,
            Family::Second => 2,
        }
    }
}

pub struct ConcreteProductA(Family);

impl ProductA for ConcreteProductA {
    fn useful_function_a(&self) -> String {
        format!("The result of the product A{}.", self.0.suffix())
    }
}

pub struct ConcreteProductB(Family);

impl ProductB for ConcreteProductB {
    fn useful_function_b(&self) -> String {
        format!("The result of the product B{}.", self.0.suffix())
    }

    fn another_useful_function_b(&self, collaborator: &dyn ProductA) -> String {
        format!(
            "The result of the B{} collaborating with the ({})",
            self.0.suffix(),
            collaborator.useful_function_a()
        )
    }
}

/// Creates products of a single family, so they always fit together.
pub struct FamilyFactory(pub Family);

impl AbstractFactory for FamilyFactory {
    fn create_product_a(&self) -> SharedPtr<dyn ProductA> {
        SharedPtr::upcast::<dyn ProductA>(&SharedPtr::new(ConcreteProductA(self.0)), |p| p)
    }

    fn create_product_b(&self) -> SharedPtr<dyn ProductB> {
        SharedPtr::upcast::<dyn ProductB>(&SharedPtr::new(ConcreteProductB(self.0)), |p| p)
    }
}

fn client_code(out: &mut dyn Write, factory: &dyn AbstractFactory) -> io::Result<()> {
    let product_a = factory.create_product_a();
    let product_b = factory.create_product_b();
    writeln!(out, "{}", product_b.useful_function_b())?;
    writeln!(out, "{}", product_b.another_useful_function_b(&*product_a))
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    writeln!(out, "Client: Testing client code with the first factory type:")?;
    let first = SharedPtr::new(FamilyFactory(Family::First));
    client_code(out, &*first)?;

    writeln!(out, "\nClient: Testing the same client code with the second factory type:")?;
    let second = SharedPtr::new(FamilyFactory(Family::Second));
    client_code(out, &*second)
}
