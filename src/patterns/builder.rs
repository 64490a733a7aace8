use std::cell::RefCell;
use std::io::{self, Write};
use std::mem;

use itertools::Itertools;

use crate::config::RunnerConfig;
use crate::SharedPtr;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Product {
    parts: Vec<String>,
}

impl Product {
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn list_parts(&self) -> String {
        format!("Product parts: {}", self.parts.iter().join(", "))
    }
}

pub trait Builder {
    fn produce_part_a(&self);
    fn produce_part_b(&self);
    fn produce_part_c(&self);

    /// Hands over the product built so far and starts a fresh one.
    fn product(&self) -> SharedPtr<Product>;
}

#[derive(Default)]
pub struct PartsBuilder {
    parts: RefCell<Vec<String>>,
}

impl PartsBuilder {
    fn push(&self, part: &str) {
        self.parts.borrow_mut().push(part.to_string());
    }
}

impl Builder for PartsBuilder {
    fn produce_part_a(&self) {
        self.push("PartA1");
    }

    fn produce_part_b(&self) {
        self.push("PartB1");
    }

    fn produce_part_c(&self) {
        self.push("PartC1");
    }

    fn product(&self) -> SharedPtr<Product> {
        let parts = mem::take(&mut *self.parts.borrow_mut());
        SharedPtr::new(Product { parts })
    }
}

/// Runs building steps in a fixed order against whichever builder it holds.
pub struct Director {
    builder: SharedPtr<dyn Builder>,
}

impl Director {
    pub fn new(builder: SharedPtr<dyn Builder>) -> Self {
        Director { builder }
    }

    pub fn set_builder(&mut self, builder: SharedPtr<dyn Builder>) {
        self.builder = builder;
    }

    pub fn build_minimal_viable_product(&self) {
        self.builder.produce_part_a();
    }

    pub fn build_full_featured_product(&self) {
        self.builder.produce_part_a();
        self.builder.produce_part_b();
        self.builder.produce_part_c();
    }
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let builder = SharedPtr::new(PartsBuilder::default());
    let director = Director::new(SharedPtr::upcast::<dyn Builder>(&builder, |b| b));

    writeln!(out, "Standard basic product:")?;
    director.build_minimal_viable_product();
    writeln!(out, " {}", builder.product().list_parts())?;

    writeln!(out, "\nStandard full featured product:")?;
    director.build_full_featured_product();
    writeln!(out, " {}", builder.product().list_parts())?;

    writeln!(out, "\nCustom product:")?;
    builder.produce_part_a();
    builder.produce_part_c();
    writeln!(out, " {}", builder.product().list_parts())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_director_steps() {
        let builder = SharedPtr::new(PartsBuilder::default());
        let director = Director::new(SharedPtr::upcast::<dyn Builder>(&builder, |b| b));
        assert_eq!(SharedPtr::use_count(&builder), 2);

        director.build_full_featured_product();
        let product = builder.product();
        assert_eq!(product.parts(), ["PartA1", "PartB1", "PartC1"]);
        assert_eq!(product.list_parts(), "Product parts: PartA1, PartB1, PartC1");
    }

    #[test]
    fn test_product_resets_builder() {
        let builder = PartsBuilder::default();
        builder.produce_part_b();
        let first = builder.product();
        let second = builder.product();

        assert_eq!(first.parts(), ["PartB1"]);
        assert!(second.parts().is_empty());
        assert!(first != second);
    }

    #[test]
    fn test_set_builder_releases_previous() {
        let first = SharedPtr::new(PartsBuilder::default());
        let second = SharedPtr::new(PartsBuilder::default());
        let mut director = Director::new(SharedPtr::upcast::<dyn Builder>(&first, |b| b));

        director.set_builder(SharedPtr::upcast::<dyn Builder>(&second, |b| b));
        director.build_minimal_viable_product();

        assert_eq!(SharedPtr::use_count(&first), 1);
        assert!(first.product().parts().is_empty());
        assert_eq!(second.product().parts(), ["PartA1"]);
    }

    #[test]
    fn test_demo_transcript() {
        let mut out = Vec::new();
        run(&mut out, &RunnerConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Standard basic product:\n Product parts: PartA1\n"));
        assert!(text.contains(" Product parts: PartA1, PartB1, PartC1\n"));
        assert!(text.contains("Custom product:\n Product parts: PartA1, PartC1\n"));
    }
}
