//! A container walked by cursors that share ownership of it.
//!
//! A cursor holds its own handle to the container, so it stays valid even
//! after the client drops every other handle.

use std::cell::RefCell;
use std::io::{self, Write};

use crate::config::RunnerConfig;
use crate::SharedPtr;

pub struct Container<T> {
    items: RefCell<Vec<T>>,
}

impl<T: Clone + 'static> Container<T> {
    pub fn new() -> SharedPtr<Container<T>> {
        SharedPtr::new(Container {
            items: RefCell::new(Vec::new()),
        })
    }

    pub fn add(&self, item: T) {
        self.items.borrow_mut().push(item);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// A cursor at the first item, owning a share of `this`.
    pub fn create_iterator(this: &SharedPtr<Container<T>>) -> Cursor<T> {
        Cursor {
            container: this.clone(),
            position: 0,
        }
    }
}

pub struct Cursor<T> {
    container: SharedPtr<Container<T>>,
    position: usize,
}

impl<T: Clone> Cursor<T> {
    pub fn first(&mut self) {
        self.position = 0;
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.container.items.borrow().len()
    }

    pub fn current_item(&self) -> Option<T> {
        self.container.items.borrow().get(self.position).cloned()
    }
}

impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.current_item()?;
        self.position += 1;
        Some(item)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Data {
    value: i32,
}

impl Data {
    pub fn new(value: i32) -> Self {
        Data { value }
    }

    pub fn set_data(&mut self, value: i32) {
        self.value = value;
    }

    pub fn data(&self) -> i32 {
        self.value
    }
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    writeln!(out, "------------------ Iterator with int ------------------")?;
    let numbers: SharedPtr<Container<i32>> = Container::new();
    for i in 0..10 {
        numbers.add(i);
    }
    let mut cursor = Container::create_iterator(&numbers);
    cursor.first();
    while !cursor.is_done() {
        if let Some(value) = cursor.current_item() {
            writeln!(out, "{value}")?;
        }
        cursor.next();
    }

    writeln!(out, "------------------ Iterator with Custom Class ------------------")?;
    let records: SharedPtr<Container<Data>> = Container::new();
    for value in [1, 10, 100] {
        records.add(Data::new(value));
    }
    for data in Container::create_iterator(&records) {
        writeln!(out, "{}", data.data())?;
    }
    Ok(())
}
