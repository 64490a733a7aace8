use std::cell::RefCell;
use std::io::{self, Write};

use itertools::Itertools;

use crate::config::RunnerConfig;
use crate::SharedPtr;

/// A node of the component tree. Branches own their children through shared
/// handles, so one subtree can hang under several branches.
pub enum Node {
    Leaf,
    Branch(RefCell<Vec<SharedPtr<Node>>>),
}

impl Node {
    pub fn leaf() -> SharedPtr<Node> {
        SharedPtr::new(Node::Leaf)
    }

    pub fn branch() -> SharedPtr<Node> {
        SharedPtr::new(Node::Branch(RefCell::new(Vec::new())))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Node::Branch(_))
    }

    /// Appends `child`. Returns `false` for leaves and for children that
    /// already contain this node, since the tree must stay acyclic.
    pub fn add(&self, child: SharedPtr<Node>) -> bool {
        let Node::Branch(children) = self else {
            return false;
        };
        if child.contains(self) {
            return false;
        }
        children.borrow_mut().push(child);
        true
    }

    /// Removes every direct child that is `child` itself.
    pub fn remove(&self, child: &SharedPtr<Node>) -> bool {
        let Node::Branch(children) = self else {
            return false;
        };
        let mut children = children.borrow_mut();
        let before = children.len();
        children.retain(|existing| existing != child);
        children.len() != before
    }

    pub fn child_count(&self) -> usize {
        match self {
            Node::Leaf => 0,
            Node::Branch(children) => children.borrow().len(),
        }
    }

    fn contains(&self, target: &Node) -> bool {
        if std::ptr::eq(self, target) {
            return true;
        }
        match self {
            Node::Leaf => false,
            Node::Branch(children) => children.borrow().iter().any(|child| child.contains(target)),
        }
    }

    pub fn operation(&self) -> String {
        match self {
            Node::Leaf => "Leaf".to_string(),
            Node::Branch(children) => {
                let inner = children.borrow().iter().map(|child| child.operation()).join("+");
                format!("Branch({inner})")
            }
        }
    }
}

fn client_code(out: &mut dyn Write, component: &SharedPtr<Node>) -> io::Result<()> {
    writeln!(out, "RESULT: {}", component.operation())
}

fn client_code_merge(
    out: &mut dyn Write,
    target: &SharedPtr<Node>,
    extra: SharedPtr<Node>,
) -> io::Result<()> {
    if target.is_composite() {
        target.add(extra);
    }
    writeln!(out, "RESULT: {}", target.operation())
}

pub fn run(out: &mut dyn Write, _config: &RunnerConfig) -> io::Result<()> {
    let simple = Node::leaf();
    writeln!(out, "Client: I've got a simple component:")?;
    client_code(out, &simple)?;

    let tree = Node::branch();
    let branch1 = Node::branch();
    branch1.add(Node::leaf());
    branch1.add(Node::leaf());

    let branch2 = Node::branch();
    branch2.add(Node::leaf());

    tree.add(branch1.clone());
    tree.add(branch2);
    writeln!(out, "\nClient: Now I've got a composite tree:")?;
    client_code(out, &tree)?;

    writeln!(
        out,
        "\nClient: I don't need to check the components classes even when managing the tree:"
    )?;
    client_code_merge(out, &tree, simple.clone())?;

    tree.remove(&branch1);
    writeln!(out, "\nClient: After removing the first branch:")?;
    client_code(out, &tree)?;
    writeln!(
        out,
        "The removed branch is still alive with {} owner(s) and {} children.",
        SharedPtr::use_count(&branch1),
        branch1.child_count()
    )
}
