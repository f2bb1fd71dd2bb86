#![allow(dead_code)]

use lilt_tween_core::{PropertyPath, TargetRef, Tweenable, Value};
use std::cell::Cell;
use std::rc::Rc;

/// Minimal host object: a float `x`, a vec3 `pos` and a destroy flag.
pub struct Node {
    pub x: Cell<f32>,
    pub pos: Cell<[f32; 3]>,
    pub alive: Cell<bool>,
    pub x_writes: Cell<usize>,
    /// When set, writes to `x` are rejected.
    pub locked: Cell<bool>,
}

impl Node {
    pub fn new(x: f32) -> Rc<Self> {
        Rc::new(Self {
            x: Cell::new(x),
            pos: Cell::new([0.0; 3]),
            alive: Cell::new(true),
            x_writes: Cell::new(0),
            locked: Cell::new(false),
        })
    }
}

impl Tweenable for Node {
    fn get_property(&self, path: &PropertyPath) -> Option<Value> {
        match path.member_chain().as_str() {
            "x" => Some(Value::Float(self.x.get())),
            "pos" => Some(Value::Vec3(self.pos.get())),
            _ => None,
        }
    }

    fn set_property(&self, path: &PropertyPath, value: Value) -> bool {
        match (path.member_chain().as_str(), value) {
            ("x", Value::Float(v)) if !self.locked.get() => {
                self.x.set(v);
                self.x_writes.set(self.x_writes.get() + 1);
                true
            }
            ("pos", Value::Vec3(v)) => {
                self.pos.set(v);
                true
            }
            _ => false,
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }
}

pub fn node(x: f32) -> (Rc<Node>, TargetRef) {
    let n = Node::new(x);
    let target = TargetRef::new(&n);
    (n, target)
}

pub fn counter() -> (Rc<Cell<usize>>, impl Fn() + Clone) {
    let count = Rc::new(Cell::new(0));
    let bump = {
        let count = count.clone();
        move || count.set(count.get() + 1)
    };
    (count, bump)
}
