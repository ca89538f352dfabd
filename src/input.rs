//! Polled keyboard input
//!
//! The host flips keys in a `KeyState` as events arrive; the simulation only
//! ever asks whether a key is held during the current tick.

use crate::scheduler::{Steppable, TickContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Up,
    Right,
    Down,
    Space,
}

impl Key {
    pub const ALL: [Key; 5] = [Key::Left, Key::Up, Key::Right, Key::Down, Key::Space];

    fn slot(self) -> usize {
        match self {
            Key::Left => 0,
            Key::Up => 1,
            Key::Right => 2,
            Key::Down => 3,
            Key::Space => 4,
        }
    }
}

/// Anything that can answer "is this key held right now"
pub trait InputSource {
    fn is_held(&self, key: Key) -> bool;
}

/// Pressed-key table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    held: [bool; 5],
}

impl KeyState {
    pub fn press(&mut self, key: Key) {
        self.held[key.slot()] = true;
    }

    pub fn release(&mut self, key: Key) {
        self.held[key.slot()] = false;
    }

    pub fn set(&mut self, key: Key, held: bool) {
        self.held[key.slot()] = held;
    }

    pub fn release_all(&mut self) {
        self.held = [false; 5];
    }
}

impl InputSource for KeyState {
    #[inline]
    fn is_held(&self, key: Key) -> bool {
        self.held[key.slot()]
    }
}

type KeyAction = Box<dyn FnMut(&mut TickContext<'_>)>;

/// Per-key callbacks run once per tick while their key is held
///
/// Callbacks run in the step phase, in registration order.
#[derive(Default)]
pub struct KeyBindings {
    actions: Vec<(Key, KeyAction)>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: Key, action: impl FnMut(&mut TickContext<'_>) + 'static) {
        self.actions.push((key, Box::new(action)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Steppable for KeyBindings {
    fn step(&mut self, ctx: &mut TickContext<'_>) {
        for (key, action) in self.actions.iter_mut() {
            if ctx.input.is_held(*key) {
                action(ctx);
            }
        }
    }
}
