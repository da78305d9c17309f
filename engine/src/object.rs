use std::any::Any;
use std::fmt;

use glam::DVec2;

use crate::render::{DrawOptions, Surface, Viewport};

/// Per-frame state handed to every [`Object::draw`] call.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub viewport: &'a Viewport,
    /// Monotonic tick counter, used for animation frame selection.
    pub count: u64,
}

/// Downcasting support for registry lookups.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Anything that lives in the [`World`].
///
/// `update` advances the object by one tick and must only touch its own
/// state. `draw` renders onto the surface and must not change the object.
pub trait Object: AsAny {
    fn update(&mut self);

    fn draw(&self, surface: &mut dyn Surface, options: &DrawOptions, frame: &Frame<'_>);

    /// World position used by the camera when this object has focus.
    fn position(&self) -> Option<DVec2> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Entry {
    id: ObjectId,
    object: Box<dyn Object>,
}

/// Insertion-ordered registry of world objects.
#[derive(Default)]
pub struct World {
    entries: Vec<Entry>,
    next_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T: Object>(&mut self, object: T) -> ObjectId {
        self.add_boxed(Box::new(object))
    }

    pub fn add_boxed(&mut self, object: Box<dyn Object>) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, object });
        log::debug!("object {id} added ({} registered)", self.entries.len());
        id
    }

    /// Removes an object, keeping the order of the rest intact.
    pub fn remove(&mut self, id: ObjectId) -> Option<Box<dyn Object>> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let entry = self.entries.remove(index);
        log::debug!("object {id} removed ({} registered)", self.entries.len());
        Some(entry.object)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn get<T: Object>(&self, id: ObjectId) -> Option<&T> {
        let entry = self.entries.iter().find(|entry| entry.id == id)?;
        (*entry.object).as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Object>(&mut self, id: ObjectId) -> Option<&mut T> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        (*entry.object).as_any_mut().downcast_mut::<T>()
    }

    pub fn position_of(&self, id: ObjectId) -> Option<DVec2> {
        let entry = self.entries.iter().find(|entry| entry.id == id)?;
        entry.object.position()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn update(&mut self) {
        for entry in &mut self.entries {
            entry.object.update();
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, options: &DrawOptions, frame: &Frame<'_>) {
        for entry in &self.entries {
            entry.object.draw(surface, options, frame);
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("ids", &self.ids().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}
