use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::components::mesh::{Geometry, Material};

/// Generation-tagged handle into a [`Pool`].
/// A handle outlives its resource only as a dead key: once disposed it never resolves again,
/// even if the slot is reused.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation, _marker: PhantomData }
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena standing in for GPU buffers: every insert is an allocation that must be
/// matched by exactly one `remove`.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Allocate a resource and return its handle.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            Handle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, value: Some(value) });
            Handle::new(index, 0)
        }
    }

    /// Release a resource. Returns `None` if the handle was already disposed.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_mut())
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live (allocated, not yet disposed) resources.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A geometry + material pair, the unit every drawable node owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHandle {
    pub geometry: Handle<Geometry>,
    pub material: Handle<Material>,
}

/// All disposable render resources owned by the scene.
#[derive(Default)]
pub struct Resources {
    pub geometries: Pool<Geometry>,
    pub materials: Pool<Material>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_mesh(&mut self, geometry: Geometry, material: Material) -> MeshHandle {
        MeshHandle {
            geometry: self.geometries.insert(geometry),
            material: self.materials.insert(material),
        }
    }

    /// Dispose both halves of a mesh. Returns `false` if either half was already gone,
    /// which means the caller disposed the same node twice.
    pub fn dispose_mesh(&mut self, mesh: MeshHandle) -> bool {
        let geometry = self.geometries.remove(mesh.geometry).is_some();
        let material = self.materials.remove(mesh.material).is_some();
        if !(geometry && material) {
            log::error!("double dispose of mesh {:?}/{:?}", mesh.geometry, mesh.material);
        }
        geometry && material
    }

    pub fn geometry(&self, mesh: MeshHandle) -> Option<&Geometry> {
        self.geometries.get(mesh.geometry)
    }

    pub fn material(&self, mesh: MeshHandle) -> Option<&Material> {
        self.materials.get(mesh.material)
    }

    pub fn material_mut(&mut self, mesh: MeshHandle) -> Option<&mut Material> {
        self.materials.get_mut(mesh.material)
    }

    /// Total live handles across both pools.
    pub fn live_count(&self) -> usize {
        self.geometries.len() + self.materials.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut pool = Pool::new();
        let h = pool.insert("a");
        assert_eq!(pool.get(h), Some(&"a"));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.remove(h), Some("a"));
        assert!(pool.is_empty());
    }

    #[test]
    fn double_remove_is_detected() {
        let mut pool = Pool::new();
        let h = pool.insert(1);
        assert!(pool.remove(h).is_some());
        assert!(pool.remove(h).is_none());
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut pool = Pool::new();
        let old = pool.insert(1);
        pool.remove(old);
        let new = pool.insert(2);
        assert_ne!(old, new);
        assert!(pool.get(old).is_none());
        assert!(pool.remove(old).is_none());
        assert_eq!(pool.get(new), Some(&2));
    }

    #[test]
    fn mesh_dispose_releases_both_halves() {
        let mut res = Resources::new();
        let mesh = res.create_mesh(Geometry::sphere(1.0), Material::default());
        assert_eq!(res.live_count(), 2);
        assert!(res.dispose_mesh(mesh));
        assert_eq!(res.live_count(), 0);
        assert!(!res.dispose_mesh(mesh));
    }
}
