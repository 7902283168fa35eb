use derive_more::{Display, IntoIterator};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

///
/// Slot
///
/// Identity of one physical index back-end inside a fused index.
/// The set is closed and its order is the fan-out order.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Slot {
    #[display("number")]
    Number,
    #[display("spatial")]
    Spatial,
    #[display("generic")]
    Generic,
}

impl Slot {
    pub const COUNT: usize = 3;
    pub const ALL: [Self; Self::COUNT] = [Self::Number, Self::Spatial, Self::Generic];

    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Number => 0,
            Self::Spatial => 1,
            Self::Generic => 2,
        }
    }
}

///
/// SlotMap
///
/// Fixed-size collection holding exactly one `T` per [`Slot`], iterated in
/// slot order.
///

#[derive(Clone, Debug, Default, Eq, IntoIterator, PartialEq)]
#[into_iterator(owned, ref, ref_mut)]
pub struct SlotMap<T>([T; Slot::COUNT]);

impl<T> SlotMap<T> {
    pub const fn new(number: T, spatial: T, generic: T) -> Self {
        Self([number, spatial, generic])
    }

    /// Build a map by evaluating `f` once per slot, in slot order.
    pub fn from_fn(mut f: impl FnMut(Slot) -> T) -> Self {
        Self(Slot::ALL.map(&mut f))
    }

    pub const fn get(&self, slot: Slot) -> &T {
        &self.0[slot.position()]
    }

    pub const fn get_mut(&mut self, slot: Slot) -> &mut T {
        &mut self.0[slot.position()]
    }

    /// Iterate `(slot, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &T)> {
        Slot::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterate `(slot, value)` pairs mutably, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Slot, &mut T)> {
        Slot::ALL.into_iter().zip(self.0.iter_mut())
    }

    pub fn map<U>(self, mut f: impl FnMut(Slot, T) -> U) -> SlotMap<U> {
        let [number, spatial, generic] = self.0;
        SlotMap([
            f(Slot::Number, number),
            f(Slot::Spatial, spatial),
            f(Slot::Generic, generic),
        ])
    }

    /// Borrow every slot mutably at once.
    pub fn each_mut(&mut self) -> SlotMap<&mut T> {
        SlotMap(self.0.each_mut())
    }

    pub fn each_ref(&self) -> SlotMap<&T> {
        SlotMap(self.0.each_ref())
    }
}

impl<T> Index<Slot> for SlotMap<T> {
    type Output = T;

    fn index(&self, slot: Slot) -> &T {
        self.get(slot)
    }
}

impl<T> IndexMut<Slot> for SlotMap<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut T {
        self.get_mut(slot)
    }
}
